//! HTTP client for trusted backend functions.
//!
//! Speaks the callable-function envelope: POST `{base}/{name}` with
//! `{"data": payload}` and the caller's bearer token; a success body is
//! `{"result": value}`, an error body is `{"error": {"status", "message"}}`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ports::{BackendFunctions, FunctionError};

#[derive(Debug, Deserialize)]
struct SuccessEnvelope {
    result: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    status: String,
    message: String,
}

pub struct HttpBackendFunctions {
    http_client: reqwest::Client,
    base_url: String,
    bearer_token: Option<SecretString>,
}

impl HttpBackendFunctions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Calls are made on behalf of the user holding `token`.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(SecretString::new(token.into()));
        self
    }

    fn function_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

/// Maps a non-success response body to a `FunctionError`.
fn rejection(status: reqwest::StatusCode, body: &str) -> FunctionError {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return FunctionError::Unauthenticated;
    }
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => FunctionError::Rejected {
            status: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => FunctionError::Rejected {
            status: status.as_u16().to_string(),
            message: body.to_string(),
        },
    }
}

#[async_trait]
impl BackendFunctions for HttpBackendFunctions {
    async fn call(&self, name: &str, payload: Value) -> Result<Value, FunctionError> {
        let mut request = self
            .http_client
            .post(self.function_url(name))
            .json(&json!({ "data": payload }));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| FunctionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(function = name, status = %status, "Backend function call rejected");
            return Err(rejection(status, &body));
        }

        let envelope: SuccessEnvelope = response
            .json()
            .await
            .map_err(|e| FunctionError::InvalidResponse(e.to_string()))?;
        Ok(envelope.result)
    }
}
