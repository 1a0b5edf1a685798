//! Mock backend functions for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::ports::{BackendFunctions, FunctionError};

#[derive(Default)]
struct MockState {
    responses: HashMap<String, Result<Value, FunctionError>>,
    calls: Vec<(String, Value)>,
}

/// Returns a configured response per function name and records every call.
#[derive(Clone, Default)]
pub struct MockBackendFunctions {
    inner: Arc<Mutex<MockState>>,
}

impl MockBackendFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, name: &str, response: Result<Value, FunctionError>) {
        self.inner
            .lock()
            .unwrap()
            .responses
            .insert(name.to_string(), response);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.inner.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl BackendFunctions for MockBackendFunctions {
    async fn call(&self, name: &str, payload: Value) -> Result<Value, FunctionError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push((name.to_string(), payload));
        state
            .responses
            .get(name)
            .cloned()
            .unwrap_or_else(|| {
                Err(FunctionError::Rejected {
                    status: "NOT_FOUND".to_string(),
                    message: format!("function '{}' is not deployed", name),
                })
            })
    }
}
