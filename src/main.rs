//! Backend function service.
//!
//! Hosts `createPaymentIntent` for the Stripe checkout adapter, since intent
//! creation needs the Stripe secret key.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;

use vr_tour_payments::adapters::auth::JwtSessionValidator;
use vr_tour_payments::adapters::http::{app_router, AuthState, FunctionsAppState};
use vr_tour_payments::adapters::stripe::{StripeConfig, StripePaymentIntentAdapter};
use vr_tour_payments::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let mut stripe = StripeConfig::new(config.payment.stripe_secret_key.clone());
    if let Some(base) = &config.payment.stripe_api_base {
        stripe = stripe.with_base_url(base);
    }
    tracing::info!(test_mode = stripe.is_test_mode(), "Stripe configured");

    let validator: AuthState = Arc::new(JwtSessionValidator::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_issuer.clone(),
        config.auth.jwt_audience.clone(),
    ));
    let functions = FunctionsAppState::new(Arc::new(StripePaymentIntentAdapter::new(stripe)));

    let app = app_router(
        functions,
        validator,
        cors_layer(&config.server),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Function service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Function service stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() && !server.is_production() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
