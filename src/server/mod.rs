//! Chat relay HTTP API.
//!
//! The relay is what the embeddable widget (and `charla chat --server`) talks
//! to. It holds no conversation state: every request carries the full history.

mod email;
mod handlers;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::completion::CompletionService;

pub use email::{ColdEmailRequest, ColdEmailResponse, EmailLanguage, EmailTone};
pub use handlers::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse};

#[derive(Clone)]
struct AppState {
    service: Arc<dyn CompletionService>,
}

/// Builds the CORS layer for the relay.
///
/// An empty list, or one containing `"*"`, allows any origin. Otherwise only
/// the listed origins get an `access-control-allow-origin` header.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin.trim().trim_end_matches('/'))
                    .with_context(|| format!("Invalid CORS origin '{origin}'"))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Builds the relay router on top of an upstream completion service.
pub fn router(service: Arc<dyn CompletionService>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/cold-email", post(handlers::cold_email))
        .layer(cors)
        .with_state(AppState { service })
}

/// Serves the relay on an already bound listener until the process stops.
pub async fn serve(
    listener: TcpListener,
    service: Arc<dyn CompletionService>,
    cors: CorsLayer,
) -> Result<()> {
    let addr = listener
        .local_addr()
        .context("Failed to read the listener address")?;
    tracing::info!("Relay listening on http://{addr}");

    axum::serve(listener, router(service, cors).into_make_service())
        .await
        .context("Relay server stopped unexpectedly")
}

/// Binds `host:port` and serves the relay.
pub async fn bind_and_serve(
    host: &str,
    port: u16,
    service: Arc<dyn CompletionService>,
    cors: CorsLayer,
) -> Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}. Try a different port."))?;
    serve(listener, service, cors).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_wildcard_and_lists() {
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["*".to_string()]).is_ok());
        assert!(cors_layer(&["https://shop.example/".to_string()]).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let err = cors_layer(&["https://shop.example".to_string(), "bad\u{7f}".to_string()])
            .err()
            .unwrap();
        assert!(err.to_string().contains("Invalid CORS origin"));
    }
}
