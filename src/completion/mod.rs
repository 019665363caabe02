//! Clients for the remote service that turns a conversation into a reply.

use async_trait::async_trait;
use reqwest::Response;
use std::time::Duration;

use crate::conversation::Message;

mod error;
mod provider;
mod relay;

pub use error::CompletionError;
pub use provider::ProviderClient;
pub use relay::RelayClient;

/// Timeout applied to every completion request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A remote service that produces the next assistant reply for a conversation.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends the full conversation so far and returns the reply text.
    ///
    /// `business_id` is an opaque tenant identifier passed through untouched.
    async fn complete(
        &self,
        messages: &[Message],
        business_id: Option<&str>,
    ) -> Result<String, CompletionError>;
}

fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Reads the body of a response, turning a non-success status into an error.
async fn read_success_body(url: &str, response: Response) -> Result<String, CompletionError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CompletionError::Protocol {
            status: status.as_u16(),
            body,
        });
    }

    response
        .text()
        .await
        .map_err(|e| CompletionError::network(url, &e))
}
