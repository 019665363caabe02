use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{CompletionError, CompletionService, build_http_client, read_success_body};
use crate::conversation::Message;

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    messages: &'a [Message],
    business_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    reply: String,
}

/// Client for a chat relay exposing `POST <base-url>/chat`.
///
/// This is the contract the embeddable widget speaks; `charla serve` provides it.
pub struct RelayClient {
    client: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_http_client(timeout),
            base_url: base_url.into(),
        }
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for RelayClient {
    async fn complete(
        &self,
        messages: &[Message],
        business_id: Option<&str>,
    ) -> Result<String, CompletionError> {
        let url = self.chat_url();
        let body = RelayRequest {
            messages,
            business_id,
        };

        tracing::debug!(%url, messages = messages.len(), ?business_id, "Sending chat request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::network(&url, &e))?;

        let text = read_success_body(&url, response).await?;
        parse_reply(&text)
    }
}

fn parse_reply(body: &str) -> Result<String, CompletionError> {
    serde_json::from_str::<RelayResponse>(body)
        .map(|r| r.reply)
        .map_err(|e| CompletionError::Format(e.to_string()))
}
