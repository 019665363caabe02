use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{CompletionError, CompletionService, build_http_client, read_success_body};
use crate::conversation::Message;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ProviderClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ProviderClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: build_http_client(timeout),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionService for ProviderClient {
    async fn complete(
        &self,
        messages: &[Message],
        business_id: Option<&str>,
    ) -> Result<String, CompletionError> {
        let url = self.completions_url();

        tracing::info!(
            model = %self.model,
            messages = messages.len(),
            ?business_id,
            "Calling model"
        );

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let mut http_request = self.client.post(&url).json(&body);

        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| CompletionError::network(&url, &e))?;

        let text = read_success_body(&url, response).await?;
        let reply = parse_first_choice(&text)?;

        tracing::info!(chars = reply.chars().count(), "Reply received");
        Ok(reply)
    }
}

fn parse_first_choice(body: &str) -> Result<String, CompletionError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Format(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| CompletionError::Format("response has no message content".to_string()))
}
