//! ProxyApiClient - REST client for the server-side chat relay.
//!
//! The relay exposes a single completion endpoint that accepts the full
//! message sequence plus a model identifier and answers with either a reply
//! string or a structured error.

use crate::error::ChatFailure;
use crate::ChatBackend;
use async_trait::async_trait;
use confab_core::conversation::{ConversationMessage, MessageRole};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CHAT_ENDPOINT: &str = "/api/chat";

/// Client implementation that talks to the chat relay over HTTP.
#[derive(Clone)]
pub struct ProxyApiClient {
    client: Client,
    base_url: String,
}

impl ProxyApiClient {
    /// Creates a new client for the relay at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Sets a request timeout on the underlying HTTP client.
    ///
    /// Timing out is a transport concern; when the timeout fires the request
    /// surfaces as a transport failure like any other incomplete exchange.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Client::builder().timeout(timeout).build() {
            Ok(client) => Self { client, ..self },
            Err(e) => {
                tracing::warn!("Failed to configure HTTP client timeout: {e}");
                self
            }
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CHAT_ENDPOINT)
    }

    async fn send_request(&self, body: &ChatRequestBody<'_>) -> Result<String, ChatFailure> {
        let response = self
            .client
            .post(self.endpoint())
            .json(body)
            .send()
            .await
            .map_err(|err| ChatFailure::transport(format!("chat request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<ChatErrorBody>()
                .await
                .ok()
                .and_then(|b| b.detail.or(b.error))
                .unwrap_or_else(|| format!("server returned {status}"));
            return Err(ChatFailure::application(detail));
        }

        let parsed: ChatReplyBody = response
            .json()
            .await
            .map_err(|err| ChatFailure::transport(format!("failed to decode reply body: {err}")))?;

        Ok(parsed.reply.unwrap_or_default())
    }
}

#[async_trait]
impl ChatBackend for ProxyApiClient {
    async fn send_chat_request(
        &self,
        messages: &[ConversationMessage],
        model: &str,
    ) -> Result<String, ChatFailure> {
        let body = ChatRequestBody {
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
            model,
        };

        tracing::debug!(
            "Sending chat request with {} messages to {}",
            body.messages.len(),
            self.endpoint()
        );

        self.send_request(&body).await
    }
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    messages: Vec<WireMessage<'a>>,
    model: &'a str,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: MessageRole,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatReplyBody {
    reply: Option<String>,
}

#[derive(Deserialize)]
struct ChatErrorBody {
    error: Option<String>,
    detail: Option<String>,
}
