//! Network collaborator for the chat client.
//!
//! Exposes the [`ChatBackend`] port consumed by the send protocol and the
//! HTTP implementation talking to the server-side relay.

mod error;
mod proxy_client;

pub use error::ChatFailure;
pub use proxy_client::ProxyApiClient;

use async_trait::async_trait;
use confab_core::conversation::ConversationMessage;

/// An abstract chat completion backend.
///
/// One call issues exactly one request carrying the conversation's full,
/// in-order message sequence and the desired model identifier. The backend
/// performs no retries; cancellation and timeouts, where supported, are
/// implementation concerns.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Requests a completion for the given message sequence.
    ///
    /// # Returns
    ///
    /// - `Ok(reply)`: the collaborator signalled a normal completion
    /// - `Err(ChatFailure::Application { .. })`: a structured, reportable
    ///   rejection
    /// - `Err(ChatFailure::Transport { .. })`: the request never completed
    async fn send_chat_request(
        &self,
        messages: &[ConversationMessage],
        model: &str,
    ) -> Result<String, ChatFailure>;
}
