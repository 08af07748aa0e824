//! The send protocol: optimistic append, network exchange, reconciliation.

use confab_core::conversation::{
    ConversationController, ConversationId, ConversationMessage, derive_title,
};
use confab_core::view::{HistoryEntry, TranscriptView, project_history, project_transcript};
use confab_interaction::{ChatBackend, ChatFailure};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Shown in place of a reply the collaborator returned blank.
pub const EMPTY_REPLY_FALLBACK: &str = "(empty response)";

/// Fixed assistant message for a request that never completed. Carries no
/// detail because none is available.
pub const NETWORK_ERROR_TEXT: &str = "⚠️ Network error. Please try again in a moment.";

/// Builds the assistant message for a structured collaborator failure.
pub fn application_error_text(detail: &str) -> String {
    format!("⚠️ Error: {detail}")
}

/// A re-render signal carrying a fully re-derived projection.
///
/// The presentation shell renders exactly what it receives; no incremental
/// diffing contract exists between the exchange and the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderSignal {
    /// The history list changed (creation, selection, title update).
    History(Vec<HistoryEntry>),
    /// The message pane changed (append, typing indicator, selection).
    Transcript(TranscriptView),
}

/// Phases of one send exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    Idle,
    Composing,
    AwaitingReply,
    Settled,
    Failed,
}

/// Terminal result of one [`MessageExchange::send`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The input was blank; nothing happened.
    Ignored,
    /// A reply (possibly the blank-reply fallback) was appended.
    Settled,
    /// An error message was appended in place of a reply.
    Failed,
}

/// Orchestrates the append -> persist -> request -> reconcile cycle.
///
/// The exchange owns the conversation controller and the network backend.
/// Every mutation is persisted and signalled before the next step runs, so
/// the shell always renders durable state plus the presentation-only typing
/// flag.
///
/// Sends are serialized by construction: `send` takes `&mut self` and the
/// single caller awaits one exchange before starting the next. There is no
/// internal locking and no cancellation; an issued send always runs to one
/// of its terminal outcomes.
pub struct MessageExchange {
    controller: ConversationController,
    backend: Arc<dyn ChatBackend>,
    model: String,
    typing: bool,
    phase: ExchangePhase,
    signals: UnboundedSender<RenderSignal>,
}

impl MessageExchange {
    pub fn new(
        controller: ConversationController,
        backend: Arc<dyn ChatBackend>,
        model: impl Into<String>,
        signals: UnboundedSender<RenderSignal>,
    ) -> Self {
        Self {
            controller,
            backend,
            model: model.into(),
            typing: false,
            phase: ExchangePhase::Idle,
            signals,
        }
    }

    /// Sends user text through the full exchange cycle.
    ///
    /// Blank input is ignored. Without an active conversation one is created
    /// implicitly, seeded with the text. The user message is appended and
    /// persisted before the request is issued; exactly one of the three
    /// terminal appends (reply, application error, network error) follows,
    /// and the typing indicator is cleared on every terminal path.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        self.enter_phase(ExchangePhase::Composing);

        if self.controller.get_active().is_none() {
            self.controller.create_conversation(Some(text));
            self.emit_history();
            self.emit_transcript();
        }

        if self.controller.get_active().is_none() {
            tracing::warn!("No active conversation after implicit creation; dropping send");
            self.enter_phase(ExchangePhase::Idle);
            return SendOutcome::Ignored;
        }

        if let Some(conversation) = self.controller.get_active_mut() {
            conversation.push_message(ConversationMessage::user(text));
            // The only point after creation where a title may change: a
            // placeholder takes its derived title from the first real text.
            if conversation.placeholder_title {
                conversation.retitle(derive_title(text));
            }
        }
        self.controller.store().save();
        self.emit_history();
        self.emit_transcript();

        self.enter_phase(ExchangePhase::AwaitingReply);
        // A stale indicator from a previous exchange is superseded here;
        // exactly one indicator is ever active.
        self.set_typing(true);

        let messages = self
            .controller
            .get_active()
            .map(|c| c.messages.clone())
            .unwrap_or_default();
        let result = self.backend.send_chat_request(&messages, &self.model).await;

        self.set_typing(false);

        let (content, outcome) = match result {
            Ok(reply) => {
                let content = if reply.trim().is_empty() {
                    EMPTY_REPLY_FALLBACK.to_string()
                } else {
                    reply
                };
                (content, SendOutcome::Settled)
            }
            Err(ChatFailure::Application { detail }) => {
                (application_error_text(&detail), SendOutcome::Failed)
            }
            Err(ChatFailure::Transport { message }) => {
                tracing::warn!("Chat transport failure: {message}");
                (NETWORK_ERROR_TEXT.to_string(), SendOutcome::Failed)
            }
        };

        if let Some(conversation) = self.controller.get_active_mut() {
            conversation.push_message(ConversationMessage::assistant(content));
        }
        self.controller.store().save();
        self.emit_transcript();

        self.enter_phase(match outcome {
            SendOutcome::Settled => ExchangePhase::Settled,
            _ => ExchangePhase::Failed,
        });
        self.enter_phase(ExchangePhase::Idle);

        outcome
    }

    /// Creates a new, empty conversation and makes it active.
    pub fn new_conversation(&mut self) -> ConversationId {
        let id = self.controller.create_conversation(None);
        self.emit_history();
        self.emit_transcript();
        id
    }

    /// Selects a conversation; unknown ids are ignored.
    pub fn select_conversation(&mut self, id: ConversationId) {
        self.controller.select_conversation(id);
        self.emit_history();
        self.emit_transcript();
    }

    /// Current history projection.
    pub fn history_view(&self) -> Vec<HistoryEntry> {
        project_history(self.controller.store())
    }

    /// Current message-pane projection.
    pub fn transcript_view(&self) -> TranscriptView {
        project_transcript(self.controller.get_active(), self.typing)
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    fn enter_phase(&mut self, phase: ExchangePhase) {
        tracing::debug!("Exchange phase: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn set_typing(&mut self, active: bool) {
        self.typing = active;
        self.emit_transcript();
    }

    fn emit_history(&self) {
        let _ = self.signals.send(RenderSignal::History(self.history_view()));
    }

    fn emit_transcript(&self) {
        let _ = self
            .signals
            .send(RenderSignal::Transcript(self.transcript_view()));
    }
}
