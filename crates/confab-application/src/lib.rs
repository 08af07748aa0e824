//! Application layer: the message exchange protocol.

mod exchange;

pub use exchange::{
    EMPTY_REPLY_FALLBACK, ExchangePhase, MessageExchange, NETWORK_ERROR_TEXT, RenderSignal,
    SendOutcome, application_error_text,
};
