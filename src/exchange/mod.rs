//! One request/response cycle per user turn.
//!
//! The [`ExchangeCoordinator`] owns the session's [`Conversation`](crate::conversation::Conversation)
//! and guarantees at most one outstanding exchange at a time.

mod coordinator;
mod event;

pub use coordinator::{
    ExchangeCoordinator, ExchangeSettings, FALLBACK_REPLY, Rejection, SubmitOutcome,
};
pub use event::{ExchangeEvent, ExchangeObserver};
