use crate::conversation::Message;

/// Something the coordinator reports to its presenters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeEvent {
    /// A message was added to the conversation.
    MessageAppended(Message),
    /// A request to the completion service is in flight.
    Pending,
    /// The in-flight request finished, successfully or not.
    Settled,
}

/// Receives coordinator events, in the order they happen.
///
/// Presenters (terminal, HTML transcript) implement this instead of being
/// called back from inside the coordinator's logic.
pub trait ExchangeObserver: Send + Sync {
    fn on_event(&self, event: &ExchangeEvent);
}
