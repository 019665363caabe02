use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::event::{ExchangeEvent, ExchangeObserver};
use crate::completion::CompletionService;
use crate::conversation::{Conversation, Message};

/// Reply recorded in place of a real one when the completion call fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't get a response right now. Please try again in a moment.";

/// Per-session settings, fixed when the coordinator is created.
#[derive(Debug, Clone, Default)]
pub struct ExchangeSettings {
    /// Persona or language directive that opens the conversation.
    pub system_prompt: Option<String>,
    /// Opaque tenant identifier forwarded with every request.
    pub business_id: Option<String>,
}

/// Why a submission was dropped without touching the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The text was empty or whitespace only.
    Blank,
    /// Another exchange is still in flight.
    Busy,
}

/// Result of [`ExchangeCoordinator::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service replied; carries the appended assistant message.
    Replied(Message),
    /// The service failed; carries the appended fallback message.
    Fallback(Message),
    Rejected(Rejection),
}

impl SubmitOutcome {
    /// The assistant message appended by this submission, if any.
    pub const fn message(&self) -> Option<&Message> {
        match self {
            Self::Replied(message) | Self::Fallback(message) => Some(message),
            Self::Rejected(_) => None,
        }
    }

    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Drives user turns through the completion service for one session.
pub struct ExchangeCoordinator {
    conversation: Mutex<Conversation>,
    busy: AtomicBool,
    service: Arc<dyn CompletionService>,
    business_id: Option<String>,
    observers: Vec<Arc<dyn ExchangeObserver>>,
}

impl ExchangeCoordinator {
    pub fn new(settings: ExchangeSettings, service: Arc<dyn CompletionService>) -> Self {
        let conversation = settings
            .system_prompt
            .map_or_else(Conversation::new, Conversation::with_system_prompt);

        Self {
            conversation: Mutex::new(conversation),
            busy: AtomicBool::new(false),
            service,
            business_id: settings.business_id,
            observers: Vec::new(),
        }
    }

    /// Registers an observer for all subsequent events.
    pub fn subscribe(&mut self, observer: Arc<dyn ExchangeObserver>) {
        self.observers.push(observer);
    }

    /// Runs one exchange for `user_text`.
    ///
    /// Blank text, or a call made while another exchange is in flight, is
    /// rejected without changing the conversation. Otherwise exactly two
    /// messages are appended: the user's text and either the reply or
    /// [`FALLBACK_REPLY`].
    pub async fn submit(&self, user_text: &str) -> SubmitOutcome {
        if user_text.trim().is_empty() {
            return SubmitOutcome::Rejected(Rejection::Blank);
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Exchange already in flight, dropping submission");
            return SubmitOutcome::Rejected(Rejection::Busy);
        }
        let _busy = BusyGuard { coordinator: self };

        self.record(Message::user(user_text));
        self.emit(&ExchangeEvent::Pending);

        let snapshot = self.snapshot();
        let outcome = match self
            .service
            .complete(&snapshot, self.business_id.as_deref())
            .await
        {
            Ok(reply) => SubmitOutcome::Replied(Message::assistant(reply)),
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "Completion failed, using fallback reply");
                SubmitOutcome::Fallback(Message::assistant(FALLBACK_REPLY))
            }
        };

        if let Some(message) = outcome.message() {
            self.record(message.clone());
        }

        outcome
    }

    /// Returns a copy of the conversation so far.
    pub fn snapshot(&self) -> Vec<Message> {
        self.lock().snapshot()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn business_id(&self) -> Option<&str> {
        self.business_id.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Conversation> {
        self.conversation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, message: Message) {
        let appended = self.lock().append(message.clone());
        match appended {
            Ok(()) => self.emit(&ExchangeEvent::MessageAppended(message)),
            Err(err) => tracing::error!(error = %err, "Message not recorded"),
        }
    }

    fn emit(&self, event: &ExchangeEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

/// Clears the busy flag when the exchange ends, however it ends.
struct BusyGuard<'a> {
    coordinator: &'a ExchangeCoordinator,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.busy.store(false, Ordering::Release);
        self.coordinator.emit(&ExchangeEvent::Settled);
    }
}
