use crate::conversation::Role;
use crate::exchange::{ExchangeEvent, ExchangeObserver};
use crate::ui::Spinner;

use super::ui;

/// Renders coordinator events in the terminal.
///
/// User lines are already echoed by the prompt, so only assistant replies
/// are printed. The spinner covers the time a reply is pending.
pub struct TerminalPresenter {
    spinner: Spinner,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            spinner: Spinner::new("Thinking..."),
        }
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeObserver for TerminalPresenter {
    fn on_event(&self, event: &ExchangeEvent) {
        match event {
            ExchangeEvent::Pending => self.spinner.start(),
            ExchangeEvent::MessageAppended(message) if message.role() == Role::Assistant => {
                self.spinner.stop();
                ui::print_message(message);
            }
            ExchangeEvent::MessageAppended(_) => {}
            ExchangeEvent::Settled => {
                self.spinner.stop();
            }
        }
    }
}
