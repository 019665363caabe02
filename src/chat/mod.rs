//! Interactive terminal chat.
//!
//! A REPL over an [`ExchangeCoordinator`](crate::exchange::ExchangeCoordinator),
//! with slash commands for inspecting the session.

/// Slash command parsing and autocomplete.
pub mod command;
mod presenter;
mod session;
mod ui;

pub use presenter::TerminalPresenter;
pub use session::{ChatSession, SessionOptions};
