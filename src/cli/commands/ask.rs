//! One-shot question command handler.

use anyhow::{Result, bail};
use std::io::{self, Write};

use super::chat::load_resolved_config;
use crate::cli::SessionArgs;
use crate::exchange::{ExchangeCoordinator, SubmitOutcome};
use crate::input::InputReader;
use crate::ui::Spinner;

pub struct AskOptions {
    pub file: Option<String>,
    pub session: SessionArgs,
}

/// Sends one message and prints the reply to stdout.
///
/// Returns `false` when the reply is the fallback message, so the caller can
/// exit with a failure status.
pub async fn run_ask(options: AskOptions) -> Result<bool> {
    let config = load_resolved_config(&options.session)?;

    let input = InputReader::read(options.file.as_deref())?;
    let text = input.trim();
    if text.is_empty() {
        bail!("Error: Input is empty");
    }

    let service = config.backend.connect(config.timeout);
    let coordinator = ExchangeCoordinator::new(config.exchange_settings(), service);

    let spinner = Spinner::new("Thinking...");
    spinner.start();
    let outcome = coordinator.submit(text).await;
    spinner.stop();

    match outcome {
        SubmitOutcome::Replied(reply) => {
            print_reply(reply.content())?;
            Ok(true)
        }
        SubmitOutcome::Fallback(reply) => {
            eprintln!("{}", reply.content());
            Ok(false)
        }
        SubmitOutcome::Rejected(reason) => bail!("Message was not sent: {reason:?}"),
    }
}

fn print_reply(reply: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{reply}")?;
    stdout.flush()?;
    Ok(())
}
