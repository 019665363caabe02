use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use std::path::PathBuf;
use std::sync::Arc;

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::presenter::TerminalPresenter;
use super::ui;
use crate::completion::CompletionService;
use crate::config::ResolvedConfig;
use crate::exchange::{ExchangeCoordinator, SubmitOutcome};
use crate::render::HtmlTranscript;
use crate::ui::{Style, is_prompt_cancelled};

/// Options that only affect the terminal session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Where to write an HTML transcript when the session ends.
    pub transcript: Option<PathBuf>,
}

/// An interactive chat session.
///
/// Owns one coordinator, and with it one conversation, for the lifetime of
/// the REPL.
pub struct ChatSession {
    config: ResolvedConfig,
    coordinator: ExchangeCoordinator,
    transcript: Option<(PathBuf, Arc<HtmlTranscript>)>,
}

impl ChatSession {
    pub fn new(
        config: ResolvedConfig,
        service: Arc<dyn CompletionService>,
        options: SessionOptions,
    ) -> Self {
        let mut coordinator = ExchangeCoordinator::new(config.exchange_settings(), service);
        coordinator.subscribe(Arc::new(TerminalPresenter::new()));

        let transcript = options.transcript.map(|path| {
            let transcript = Arc::new(HtmlTranscript::with_history(&coordinator.snapshot()));
            coordinator.subscribe(transcript.clone());
            (path, transcript)
        });

        Self {
            config,
            coordinator,
            transcript,
        }
    }

    pub async fn run(&self) -> Result<()> {
        ui::print_header(&self.config);

        let prompt_style = Styled::new("You ›")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .prompt();

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => {
                        if !self.handle_command(cmd) {
                            break;
                        }
                    }
                    Input::Text(text) => {
                        self.send(&text).await;
                    }
                },
                Err(e) if is_prompt_cancelled(&e) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.write_transcript()?;
        ui::print_goodbye();
        Ok(())
    }

    async fn send(&self, text: &str) {
        if let SubmitOutcome::Rejected(reason) = self.coordinator.submit(text).await {
            tracing::debug!(?reason, "Submission rejected");
        }
    }

    fn handle_command(&self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Config => {
                ui::print_config(&self.config);
                true
            }
            SlashCommand::Help => {
                ui::print_help();
                true
            }
            SlashCommand::History => {
                ui::print_history(&self.coordinator.snapshot());
                true
            }
            SlashCommand::Quit => false,
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
                true
            }
        }
    }

    fn write_transcript(&self) -> Result<()> {
        let Some((path, transcript)) = &self.transcript else {
            return Ok(());
        };

        let html = transcript.render_document("charla transcript");
        crate::fs::atomic_write(path, &html)?;
        println!(
            "{} Transcript saved to {}",
            Style::success("✓"),
            Style::secondary(path.display())
        );
        Ok(())
    }
}
