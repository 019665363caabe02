//! Chat mode UI components.

use crate::config::{Backend, ResolvedConfig};
use crate::conversation::Message;
use crate::ui::Style;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(config: &ResolvedConfig) {
    println!(
        "{} {} - Interactive Chat",
        Style::header("charla"),
        Style::version(format!("v{VERSION}"))
    );
    if let Some(persona) = &config.persona_name {
        println!("{} {}", Style::label("persona"), Style::value(persona));
    }
    println!(
        "{}",
        Style::secondary("Type a message, /help for commands, 'exit' or Ctrl+C to quit")
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_message(message: &Message) {
    println!("{} {}", Style::speaker(message.role()), message.content());
    println!();
}

pub fn print_config(config: &ResolvedConfig) {
    println!("{}", Style::header("Configuration"));
    match &config.backend {
        Backend::Provider(provider) => {
            println!(
                "  {}     {}",
                Style::label("provider"),
                Style::value(&provider.name)
            );
            println!(
                "  {}        {}",
                Style::label("model"),
                Style::value(&provider.model)
            );
            println!(
                "  {}     {}",
                Style::label("endpoint"),
                Style::secondary(&provider.endpoint)
            );
        }
        Backend::Relay { url } => {
            println!("  {}       {}", Style::label("server"), Style::value(url));
        }
    }
    println!(
        "  {}      {}",
        Style::label("persona"),
        config
            .persona_name
            .as_deref()
            .map_or_else(|| Style::secondary("(custom prompt)"), Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("business_id"),
        config
            .business_id
            .as_deref()
            .map_or_else(|| Style::secondary("(not set)"), Style::value)
    );
    println!();
}

pub fn print_history(messages: &[Message]) {
    println!("{}", Style::header("Conversation"));
    if messages.is_empty() {
        println!("  {}", Style::secondary("(empty)"));
    }
    for message in messages {
        println!("  {} {}", Style::speaker(message.role()), message.content());
    }
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    println!(
        "  {}   {}",
        Style::command("/config"),
        Style::secondary("Show current configuration")
    );
    println!(
        "  {}  {}",
        Style::command("/history"),
        Style::secondary("Show the conversation so far")
    );
    println!(
        "  {}     {}",
        Style::command("/help"),
        Style::secondary("Show this help")
    );
    println!(
        "  {}     {}",
        Style::command("/quit"),
        Style::secondary("Exit chat mode (or type 'exit')")
    );
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
