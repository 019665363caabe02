use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "charla")]
#[command(about = "Terminal chat client and HTTP relay for OpenAI-compatible endpoints")]
#[command(version)]
pub struct Args {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file (serve also keeps logging to stderr)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Session options used when no subcommand is given (same as `charla chat`)
    #[command(flatten)]
    pub session: SessionArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every command that opens a conversation.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Provider name from the config file
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Model name (falls back to the config file, then OPENAI_MODEL_NAME)
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Chat relay base URL (sends requests to `<url>/chat` instead of a provider)
    #[arg(short = 's', long)]
    pub server: Option<String>,

    /// Business identifier forwarded to the relay
    #[arg(short = 'b', long)]
    pub business_id: Option<String>,

    /// Persona for the system prompt (preset or custom)
    #[arg(long)]
    pub persona: Option<String>,

    /// Literal system prompt; overrides --persona ("" disables it)
    #[arg(long)]
    pub system_prompt: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat (default)
    Chat {
        #[command(flatten)]
        session: SessionArgs,

        /// Write an HTML transcript of the session to this file on exit
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
    /// Send a single message and print the reply
    Ask {
        /// File holding the message (reads from stdin if not provided)
        file: Option<String>,

        #[command(flatten)]
        session: SessionArgs,
    },
    /// Run the chat relay HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,

        /// Upstream provider name from the config file
        #[arg(short = 'p', long)]
        provider: Option<String>,

        /// Upstream model name
        #[arg(short = 'm', long)]
        model: Option<String>,

        /// Origin allowed by CORS (repeatable; "*" allows any)
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },
    /// List configured providers
    Providers {
        /// Show details for a specific provider
        provider: Option<String>,
    },
    /// Manage system-prompt personas
    Personas {
        #[command(subcommand)]
        command: Option<PersonasCommand>,
    },
    /// Configure default settings
    Configure,
}

#[derive(Subcommand, Debug)]
pub enum PersonasCommand {
    /// List preset and custom personas
    List,
    /// Show the prompt of a persona
    Show {
        /// Persona name
        name: String,
    },
}
