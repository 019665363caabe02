//! # charla - Terminal chat client and HTTP relay
//!
//! `charla` keeps a role-tagged conversation, sends the whole history to an
//! OpenAI-compatible endpoint (directly or through a relay), and shows the
//! reply. Only one exchange is in flight at a time; when the remote call
//! fails the user sees a fixed fallback reply instead of an error.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive chat (Spanish persona by default)
//! charla
//!
//! # One question from stdin
//! echo "¿Qué es Rust?" | charla ask
//!
//! # Run the relay used by the web widget, then chat through it
//! charla serve --port 8000
//! charla chat --server http://localhost:8000 --business-id restaurant_123
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/charla/config.toml`:
//!
//! ```toml
//! [charla]
//! provider = "openai"
//! model = "gpt-4o-mini"
//! persona = "spanish"
//!
//! [providers.openai]
//! endpoint = "https://api.openai.com"
//! api_key_env = "OPENAI_API_KEY"
//! ```

/// Interactive chat mode.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Remote completion clients (provider and relay).
pub mod completion;

/// Configuration file management and provider settings.
pub mod config;

/// Conversation history.
pub mod conversation;

/// Single-flight exchange coordination.
pub mod exchange;

/// File system utilities.
pub mod fs;

/// Input reading from files and stdin.
pub mod input;

/// Tracing subscriber setup.
pub mod logging;

/// XDG-style path utilities for configuration.
pub mod paths;

/// System-prompt personas (presets and custom).
pub mod persona;

/// HTML rendering of conversations.
pub mod render;

/// Chat relay HTTP API.
pub mod server;

/// Terminal UI components (spinner, colors).
pub mod ui;
