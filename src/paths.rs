//! XDG-style path utilities.
//!
//! Prefers XDG Base Directory conventions over OS-specific locations, so the
//! config lives in the same place on macOS and Linux.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "charla";

/// Returns the configuration directory for charla.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/charla` if `XDG_CONFIG_HOME` is set and non-empty
/// 2. `~/.config/charla` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => {
            let home = dirs::home_dir().context("Failed to determine home directory")?;
            Ok(home.join(".config").join(APP_DIR))
        }
    }
}
