//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Select, Text};

use crate::config::{BUILTIN_PROVIDER, CharlaConfig, ConfigFile, ConfigManager, DEFAULT_MODEL};
use crate::persona::{DEFAULT_PERSONA, PRESETS, sorted_custom_keys};
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command to edit default settings.
///
/// Allows the user to interactively set the default provider, model, persona,
/// business id and relay server.
pub fn run_configure() -> Result<()> {
    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    print_current_defaults(&config);

    let mut provider_names: Vec<String> = config.providers.keys().cloned().collect();
    if !config.providers.contains_key(BUILTIN_PROVIDER) {
        provider_names.push(BUILTIN_PROVIDER.to_string());
    }
    provider_names.sort();

    let provider = select_provider(&provider_names, config.charla.provider.as_deref())?;

    let available_models: Vec<String> = config
        .providers
        .get(&provider)
        .map(|p| p.models.clone())
        .unwrap_or_default();
    let model = select_model(&available_models, config.charla.model.as_deref())?;

    let persona = select_persona(&config, config.charla.persona.as_deref())?;

    let business_id = optional_text(
        "Default business id:",
        "Sent with relay requests; leave empty for none",
        config.charla.business_id.as_deref(),
    )?;

    let server = optional_text(
        "Relay server URL:",
        "Chat through a relay (e.g., http://localhost:8000); leave empty to call the provider",
        config.charla.server.as_deref(),
    )?;

    config.charla = CharlaConfig {
        provider: Some(provider),
        model: Some(model),
        persona: Some(persona),
        business_id,
        server,
        request_timeout_secs: config.charla.request_timeout_secs,
        cors_origins: config.charla.cors_origins.clone(),
    };

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    let entries = [
        ("provider", config.charla.provider.as_deref()),
        ("model", config.charla.model.as_deref()),
        ("persona", config.charla.persona.as_deref()),
        ("business_id", config.charla.business_id.as_deref()),
        ("server", config.charla.server.as_deref()),
    ];

    println!("{}", Style::header("Current defaults"));
    for (label, value) in entries {
        println!(
            "  {}  {}",
            Style::label(format!("{label:11}")),
            value.map_or_else(|| Style::secondary("(not set)"), Style::value)
        );
    }
    println!();
}

fn select_provider(providers: &[String], default: Option<&str>) -> Result<String> {
    let default_index = providers
        .iter()
        .position(|p| p == default.unwrap_or(BUILTIN_PROVIDER))
        .unwrap_or(0);

    let selection = Select::new("Default provider:", providers.to_vec())
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}

fn select_model(available_models: &[String], default: Option<&str>) -> Result<String> {
    if available_models.is_empty() {
        let model = Text::new("Default model:")
            .with_help_message("Enter the model name")
            .with_default(default.unwrap_or(DEFAULT_MODEL))
            .prompt()?;

        if model.trim().is_empty() {
            bail!("Model name cannot be empty");
        }

        Ok(model.trim().to_string())
    } else {
        let default_index = default
            .and_then(|d| available_models.iter().position(|m| m == d))
            .unwrap_or(0);

        let selection = Select::new("Default model:", available_models.to_vec())
            .with_starting_cursor(default_index)
            .prompt()?;

        Ok(selection)
    }
}

fn select_persona(config: &ConfigFile, default: Option<&str>) -> Result<String> {
    let custom_keys = sorted_custom_keys(&config.personas);

    let mut keys: Vec<&str> = PRESETS.iter().map(|p| p.key).collect();
    keys.extend(custom_keys.iter().map(|k| k.as_str()));

    let options: Vec<String> = PRESETS
        .iter()
        .map(|p| format!("{} - {}", p.key, p.description))
        .chain(custom_keys.iter().map(|key| {
            let desc = config
                .personas
                .get(*key)
                .map_or("", |p| p.description.as_str());
            format!("{key} - {desc}")
        }))
        .collect();

    let default_index = keys
        .iter()
        .position(|k| *k == default.unwrap_or(DEFAULT_PERSONA))
        .unwrap_or(0);

    let selection = Select::new("Default persona:", options)
        .with_starting_cursor(default_index)
        .raw_prompt()?;

    Ok(keys
        .get(selection.index)
        .copied()
        .unwrap_or(DEFAULT_PERSONA)
        .to_string())
}

fn optional_text(message: &str, help: &str, default: Option<&str>) -> Result<Option<String>> {
    let mut prompt = Text::new(message).with_help_message(help);
    if let Some(d) = default {
        prompt = prompt.with_default(d);
    }

    let value = prompt.prompt()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}
