//! Persona listing command handler.

use anyhow::Result;

use crate::config::ConfigManager;
use crate::persona::{PRESETS, get_preset, resolve_persona, sorted_custom_keys};
use crate::ui::Style;

/// Lists all available personas (presets and custom).
pub fn list_personas() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    println!("{}", Style::header("Preset personas"));
    for preset in PRESETS {
        println!(
            "  {}  {}",
            Style::value(format!("{:10}", preset.key)),
            Style::secondary(preset.description)
        );
    }

    if !config.personas.is_empty() {
        println!();
        println!("{}", Style::header("Custom personas"));
        for key in sorted_custom_keys(&config.personas) {
            let description = config
                .personas
                .get(key)
                .map_or("", |p| p.description.as_str());
            println!(
                "  {}  {}",
                Style::value(format!("{key:10}")),
                Style::secondary(description)
            );
        }
    }

    Ok(())
}

/// Shows details of a persona (description and prompt).
pub fn show_persona(name: &str) -> Result<()> {
    if let Some(preset) = get_preset(name) {
        print_persona("Preset persona", preset.key, preset.description, preset.prompt);
        return Ok(());
    }

    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    let resolved = resolve_persona(name, &config.personas)?;
    let description = config
        .personas
        .get(name)
        .map_or("", |p| p.description.as_str());
    print_persona("Custom persona", resolved.key(), description, resolved.prompt());

    Ok(())
}

fn print_persona(title: &str, key: &str, description: &str, prompt: &str) {
    println!("{}", Style::header(title));
    println!();
    println!("  {}  {}", Style::label("Name:"), Style::value(key));
    println!("  {}  {}", Style::label("Desc:"), Style::secondary(description));
    println!();
    println!("{}", Style::label("Prompt:"));
    println!("{prompt}");
}
