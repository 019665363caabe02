//! Provider listing command handler.

use anyhow::Result;

use crate::config::{BUILTIN_PROVIDER, ConfigManager, ProviderConfig};
use crate::ui::Style;

/// Prints configured providers to stdout.
///
/// If `specific_provider` is provided, shows detailed information for that provider.
/// Otherwise, lists every configured provider; the built-in `openai` provider is
/// listed when the config file does not override it.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    let mut providers: Vec<(String, ProviderConfig)> = config
        .providers
        .iter()
        .map(|(name, provider)| (name.clone(), provider.clone()))
        .collect();
    if !config.providers.contains_key(BUILTIN_PROVIDER) {
        providers.push((BUILTIN_PROVIDER.to_string(), ProviderConfig::builtin()));
    }
    providers.sort_by(|a, b| a.0.cmp(&b.0));

    let default_provider = config
        .charla
        .provider
        .as_deref()
        .unwrap_or(BUILTIN_PROVIDER);

    if let Some(provider_name) = specific_provider {
        let Some((_, provider)) = providers.iter().find(|(name, _)| name == provider_name) else {
            anyhow::bail!("Provider '{provider_name}' not found");
        };

        let is_default = default_provider == provider_name;
        println!(
            "{} {}{}",
            Style::header("Provider:"),
            Style::value(provider_name),
            if is_default { " (default)" } else { "" }
        );
        println!("  endpoint = {}", provider.endpoint);
        if provider.requires_api_key() {
            let has_key = provider.get_api_key().is_some();
            println!(
                "  api_key  = {}",
                if has_key {
                    Style::success("(set)")
                } else {
                    Style::warning("(not set)")
                }
            );
        }
        if provider.models.is_empty() {
            println!("  models   = (none configured)");
        } else {
            println!("  models:");
            for model in &provider.models {
                println!("    - {model}");
            }
        }
    } else {
        println!("{}\n", Style::header("Configured providers:"));
        for (name, provider) in &providers {
            let is_default = default_provider == name;
            println!(
                "  {}{}",
                Style::value(name),
                if is_default { " (default)" } else { "" }
            );
            println!("    endpoint: {}", provider.endpoint);
            if !provider.models.is_empty() {
                println!("    models: {}", provider.models.join(", "));
            }
        }
    }

    Ok(())
}
