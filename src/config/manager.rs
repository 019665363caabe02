use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::completion::{CompletionService, DEFAULT_TIMEOUT, ProviderClient, RelayClient};
use crate::exchange::ExchangeSettings;
use crate::paths;
use crate::persona::{self, DEFAULT_PERSONA};
use crate::ui::Style;

/// Provider used when neither the CLI nor the config file names one.
pub const BUILTIN_PROVIDER: &str = "openai";

/// Model used when neither the CLI, the config file nor `OPENAI_MODEL_NAME` names one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Environment variable consulted after the config file for the model name.
pub const MODEL_ENV: &str = "OPENAI_MODEL_NAME";

/// Default settings in the `[charla]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharlaConfig {
    /// Default provider name.
    pub provider: Option<String>,
    /// Default model name.
    pub model: Option<String>,
    /// Default persona key.
    pub persona: Option<String>,
    /// Opaque tenant identifier sent with every request.
    pub business_id: Option<String>,
    /// Base URL of a chat relay; when set, chats go through it instead of a provider.
    pub server: Option<String>,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Origins the relay allows through CORS; unset or `["*"]` allows any.
    pub cors_origins: Option<Vec<String>>,
}

/// Configuration for an OpenAI-compatible provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// List of available models for this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// The provider assumed when nothing is configured: OpenAI, keyed by `OPENAI_API_KEY`.
    pub fn builtin() -> Self {
        Self {
            endpoint: "https://api.openai.com".to_string(),
            api_key: None,
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            models: Vec::new(),
        }
    }

    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// A user-defined persona from the `[personas.<key>]` tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPersona {
    /// Short description for listings.
    pub description: String,
    /// The system prompt that opens each conversation.
    pub prompt: String,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/charla/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub charla: CharlaConfig,
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub personas: HashMap<String, CustomPersona>,
}

/// A provider resolved down to what a client needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub name: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Where completion requests go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Directly to an OpenAI-compatible provider.
    Provider(ProviderSettings),
    /// Through a chat relay (`POST <url>/chat`).
    Relay { url: String },
}

impl Backend {
    /// Builds the client for this backend.
    pub fn connect(&self, timeout: Duration) -> Arc<dyn CompletionService> {
        match self {
            Self::Provider(provider) => Arc::new(ProviderClient::new(
                provider.endpoint.clone(),
                provider.model.clone(),
                provider.api_key.clone(),
                timeout,
            )),
            Self::Relay { url } => Arc::new(RelayClient::new(url.clone(), timeout)),
        }
    }
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend: Backend,
    /// Persona key, when the system prompt came from a persona.
    pub persona_name: Option<String>,
    /// `None` means the conversation starts without a system message.
    pub system_prompt: Option<String>,
    pub business_id: Option<String>,
    pub timeout: Duration,
}

impl ResolvedConfig {
    /// Session settings for a new exchange coordinator.
    pub fn exchange_settings(&self) -> ExchangeSettings {
        ExchangeSettings {
            system_prompt: self.system_prompt.clone(),
            business_id: self.business_id.clone(),
        }
    }
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub server: Option<String>,
    pub persona: Option<String>,
    /// Literal system prompt; an empty string disables the system message.
    pub system_prompt: Option<String>,
    pub business_id: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Priority: CLI options, then the config file, then built-in defaults.
///
/// # Errors
///
/// Returns an error if a persona or provider cannot be found, a custom persona
/// has an invalid key, or a provider requires an API key that is not set.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    for key in config_file.personas.keys() {
        persona::validate_custom_key(key)?;
    }

    let (persona_name, system_prompt) = match options.system_prompt.as_deref() {
        Some("") => (None, None),
        Some(prompt) => (None, Some(prompt.to_string())),
        None => {
            let key = options
                .persona
                .as_deref()
                .or(config_file.charla.persona.as_deref())
                .unwrap_or(DEFAULT_PERSONA);
            let resolved = persona::resolve_persona(key, &config_file.personas)?;
            (
                Some(resolved.key().to_string()),
                Some(resolved.prompt().to_string()),
            )
        }
    };

    // An explicit --provider beats a relay configured in the file.
    let relay_url = options.server.clone().or_else(|| {
        if options.provider.is_some() {
            None
        } else {
            config_file.charla.server.clone()
        }
    });

    let backend = match relay_url {
        Some(url) => Backend::Relay { url },
        None => Backend::Provider(resolve_provider(options, config_file)?),
    };

    let timeout = config_file
        .charla
        .request_timeout_secs
        .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

    Ok(ResolvedConfig {
        backend,
        persona_name,
        system_prompt,
        business_id: options
            .business_id
            .clone()
            .or_else(|| config_file.charla.business_id.clone()),
        timeout,
    })
}

/// Resolves the provider, model and API key.
///
/// The built-in `openai` provider is used when the name is not configured.
pub fn resolve_provider(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ProviderSettings> {
    let provider_name = options
        .provider
        .as_deref()
        .or(config_file.charla.provider.as_deref())
        .unwrap_or(BUILTIN_PROVIDER)
        .to_string();

    let provider_config = match config_file.providers.get(&provider_name) {
        Some(provider) => provider.clone(),
        None if provider_name == BUILTIN_PROVIDER => ProviderConfig::builtin(),
        None => {
            let mut available: Vec<&str> =
                config_file.providers.keys().map(String::as_str).collect();
            available.sort_unstable();
            if available.is_empty() {
                bail!(
                    "Provider '{provider_name}' not found\n\n\
                     No providers configured. Add providers to ~/.config/charla/config.toml"
                );
            }
            bail!(
                "Provider '{provider_name}' not found\n\n\
                 Available providers:\n  \
                 - {}\n\n\
                 Add providers to ~/.config/charla/config.toml",
                available.join("\n  - ")
            );
        }
    };

    let model = options
        .model
        .clone()
        .or_else(|| config_file.charla.model.clone())
        .or_else(|| {
            std::env::var(MODEL_ENV)
                .ok()
                .filter(|m| !m.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    if !provider_config.models.is_empty() && !provider_config.models.contains(&model) {
        eprintln!(
            "{} Model '{}' is not in the configured models list for '{}'\n\
             Configured models: {}\n\
             Proceeding anyway...\n",
            Style::warning("Warning:"),
            model,
            provider_name,
            provider_config.models.join(", ")
        );
    }

    let api_key = provider_config.get_api_key();

    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        bail!(
            "Provider '{provider_name}' requires an API key\n\n\
             Set the {env_var} environment variable (a .env file works too):\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/charla/config.toml"
        );
    }

    Ok(ProviderSettings {
        name: provider_name,
        endpoint: provider_config.endpoint,
        model,
        api_key,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/charla/config.toml`
    /// or `~/.config/charla/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        crate::fs::atomic_write(&self.config_path, &contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file, treating a missing file as empty.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    fn create_test_config() -> ConfigFile {
        let mut providers = HashMap::new();
        providers.insert(
            "ollama".to_string(),
            ProviderConfig {
                endpoint: "http://localhost:11434".to_string(),
                api_key: None,
                api_key_env: None,
                models: vec!["gemma3:12b".to_string()],
            },
        );
        providers.insert(
            "openrouter".to_string(),
            ProviderConfig {
                endpoint: "https://openrouter.ai/api".to_string(),
                api_key: None,
                api_key_env: Some("CHARLA_TEST_NONEXISTENT_API_KEY".to_string()),
                models: vec!["gpt-4o".to_string()],
            },
        );

        let mut personas = HashMap::new();
        personas.insert(
            "pirate".to_string(),
            CustomPersona {
                description: "Talks like a pirate".to_string(),
                prompt: "Answer like a pirate.".to_string(),
            },
        );

        ConfigFile {
            charla: CharlaConfig {
                provider: Some("ollama".to_string()),
                model: Some("gemma3:12b".to_string()),
                ..CharlaConfig::default()
            },
            providers,
            personas,
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        manager.save(&create_test_config()).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.charla.provider, Some("ollama".to_string()));
        assert_eq!(loaded.charla.model, Some("gemma3:12b".to_string()));
        assert!(loaded.providers.contains_key("ollama"));
        assert_eq!(
            loaded.personas.get("pirate").map(|p| p.prompt.as_str()),
            Some("Answer like a pirate.")
        );
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert!(manager.load_or_default().unwrap().providers.is_empty());
    }

    #[test]
    fn test_load_or_default_reports_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[charla\nprovider = ").unwrap();

        assert!(manager.load_or_default().is_err());
    }

    #[test]
    fn test_parse_documented_layout() {
        let config: ConfigFile = toml::from_str(
            r#"
            [charla]
            provider = "openai"
            model = "gpt-4o-mini"
            persona = "support"
            business_id = "restaurant_123"
            request_timeout_secs = 30
            cors_origins = ["https://shop.example"]

            [providers.openai]
            endpoint = "https://api.openai.com"
            api_key_env = "OPENAI_API_KEY"

            [personas.pirate]
            description = "Talks like a pirate"
            prompt = "Answer like a pirate."
            "#,
        )
        .unwrap();

        assert_eq!(config.charla.persona.as_deref(), Some("support"));
        assert_eq!(config.charla.request_timeout_secs, Some(30));
        assert_eq!(
            config.charla.cors_origins,
            Some(vec!["https://shop.example".to_string()])
        );
        assert!(config.providers["openai"].models.is_empty());
        assert!(config.personas.contains_key("pirate"));
    }

    #[test]
    #[serial]
    fn test_provider_get_api_key_from_env() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var("CHARLA_TEST_API_KEY", "test-key-value");
        }

        let provider = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("CHARLA_TEST_API_KEY".to_string()),
            models: vec![],
        };

        assert_eq!(provider.get_api_key(), Some("test-key-value".to_string()));

        unsafe {
            std::env::remove_var("CHARLA_TEST_API_KEY");
        }
    }

    #[test]
    fn test_provider_get_api_key_fallback() {
        let provider = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("CHARLA_TEST_UNSET_KEY".to_string()),
            models: vec![],
        };

        assert_eq!(provider.get_api_key(), Some("fallback-key".to_string()));
    }

    #[test]
    fn test_provider_requires_api_key() {
        assert!(ProviderConfig::builtin().requires_api_key());

        let local = ProviderConfig {
            endpoint: "http://localhost:11434".to_string(),
            api_key: None,
            api_key_env: None,
            models: vec![],
        };
        assert!(!local.requires_api_key());
    }

    #[test]
    fn test_resolve_config_falls_back_to_file() {
        let resolved = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        assert_eq!(
            resolved.backend,
            Backend::Provider(ProviderSettings {
                name: "ollama".to_string(),
                endpoint: "http://localhost:11434".to_string(),
                model: "gemma3:12b".to_string(),
                api_key: None,
            })
        );
        assert_eq!(resolved.persona_name.as_deref(), Some(DEFAULT_PERSONA));
        assert!(
            resolved
                .system_prompt
                .as_deref()
                .is_some_and(|p| p.contains("español"))
        );
        assert_eq!(resolved.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_resolve_config_empty_system_prompt_disables_seed() {
        let options = ResolveOptions {
            system_prompt: Some(String::new()),
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert!(resolved.system_prompt.is_none());
        assert!(resolved.persona_name.is_none());
        assert!(resolved.exchange_settings().system_prompt.is_none());
    }

    #[test]
    fn test_resolve_config_literal_system_prompt_beats_persona() {
        let options = ResolveOptions {
            persona: Some("pirate".to_string()),
            system_prompt: Some("Responde en español.".to_string()),
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(resolved.system_prompt.as_deref(), Some("Responde en español."));
        assert!(resolved.persona_name.is_none());
    }

    #[test]
    fn test_resolve_config_custom_persona() {
        let options = ResolveOptions {
            persona: Some("pirate".to_string()),
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(resolved.system_prompt.as_deref(), Some("Answer like a pirate."));
    }

    #[test]
    fn test_resolve_config_unknown_persona() {
        let options = ResolveOptions {
            persona: Some("nonexistent".to_string()),
            ..ResolveOptions::default()
        };

        let err = resolve_config(&options, &create_test_config()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_resolve_config_rejects_shadowing_persona() {
        let mut config = create_test_config();
        config.personas.insert(
            "spanish".to_string(),
            CustomPersona {
                description: "mine".to_string(),
                prompt: "mine".to_string(),
            },
        );

        let err = resolve_config(&ResolveOptions::default(), &config).unwrap_err();
        assert!(err.to_string().contains("shadows a preset"));
    }

    #[test]
    fn test_resolve_config_server_selects_relay() {
        let options = ResolveOptions {
            server: Some("http://localhost:8000".to_string()),
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(
            resolved.backend,
            Backend::Relay {
                url: "http://localhost:8000".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_config_cli_provider_beats_file_server() {
        let mut config = create_test_config();
        config.charla.server = Some("http://relay.local".to_string());

        let options = ResolveOptions {
            provider: Some("ollama".to_string()),
            ..ResolveOptions::default()
        };
        let resolved = resolve_config(&options, &config).unwrap();
        assert!(matches!(resolved.backend, Backend::Provider(_)));

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();
        assert!(matches!(resolved.backend, Backend::Relay { .. }));
    }

    #[test]
    fn test_resolve_config_business_id_and_timeout() {
        let mut config = create_test_config();
        config.charla.business_id = Some("from_file".to_string());
        config.charla.request_timeout_secs = Some(5);

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();
        assert_eq!(resolved.business_id.as_deref(), Some("from_file"));
        assert_eq!(resolved.timeout, Duration::from_secs(5));

        let options = ResolveOptions {
            business_id: Some("from_cli".to_string()),
            ..ResolveOptions::default()
        };
        let resolved = resolve_config(&options, &config).unwrap();
        assert_eq!(resolved.exchange_settings().business_id.as_deref(), Some("from_cli"));
    }

    #[test]
    fn test_resolve_provider_not_found() {
        let options = ResolveOptions {
            provider: Some("nonexistent".to_string()),
            ..ResolveOptions::default()
        };

        let err = resolve_provider(&options, &create_test_config()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("ollama"));
    }

    #[test]
    #[serial]
    fn test_resolve_provider_defaults_model() {
        let original = std::env::var(MODEL_ENV).ok();
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::remove_var(MODEL_ENV);
        }

        let mut config = create_test_config();
        config.charla.model = None;
        config.providers.get_mut("ollama").unwrap().models.clear();

        let provider = resolve_provider(&ResolveOptions::default(), &config).unwrap();
        assert_eq!(provider.model, DEFAULT_MODEL);

        if let Some(val) = original {
            unsafe { std::env::set_var(MODEL_ENV, val) };
        }
    }

    #[test]
    #[serial]
    fn test_resolve_provider_model_env_below_config_file() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var(MODEL_ENV, "gpt-4o");
        }

        let config = create_test_config();
        let from_file = resolve_provider(&ResolveOptions::default(), &config).unwrap();

        let mut no_model = create_test_config();
        no_model.charla.model = None;
        no_model.providers.get_mut("ollama").unwrap().models.clear();
        let from_env = resolve_provider(&ResolveOptions::default(), &no_model).unwrap();

        unsafe {
            std::env::remove_var(MODEL_ENV);
        }

        assert_eq!(Some(from_file.model), config.charla.model);
        assert_eq!(from_env.model, "gpt-4o");
    }

    #[test]
    fn test_resolve_provider_api_key_required_but_missing() {
        let options = ResolveOptions {
            provider: Some("openrouter".to_string()),
            model: Some("gpt-4o".to_string()),
            ..ResolveOptions::default()
        };

        let err = resolve_provider(&options, &create_test_config()).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    #[serial]
    fn test_resolve_provider_builtin_openai() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var("OPENAI_API_KEY", "sk-test");
            std::env::remove_var(MODEL_ENV);
        }

        let provider = resolve_provider(&ResolveOptions::default(), &ConfigFile::default()).unwrap();

        assert_eq!(provider.name, BUILTIN_PROVIDER);
        assert_eq!(provider.endpoint, "https://api.openai.com");
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.api_key.as_deref(), Some("sk-test"));

        unsafe {
            std::env::remove_var("OPENAI_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_resolve_provider_builtin_without_key() {
        let original = std::env::var("OPENAI_API_KEY").ok();
        unsafe {
            std::env::remove_var("OPENAI_API_KEY");
        }

        let err = resolve_provider(&ResolveOptions::default(), &ConfigFile::default()).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        if let Some(val) = original {
            unsafe { std::env::set_var("OPENAI_API_KEY", val) };
        }
    }
}
