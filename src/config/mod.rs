//! Configuration file management and provider settings.

mod manager;

pub use manager::{
    BUILTIN_PROVIDER, Backend, CharlaConfig, ConfigFile, ConfigManager, CustomPersona,
    DEFAULT_MODEL, MODEL_ENV, ProviderConfig, ProviderSettings, ResolveOptions, ResolvedConfig,
    resolve_config, resolve_provider,
};
