//! System-prompt personas.
//!
//! A persona is the directive that opens every conversation (language, tone,
//! role). Presets ship with the binary; custom personas live in the config file.

use std::collections::HashMap;
use thiserror::Error;

use crate::config::CustomPersona;

/// A built-in persona.
#[derive(Debug, Clone)]
pub struct PresetPersona {
    pub key: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

/// Persona used when nothing else is configured.
pub const DEFAULT_PERSONA: &str = "spanish";

pub const PRESETS: &[PresetPersona] = &[
    PresetPersona {
        key: "spanish",
        description: "Helpful assistant answering in Spanish",
        prompt: "Eres un asistente útil. Responde en español de forma clara y concisa, \
                 salvo que el usuario te pida explícitamente usar otro idioma.",
    },
    PresetPersona {
        key: "english",
        description: "Helpful assistant answering in English",
        prompt: "You are a helpful assistant. Answer in English, clearly and concisely, \
                 unless the user explicitly asks for another language.",
    },
    PresetPersona {
        key: "support",
        description: "Customer support agent (Spanish)",
        prompt: "Eres un agente de soporte al cliente disponible 24/7. Responde en español \
                 de forma amable, clara y concisa. Si no conoces la respuesta, dilo claramente.",
    },
];

#[derive(Debug, Clone)]
pub enum ResolvedPersona {
    Preset(&'static PresetPersona),
    Custom { key: String, prompt: String },
}

impl ResolvedPersona {
    pub fn prompt(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.prompt,
            Self::Custom { prompt, .. } => prompt,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.key,
            Self::Custom { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersonaError {
    #[error("Persona '{key}' not found\n\nAvailable personas: {}", available_keys(.custom_keys))]
    NotFound {
        key: String,
        custom_keys: Vec<String>,
    },
    #[error("Persona '{0}' shadows a preset persona; pick another name")]
    ShadowsPreset(String),
    #[error(
        "Invalid persona key '{0}': must start with a letter and contain only alphanumeric characters and underscores"
    )]
    InvalidKey(String),
}

fn available_keys(custom_keys: &[String]) -> String {
    PRESETS
        .iter()
        .map(|p| p.key)
        .chain(custom_keys.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn get_preset(key: &str) -> Option<&'static PresetPersona> {
    PRESETS.iter().find(|p| p.key == key)
}

pub fn is_preset(key: &str) -> bool {
    get_preset(key).is_some()
}

#[allow(clippy::implicit_hasher)]
pub fn sorted_custom_keys(personas: &HashMap<String, CustomPersona>) -> Vec<&String> {
    let mut keys: Vec<_> = personas.keys().collect();
    keys.sort();
    keys
}

/// Resolves a persona key, checking presets before custom personas.
#[allow(clippy::implicit_hasher)]
pub fn resolve_persona(
    key: &str,
    custom: &HashMap<String, CustomPersona>,
) -> Result<ResolvedPersona, PersonaError> {
    if let Some(preset) = get_preset(key) {
        return Ok(ResolvedPersona::Preset(preset));
    }

    if let Some(persona) = custom.get(key) {
        return Ok(ResolvedPersona::Custom {
            key: key.to_string(),
            prompt: persona.prompt.clone(),
        });
    }

    Err(PersonaError::NotFound {
        key: key.to_string(),
        custom_keys: sorted_custom_keys(custom).into_iter().cloned().collect(),
    })
}

/// Validates the key of a custom persona.
pub fn validate_custom_key(key: &str) -> Result<(), PersonaError> {
    let starts_with_letter = key.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_with_letter || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PersonaError::InvalidKey(key.to_string()));
    }

    if is_preset(key) {
        return Err(PersonaError::ShadowsPreset(key.to_string()));
    }

    Ok(())
}
