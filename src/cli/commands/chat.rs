use anyhow::Result;
use std::path::PathBuf;

use crate::chat::{ChatSession, SessionOptions};
use crate::cli::SessionArgs;
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};

pub struct ChatOptions {
    pub session: SessionArgs,
    pub transcript: Option<PathBuf>,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let config = load_resolved_config(&options.session)?;
    let service = config.backend.connect(config.timeout);

    tracing::debug!(persona = ?config.persona_name, "Starting chat");

    let session = ChatSession::new(
        config,
        service,
        SessionOptions {
            transcript: options.transcript,
        },
    );
    session.run().await
}

/// Merges session flags with the config file.
pub(crate) fn load_resolved_config(session: &SessionArgs) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default()?;

    let options = ResolveOptions {
        provider: session.provider.clone(),
        model: session.model.clone(),
        server: session.server.clone(),
        persona: session.persona.clone(),
        system_prompt: session.system_prompt.clone(),
        business_id: session.business_id.clone(),
    };

    resolve_config(&options, &config_file)
}
