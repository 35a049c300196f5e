//! Chat command handler.

use anyhow::{Context, Result};

use crate::{chat, config};

pub async fn run(config: &config::Config) -> Result<()> {
    chat::run_interactive_chat(config)
        .await
        .context("interactive chat failed")
}
