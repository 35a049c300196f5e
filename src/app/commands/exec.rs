//! Exec command handler.

use anyhow::Result;

use crate::{chat, config};

pub async fn run(config: &config::Config, prompt: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    chat::run_exec(&mut stdout, config, prompt).await
}
