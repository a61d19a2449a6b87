//! Single configuration loading command

use anyhow::{Context, Result};
use crammers_core::BertVariant;
use tracing::info;

use crate::config::CliSettingsLoader;

/// Load one configuration and print it as JSON.
///
/// `target` is a catalog variant name or any registry model id.
pub async fn show_command(target: String, check: bool, settings: CliSettingsLoader) -> Result<()> {
    let model_name = match target.parse::<BertVariant>() {
        Ok(variant) => variant.model_id().to_string(),
        Err(_) => target,
    };
    info!("Loading configuration for {}", model_name);

    let loader = super::build_config_loader(&settings).await?;
    let config = loader
        .load(&model_name)
        .await
        .with_context(|| format!("Failed to load configuration for {}", model_name))?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    if check {
        config
            .validate()
            .context("Configuration validation failed")?;
        println!("\nConfiguration is valid (head_dim {})", config.head_dim());
    }

    Ok(())
}
