//! Catalog initialization command

use anyhow::{Context, Result};
use crammers_core::VariantCatalog;

use crate::config::CliSettingsLoader;

/// Build the whole variant catalog and print one line per entry
pub async fn catalog_command(settings: CliSettingsLoader) -> Result<()> {
    let loader = super::build_config_loader(&settings).await?;
    let catalog = VariantCatalog::initialize(&loader)
        .await
        .context("Failed to initialize the variant catalog")?;

    println!(
        "{:<16} {:>6} {:>7} {:>6} {:>8} {:>8}",
        "variant", "layers", "d_model", "heads", "ffn", "vocab"
    );
    for (variant, config) in catalog.iter() {
        println!(
            "{:<16} {:>6} {:>7} {:>6} {:>8} {:>8}",
            variant.name(),
            config.n_layers(),
            config.d_model(),
            config.heads(),
            config.feed_forward_hidden(),
            config.vocab_size()
        );
    }

    Ok(())
}
