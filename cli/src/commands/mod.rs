//! CLI command implementations

pub mod catalog;
pub mod show;
pub mod variants;

pub use catalog::catalog_command;
pub use show::show_command;
pub use variants::variants_command;

use crate::config::CliSettingsLoader;
use anyhow::Result;
use crammers_core::{ConfigLoader, HubRegistry};
use std::sync::Arc;
use tracing::debug;

/// Resolve registry settings and build a config loader on top of them
async fn build_config_loader(settings_loader: &CliSettingsLoader) -> Result<ConfigLoader> {
    let settings = settings_loader.load().await?;
    debug!(
        "Registry endpoint {}, cache {:?}, offline {}",
        settings.endpoint, settings.cache_dir, settings.offline
    );

    let registry = HubRegistry::new(settings)?;
    Ok(ConfigLoader::new(Arc::new(registry)))
}
