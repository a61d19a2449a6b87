//! # crammers Core
//!
//! Core library for crammers: local BERT configuration records built from
//! pretrained model metadata.
//!
//! A [`ConfigLoader`] asks a [`registry::ModelRegistry`] for a model's
//! tokenizer and architecture descriptors and copies their fields into a
//! [`BertConfig`]. The [`VariantCatalog`] holds one such record for each
//! supported [`BertVariant`], all loaded at startup.

// Core modules
pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use catalog::{BertVariant, VariantCatalog};
pub use config::BertConfig;
pub use error::{CatalogError, ConfigError, Error, RegistryError, Result};
pub use loader::ConfigLoader;
pub use registry::{HubRegistry, HubSettings, ModelRegistry, StaticRegistry};

/// Current version of the crammers-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the library
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
