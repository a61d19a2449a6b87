//! Error types and handling for crammers core

use thiserror::Error;

/// Result type alias for crammers operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for crammers core
#[derive(Error, Debug)]
pub enum Error {
    /// Model registry lookup errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Variant catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True when the error came from a failed registry lookup
    pub fn is_registry_lookup(&self) -> bool {
        matches!(self, Error::Registry(RegistryError::Lookup { .. }))
    }

    /// True when the error names a variant outside the catalog
    pub fn is_unknown_variant(&self) -> bool {
        matches!(self, Error::Catalog(CatalogError::UnknownVariant { .. }))
    }
}

/// Model registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry could not resolve a model name to its descriptors
    #[error("Failed to resolve model '{model}': {reason}")]
    Lookup { model: String, reason: String },
}

impl RegistryError {
    pub fn lookup(model: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        RegistryError::Lookup {
            model: model.into(),
            reason: reason.to_string(),
        }
    }
}

/// Variant catalog errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown BERT variant: {name}")]
    UnknownVariant { name: String },
}

/// Configuration-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },

    #[error("Hidden size {d_model} is not divisible by {heads} attention heads")]
    HeadsMismatch { d_model: usize, heads: usize },
}
