//! Model registry capability and implementations
//!
//! A registry resolves a model name to two read-only descriptors: one for the
//! tokenizer vocabulary and one for the model architecture. The loader only
//! talks to the [`ModelRegistry`] trait, so tests and offline callers can
//! substitute [`StaticRegistry`] for the network-backed [`HubRegistry`].

pub mod descriptor;
pub mod hub;

pub use descriptor::{ModelDescriptor, TokenizerDescriptor};
pub use hub::{HubRegistry, HubSettings};

use crate::error::{RegistryError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Trait for pretrained model registries
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Fetch the tokenizer descriptor for a model
    async fn fetch_tokenizer_descriptor(&self, model_name: &str) -> Result<TokenizerDescriptor>;

    /// Fetch the architecture descriptor for a model
    async fn fetch_model_descriptor(&self, model_name: &str) -> Result<ModelDescriptor>;

    /// Get the registry name
    fn name(&self) -> &str;
}

/// In-memory registry holding descriptors by model name
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    tokenizers: HashMap<String, TokenizerDescriptor>,
    models: HashMap<String, ModelDescriptor>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register both descriptors for a model
    pub fn with_model(
        self,
        model_name: impl Into<String>,
        tokenizer: TokenizerDescriptor,
        model: ModelDescriptor,
    ) -> Self {
        let model_name = model_name.into();
        self.with_tokenizer_descriptor(model_name.clone(), tokenizer)
            .with_model_descriptor(model_name, model)
    }

    /// Register only a tokenizer descriptor
    pub fn with_tokenizer_descriptor(
        mut self,
        model_name: impl Into<String>,
        tokenizer: TokenizerDescriptor,
    ) -> Self {
        self.tokenizers.insert(model_name.into(), tokenizer);
        self
    }

    /// Register only an architecture descriptor
    pub fn with_model_descriptor(
        mut self,
        model_name: impl Into<String>,
        model: ModelDescriptor,
    ) -> Self {
        self.models.insert(model_name.into(), model);
        self
    }
}

#[async_trait]
impl ModelRegistry for StaticRegistry {
    async fn fetch_tokenizer_descriptor(&self, model_name: &str) -> Result<TokenizerDescriptor> {
        self.tokenizers.get(model_name).cloned().ok_or_else(|| {
            RegistryError::lookup(model_name, "no tokenizer registered under this name").into()
        })
    }

    async fn fetch_model_descriptor(&self, model_name: &str) -> Result<ModelDescriptor> {
        self.models.get(model_name).cloned().ok_or_else(|| {
            RegistryError::lookup(model_name, "no model config registered under this name").into()
        })
    }

    fn name(&self) -> &str {
        "static"
    }
}
