//! Loading BERT configurations from a model registry

use crate::config::BertConfig;
use crate::error::Result;
use crate::registry::ModelRegistry;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds [`BertConfig`] records from registry descriptors
#[derive(Clone)]
pub struct ConfigLoader {
    registry: Arc<dyn ModelRegistry>,
}

impl ConfigLoader {
    pub fn new(registry: Arc<dyn ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &dyn ModelRegistry {
        self.registry.as_ref()
    }

    /// Load the configuration for `model_name`.
    ///
    /// The tokenizer and architecture lookups are independent and run
    /// concurrently. If either fails, nothing is built and the registry
    /// error is returned as is.
    pub async fn load(&self, model_name: &str) -> Result<BertConfig> {
        debug!(
            "Resolving {} through {} registry",
            model_name,
            self.registry.name()
        );

        let (tokenizer, model) = tokio::try_join!(
            self.registry.fetch_tokenizer_descriptor(model_name),
            self.registry.fetch_model_descriptor(model_name),
        )?;

        let config = BertConfig::from_descriptors(&tokenizer, &model);
        info!(
            "Loaded {}: {} layers, d_model {}, {} heads, vocab {}",
            model_name,
            config.n_layers(),
            config.d_model(),
            config.heads(),
            config.vocab_size()
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ModelDescriptor, StaticRegistry, TokenizerDescriptor};

    fn stub_base_descriptor() -> ModelDescriptor {
        ModelDescriptor {
            type_vocab_size: 2,
            pad_token_id: Some(0),
            hidden_size: 768,
            max_position_embeddings: 512,
            num_attention_heads: 12,
            intermediate_size: 3072,
            num_hidden_layers: 12,
            hidden_dropout_prob: 0.1,
            attention_probs_dropout_prob: 0.1,
            classifier_dropout: None,
            layer_norm_eps: 1e-12,
        }
    }

    fn stub_loader() -> ConfigLoader {
        let registry = StaticRegistry::new().with_model(
            "stub-base",
            TokenizerDescriptor::new(30522),
            stub_base_descriptor(),
        );
        ConfigLoader::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_load_stub_base() {
        let config = stub_loader().load("stub-base").await.unwrap();

        assert_eq!(config.vocab_size(), 30522);
        assert_eq!(config.type_vocab_size(), 2);
        assert_eq!(config.pad_token_id(), Some(0));
        assert_eq!(config.embed_size(), 768);
        assert_eq!(config.seq_len(), 512);
        assert_eq!(config.heads(), 12);
        assert_eq!(config.d_model(), 768);
        assert_eq!(config.feed_forward_hidden(), 3072);
        assert_eq!(config.n_layers(), 12);
        assert_eq!(config.hidden_dropout_prob(), 0.1);
        assert_eq!(config.attention_probs_dropout_prob(), 0.1);
        assert_eq!(config.classifier_dropout(), None);
        assert_eq!(config.layer_norm_eps(), 1e-12);
    }

    #[tokio::test]
    async fn test_load_is_deterministic() {
        let loader = stub_loader();

        let first = loader.load("stub-base").await.unwrap();
        let second = loader.load("stub-base").await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_load_unknown_model() {
        let err = stub_loader().load("nonexistent-model-xyz").await.unwrap_err();
        assert!(err.is_registry_lookup(), "unexpected error: {}", err);
    }

    #[tokio::test]
    async fn test_load_fails_when_one_lookup_fails() {
        // Architecture present, tokenizer missing
        let registry = StaticRegistry::new()
            .with_model_descriptor("half-model", stub_base_descriptor());
        let loader = ConfigLoader::new(Arc::new(registry));

        let err = loader.load("half-model").await.unwrap_err();
        assert!(err.is_registry_lookup());

        // Tokenizer present, architecture missing
        let registry = StaticRegistry::new()
            .with_tokenizer_descriptor("half-model", TokenizerDescriptor::new(30522));
        let loader = ConfigLoader::new(Arc::new(registry));

        let err = loader.load("half-model").await.unwrap_err();
        assert!(err.is_registry_lookup());
    }

    #[tokio::test]
    async fn test_classifier_dropout_passes_through() {
        let registry = StaticRegistry::new().with_model(
            "with-dropout",
            TokenizerDescriptor::new(100),
            ModelDescriptor {
                classifier_dropout: Some(0.25),
                ..stub_base_descriptor()
            },
        );
        let config = ConfigLoader::new(Arc::new(registry))
            .load("with-dropout")
            .await
            .unwrap();

        assert_eq!(config.classifier_dropout(), Some(0.25));
    }

    #[tokio::test]
    async fn test_null_pad_token_id_passes_through() {
        let registry = StaticRegistry::new().with_model(
            "no-pad",
            TokenizerDescriptor::new(100),
            ModelDescriptor {
                pad_token_id: None,
                ..stub_base_descriptor()
            },
        );
        let config = ConfigLoader::new(Arc::new(registry))
            .load("no-pad")
            .await
            .unwrap();

        assert_eq!(config.pad_token_id(), None);
        assert!(config.validate().is_ok());
    }
}
