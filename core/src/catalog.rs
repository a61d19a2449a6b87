//! Fixed catalog of supported BERT variants

use crate::config::BertConfig;
use crate::error::{CatalogError, Result};
use crate::loader::ConfigLoader;
use futures::future::try_join_all;
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};

/// Supported pretrained BERT variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BertVariant {
    BaseUncased,
    LargeUncased,
    TinyUncased,
}

impl BertVariant {
    /// Every variant, in catalog order
    pub fn all() -> &'static [BertVariant] {
        &[
            BertVariant::BaseUncased,
            BertVariant::LargeUncased,
            BertVariant::TinyUncased,
        ]
    }

    /// Registry identifier the variant is loaded from
    pub fn model_id(&self) -> &'static str {
        match self {
            BertVariant::BaseUncased => "bert-base-uncased",
            BertVariant::LargeUncased => "bert-large-uncased",
            BertVariant::TinyUncased => "prajjwal1/bert-tiny",
        }
    }

    /// Symbolic name
    pub fn name(&self) -> &'static str {
        match self {
            BertVariant::BaseUncased => "base-uncased",
            BertVariant::LargeUncased => "large-uncased",
            BertVariant::TinyUncased => "tiny-uncased",
        }
    }

    fn index(self) -> usize {
        match self {
            BertVariant::BaseUncased => 0,
            BertVariant::LargeUncased => 1,
            BertVariant::TinyUncased => 2,
        }
    }
}

impl fmt::Display for BertVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BertVariant {
    type Err = CatalogError;

    /// Accepts the symbolic name (`base-uncased`), the constant-style name
    /// (`BASE_UNCASED`) or the registry id (`bert-base-uncased`).
    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = normalize_identifier(input);

        BertVariant::all()
            .iter()
            .copied()
            .find(|variant| {
                normalized == normalize_identifier(variant.name())
                    || normalized == normalize_identifier(variant.model_id())
            })
            .ok_or_else(|| CatalogError::UnknownVariant {
                name: input.to_string(),
            })
    }
}

fn normalize_identifier(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace('_', "-")
}

/// Configurations for every [`BertVariant`], built together up front
#[derive(Debug, Clone)]
pub struct VariantCatalog {
    // Aligned with `BertVariant::all()`
    configs: Vec<BertConfig>,
}

impl VariantCatalog {
    /// Load every variant.
    ///
    /// All lookups run concurrently. The catalog exists only if every one of
    /// them succeeds; the first failure is returned and nothing is kept.
    pub async fn initialize(loader: &ConfigLoader) -> Result<Self> {
        let loads = BertVariant::all()
            .iter()
            .map(|variant| loader.load(variant.model_id()));

        let configs = try_join_all(loads).await.map_err(|e| {
            error!("Variant catalog initialization failed: {}", e);
            e
        })?;

        info!("Variant catalog ready with {} entries", configs.len());
        Ok(Self { configs })
    }

    /// Get the configuration of a variant
    pub fn get(&self, variant: BertVariant) -> &BertConfig {
        &self.configs[variant.index()]
    }

    /// Get the configuration of a variant by name
    pub fn get_by_name(&self, name: &str) -> Result<&BertConfig> {
        let variant: BertVariant = name.parse()?;
        Ok(self.get(variant))
    }

    /// Entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (BertVariant, &BertConfig)> {
        BertVariant::all().iter().copied().zip(self.configs.iter())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ModelDescriptor, StaticRegistry, TokenizerDescriptor};
    use std::sync::Arc;

    fn descriptor(hidden: usize, heads: usize, layers: usize) -> ModelDescriptor {
        ModelDescriptor {
            hidden_size: hidden,
            num_attention_heads: heads,
            num_hidden_layers: layers,
            intermediate_size: hidden * 4,
            ..ModelDescriptor::default()
        }
    }

    fn full_registry() -> StaticRegistry {
        let vocab = TokenizerDescriptor::new(30522);
        StaticRegistry::new()
            .with_model("bert-base-uncased", vocab.clone(), descriptor(768, 12, 12))
            .with_model("bert-large-uncased", vocab.clone(), descriptor(1024, 16, 24))
            .with_model("prajjwal1/bert-tiny", vocab, descriptor(128, 2, 2))
    }

    async fn catalog() -> VariantCatalog {
        VariantCatalog::initialize(&ConfigLoader::new(Arc::new(full_registry())))
            .await
            .unwrap()
    }

    #[test]
    fn test_parse_variant_names() {
        assert_eq!(
            "base-uncased".parse::<BertVariant>().unwrap(),
            BertVariant::BaseUncased
        );
        assert_eq!(
            "LARGE_UNCASED".parse::<BertVariant>().unwrap(),
            BertVariant::LargeUncased
        );
        assert_eq!(
            "prajjwal1/bert-tiny".parse::<BertVariant>().unwrap(),
            BertVariant::TinyUncased
        );
        assert_eq!(
            " Bert-Base-Uncased ".parse::<BertVariant>().unwrap(),
            BertVariant::BaseUncased
        );
    }

    #[test]
    fn test_parse_unknown_variant() {
        let err = "base-cased".parse::<BertVariant>().unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownVariant {
                name: "base-cased".to_string()
            }
        );
        assert!("".parse::<BertVariant>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for variant in BertVariant::all() {
            assert_eq!(variant.to_string().parse::<BertVariant>().unwrap(), *variant);
        }
    }

    #[tokio::test]
    async fn test_embed_size_matches_d_model() {
        let catalog = catalog().await;

        for variant in BertVariant::all() {
            let config = catalog.get(*variant);
            assert_eq!(config.embed_size(), config.d_model(), "variant {}", variant);
        }
    }

    #[tokio::test]
    async fn test_entries_map_to_their_models() {
        let catalog = catalog().await;

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(BertVariant::BaseUncased).d_model(), 768);
        assert_eq!(catalog.get(BertVariant::LargeUncased).n_layers(), 24);
        assert_eq!(catalog.get(BertVariant::TinyUncased).heads(), 2);

        let order: Vec<_> = catalog.iter().map(|(variant, _)| variant).collect();
        assert_eq!(order, BertVariant::all());
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let catalog = catalog().await;

        let config = catalog.get_by_name("TINY_UNCASED").unwrap();
        assert_eq!(config.d_model(), 128);

        let err = catalog.get_by_name("UnknownVariantName").unwrap_err();
        assert!(err.is_unknown_variant());
    }

    #[tokio::test]
    async fn test_initialization_is_all_or_nothing() {
        let vocab = TokenizerDescriptor::new(30522);
        let registry = StaticRegistry::new()
            .with_model("bert-base-uncased", vocab.clone(), descriptor(768, 12, 12))
            .with_model("bert-large-uncased", vocab, descriptor(1024, 16, 24));

        let result = VariantCatalog::initialize(&ConfigLoader::new(Arc::new(registry))).await;

        let err = result.unwrap_err();
        assert!(err.is_registry_lookup());
    }
}
