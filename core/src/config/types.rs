//! Local BERT configuration record
//!
//! A `BertConfig` is only ever built from registry descriptors and is never
//! mutated afterwards. Model-construction code reads it through accessors.

use crate::error::ConfigError;
use crate::registry::{ModelDescriptor, TokenizerDescriptor};
use serde::Serialize;

/// BERT architecture configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BertConfig {
    vocab_size: usize,
    type_vocab_size: usize,
    pad_token_id: Option<u32>,
    embed_size: usize,
    seq_len: usize,
    heads: usize,
    d_model: usize,
    feed_forward_hidden: usize,
    n_layers: usize,
    hidden_dropout_prob: f64,
    attention_probs_dropout_prob: f64,
    classifier_dropout: Option<f64>,
    layer_norm_eps: f64,
}

impl BertConfig {
    /// Copy the relevant descriptor fields into a new record.
    ///
    /// Values are taken verbatim. `embed_size` and `d_model` both come from
    /// the architecture's hidden size.
    pub fn from_descriptors(tokenizer: &TokenizerDescriptor, model: &ModelDescriptor) -> Self {
        Self {
            vocab_size: tokenizer.vocab_size,
            type_vocab_size: model.type_vocab_size,
            pad_token_id: model.pad_token_id,
            embed_size: model.hidden_size,
            seq_len: model.max_position_embeddings,
            heads: model.num_attention_heads,
            d_model: model.hidden_size,
            feed_forward_hidden: model.intermediate_size,
            n_layers: model.num_hidden_layers,
            hidden_dropout_prob: model.hidden_dropout_prob,
            attention_probs_dropout_prob: model.attention_probs_dropout_prob,
            classifier_dropout: model.classifier_dropout,
            layer_norm_eps: model.layer_norm_eps,
        }
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub fn type_vocab_size(&self) -> usize {
        self.type_vocab_size
    }

    /// Padding token id, `None` when the pretrained config sets it to null
    pub fn pad_token_id(&self) -> Option<u32> {
        self.pad_token_id
    }

    pub fn embed_size(&self) -> usize {
        self.embed_size
    }

    /// Maximum sequence length
    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Number of attention heads
    pub fn heads(&self) -> usize {
        self.heads
    }

    pub fn d_model(&self) -> usize {
        self.d_model
    }

    pub fn feed_forward_hidden(&self) -> usize {
        self.feed_forward_hidden
    }

    pub fn n_layers(&self) -> usize {
        self.n_layers
    }

    pub fn hidden_dropout_prob(&self) -> f64 {
        self.hidden_dropout_prob
    }

    pub fn attention_probs_dropout_prob(&self) -> f64 {
        self.attention_probs_dropout_prob
    }

    /// Classifier dropout, `None` when the pretrained config leaves it unset
    pub fn classifier_dropout(&self) -> Option<f64> {
        self.classifier_dropout
    }

    pub fn layer_norm_eps(&self) -> f64 {
        self.layer_norm_eps
    }

    /// Width of a single attention head
    pub fn head_dim(&self) -> usize {
        if self.heads == 0 {
            0
        } else {
            self.d_model / self.heads
        }
    }

    /// Validate the configuration for model construction
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("vocab_size", self.vocab_size),
            ("type_vocab_size", self.type_vocab_size),
            ("embed_size", self.embed_size),
            ("seq_len", self.seq_len),
            ("heads", self.heads),
            ("d_model", self.d_model),
            ("feed_forward_hidden", self.feed_forward_hidden),
            ("n_layers", self.n_layers),
        ];
        for (field, value) in sizes {
            if value == 0 {
                return Err(invalid(field, value));
            }
        }

        if self.d_model % self.heads != 0 {
            return Err(ConfigError::HeadsMismatch {
                d_model: self.d_model,
                heads: self.heads,
            });
        }

        if let Some(pad) = self.pad_token_id {
            if pad as usize >= self.vocab_size {
                return Err(invalid("pad_token_id", pad));
            }
        }

        let probs = [
            ("hidden_dropout_prob", Some(self.hidden_dropout_prob)),
            (
                "attention_probs_dropout_prob",
                Some(self.attention_probs_dropout_prob),
            ),
            ("classifier_dropout", self.classifier_dropout),
        ];
        for (field, value) in probs {
            if let Some(p) = value {
                if !(0.0..=1.0).contains(&p) {
                    return Err(invalid(field, p));
                }
            }
        }

        if self.layer_norm_eps.is_nan() || self.layer_norm_eps <= 0.0 {
            return Err(invalid("layer_norm_eps", self.layer_norm_eps));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> BertConfig {
        BertConfig::from_descriptors(&TokenizerDescriptor::new(30522), &ModelDescriptor::default())
    }

    #[test]
    fn test_from_descriptors_copies_fields() {
        let model = ModelDescriptor {
            type_vocab_size: 3,
            pad_token_id: Some(1),
            hidden_size: 256,
            max_position_embeddings: 128,
            num_attention_heads: 4,
            intermediate_size: 1024,
            num_hidden_layers: 4,
            hidden_dropout_prob: 0.2,
            attention_probs_dropout_prob: 0.3,
            classifier_dropout: Some(0.4),
            layer_norm_eps: 1e-6,
        };
        let config = BertConfig::from_descriptors(&TokenizerDescriptor::new(1000), &model);

        assert_eq!(config.vocab_size(), 1000);
        assert_eq!(config.type_vocab_size(), 3);
        assert_eq!(config.pad_token_id(), Some(1));
        assert_eq!(config.embed_size(), 256);
        assert_eq!(config.d_model(), 256);
        assert_eq!(config.seq_len(), 128);
        assert_eq!(config.heads(), 4);
        assert_eq!(config.feed_forward_hidden(), 1024);
        assert_eq!(config.n_layers(), 4);
        assert_eq!(config.hidden_dropout_prob(), 0.2);
        assert_eq!(config.attention_probs_dropout_prob(), 0.3);
        assert_eq!(config.classifier_dropout(), Some(0.4));
        assert_eq!(config.layer_norm_eps(), 1e-6);
        assert_eq!(config.head_dim(), 64);
    }

    #[test]
    fn test_validate_accepts_base() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_heads_mismatch() {
        let model = ModelDescriptor {
            num_attention_heads: 5,
            ..ModelDescriptor::default()
        };
        let config = BertConfig::from_descriptors(&TokenizerDescriptor::new(30522), &model);

        assert_eq!(
            config.validate(),
            Err(ConfigError::HeadsMismatch {
                d_model: 768,
                heads: 5
            })
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_heads = ModelDescriptor {
            num_attention_heads: 0,
            ..ModelDescriptor::default()
        };
        let bad_dropout = ModelDescriptor {
            classifier_dropout: Some(1.5),
            ..ModelDescriptor::default()
        };
        let bad_eps = ModelDescriptor {
            layer_norm_eps: 0.0,
            ..ModelDescriptor::default()
        };

        for model in [zero_heads, bad_dropout, bad_eps] {
            let config = BertConfig::from_descriptors(&TokenizerDescriptor::new(30522), &model);
            assert!(config.validate().is_err(), "{:?} should be invalid", model);
        }

        let tiny_vocab = BertConfig::from_descriptors(
            &TokenizerDescriptor::new(0),
            &ModelDescriptor::default(),
        );
        assert!(tiny_vocab.validate().is_err());
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(base_config()).unwrap();

        assert_eq!(value["embed_size"], 768);
        assert_eq!(value["d_model"], 768);
        assert_eq!(value["seq_len"], 512);
        assert!(value["classifier_dropout"].is_null());
    }
}
