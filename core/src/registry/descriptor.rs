//! Read-only descriptors published by a model registry

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Vocabulary metadata for a pretrained tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerDescriptor {
    /// Number of distinct WordPiece entries
    pub vocab_size: usize,
}

impl TokenizerDescriptor {
    pub fn new(vocab_size: usize) -> Self {
        Self { vocab_size }
    }

    /// Build a descriptor from the contents of a `vocab.txt` file.
    ///
    /// Each line holds one token. A repeated token keeps a single entry, so
    /// the size is the number of distinct lines, not the line count.
    pub fn from_vocab_text(text: &str) -> Self {
        if text.is_empty() {
            return Self { vocab_size: 0 };
        }
        let body = text.strip_suffix('\n').unwrap_or(text);
        let vocab_size = body.split('\n').collect::<HashSet<_>>().len();
        Self { vocab_size }
    }
}

/// Architecture metadata for a pretrained BERT model, as found in `config.json`.
///
/// Keys missing from the file take the stock BERT architecture defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDescriptor {
    pub type_vocab_size: usize,
    pub pad_token_id: Option<u32>,
    pub hidden_size: usize,
    pub max_position_embeddings: usize,
    pub num_attention_heads: usize,
    pub intermediate_size: usize,
    pub num_hidden_layers: usize,
    pub hidden_dropout_prob: f64,
    pub attention_probs_dropout_prob: f64,
    pub classifier_dropout: Option<f64>,
    pub layer_norm_eps: f64,
}

impl Default for ModelDescriptor {
    fn default() -> Self {
        Self {
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
}

impl ModelDescriptor {
    /// Parse a descriptor from the text of a `config.json` file
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
