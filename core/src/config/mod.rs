//! Configuration records produced by crammers core
//!
//! Only exports the local BERT record. Registry settings live with the
//! registry; file discovery for them is in the CLI layer.

pub mod types;

pub use types::BertConfig;
