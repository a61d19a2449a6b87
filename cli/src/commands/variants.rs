//! Variant listing command

use anyhow::Result;
use crammers_core::BertVariant;

/// Show the supported variants and the models they load
pub async fn variants_command() -> Result<()> {
    println!("Supported BERT variants\n");

    for variant in BertVariant::all() {
        println!("  {:<16} {}", variant.name(), variant.model_id());
    }

    Ok(())
}
