//! `devclass config` command

use anyhow::Result;
use devclass_core::ClassifierConfig;

/// Print the configuration the classifier runs with, as JSON.
pub fn show(config: &ClassifierConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
