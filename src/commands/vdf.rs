//! Vdf command - Print a KeyValues file as JSON

use anyhow::{Context, Result};
use std::path::Path;

use crate::vdf;

/// Parse `file` and return it as pretty JSON, keys in file order
pub fn execute(file: &Path) -> Result<String> {
    let doc =
        vdf::load_file(file).with_context(|| format!("Failed to parse: {}", file.display()))?;
    let json = serde_json::to_string_pretty(&doc)?;
    Ok(json)
}
