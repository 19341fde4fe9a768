//! Mapping configuration loader.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use cbs_model::MappingConfig;

/// Load and validate a mapping document (JSON).
///
/// The config is resolved once per session; callers hold it immutable for
/// the session's lifetime.
pub fn load_mapping_config(path: &Path) -> Result<MappingConfig> {
    let file = File::open(path)
        .with_context(|| format!("failed to open mapping config {}", path.display()))?;
    let config: MappingConfig = serde_json::from_reader(file)
        .with_context(|| format!("failed to parse mapping config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid mapping config {}", path.display()))?;
    debug!(fields = config.fields.len(), "loaded mapping config");
    Ok(config)
}
