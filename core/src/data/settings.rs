use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::config::PlannerSettings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Returns sensible defaults for all settings fields.
pub fn default_settings() -> PlannerSettings {
    PlannerSettings::default()
}

/// Load `PlannerSettings` from a YAML file. Missing keys keep their defaults.
pub fn load(path: &Path) -> Result<PlannerSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

/// Parse settings from a YAML string. An empty document yields the defaults.
pub fn parse(content: &str) -> Result<PlannerSettings, SettingsError> {
    if content.trim().is_empty() {
        return Ok(default_settings());
    }
    Ok(serde_yaml::from_str(content)?)
}
