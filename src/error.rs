//! Error types for configuration loading
//!
//! The simulation itself never fails; only reading tuning/settings files can.

use std::path::PathBuf;

/// Errors raised while loading or validating configuration files
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Could not read the file
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not valid JSON for the target type
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parsed but violate a gameplay constraint
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Read a JSON file into any deserializable config type
pub(crate) fn load_json<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}
