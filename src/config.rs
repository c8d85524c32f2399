//! Run settings.
//!
//! Settings are read from an optional TOML file; every key has a default so
//! an empty file (or no file) is valid:
//!
//! ```toml
//! output_suffix = "_aug"
//! extensions = ["png", "jpg", "jpeg"]
//! jpeg_quality = 95
//! seed = 42
//! stop_on_error = false
//! ```

use crate::core::error::{ConfigError, ConfigResult};
use crate::io::store::DEFAULT_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Appended to the input directory name to form the output directory
    pub output_suffix: String,
    /// Input extensions to accept; empty accepts every file
    pub extensions: Vec<String>,
    /// JPEG quality for written outputs (1-100)
    pub jpeg_quality: u8,
    /// Seed for the random transforms; unset seeds from the OS
    pub seed: Option<u64>,
    /// Abort the run on the first per-image failure
    pub stop_on_error: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_suffix: "_aug".to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            jpeg_quality: 95,
            seed: None,
            stop_on_error: false,
        }
    }
}

impl Settings {
    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let settings: Settings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Read settings from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.output_suffix.is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: "output_suffix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.output_suffix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidSetting {
                key: "output_suffix".to_string(),
                reason: "must not contain path separators".to_string(),
            });
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidSetting {
                key: "jpeg_quality".to_string(),
                reason: format!("{} is outside 1-100", self.jpeg_quality),
            });
        }
        Ok(())
    }
}
