//! Checker configuration loaded from `bugfree.json`.
//!
//! ```json
//! { "emit_level": { "unused_use": "error", "qualified_name_discouraged": "suppress" } }
//! ```
//!
//! Categories left out keep their default level.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::hir::{Category, Level, SeverityPolicy};

pub const CONFIG_FILE: &str = "bugfree.json";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown diagnostic category `{0}` in emit_level")]
    UnknownCategory(String),
}

/// Loaded configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// The file this was loaded from, if any.
    pub path: Option<PathBuf>,
    /// Emit level for every diagnostic category.
    pub emit_level: SeverityPolicy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    emit_level: BTreeMap<String, Level>,
}

impl Config {
    /// Parse a JSON document, layering it over the default levels.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(text)?;

        let mut emit_level = SeverityPolicy::default();
        for (key, level) in file.emit_level {
            let category =
                Category::from_key(&key).ok_or(ConfigError::UnknownCategory(key))?;
            emit_level.set(category, level);
        }

        Ok(Self {
            path: None,
            emit_level,
        })
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut config = Self::from_json_str(&text)?;
        config.path = Some(path.to_owned());
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `bugfree.json` from a project root, or the defaults if there is none.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn policy(&self) -> &SeverityPolicy {
        &self.emit_level
    }
}
