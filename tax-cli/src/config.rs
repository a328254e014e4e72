//! Optional TOML configuration for `taxcalc`.
//!
//! Every key is optional; command-line flags override file values.
//!
//! ```toml
//! age_bracket = "60to80"      # below60 | 60to80 | above80
//! regime = "old"              # new | old
//! slabs = "slabs_fy2025_26.csv"
//! log_level = "info"
//! export_dir = "reports"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::{AgeBracket, Regime};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    pub age_bracket: Option<AgeBracket>,
    pub regime: Option<Regime>,
    /// Slab table CSV replacing the built-in table.
    pub slabs: Option<PathBuf>,
    pub log_level: Option<String>,
    /// Directory for exported reports when no explicit path is given.
    pub export_dir: Option<PathBuf>,
}

impl CliConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Reads and parses the file at `path`.
    ///
    /// A relative `slabs` or `export_dir` is resolved against the config
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.slabs = config.slabs.map(|p| base.join(p));
            config.export_dir = config.export_dir.map(|p| base.join(p));
        }
        debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }
}
