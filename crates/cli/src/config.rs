// ABOUTME: Loads the feed configuration file and compiles it into a FeedRegistry.
// ABOUTME: Accepts TOML or JSON documents; "-" reads TOML from stdin.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use scrapefeed_extract::{FeedConfig, FeedRegistry, SpecError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Top-level configuration document: feeds keyed by slug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub feeds: BTreeMap<String, FeedConfig>,
}

/// Errors raised while reading or compiling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Document syntax, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSyntax {
    Toml,
    Json,
}

impl ConfigSyntax {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigSyntax::Json,
            _ => ConfigSyntax::Toml,
        }
    }
}

/// Parses a configuration document without compiling it.
pub fn parse_config(text: &str, syntax: ConfigSyntax) -> Result<ConfigFile, ConfigError> {
    Ok(match syntax {
        ConfigSyntax::Toml => toml::from_str(text)?,
        ConfigSyntax::Json => serde_json::from_str(text)?,
    })
}

/// Reads the configuration at `path` (or stdin for `-`).
pub fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(io_err)?;
        return parse_config(&text, ConfigSyntax::Toml);
    }

    let text = fs::read_to_string(path).map_err(io_err)?;
    parse_config(&text, ConfigSyntax::for_path(path))
}

/// Reads and compiles every configured feed.
pub fn load_registry(path: &Path) -> Result<FeedRegistry, ConfigError> {
    let config = read_config(path)?;
    let registry = FeedRegistry::compile(config.feeds)?;
    debug!(path = %path.display(), feeds = registry.len(), "loaded feed registry");
    Ok(registry)
}
