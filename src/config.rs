//! Configuration management for th-iban

use crate::codec::{Codec, DEFAULT_PREFIX};
use crate::error::{IbanError, Result};
use crate::messages::Locale;
use crate::normalize::{DisplayVariant, Normalizer};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "th-iban.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub addressbook: AddressBookConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodecConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub variant: DisplayVariant,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressBookConfig {
    /// Defaults to `~/.th-iban/addressbook.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).map_err(|e| IbanError::Config(e.to_string()))?;
        config.codec()?;
        Ok(config)
    }

    pub fn codec(&self) -> Result<Codec> {
        Codec::new(&self.codec.prefix)
            .map_err(|e| IbanError::Config(format!("codec.prefix: {}", e)))
    }

    pub fn normalizer(&self) -> Result<Normalizer> {
        Ok(Normalizer::new(self.codec()?, self.display.locale))
    }

    pub fn addressbook_path(&self) -> PathBuf {
        self.addressbook
            .path
            .clone()
            .unwrap_or_else(crate::addressbook::get_addressbook_path)
    }
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        warn!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(path)?;
    Config::from_toml(&contents)
}
