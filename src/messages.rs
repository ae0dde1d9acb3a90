//! User-facing validation messages, per locale

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            other => Err(format!("Unknown locale '{}'", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Zh => write!(f, "zh"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Nothing was entered.
    Empty,
    /// Neither a hex address nor a valid checksummed identifier.
    UnsupportedFormat,
}

static CATALOG: Lazy<HashMap<(Locale, MessageKey), &'static str>> = Lazy::new(|| {
    HashMap::from([
        ((Locale::En, MessageKey::Empty), "Please enter an address"),
        (
            (Locale::En, MessageKey::UnsupportedFormat),
            "Unsupported address format. Enter a 0x address or a checksummed address",
        ),
        ((Locale::Zh, MessageKey::Empty), "请输入地址"),
        (
            (Locale::Zh, MessageKey::UnsupportedFormat),
            "不支持的地址格式，请输入 0x 地址或校验地址",
        ),
    ])
});

/// Look up a message, falling back to English.
pub fn message(locale: Locale, key: MessageKey) -> &'static str {
    CATALOG
        .get(&(locale, key))
        .or_else(|| CATALOG.get(&(Locale::En, key)))
        .copied()
        .unwrap_or("Invalid address")
}
