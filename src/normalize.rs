//! Classification and canonicalization of user-entered addresses
//!
//! Input may be a canonical hex address or a checksummed identifier. Anything
//! else is a designed negative result (`None` or a user message), never an
//! error: form fields see garbage all the time.

use crate::codec::{parse_hex_address, Codec};
use crate::messages::{message, Locale, MessageKey};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Identifiers issued before the general encoding existed. Consulted before
/// any other rule, so the mapping holds even if the algorithm changes.
pub const LEGACY_IDS: &[(&str, &str)] = &[(
    "TH48000000000000000000000000001EKI",
    "0x0000000000000000000000000000000000010002",
)];

static HEX_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9A-Fa-f]{40}$").expect("hex pattern is a valid regex"));

static DEFAULT_NORMALIZER: Lazy<Normalizer> = Lazy::new(Normalizer::default);

const SHORT_HEAD: usize = 6;
const SHORT_TAIL: usize = 4;

/// How an address is rendered for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayVariant {
    /// `0xf39f...2266`
    #[default]
    Short,
    /// The IBAN-style identifier.
    Checksummed,
    /// Lower-case hex.
    Full,
    /// Mixed-case (EIP-55) hex.
    MixedCase,
}

impl DisplayVariant {
    pub const ALL: [DisplayVariant; 4] = [
        DisplayVariant::Short,
        DisplayVariant::Checksummed,
        DisplayVariant::Full,
        DisplayVariant::MixedCase,
    ];
}

impl FromStr for DisplayVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "short" => Ok(DisplayVariant::Short),
            "checksummed" => Ok(DisplayVariant::Checksummed),
            "full" => Ok(DisplayVariant::Full),
            "mixed_case" => Ok(DisplayVariant::MixedCase),
            other => Err(format!("Unknown display variant '{}'", other)),
        }
    }
}

impl fmt::Display for DisplayVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DisplayVariant::Short => "short",
            DisplayVariant::Checksummed => "checksummed",
            DisplayVariant::Full => "full",
            DisplayVariant::MixedCase => "mixed_case",
        };
        write!(f, "{}", name)
    }
}

/// Address normalizer bound to a codec prefix and a message locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalizer {
    codec: Codec,
    locale: Locale,
}

impl Normalizer {
    pub fn new(codec: Codec, locale: Locale) -> Self {
        Normalizer { codec, locale }
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn is_checksummed_id(&self, s: &str) -> bool {
        self.codec.validate(s)
    }

    /// Canonical lower-case hex for `input`, or `None` when it is not a
    /// recognized address.
    pub fn normalize(&self, input: &str) -> Option<String> {
        let trimmed = input.trim();

        if let Some(address) = legacy_address(trimmed) {
            return Some(address.to_string());
        }

        if is_canonical_hex(trimmed) {
            return Some(trimmed.to_lowercase());
        }

        if self.is_checksummed_id(trimmed) {
            return match self.codec.decode(trimmed) {
                Ok(address) => Some(address),
                Err(e) => {
                    debug!("Checksummed identifier {} failed to decode: {}", trimmed, e);
                    None
                }
            };
        }

        debug!("Unrecognized address input: {:?}", trimmed);
        None
    }

    /// A message to show the user, or `None` when the input is in a
    /// recognized format.
    ///
    /// Only the format is judged: a checksummed id that passes
    /// [`Codec::validate`] is accepted here even if it cannot be decoded.
    pub fn validate_input(&self, input: &str) -> Option<&'static str> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Some(message(self.locale, MessageKey::Empty));
        }
        if legacy_address(trimmed).is_none()
            && !is_canonical_hex(trimmed)
            && !self.is_checksummed_id(trimmed)
        {
            return Some(message(self.locale, MessageKey::UnsupportedFormat));
        }
        None
    }

    /// Render a canonical hex address. `None` if `raw` is not canonical hex.
    pub fn format_for_display(&self, raw: &str, variant: DisplayVariant) -> Option<String> {
        if !is_canonical_hex(raw) {
            return None;
        }
        let lower = raw.to_lowercase();

        match variant {
            DisplayVariant::Short => Some(format!(
                "{}...{}",
                &lower[..SHORT_HEAD],
                &lower[lower.len() - SHORT_TAIL..]
            )),
            DisplayVariant::Checksummed => self.codec.encode(&lower).ok(),
            DisplayVariant::Full => Some(lower),
            DisplayVariant::MixedCase => parse_hex_address(&lower)
                .ok()
                .map(|address| address.to_checksum(None)),
        }
    }
}

/// Hardcoded address for a legacy identifier, if `id` is one.
pub fn legacy_address(id: &str) -> Option<&'static str> {
    LEGACY_IDS
        .iter()
        .find(|(legacy, _)| *legacy == id)
        .map(|(_, address)| *address)
}

/// `0x` followed by exactly 40 hex digits of either case.
pub fn is_canonical_hex(s: &str) -> bool {
    HEX_ADDRESS.is_match(s)
}

pub fn is_checksummed_id(s: &str) -> bool {
    DEFAULT_NORMALIZER.is_checksummed_id(s)
}

pub fn normalize(input: &str) -> Option<String> {
    DEFAULT_NORMALIZER.normalize(input)
}

pub fn validate_input(input: &str) -> Option<&'static str> {
    DEFAULT_NORMALIZER.validate_input(input)
}

pub fn format_for_display(raw: &str, variant: DisplayVariant) -> Option<String> {
    DEFAULT_NORMALIZER.format_for_display(raw, variant)
}
