//! Checksum codec between 20-byte account addresses and IBAN-style identifiers
//!
//! An identifier is `PREFIX + check digits + body`, where the body is the
//! base-36 rendering of the address's 160-bit value and the check digits follow
//! ISO 7064 MOD 97-10. Only the direct form is produced or decoded.

mod body;
mod checksum;

pub use body::MIN_BODY_LEN;
pub use checksum::{check_digits, has_valid_checksum, mod97_10, rearrange};

use crate::error::{IbanError, Result};
use alloy_primitives::{Address, U160};
use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix used when no other is configured.
pub const DEFAULT_PREFIX: &str = "TH";

/// Total length of an indirect-form identifier.
pub const INDIRECT_LEN: usize = 20;

/// Prefix + check digits.
const HEADER_LEN: usize = 4;

/// Prefix, two check digits, then either the 16-character indirect body or a
/// 30-31 character direct body.
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]{2})[0-9]{2}(?:ETH[0-9A-Z]{13}|[0-9A-Z]{30,31})$")
        .expect("identifier pattern is a valid regex")
});

static DEFAULT_CODEC: Lazy<Codec> = Lazy::new(Codec::default);

/// Encoder/decoder bound to one two-letter prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    prefix: String,
}

impl Codec {
    /// Create a codec for `prefix`, which must be two ASCII upper-case letters.
    pub fn new(prefix: &str) -> Result<Self> {
        if prefix.len() != 2 || !prefix.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(IbanError::InvalidPrefix(format!(
                "'{}' must be exactly two upper-case letters",
                prefix
            )));
        }
        Ok(Codec {
            prefix: prefix.to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Encode a hex address (`0x` optional, any case) as an identifier.
    pub fn encode(&self, raw: &str) -> Result<String> {
        let address = parse_hex_address(raw)?;
        Ok(self.encode_address(&address))
    }

    pub fn encode_address(&self, address: &Address) -> String {
        let body = body::to_base36(U160::from_be_slice(address.as_slice()));
        let check = checksum::check_digits(&self.prefix, &body);
        format!("{}{}{}", self.prefix, check, body)
    }

    /// Decode an identifier into the lower-case canonical hex address.
    ///
    /// The checksum is not verified here; use [`Codec::validate`] for that.
    pub fn decode(&self, id: &str) -> Result<String> {
        self.decode_address(id).map(|address| canonical_hex(&address))
    }

    pub fn decode_address(&self, id: &str) -> Result<Address> {
        if id.chars().count() == INDIRECT_LEN {
            return Err(IbanError::NotDirectFormat);
        }
        if !id.is_ascii() {
            return Err(IbanError::MalformedInput(
                "identifier must be ASCII".to_string(),
            ));
        }
        let body = id
            .get(HEADER_LEN..)
            .filter(|body| !body.is_empty())
            .ok_or_else(|| IbanError::MalformedInput("identifier has no body".to_string()))?;

        let value = body::from_base36(body)?;
        Ok(Address::from(value.to_be_bytes::<20>()))
    }

    /// Structural check followed by the MOD 97-10 check. Never fails.
    pub fn validate(&self, id: &str) -> bool {
        match ID_PATTERN.captures(id) {
            Some(caps) if &caps[1] == self.prefix => checksum::has_valid_checksum(id),
            _ => false,
        }
    }
}

impl Default for Codec {
    fn default() -> Self {
        Codec {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Parse 40 hex digits, with or without `0x`, into an address.
pub fn parse_hex_address(raw: &str) -> Result<Address> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    let bytes = hex::decode(digits)
        .map_err(|e| IbanError::InvalidAddress(format!("{}: {}", raw, e)))?;
    let bytes: [u8; 20] = bytes.as_slice().try_into().map_err(|_| {
        IbanError::InvalidAddress(format!("address must be 20 bytes, got {}", bytes.len()))
    })?;
    Ok(Address::from(bytes))
}

/// `0x` followed by 40 lower-case hex digits.
pub fn canonical_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// [`Codec::encode`] with the default prefix.
pub fn encode(raw: &str) -> Result<String> {
    DEFAULT_CODEC.encode(raw)
}

/// [`Codec::decode`] with the default prefix.
pub fn decode(id: &str) -> Result<String> {
    DEFAULT_CODEC.decode(id)
}

/// [`Codec::validate`] with the default prefix.
pub fn validate(id: &str) -> bool {
    DEFAULT_CODEC.validate(id)
}
