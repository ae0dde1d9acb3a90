//! th-iban - IBAN-style checksummed identifiers for 20-byte EVM addresses
//!
//! # Architecture
//!
//! ## Core
//! - [`codec`] - Address ⇄ identifier conversion and MOD 97-10 checksums
//! - [`normalize`] - Input classification, canonical hex, display variants
//! - [`messages`] - Localized validation messages
//!
//! ## State
//! - [`addressbook`] - Labeled recipients, persisted as JSON
//!
//! ## Configuration & Utilities
//! - [`cli`] - Command line front end
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! ```
//! use th_iban::{decode, encode, normalize};
//!
//! let id = encode("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
//! assert_eq!(id, "TH20SGHMIMLXXVYZDHFCOCE17IR4BLCSPYE");
//! assert_eq!(decode(&id).unwrap(), "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
//! assert_eq!(normalize(&id), Some(decode(&id).unwrap()));
//! ```

#![forbid(unsafe_code)]

// ============================================================================
// Core
// ============================================================================
pub mod codec;
pub mod messages;
pub mod normalize;

// ============================================================================
// State
// ============================================================================
pub mod addressbook;

// ============================================================================
// Configuration & Utilities
// ============================================================================
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;

pub use codec::{decode, encode, validate, Codec};
pub use error::{IbanError, Result};
pub use messages::Locale;
pub use normalize::{
    format_for_display, is_canonical_hex, is_checksummed_id, normalize, validate_input,
    DisplayVariant, Normalizer,
};
