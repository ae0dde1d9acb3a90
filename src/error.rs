//! Error types for th-iban

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IbanError {
    /// Encode input is not a well-formed 20-byte hex address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Decode was given an indirect-form (length 20) identifier.
    #[error("Identifier is in indirect form; only direct form can be decoded")]
    NotDirectFormat,

    /// Decode body is not a base-36 number naming a 20-byte account.
    #[error("Malformed identifier: {0}")]
    MalformedInput(String),

    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Address book error: {0}")]
    AddressBook(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IbanError {
    fn from(err: std::io::Error) -> Self {
        IbanError::Io(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, IbanError>;
