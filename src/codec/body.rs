//! Base-36 body of an identifier (the BBAN)

use crate::error::{IbanError, Result};
use alloy_primitives::U160;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const RADIX: u64 = 36;

/// Bodies are left padded with `'0'` up to this width, never truncated.
pub const MIN_BODY_LEN: usize = 15;

/// Upper-case base-36 rendering of `value`, padded to [`MIN_BODY_LEN`].
pub fn to_base36(value: U160) -> String {
    let radix = U160::from(RADIX);
    // 36^31 > 2^160, so 31 digits always suffice.
    let mut digits = Vec::with_capacity(31);
    let mut rest = value;
    while !rest.is_zero() {
        let (quotient, remainder) = rest.div_rem(radix);
        digits.push(ALPHABET[remainder.as_limbs()[0] as usize]);
        rest = quotient;
    }
    while digits.len() < MIN_BODY_LEN {
        digits.push(b'0');
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

/// Parses a base-36 body (either case) into a 160-bit value.
pub fn from_base36(body: &str) -> Result<U160> {
    if body.is_empty() {
        return Err(IbanError::MalformedInput("identifier has no body".to_string()));
    }

    let radix = U160::from(RADIX);
    body.chars().try_fold(U160::ZERO, |acc, c| {
        let digit = c.to_digit(36).ok_or_else(|| {
            IbanError::MalformedInput(format!("'{}' is not a base-36 digit", c))
        })?;
        acc.checked_mul(radix)
            .and_then(|shifted| shifted.checked_add(U160::from(u64::from(digit))))
            .ok_or_else(|| {
                IbanError::MalformedInput(format!("body {} does not fit in 20 bytes", body))
            })
    })
}
