//! ISO 7064 MOD 97-10 check digits for IBAN-style identifiers

/// Number of decimal digits reduced per step. Nine digits plus a two-digit
/// carried remainder never overflow a `u64`.
const CHUNK_LEN: usize = 9;

/// Moves the first four characters (prefix and check digits) to the end and
/// expands every letter to its two-digit value (`A` = 10 .. `Z` = 35).
///
/// Characters outside `0-9A-Za-z` contribute nothing.
pub fn rearrange(id: &str) -> String {
    let split = id.char_indices().nth(4).map_or(id.len(), |(i, _)| i);
    let (head, tail) = id.split_at(split);

    let mut digits = String::with_capacity(id.len() * 2);
    for value in tail.chars().chain(head.chars()).filter_map(|c| c.to_digit(36)) {
        digits.push_str(&value.to_string());
    }
    digits
}

/// Remainder of a decimal digit string modulo 97.
///
/// Works left to right: the leading chunk is replaced by its remainder until
/// at most two digits are left. Only machine-word arithmetic is needed, so the
/// input may be arbitrarily long.
pub fn mod97_10(digits: &str) -> u32 {
    let mut remaining = digits.to_string();
    while remaining.len() > 2 {
        let end = remaining.len().min(CHUNK_LEN);
        let chunk = parse_decimal(&remaining[..end]);
        remaining = format!("{}{}", chunk % 97, &remaining[end..]);
    }
    (parse_decimal(&remaining) % 97) as u32
}

fn parse_decimal(digits: &str) -> u64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc * 10 + u64::from(d))
}

/// Two check digits for `prefix` + `body`, zero padded ("02" .. "98").
pub fn check_digits(prefix: &str, body: &str) -> String {
    let remainder = mod97_10(&rearrange(&format!("{}00{}", prefix, body)));
    format!("{:02}", 98 - remainder)
}

/// True when the full identifier satisfies the ISO 13616 invariant.
pub fn has_valid_checksum(id: &str) -> bool {
    mod97_10(&rearrange(id)) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearrange_moves_header_and_expands_letters() {
        assert_eq!(rearrange("TH001A"), "110291700");
        assert_eq!(rearrange("AB12"), "101112");
    }

    #[test]
    fn test_mod97_matches_native_remainder() {
        let samples = [
            "0",
            "97",
            "98",
            "123456789",
            "1234567890123456789",
            "281617221822213333313435131715122412141718274112112282534142917",
        ];
        for digits in samples {
            let expected = digits
                .chars()
                .fold(0u64, |acc, c| (acc * 10 + u64::from(c.to_digit(10).unwrap())) % 97);
            assert_eq!(u64::from(mod97_10(digits)), expected, "digits {}", digits);
        }
    }

    #[test]
    fn test_reference_iban() {
        // Published ISO 13616 example.
        assert!(has_valid_checksum("GB82WEST12345698765432"));
        assert_eq!(check_digits("GB", "WEST12345698765432"), "82");
        assert!(!has_valid_checksum("GB83WEST12345698765432"));
    }

    #[test]
    fn test_check_digits_ignore_body_padding() {
        assert_eq!(check_digits("TH", "000000000000001EKI"), "48");
        assert_eq!(check_digits("TH", "000000000000000000000000001EKI"), "48");
    }

    #[test]
    fn test_check_digits_are_two_wide() {
        let digits = check_digits("TH", "000000000000001");
        assert_eq!(digits.len(), 2);
        assert_eq!(digits, "50");
    }
}
