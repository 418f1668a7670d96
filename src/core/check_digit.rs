//! GS1 Modulo-10 check digit.

use super::error::VersandError;

/// Compute the GS1 Modulo-10 check digit of a digit string.
///
/// Digits are weighted from the left, 0-indexed: even positions × 3, odd
/// positions × 1. The check digit is `(10 - (sum mod 10)) mod 10`.
///
/// ```
/// use versand::core::gs1_check_digit;
///
/// // GS1 reference SSCC 1 0614141 234567890 8
/// assert_eq!(gs1_check_digit("10614141234567890").unwrap(), 8);
/// assert!(gs1_check_digit("0614A").is_err());
/// ```
pub fn gs1_check_digit(digits: &str) -> Result<u8, VersandError> {
    if digits.is_empty() {
        return Err(VersandError::InvalidInput(
            "check digit input must not be empty".into(),
        ));
    }

    let mut total: u32 = 0;
    for (i, c) in digits.chars().enumerate() {
        let Some(value) = c.to_digit(10) else {
            return Err(VersandError::InvalidInput(format!(
                "non-digit character '{c}' at position {i} in '{digits}'"
            )));
        };
        total += value * if i % 2 == 0 { 3 } else { 1 };
    }

    Ok(((10 - (total % 10)) % 10) as u8)
}

/// Check that the last character of `code` is the check digit of the rest.
///
/// Returns `false` for anything that is not at least two ASCII digits.
pub fn has_valid_check_digit(code: &str) -> bool {
    if code.len() < 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (body, check) = code.split_at(code.len() - 1);
    match gs1_check_digit(body) {
        Ok(expected) => check.as_bytes()[0] - b'0' == expected,
        Err(_) => false,
    }
}
