use super::error::VersandError;

/// Shortest GLN accepted for NVE composition.
pub const GLN_MIN_LEN: usize = 7;

/// Longest GLN accepted for NVE composition.
pub const GLN_MAX_LEN: usize = 9;

/// Combined width of GLN and sequence digits in an NVE.
pub const NVE_GLN_AND_SEQUENCE_WIDTH: usize = 16;

/// Validate a GLN for NVE use and return the sequence padding it implies.
///
/// The padding is `16 - len(gln)` and must lie in `7..=9`, which is the
/// same as requiring a GLN of 7, 8 or 9 digits.
///
/// ```
/// use versand::core::validate_gln;
///
/// assert_eq!(validate_gln("1234567").unwrap(), 9);
/// assert_eq!(validate_gln("123456789").unwrap(), 7);
/// assert!(validate_gln("12345").is_err());
/// assert!(validate_gln("12345a7").is_err());
/// ```
pub fn validate_gln(gln: &str) -> Result<usize, VersandError> {
    if gln.is_empty() || !gln.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersandError::InvalidGln {
            value: gln.into(),
            reason: "GLN must be numeric".into(),
        });
    }

    let padding = NVE_GLN_AND_SEQUENCE_WIDTH.saturating_sub(gln.len());
    if !(GLN_MIN_LEN..=GLN_MAX_LEN).contains(&padding) {
        return Err(VersandError::InvalidGln {
            value: gln.into(),
            reason: format!(
                "GLN must be {GLN_MIN_LEN}, 8, or {GLN_MAX_LEN} digits, got {}",
                gln.len()
            ),
        });
    }

    Ok(padding)
}

/// Validate a single NVE prefix digit (0-9).
pub fn validate_nve_prefix(digit: u8) -> Result<(), VersandError> {
    if digit > 9 {
        return Err(VersandError::InvalidInput(format!(
            "NVE prefix must be a single digit 0-9, got {digit}"
        )));
    }
    Ok(())
}
