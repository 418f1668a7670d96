//! Typed identifiers: GLN, NVE prefix and the NVE itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::check_digit::{gs1_check_digit, has_valid_check_digit};
use super::error::VersandError;
use super::validation::{validate_gln, validate_nve_prefix};

/// Global Location Number of a warehouse, 7-9 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Gln(String);

impl Gln {
    /// Parse and validate a GLN.
    pub fn parse(value: &str) -> Result<Self, VersandError> {
        validate_gln(value)?;
        Ok(Self(value.to_string()))
    }

    /// Number of sequence digits an NVE built on this GLN carries.
    pub fn padding(&self) -> usize {
        // validated on construction
        super::validation::NVE_GLN_AND_SEQUENCE_WIDTH - self.0.len()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Gln {
    type Error = VersandError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_gln(&value)?;
        Ok(Self(value))
    }
}

impl From<Gln> for String {
    fn from(gln: Gln) -> Self {
        gln.0
    }
}

impl fmt::Display for Gln {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single leading digit of an NVE (0-9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct NvePrefix(u8);

impl NvePrefix {
    pub fn new(digit: u8) -> Result<Self, VersandError> {
        validate_nve_prefix(digit)?;
        Ok(Self(digit))
    }

    pub fn digit(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<u8> for NvePrefix {
    type Error = VersandError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NvePrefix> for u8 {
    fn from(prefix: NvePrefix) -> Self {
        prefix.0
    }
}

impl fmt::Display for NvePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nummer der Versandeinheit: prefix + GLN + padded sequence + check digit.
///
/// ```
/// use versand::core::{Gln, Nve, NvePrefix};
///
/// let nve = Nve::compose(
///     NvePrefix::new(0).unwrap(),
///     &Gln::parse("1234567").unwrap(),
///     "000000001",
/// )
/// .unwrap();
/// assert_eq!(nve.as_str(), "012345670000000015");
/// assert_eq!(nve.check_digit(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nve(String);

/// Character length of a composed NVE.
pub const NVE_LEN: usize = 18;

impl Nve {
    /// Assemble an NVE from its parts and append the check digit.
    ///
    /// `sequence` must be exactly `gln.padding()` digits wide.
    pub fn compose(prefix: NvePrefix, gln: &Gln, sequence: &str) -> Result<Self, VersandError> {
        if sequence.len() != gln.padding() {
            return Err(VersandError::InvalidInput(format!(
                "sequence '{sequence}' must be {} digits for GLN {gln}",
                gln.padding()
            )));
        }
        let mut body = String::with_capacity(NVE_LEN);
        body.push(prefix.as_char());
        body.push_str(gln.as_str());
        body.push_str(sequence);

        let check = gs1_check_digit(&body)?;
        body.push(char::from(b'0' + check));
        Ok(Self(body))
    }

    /// Parse an existing NVE, verifying length, digits and check digit.
    pub fn parse(value: &str) -> Result<Self, VersandError> {
        if value.len() != NVE_LEN {
            return Err(VersandError::InvalidInput(format!(
                "NVE must be {NVE_LEN} digits, got {}",
                value.len()
            )));
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VersandError::InvalidInput(format!(
                "NVE '{value}' must be numeric"
            )));
        }
        if !has_valid_check_digit(value) {
            return Err(VersandError::InvalidInput(format!(
                "NVE '{value}' has an invalid check digit"
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything but the trailing check digit.
    pub fn body(&self) -> &str {
        &self.0[..self.0.len() - 1]
    }

    pub fn check_digit(&self) -> u8 {
        self.0.as_bytes()[self.0.len() - 1] - b'0'
    }

    /// Recompute the check digit and compare with the stored one.
    pub fn is_check_digit_valid(&self) -> bool {
        has_valid_check_digit(&self.0)
    }
}

impl TryFrom<String> for Nve {
    type Error = VersandError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Nve> for String {
    fn from(nve: Nve) -> Self {
        nve.0
    }
}

impl fmt::Display for Nve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(d: u8) -> NvePrefix {
        NvePrefix::new(d).unwrap()
    }

    #[test]
    fn compose_worked_example() {
        let gln = Gln::parse("1234567").unwrap();
        let nve = Nve::compose(prefix(0), &gln, "000000001").unwrap();
        assert_eq!(nve.as_str(), "012345670000000015");
        assert_eq!(nve.body(), "01234567000000001");
        assert!(nve.is_check_digit_valid());
    }

    #[test]
    fn compose_nine_digit_gln() {
        let gln = Gln::parse("123456789").unwrap();
        assert_eq!(gln.padding(), 7);
        let nve = Nve::compose(prefix(9), &gln, "0000001").unwrap();
        assert_eq!(nve.as_str().len(), NVE_LEN);
        assert_eq!(nve.as_str(), "912345678900000015");
    }

    #[test]
    fn compose_rejects_wrong_sequence_width() {
        let gln = Gln::parse("12345678").unwrap();
        assert!(Nve::compose(prefix(1), &gln, "000001").is_err());
        assert!(Nve::compose(prefix(1), &gln, "123456789").is_err());
    }

    #[test]
    fn parse_rejects_bad_check_digit() {
        assert!(Nve::parse("012345670000000015").is_ok());
        assert!(Nve::parse("012345670000000013").is_err());
        assert!(Nve::parse("01234567000000001").is_err());
        assert!(Nve::parse("01234567000000001A").is_err());
    }

    #[test]
    fn prefix_char() {
        assert_eq!(prefix(7).as_char(), '7');
        assert!(NvePrefix::new(12).is_err());
    }

    #[test]
    fn gln_serde_validates() {
        let ok: Result<Gln, _> = serde_json::from_str("\"1234567\"");
        assert!(ok.is_ok());
        let bad: Result<Gln, _> = serde_json::from_str("\"12\"");
        assert!(bad.is_err());
    }
}
