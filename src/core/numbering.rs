use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::VersandError;

/// Placeholder substituted with the four-digit year in a prefix template.
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Gapless number sequence.
///
/// Issues 1, 2, 3, ... zero-padded to a configurable width, optionally
/// preceded by a prefix template such as `"{year}-"`. Padding may change
/// at any time without touching the next value to be issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberSequence {
    prefix: Option<String>,
    padding: usize,
    next_number: u64,
}

/// A number taken from a [`NumberSequence`], with the formatting it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedNumber {
    pub value: u64,
    pub padding: usize,
    pub prefix: Option<String>,
}

impl IssuedNumber {
    /// Zero-padded digits without prefix, e.g. "000000001".
    ///
    /// A value wider than the padding is returned unpadded; see [`Self::fits`].
    pub fn digits(&self) -> String {
        format!("{:0>width$}", self.value, width = self.padding)
    }

    /// Whether the value fits into its padding width.
    pub fn fits(&self) -> bool {
        self.value.to_string().len() <= self.padding
    }

    /// Prefix (with `{year}` taken from `date`) followed by the padded digits.
    pub fn render(&self, date: NaiveDate) -> String {
        match &self.prefix {
            Some(template) => format!(
                "{}{}",
                template.replace(YEAR_PLACEHOLDER, &date.year().to_string()),
                self.digits()
            ),
            None => self.digits(),
        }
    }
}

impl NumberSequence {
    /// Create a new sequence starting at 1 with no prefix.
    pub fn new(padding: usize) -> Self {
        Self {
            prefix: None,
            padding,
            next_number: 1,
        }
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(padding: usize, next_number: u64) -> Result<Self, VersandError> {
        if next_number == 0 {
            return Err(VersandError::Sequence(
                "sequences start at 1, got next number 0".into(),
            ));
        }
        Ok(Self {
            prefix: None,
            padding,
            next_number,
        })
    }

    /// Set a prefix template, e.g. `"{year}-"`.
    pub fn with_prefix(mut self, template: impl Into<String>) -> Self {
        self.prefix = Some(template.into());
        self
    }

    /// Take the next number.
    pub fn issue(&mut self) -> IssuedNumber {
        let issued = self.peek();
        self.next_number += 1;
        issued
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> IssuedNumber {
        IssuedNumber {
            value: self.next_number,
            padding: self.padding,
            prefix: self.prefix.clone(),
        }
    }

    /// Change the formatting width of future numbers.
    pub fn set_padding(&mut self, padding: usize) {
        self.padding = padding;
    }

    /// Restart the sequence at 1.
    pub fn reset(&mut self) {
        self.next_number = 1;
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Get the next number that will be issued (without prefix/formatting).
    pub fn next_raw(&self) -> u64 {
        self.next_number
    }
}
