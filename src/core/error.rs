use std::fmt;

use thiserror::Error;

/// Errors raised by configuration, numbering, NVE assignment and order processing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VersandError {
    /// GLN is not numeric or has the wrong length. Raised at configuration time.
    #[error("invalid GLN '{value}': {reason}")]
    InvalidGln { value: String, reason: String },

    /// Warehouse NVE settings are incomplete at picking validation time.
    #[error("{field} does not exist for warehouse '{warehouse}', configure it in the warehouse settings")]
    ConfigurationMissing {
        warehouse: String,
        field: MissingField,
    },

    /// Non-digit input reached a check digit or identifier computation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Counter lookup, creation or allocation failed.
    #[error("sequence error: {0}")]
    Sequence(String),

    /// Package lookup or write-once violation.
    #[error("package error: {0}")]
    Package(String),

    /// Illegal picking state transition.
    #[error("picking error: {0}")]
    Picking(String),

    /// Marketplace order could not be processed.
    #[error("marketplace error: {0}")]
    Marketplace(String),

    /// Journal lookup or removal failed.
    #[error("journal error: {0}")]
    Journal(String),

    /// Malformed configuration document.
    #[error("configuration error: {0}")]
    Config(String),
}

/// The warehouse setting reported by [`VersandError::ConfigurationMissing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    NvePrefix,
    Gln,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NvePrefix => f.write_str("NVE prefix"),
            Self::Gln => f.write_str("GLN"),
        }
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "order.marketplace").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Rule identifier if applicable (e.g. "SO-01").
    pub rule: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}
