use serde::{Deserialize, Serialize};

use crate::core::VersandError;

/// Settings for invoice and credit note numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberingConfig {
    /// Static prefix of invoice names, e.g. "RE_".
    pub invoice_prefix: String,
    /// Static prefix of credit note names, e.g. "GS_".
    pub credit_note_prefix: String,
    /// Prefix template of the journal counter; `{year}` is replaced.
    pub sequence_prefix: String,
    /// Zero-padding of the running number.
    pub padding: usize,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            invoice_prefix: "RE_".into(),
            credit_note_prefix: "GS_".into(),
            sequence_prefix: "{year}-".into(),
            padding: 6,
        }
    }
}

impl NumberingConfig {
    /// Parse from JSON; missing keys fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, VersandError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| VersandError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), VersandError> {
        if self.invoice_prefix.is_empty() || self.credit_note_prefix.is_empty() {
            return Err(VersandError::Config(
                "document prefixes must not be empty".into(),
            ));
        }
        if self.invoice_prefix == self.credit_note_prefix {
            return Err(VersandError::Config(format!(
                "invoice and credit note prefix must differ, both are '{}'",
                self.invoice_prefix
            )));
        }
        if self.padding == 0 {
            return Err(VersandError::Config("padding must be at least 1".into()));
        }
        Ok(())
    }
}

/// Builder for [`NumberingConfig`].
///
/// # Example
///
/// ```
/// use versand::marketplace::NumberingConfigBuilder;
///
/// let config = NumberingConfigBuilder::new()
///     .padding(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.invoice_prefix, "RE_");
/// ```
#[derive(Default)]
pub struct NumberingConfigBuilder {
    config: NumberingConfig,
}

impl NumberingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the invoice name prefix.
    pub fn invoice_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.invoice_prefix = prefix.into();
        self
    }

    /// Set the credit note name prefix.
    pub fn credit_note_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.credit_note_prefix = prefix.into();
        self
    }

    /// Set the counter prefix template.
    pub fn sequence_prefix(mut self, template: impl Into<String>) -> Self {
        self.config.sequence_prefix = template.into();
        self
    }

    /// Set the zero-padding width.
    pub fn padding(mut self, width: usize) -> Self {
        self.config.padding = width;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<NumberingConfig, VersandError> {
        self.config.check()?;
        Ok(self.config)
    }
}
