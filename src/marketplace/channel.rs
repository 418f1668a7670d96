//! Sales channels an order can come from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::VersandError;

/// Marketplace an order was placed on.
///
/// The display name is also the name of the sale journal its invoices are
/// routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marketplace {
    Shopify,
    Kaufland,
    Otto,
    Ebay,
    Amazon,
    MediamarktSaturnRetail,
    MediamarktMarketplace,
}

impl Marketplace {
    pub const ALL: [Self; 7] = [
        Self::Shopify,
        Self::Kaufland,
        Self::Otto,
        Self::Ebay,
        Self::Amazon,
        Self::MediamarktSaturnRetail,
        Self::MediamarktMarketplace,
    ];

    /// Stable selection code used by the order import.
    pub fn code(self) -> &'static str {
        match self {
            Self::Shopify => "1",
            Self::Kaufland => "2",
            Self::Otto => "4",
            Self::Ebay => "5",
            Self::Amazon => "6",
            Self::MediamarktSaturnRetail => "7",
            Self::MediamarktMarketplace => "8",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, VersandError> {
        Self::ALL
            .into_iter()
            .find(|m| m.code() == code.trim())
            .ok_or_else(|| VersandError::Marketplace(format!("unknown marketplace code '{code}'")))
    }

    /// Name of the sale journal for this marketplace.
    pub fn journal_name(self) -> &'static str {
        match self {
            Self::Shopify => "Shopify",
            Self::Kaufland => "Kaufland",
            Self::Otto => "OTTO",
            Self::Ebay => "Ebay",
            Self::Amazon => "Amazon",
            Self::MediamarktSaturnRetail => "MediamarktSaturn Retail",
            Self::MediamarktMarketplace => "Mediamarkt Marketplace",
        }
    }

    /// Whether confirming an order creates its invoice right away.
    ///
    /// MediaMarktSaturn retail orders are invoiced by the retailer's own process.
    pub fn invoices_on_confirmation(self) -> bool {
        self != Self::MediamarktSaturnRetail
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.journal_name())
    }
}
