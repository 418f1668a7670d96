//! # versand
//!
//! Shipping unit numbering (NVE / SSCC) for warehouse deliveries, together
//! with the marketplace order and invoicing flow that decides which
//! deliveries receive one.
//!
//! An NVE is 18 digits: a prefix digit, the warehouse GLN, a zero-padded
//! running number from the warehouse counter and a GS1 Mod-10 check digit.
//!
//! ## Quick Start
//!
//! ```rust
//! use versand::core::*;
//!
//! let gln = Gln::parse("1234567").unwrap();
//! let nve = Nve::compose(NvePrefix::new(0).unwrap(), &gln, "000000001").unwrap();
//!
//! assert_eq!(nve.as_str(), "012345670000000015");
//! assert!(has_valid_check_digit(nve.as_str()));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Check digit, GLN/NVE identifiers, counters, errors |
//! | `nve` (default) | Warehouses, packages, pickings, NVE assignment on validation |
//! | `label` | Shipping label data and JSON export |
//! | `marketplace` | Marketplace orders, sale journals, invoice numbering |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "nve")]
pub mod nve;

#[cfg(feature = "marketplace")]
pub mod marketplace;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
