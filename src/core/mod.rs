//! Core identifiers, check digits, numbering and counter storage.
//!
//! This module provides the building blocks shared by NVE generation and
//! marketplace document numbering: GS1 check digits, GLN validation,
//! gapless number sequences and a keyed counter store.

mod check_digit;
mod error;
mod identifier;
mod numbering;
mod store;
mod types;
mod validation;

pub use check_digit::*;
pub use error::*;
pub use identifier::*;
pub use numbering::*;
pub use store::*;
pub use types::*;
pub use validation::*;
