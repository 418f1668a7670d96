//! Label data for an external barcode renderer.
//!
//! The renderer encodes [`NveLabel::barcode`] as a Code128 symbol and prints
//! the remaining fields as text.

use rust_decimal::Decimal;
use serde::Serialize;

use super::package::{Package, PackageStore};
use super::picking::Picking;
use super::warehouse::Warehouse;
use crate::core::{Gln, Nve, PackageId, VersandError};

/// Symbology the label renderer is expected to use.
pub const BARCODE_SYMBOLOGY: &str = "Code128";

/// One printable shipping label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NveLabel {
    pub package: PackageId,
    pub package_name: String,
    /// Barcode payload: the bare 18-digit NVE.
    pub barcode: String,
    pub symbology: &'static str,
    pub check_digit_valid: bool,
    /// NVE split into prefix, GLN, sequence and check digit.
    pub human_readable: String,
    pub warehouse: Option<String>,
    pub net_weight: Decimal,
    pub gross_weight: Decimal,
}

impl NveLabel {
    /// Label for a package, or `None` if it has no NVE yet.
    pub fn for_package(package: &Package, warehouse: Option<&Warehouse>) -> Option<Self> {
        let nve = package.nve.as_ref()?;
        Some(Self {
            package: package.id,
            package_name: package.name.clone(),
            barcode: nve.as_str().to_string(),
            symbology: BARCODE_SYMBOLOGY,
            check_digit_valid: nve.is_check_digit_valid(),
            human_readable: human_readable(nve, warehouse.and_then(Warehouse::gln)),
            warehouse: warehouse.map(|w| w.name.clone()),
            net_weight: package.net_weight(),
            gross_weight: package.gross_weight(),
        })
    }
}

/// Group an NVE as `P GLN SEQUENCE C`.
///
/// Grouping needs the GLN the NVE was issued under. NVEs that do not carry
/// `gln` after the prefix, such as those issued before a GLN change, are
/// returned ungrouped.
pub fn human_readable(nve: &Nve, gln: Option<&Gln>) -> String {
    let s = nve.as_str();
    match gln.map(Gln::as_str) {
        Some(gln) if s.len() > gln.len() + 2 && s[1..].starts_with(gln) => format!(
            "{} {} {} {}",
            &s[..1],
            gln,
            &s[1 + gln.len()..s.len() - 1],
            &s[s.len() - 1..]
        ),
        _ => s.to_string(),
    }
}

/// Labels for every package of a picking that carries an NVE.
pub fn picking_labels(
    picking: &Picking,
    warehouse: Option<&Warehouse>,
    packages: &dyn PackageStore,
) -> Result<Vec<NveLabel>, VersandError> {
    let mut labels = Vec::new();
    for id in picking.result_packages() {
        let package = packages
            .get(id)?
            .ok_or_else(|| VersandError::Package(format!("{id} does not exist")))?;
        if let Some(label) = NveLabel::for_package(&package, warehouse) {
            labels.push(label);
        }
    }
    Ok(labels)
}

/// Serialise labels as a JSON array for the renderer.
pub fn labels_to_json(labels: &[NveLabel]) -> Result<String, VersandError> {
    serde_json::to_string_pretty(labels)
        .map_err(|e| VersandError::InvalidInput(format!("label serialisation failed: {e}")))
}
