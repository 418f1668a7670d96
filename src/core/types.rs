use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
            }
        }
    };
}

record_id!(
    /// Warehouse record.
    WarehouseId,
    "warehouse"
);
record_id!(
    /// Picking type (operation type) record.
    PickingTypeId,
    "picking-type"
);
record_id!(
    /// Picking (delivery, receipt, transfer) record.
    PickingId,
    "picking"
);
record_id!(
    /// Physical package record.
    PackageId,
    "package"
);
record_id!(
    /// Accounting journal record.
    JournalId,
    "journal"
);
record_id!(
    /// Sale order record.
    SaleOrderId,
    "sale-order"
);
record_id!(
    /// Invoice or credit note record.
    InvoiceId,
    "invoice"
);
