//! Stock level classification.
//!
//! The warehouse API reports a raw unit count per product; the dashboard
//! derives a status badge from fixed thresholds.

use serde::{Deserialize, Serialize};

/// Derived stock status for a product.
///
/// Thresholds: 0 (or below) is out of stock, 1 through 10 is low, anything
/// above 10 is in stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

/// Inclusive upper bound of the low-stock band.
const LOW_STOCK_MAX: i64 = 10;

impl StockStatus {
    /// Classify a unit count.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        if units <= 0 {
            Self::OutOfStock
        } else if units <= LOW_STOCK_MAX {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    /// Badge label shown in the products table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of Stock",
            Self::LowStock => "Low Stock",
            Self::InStock => "In Stock",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
