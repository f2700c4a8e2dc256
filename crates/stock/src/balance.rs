use serde::{Deserialize, Serialize};

use farmstock_core::ProductId;

/// Read model: reconciled stock position of one product.
///
/// Transient. Built on every request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBalance {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit: String,
    pub categories: Vec<String>,
    /// Entries minus exits to date.
    pub balance: f64,
    /// Quantity-weighted average entry price; `0.0` without entries.
    pub average_price: f64,
    /// Balance minus planned consumption. Negative means a future shortfall.
    pub predicted_quantity: f64,
}

impl StockBalance {
    /// Value of the stock on hand at average cost. Negative balances count as zero.
    pub fn stock_value(&self) -> f64 {
        if self.balance > 0.0 {
            self.balance * self.average_price
        } else {
            0.0
        }
    }

    pub fn has_shortfall(&self) -> bool {
        self.predicted_quantity < 0.0
    }
}
