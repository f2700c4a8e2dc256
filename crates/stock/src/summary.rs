use serde::{Deserialize, Serialize};

use crate::balance::StockBalance;

/// Figures shown above the stock table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    pub product_count: usize,
    /// Products with a positive balance.
    pub in_stock: usize,
    /// Products whose predicted quantity is below zero.
    pub shortfalls: usize,
    /// Σ balance × average price over products with positive balance.
    pub total_value: f64,
}

impl StockSummary {
    pub fn from_balances(balances: &[StockBalance]) -> Self {
        Self {
            product_count: balances.len(),
            in_stock: balances.iter().filter(|b| b.balance > 0.0).count(),
            shortfalls: balances.iter().filter(|b| b.has_shortfall()).count(),
            total_value: balances.iter().map(StockBalance::stock_value).sum(),
        }
    }
}
