use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use farmstock_core::FarmId;
use farmstock_stock::{BalanceColumn, Diagnostic, SortDirection, StockBalance, StockSummary};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// `?sort=<column>&order=<asc|desc>` on the stock listing.
#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl StockQuery {
    /// `None` keeps the engine's name ordering.
    pub fn ordering(
        &self,
    ) -> Result<Option<(BalanceColumn, SortDirection)>, axum::response::Response> {
        let direction = match self.order.as_deref() {
            Some(raw) => raw.parse::<SortDirection>().map_err(|e| {
                errors::json_error(StatusCode::BAD_REQUEST, "invalid_sort", e.to_string())
            })?,
            None => SortDirection::Asc,
        };

        match self.sort.as_deref() {
            Some(raw) => {
                let column = raw.parse::<BalanceColumn>().map_err(|e| {
                    errors::json_error(StatusCode::BAD_REQUEST, "invalid_sort", e.to_string())
                })?;
                Ok(Some((column, direction)))
            }
            None if direction == SortDirection::Desc => Ok(Some((BalanceColumn::Name, direction))),
            None => Ok(None),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct StockListResponse {
    pub farm_id: FarmId,
    pub count: usize,
    pub balances: Vec<StockBalance>,
    pub summary: StockSummary,
    pub diagnostics: Vec<Diagnostic>,
}
