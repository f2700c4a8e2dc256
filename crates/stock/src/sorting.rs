//! Re-sorting a report by any column, as the stock table does on header click.

use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use farmstock_core::DomainError;

use crate::balance::StockBalance;
use crate::collation::Collation;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceColumn {
    Name,
    Unit,
    Categories,
    Balance,
    AveragePrice,
    PredictedQuantity,
}

impl FromStr for BalanceColumn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "name" | "product_name" => Ok(BalanceColumn::Name),
            "unit" => Ok(BalanceColumn::Unit),
            "categories" | "category" => Ok(BalanceColumn::Categories),
            "balance" | "quantity" => Ok(BalanceColumn::Balance),
            "average_price" | "price" => Ok(BalanceColumn::AveragePrice),
            "predicted_quantity" | "predicted" => Ok(BalanceColumn::PredictedQuantity),
            other => Err(DomainError::validation(format!(
                "unknown sort column '{other}' (expected one of: name, unit, categories, \
                 balance, average_price, predicted_quantity)"
            ))),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(DomainError::validation(format!(
                "unknown sort direction '{other}' (expected asc or desc)"
            ))),
        }
    }
}

/// Stable sort by `column`. Ties fall back to name, then id, both ascending.
pub fn sort_balances(
    balances: &mut [StockBalance],
    column: BalanceColumn,
    direction: SortDirection,
    collation: Collation,
) {
    balances.sort_by(|a, b| {
        let primary = match column {
            BalanceColumn::Name => collation.compare(&a.product_name, &b.product_name),
            BalanceColumn::Unit => collation.compare(&a.unit, &b.unit),
            BalanceColumn::Categories => {
                collation.compare(&a.categories.join(", "), &b.categories.join(", "))
            }
            BalanceColumn::Balance => a.balance.total_cmp(&b.balance),
            BalanceColumn::AveragePrice => a.average_price.total_cmp(&b.average_price),
            BalanceColumn::PredictedQuantity => {
                a.predicted_quantity.total_cmp(&b.predicted_quantity)
            }
        };
        let primary = match direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| tie_break(a, b, collation))
    });
}

fn tie_break(a: &StockBalance, b: &StockBalance, collation: Collation) -> Ordering {
    collation
        .compare(&a.product_name, &b.product_name)
        .then_with(|| a.product_id.cmp(&b.product_id))
}
