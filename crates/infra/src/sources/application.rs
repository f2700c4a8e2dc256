use serde::{Deserialize, Serialize};
use uuid::Uuid;

use farmstock_core::ProductId;

/// Lifecycle of a spray application as far as stock is concerned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Planned,
    InProgress,
    Executed,
}

impl ApplicationStatus {
    /// Whether the application still holds a reservation on its products.
    pub fn reserves_stock(&self) -> bool {
        !matches!(self, ApplicationStatus::Executed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationLine {
    pub product_id: ProductId,
    pub quantity: f64,
}

/// A spray application with the product quantities it will consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedApplication {
    pub id: Uuid,
    pub status: ApplicationStatus,
    pub lines: Vec<ApplicationLine>,
}

impl PlannedApplication {
    pub fn new(status: ApplicationStatus) -> Self {
        Self {
            id: Uuid::now_v7(),
            status,
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, product_id: impl Into<ProductId>, quantity: f64) -> Self {
        self.lines.push(ApplicationLine {
            product_id: product_id.into(),
            quantity,
        });
        self
    }
}
