//! Read-only collaborator contracts the stock report is assembled from.
//!
//! Every call is scoped by an explicit `FarmId`. Implementations must never
//! return rows belonging to another farm.

pub mod application;
pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use farmstock_core::FarmId;
use farmstock_stock::{CategoryIndex, Movement, PlannedConsumption, Product};

pub use application::{ApplicationLine, ApplicationStatus, PlannedApplication};
pub use in_memory::InMemoryFarmData;
pub use postgres::PostgresFarmData;

/// Upstream fetch failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("database error: {0}")]
    Database(String),

    #[error("failed to decode row: {0}")]
    Decode(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Active products of a farm.
#[async_trait::async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn list(&self, farm_id: FarmId) -> Result<Vec<Product>, SourceError>;
}

/// Append-only entry/exit records of a farm.
#[async_trait::async_trait]
pub trait MovementLedger: Send + Sync {
    async fn list(&self, farm_id: FarmId) -> Result<Vec<Movement>, SourceError>;
}

/// Quantities reserved by applications that have not been executed yet.
#[async_trait::async_trait]
pub trait PlannedConsumptionIndex: Send + Sync {
    async fn sums_by_product(&self, farm_id: FarmId) -> Result<PlannedConsumption, SourceError>;
}

/// Product → category labels join, fetched separately from the catalog.
#[async_trait::async_trait]
pub trait CategoryDirectory: Send + Sync {
    async fn categories_by_product(&self, farm_id: FarmId) -> Result<CategoryIndex, SourceError>;
}

#[async_trait::async_trait]
impl<S> ProductCatalog for Arc<S>
where
    S: ProductCatalog + ?Sized,
{
    async fn list(&self, farm_id: FarmId) -> Result<Vec<Product>, SourceError> {
        (**self).list(farm_id).await
    }
}

#[async_trait::async_trait]
impl<S> MovementLedger for Arc<S>
where
    S: MovementLedger + ?Sized,
{
    async fn list(&self, farm_id: FarmId) -> Result<Vec<Movement>, SourceError> {
        (**self).list(farm_id).await
    }
}

#[async_trait::async_trait]
impl<S> PlannedConsumptionIndex for Arc<S>
where
    S: PlannedConsumptionIndex + ?Sized,
{
    async fn sums_by_product(&self, farm_id: FarmId) -> Result<PlannedConsumption, SourceError> {
        (**self).sums_by_product(farm_id).await
    }
}

#[async_trait::async_trait]
impl<S> CategoryDirectory for Arc<S>
where
    S: CategoryDirectory + ?Sized,
{
    async fn categories_by_product(&self, farm_id: FarmId) -> Result<CategoryIndex, SourceError> {
        (**self).categories_by_product(farm_id).await
    }
}
