//! Infrastructure layer: farm data sources and the stock report service.

pub mod report;
pub mod sources;

pub use report::{ReportError, StockReport, StockReportService};
pub use sources::{
    ApplicationLine, ApplicationStatus, CategoryDirectory, InMemoryFarmData, MovementLedger,
    PlannedApplication, PlannedConsumptionIndex, PostgresFarmData, ProductCatalog, SourceError,
};
