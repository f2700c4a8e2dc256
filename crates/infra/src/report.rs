//! Stock report service.
//!
//! Fetches the four inputs of a farm concurrently, then runs the
//! reconciliation engine once all of them have resolved. If any fetch fails
//! the engine does not run and no partial report is produced.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use farmstock_core::FarmId;
use farmstock_stock::{Diagnostic, StockBalance, StockEngine, StockSummary};

use crate::sources::{
    CategoryDirectory, MovementLedger, PlannedConsumptionIndex, ProductCatalog, SourceError,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("failed to load {collaborator}: {source}")]
    Fetch {
        collaborator: &'static str,
        #[source]
        source: SourceError,
    },
}

impl ReportError {
    fn fetch(collaborator: &'static str) -> impl FnOnce(SourceError) -> Self {
        move |source| ReportError::Fetch {
            collaborator,
            source,
        }
    }
}

/// One reconciled stock report for a farm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
    pub farm_id: FarmId,
    pub balances: Vec<StockBalance>,
    pub summary: StockSummary,
    pub diagnostics: Vec<Diagnostic>,
}

/// Assembles stock reports from the farm's collaborators.
#[derive(Clone)]
pub struct StockReportService {
    catalog: Arc<dyn ProductCatalog>,
    ledger: Arc<dyn MovementLedger>,
    planned: Arc<dyn PlannedConsumptionIndex>,
    categories: Arc<dyn CategoryDirectory>,
    engine: StockEngine,
}

impl core::fmt::Debug for StockReportService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StockReportService")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl StockReportService {
    /// Build from a single source implementing every contract.
    pub fn from_source<S>(source: Arc<S>, engine: StockEngine) -> Self
    where
        S: ProductCatalog + MovementLedger + PlannedConsumptionIndex + CategoryDirectory + 'static,
    {
        Self {
            catalog: source.clone(),
            ledger: source.clone(),
            planned: source.clone(),
            categories: source,
            engine,
        }
    }

    pub fn from_parts(
        catalog: Arc<dyn ProductCatalog>,
        ledger: Arc<dyn MovementLedger>,
        planned: Arc<dyn PlannedConsumptionIndex>,
        categories: Arc<dyn CategoryDirectory>,
        engine: StockEngine,
    ) -> Self {
        Self {
            catalog,
            ledger,
            planned,
            categories,
            engine,
        }
    }

    pub fn engine(&self) -> StockEngine {
        self.engine
    }

    #[instrument(skip_all, fields(farm_id = %farm_id), err)]
    pub async fn report(&self, farm_id: FarmId) -> Result<StockReport, ReportError> {
        let (products, movements, planned, categories) = tokio::try_join!(
            async { self.catalog.list(farm_id).await.map_err(ReportError::fetch("products")) },
            async { self.ledger.list(farm_id).await.map_err(ReportError::fetch("movements")) },
            async {
                self.planned
                    .sums_by_product(farm_id)
                    .await
                    .map_err(ReportError::fetch("planned consumption"))
            },
            async {
                self.categories
                    .categories_by_product(farm_id)
                    .await
                    .map_err(ReportError::fetch("categories"))
            },
        )?;

        let (balances, diagnostics) =
            self.engine
                .compute_with_diagnostics(&movements, &products, &planned, &categories);

        for d in &diagnostics {
            tracing::warn!(
                movement_id = %d.movement_id,
                product_id = %d.product_id,
                anomaly = ?d.kind,
                "stock ledger anomaly"
            );
        }

        let summary = StockSummary::from_balances(&balances);
        tracing::info!(
            products = products.len(),
            movements = movements.len(),
            balances = balances.len(),
            shortfalls = summary.shortfalls,
            "stock report computed"
        );

        Ok(StockReport {
            farm_id,
            balances,
            summary,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{ApplicationStatus, InMemoryFarmData, PlannedApplication};
    use chrono::NaiveDate;
    use farmstock_core::ProductId;
    use farmstock_stock::{Movement, Product};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    struct FailingLedger;

    #[async_trait::async_trait]
    impl MovementLedger for FailingLedger {
        async fn list(&self, _farm_id: FarmId) -> Result<Vec<Movement>, SourceError> {
            Err(SourceError::Unavailable("ledger offline".to_string()))
        }
    }

    #[tokio::test]
    async fn report_reconciles_farm_data() {
        let data = Arc::new(InMemoryFarmData::new());
        let farm = FarmId::new();

        data.insert_product(farm, Product::new("p", "Óleo mineral", "L"));
        data.insert_product(farm, Product::new("q", "Boro", "Kg"));
        data.record_movement(farm, Movement::entry("p", 100.0, 2.0, date(1)));
        data.record_movement(farm, Movement::entry("p", 50.0, 3.0, date(2)));
        data.record_movement(farm, Movement::exit("p", 30.0, date(3)));
        data.tag_product(farm, ProductId::new("p"), "Adjuvante");
        data.plan_application(
            farm,
            PlannedApplication::new(ApplicationStatus::Planned).with_line("p", 20.0),
        );
        data.plan_application(
            farm,
            PlannedApplication::new(ApplicationStatus::Planned).with_line("q", 15.0),
        );

        let service = StockReportService::from_source(data, StockEngine::default());
        let report = service.report(farm).await.unwrap();

        let names: Vec<&str> = report.balances.iter().map(|b| b.product_name.as_str()).collect();
        assert_eq!(names, ["Boro", "Óleo mineral"]);

        let p = &report.balances[1];
        assert_eq!(p.balance, 120.0);
        assert_eq!(p.predicted_quantity, 100.0);
        assert_eq!(p.categories, ["Adjuvante"]);

        let q = &report.balances[0];
        assert_eq!(q.predicted_quantity, -15.0);
        assert_eq!(report.summary.shortfalls, 1);
        assert!(report.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_yields_no_report() {
        let data = Arc::new(InMemoryFarmData::new());
        let farm = FarmId::new();
        data.insert_product(farm, Product::new("p", "Glifosato", "L"));

        let service = StockReportService::from_parts(
            data.clone(),
            Arc::new(FailingLedger),
            data.clone(),
            data,
            StockEngine::default(),
        );

        let err = service.report(farm).await.unwrap_err();

        assert_eq!(
            err,
            ReportError::Fetch {
                collaborator: "movements",
                source: SourceError::Unavailable("ledger offline".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn unknown_farm_yields_empty_report() {
        let service = StockReportService::from_source(
            Arc::new(InMemoryFarmData::new()),
            StockEngine::default(),
        );

        let report = service.report(FarmId::new()).await.unwrap();

        assert!(report.balances.is_empty());
        assert_eq!(report.summary.product_count, 0);
    }
}
