use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use farmstock_infra::{InMemoryFarmData, PostgresFarmData, StockReportService};
use farmstock_stock::StockEngine;

use crate::config::ApiConfig;

/// Services shared by every request.
#[derive(Debug, Clone)]
pub struct AppServices {
    reports: StockReportService,
}

impl AppServices {
    pub fn new(reports: StockReportService) -> Self {
        Self { reports }
    }

    /// Services over an in-memory store (dev/tests).
    pub fn in_memory(data: Arc<InMemoryFarmData>, engine: StockEngine) -> Self {
        Self::new(StockReportService::from_source(data, engine))
    }

    pub fn reports(&self) -> &StockReportService {
        &self.reports
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<Arc<AppServices>> {
    let engine = StockEngine::new(config.collation);

    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; serving stock from an empty in-memory store");
        return Ok(Arc::new(AppServices::in_memory(
            Arc::new(InMemoryFarmData::new()),
            engine,
        )));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(database_url)
        .await?;
    tracing::info!(max_connections = config.db_max_connections, "connected to Postgres");

    let source = Arc::new(PostgresFarmData::new(pool));
    Ok(Arc::new(AppServices::new(StockReportService::from_source(
        source, engine,
    ))))
}
