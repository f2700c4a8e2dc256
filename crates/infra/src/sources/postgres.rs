//! Postgres-backed farm data sources.
//!
//! Reads the tables owned by the farm-management backend. Row-level security
//! lives in the database; every query here still filters by `farm_id`.
//!
//! Expected schema (relevant columns only):
//!
//! - `products`: `id uuid`, `farm_id uuid`, `name text`, `unit text`, `active bool`
//! - `stock_movements`: `id uuid`, `farm_id uuid`, `product_id uuid`, `kind text`,
//!   `quantity numeric`, `unit_price numeric null`, `date date`
//! - `categories`: `id uuid`, `name text`
//! - `product_categories`: `product_id uuid`, `category_id uuid`
//! - `applications`: `id uuid`, `farm_id uuid`, `status text null`
//! - `application_products`: `application_id uuid`, `product_id uuid`, `quantity numeric`
//!
//! Numeric columns are cast to `float8` in SQL.

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use farmstock_core::{FarmId, MovementId, ProductId};
use farmstock_stock::{CategoryIndex, Movement, MovementKind, PlannedConsumption, Product};

use super::{
    CategoryDirectory, MovementLedger, PlannedConsumptionIndex, ProductCatalog, SourceError,
};

/// Sum of line quantities per product over applications not yet executed.
/// A NULL status counts as not executed.
const PLANNED_CONSUMPTION_SQL: &str = r#"
    SELECT
        ap.product_id::text AS product_id,
        SUM(ap.quantity)::float8 AS quantity
    FROM application_products ap
    JOIN applications a ON a.id = ap.application_id
    WHERE a.farm_id = $1 AND a.status IS DISTINCT FROM 'executed'
    GROUP BY ap.product_id
"#;

/// Postgres implementation of every collaborator contract.
///
/// Cheap to clone; all clones share the same pool.
#[derive(Debug, Clone)]
pub struct PostgresFarmData {
    pool: Arc<PgPool>,
}

impl PostgresFarmData {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl ProductCatalog for PostgresFarmData {
    #[instrument(skip_all, fields(farm_id = %farm_id, row_count = tracing::field::Empty), err)]
    async fn list(&self, farm_id: FarmId) -> Result<Vec<Product>, SourceError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id::text AS id,
                name,
                unit,
                active
            FROM products
            WHERE farm_id = $1 AND active = TRUE
            "#,
        )
        .bind(farm_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        let products = rows
            .into_iter()
            .map(|row| -> Result<Product, SourceError> {
                Ok(Product {
                    id: ProductId::new(try_get::<String>(&row, "id")?),
                    name: try_get(&row, "name")?,
                    unit: try_get::<Option<String>>(&row, "unit")?.unwrap_or_default(),
                    active: try_get(&row, "active")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Span::current().record("row_count", products.len());
        Ok(products)
    }
}

#[async_trait::async_trait]
impl MovementLedger for PostgresFarmData {
    #[instrument(skip_all, fields(farm_id = %farm_id, row_count = tracing::field::Empty), err)]
    async fn list(&self, farm_id: FarmId) -> Result<Vec<Movement>, SourceError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                product_id::text AS product_id,
                kind,
                quantity::float8 AS quantity,
                unit_price::float8 AS unit_price,
                date
            FROM stock_movements
            WHERE farm_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(farm_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_movements", e))?;

        let movements = rows
            .into_iter()
            .map(|row| -> Result<Movement, SourceError> {
                Ok(Movement {
                    id: MovementId::from_uuid(try_get(&row, "id")?),
                    product_id: ProductId::new(try_get::<String>(&row, "product_id")?),
                    kind: MovementKind::parse(&try_get::<String>(&row, "kind")?),
                    quantity: try_get(&row, "quantity")?,
                    unit_price: try_get(&row, "unit_price")?,
                    date: try_get::<NaiveDate>(&row, "date")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Span::current().record("row_count", movements.len());
        Ok(movements)
    }
}

#[async_trait::async_trait]
impl PlannedConsumptionIndex for PostgresFarmData {
    #[instrument(skip_all, fields(farm_id = %farm_id), err)]
    async fn sums_by_product(&self, farm_id: FarmId) -> Result<PlannedConsumption, SourceError> {
        let rows = sqlx::query(PLANNED_CONSUMPTION_SQL)
            .bind(farm_id.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("sum_planned_consumption", e))?;

        rows.into_iter()
            .map(|row| -> Result<(ProductId, f64), SourceError> {
                let product_id = ProductId::new(try_get::<String>(&row, "product_id")?);
                let quantity = try_get::<Option<f64>>(&row, "quantity")?.unwrap_or(0.0);
                Ok((product_id, quantity))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl CategoryDirectory for PostgresFarmData {
    #[instrument(skip_all, fields(farm_id = %farm_id), err)]
    async fn categories_by_product(&self, farm_id: FarmId) -> Result<CategoryIndex, SourceError> {
        let rows = sqlx::query(
            r#"
            SELECT
                pc.product_id::text AS product_id,
                c.name AS category
            FROM product_categories pc
            JOIN categories c ON c.id = pc.category_id
            JOIN products p ON p.id = pc.product_id
            WHERE p.farm_id = $1
            ORDER BY pc.product_id, c.name
            "#,
        )
        .bind(farm_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_product_categories", e))?;

        rows.into_iter()
            .map(|row| -> Result<(ProductId, String), SourceError> {
                Ok((
                    ProductId::new(try_get::<String>(&row, "product_id")?),
                    try_get::<String>(&row, "category")?,
                ))
            })
            .collect()
    }
}

fn try_get<'r, T>(row: &'r sqlx::postgres::PgRow, column: &str) -> Result<T, SourceError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| SourceError::Decode(format!("{column}: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> SourceError {
    match err {
        sqlx::Error::Database(db_err) => {
            SourceError::Database(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            SourceError::Unavailable(format!("connection pool unavailable in {}", operation))
        }
        sqlx::Error::Io(e) => {
            SourceError::Unavailable(format!("io error in {}: {}", operation, e))
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_) => {
            SourceError::Decode(format!("{}: {}", operation, err))
        }
        _ => SourceError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planned_consumption_counts_applications_without_status() {
        // `<>` would drop rows whose status is NULL.
        assert!(PLANNED_CONSUMPTION_SQL.contains("a.status IS DISTINCT FROM 'executed'"));
        assert!(!PLANNED_CONSUMPTION_SQL.contains("<>"));
    }

    #[test]
    fn pool_exhaustion_is_unavailable() {
        let err = map_sqlx_error("list_products", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, SourceError::Unavailable(msg) if msg.contains("list_products")));
    }
}
