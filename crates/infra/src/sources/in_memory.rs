use std::collections::HashMap;
use std::sync::RwLock;

use farmstock_core::{FarmId, ProductId};
use farmstock_stock::{CategoryIndex, Movement, PlannedConsumption, Product};

use super::{
    CategoryDirectory, MovementLedger, PlannedApplication, PlannedConsumptionIndex, ProductCatalog,
    SourceError,
};

#[derive(Debug, Default, Clone)]
struct FarmRecords {
    products: Vec<Product>,
    movements: Vec<Movement>,
    categories: Vec<(ProductId, String)>,
    applications: Vec<PlannedApplication>,
}

/// In-memory, farm-isolated data for tests/dev.
///
/// Implements every collaborator contract from one store.
#[derive(Debug, Default)]
pub struct InMemoryFarmData {
    inner: RwLock<HashMap<FarmId, FarmRecords>>,
}

impl InMemoryFarmData {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_farm(&self, farm_id: FarmId, f: impl FnOnce(&mut FarmRecords)) {
        if let Ok(mut map) = self.inner.write() {
            f(map.entry(farm_id).or_default());
        }
    }

    fn read<T>(&self, farm_id: FarmId, f: impl FnOnce(&FarmRecords) -> T) -> Result<T, SourceError>
    where
        T: Default,
    {
        let map = self
            .inner
            .read()
            .map_err(|_| SourceError::Unavailable("in-memory store lock poisoned".to_string()))?;
        Ok(map.get(&farm_id).map(f).unwrap_or_default())
    }

    pub fn insert_product(&self, farm_id: FarmId, product: Product) {
        self.with_farm(farm_id, |r| r.products.push(product));
    }

    pub fn record_movement(&self, farm_id: FarmId, movement: Movement) {
        self.with_farm(farm_id, |r| r.movements.push(movement));
    }

    pub fn tag_product(&self, farm_id: FarmId, product_id: ProductId, category: impl Into<String>) {
        let category = category.into();
        self.with_farm(farm_id, |r| r.categories.push((product_id, category)));
    }

    pub fn plan_application(&self, farm_id: FarmId, application: PlannedApplication) {
        self.with_farm(farm_id, |r| r.applications.push(application));
    }

    /// Drop every record of a farm.
    pub fn clear_farm(&self, farm_id: FarmId) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(&farm_id);
        }
    }
}

#[async_trait::async_trait]
impl ProductCatalog for InMemoryFarmData {
    async fn list(&self, farm_id: FarmId) -> Result<Vec<Product>, SourceError> {
        self.read(farm_id, |r| {
            r.products.iter().filter(|p| p.active).cloned().collect()
        })
    }
}

#[async_trait::async_trait]
impl MovementLedger for InMemoryFarmData {
    async fn list(&self, farm_id: FarmId) -> Result<Vec<Movement>, SourceError> {
        self.read(farm_id, |r| r.movements.clone())
    }
}

#[async_trait::async_trait]
impl PlannedConsumptionIndex for InMemoryFarmData {
    async fn sums_by_product(&self, farm_id: FarmId) -> Result<PlannedConsumption, SourceError> {
        self.read(farm_id, |r| {
            r.applications
                .iter()
                .filter(|a| a.status.reserves_stock())
                .flat_map(|a| a.lines.iter())
                .map(|line| (line.product_id.clone(), line.quantity))
                .collect()
        })
    }
}

#[async_trait::async_trait]
impl CategoryDirectory for InMemoryFarmData {
    async fn categories_by_product(&self, farm_id: FarmId) -> Result<CategoryIndex, SourceError> {
        self.read(farm_id, |r| r.categories.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::ApplicationStatus;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[tokio::test]
    async fn farms_are_isolated() {
        let data = InMemoryFarmData::new();
        let farm_a = FarmId::new();
        let farm_b = FarmId::new();

        data.insert_product(farm_a, Product::new("p1", "Glifosato", "L"));
        data.record_movement(farm_a, Movement::entry("p1", 10.0, 1.0, date()));

        assert_eq!(ProductCatalog::list(&data, farm_a).await.unwrap().len(), 1);
        assert!(ProductCatalog::list(&data, farm_b).await.unwrap().is_empty());
        assert!(MovementLedger::list(&data, farm_b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalog_hides_inactive_products() {
        let data = InMemoryFarmData::new();
        let farm = FarmId::new();
        data.insert_product(farm, Product::new("p1", "Ativo", "L"));
        data.insert_product(farm, Product::new("p2", "Arquivado", "L").inactive());

        let products = ProductCatalog::list(&data, farm).await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Ativo");
    }

    #[tokio::test]
    async fn executed_applications_release_their_reservation() {
        let data = InMemoryFarmData::new();
        let farm = FarmId::new();
        data.plan_application(
            farm,
            PlannedApplication::new(ApplicationStatus::Planned)
                .with_line("p1", 5.0)
                .with_line("p2", 1.0),
        );
        data.plan_application(
            farm,
            PlannedApplication::new(ApplicationStatus::InProgress).with_line("p1", 2.0),
        );
        data.plan_application(
            farm,
            PlannedApplication::new(ApplicationStatus::Executed).with_line("p1", 100.0),
        );

        let planned = data.sums_by_product(farm).await.unwrap();

        assert_eq!(planned.get(&ProductId::new("p1")), 7.0);
        assert_eq!(planned.get(&ProductId::new("p2")), 1.0);
    }

    #[tokio::test]
    async fn clear_farm_removes_everything() {
        let data = InMemoryFarmData::new();
        let farm = FarmId::new();
        data.tag_product(farm, ProductId::new("p1"), "Herbicida");
        data.clear_farm(farm);

        assert!(data.categories_by_product(farm).await.unwrap().is_empty());
    }
}
