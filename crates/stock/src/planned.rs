//! Pre-aggregated side inputs keyed by product.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use farmstock_core::ProductId;

/// Quantity reserved per product by applications that have not been executed yet.
///
/// Absent products have nothing reserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlannedConsumption(HashMap<ProductId, f64>);

impl PlannedConsumption {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserved quantity for `product_id`, `0.0` when nothing is planned.
    pub fn get(&self, product_id: &ProductId) -> f64 {
        self.0.get(product_id).copied().unwrap_or(0.0)
    }

    /// Add `quantity` to the reservation for `product_id`.
    pub fn add(&mut self, product_id: ProductId, quantity: f64) {
        *self.0.entry(product_id).or_insert(0.0) += quantity;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ProductId, f64)> for PlannedConsumption {
    fn from_iter<I: IntoIterator<Item = (ProductId, f64)>>(iter: I) -> Self {
        let mut planned = Self::new();
        for (product_id, quantity) in iter {
            planned.add(product_id, quantity);
        }
        planned
    }
}

/// Category labels per product, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryIndex(HashMap<ProductId, Vec<String>>);

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels for `product_id`; empty when the product has none.
    pub fn get(&self, product_id: &ProductId) -> &[String] {
        self.0.get(product_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push(&mut self, product_id: ProductId, category: impl Into<String>) {
        self.0.entry(product_id).or_default().push(category.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ProductId, String)> for CategoryIndex {
    fn from_iter<I: IntoIterator<Item = (ProductId, String)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (product_id, category) in iter {
            index.push(product_id, category);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planned_sums_repeated_products() {
        let planned: PlannedConsumption = [
            (ProductId::new("a"), 5.0),
            (ProductId::new("a"), 2.5),
            (ProductId::new("b"), 1.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(planned.get(&ProductId::new("a")), 7.5);
        assert_eq!(planned.get(&ProductId::new("missing")), 0.0);
        assert_eq!(planned.len(), 2);
    }

    #[test]
    fn categories_keep_insertion_order() {
        let index: CategoryIndex = [
            (ProductId::new("a"), "Herbicida".to_string()),
            (ProductId::new("a"), "Adjuvante".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(index.get(&ProductId::new("a")), ["Herbicida", "Adjuvante"]);
        assert!(index.get(&ProductId::new("b")).is_empty());
    }
}
