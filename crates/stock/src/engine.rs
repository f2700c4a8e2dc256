//! Stock reconciliation engine.
//!
//! Single pass over movements, then a single pass over the union of movement
//! products and roster products. Pure: no IO, no caching, inputs untouched.

use std::collections::{HashMap, HashSet};

use farmstock_core::ProductId;

use crate::balance::StockBalance;
use crate::collation::Collation;
use crate::diagnostics::{self, Diagnostic};
use crate::movement::{Movement, MovementKind};
use crate::planned::{CategoryIndex, PlannedConsumption};
use crate::product::{Product, UNKNOWN_PRODUCT_NAME, UNKNOWN_UNIT};

/// Running totals for one product.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Totals {
    entries: f64,
    exits: f64,
    total_entry_value: f64,
    total_entry_quantity: f64,
}

impl Totals {
    fn record(&mut self, movement: &Movement) {
        match movement.kind {
            MovementKind::Entry => {
                self.entries += movement.quantity;
                self.total_entry_quantity += movement.quantity;
                self.total_entry_value += movement.quantity * movement.unit_price.unwrap_or(0.0);
            }
            MovementKind::Exit => {
                self.exits += movement.quantity;
            }
            MovementKind::Unrecognized(_) => {}
        }
    }

    fn balance(&self) -> f64 {
        self.entries - self.exits
    }

    /// Quantity-weighted mean over entries only, recomputed from full history.
    fn average_price(&self) -> f64 {
        if self.total_entry_quantity > 0.0 {
            self.total_entry_value / self.total_entry_quantity
        } else {
            0.0
        }
    }
}

/// Reconciliation engine configured with the farm's collation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct StockEngine {
    collation: Collation,
}

impl StockEngine {
    pub fn new(collation: Collation) -> Self {
        Self { collation }
    }

    pub fn collation(&self) -> Collation {
        self.collation
    }

    /// One balance per product in `products` ∪ products referenced by `movements`,
    /// sorted by product name.
    pub fn compute(
        &self,
        movements: &[Movement],
        products: &[Product],
        planned: &PlannedConsumption,
        categories: &CategoryIndex,
    ) -> Vec<StockBalance> {
        let roster = index_roster(products);
        let mut totals = accumulate(movements);

        for product in products {
            totals.entry(&product.id).or_default();
        }

        let mut out: Vec<StockBalance> = totals
            .into_iter()
            .map(|(product_id, totals)| {
                let (product_name, unit) = match roster.get(product_id) {
                    Some(p) => (p.name.clone(), p.unit.clone()),
                    None => (UNKNOWN_PRODUCT_NAME.to_string(), UNKNOWN_UNIT.to_string()),
                };
                let balance = totals.balance();
                StockBalance {
                    product_id: product_id.clone(),
                    product_name,
                    unit,
                    categories: categories.get(product_id).to_vec(),
                    balance,
                    average_price: totals.average_price(),
                    predicted_quantity: balance - planned.get(product_id),
                }
            })
            .collect();

        out.sort_by(|a, b| {
            self.collation
                .compare(&a.product_name, &b.product_name)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        out
    }

    /// Like [`compute`](Self::compute), also returning anomalies found in the ledger.
    ///
    /// Balances are identical to `compute`; diagnostics are informational only.
    pub fn compute_with_diagnostics(
        &self,
        movements: &[Movement],
        products: &[Product],
        planned: &PlannedConsumption,
        categories: &CategoryIndex,
    ) -> (Vec<StockBalance>, Vec<Diagnostic>) {
        let known: HashSet<&ProductId> = products.iter().map(|p| &p.id).collect();
        let diagnostics = diagnostics::inspect(movements, &known);
        (self.compute(movements, products, planned, categories), diagnostics)
    }
}

/// Reconcile with the default (pt-BR) collation.
pub fn compute_balances(
    movements: &[Movement],
    products: &[Product],
    planned: &PlannedConsumption,
    categories: &CategoryIndex,
) -> Vec<StockBalance> {
    StockEngine::default().compute(movements, products, planned, categories)
}

/// First roster entry wins when an id is listed twice.
fn index_roster(products: &[Product]) -> HashMap<&ProductId, &Product> {
    let mut roster = HashMap::with_capacity(products.len());
    for p in products {
        roster.entry(&p.id).or_insert(p);
    }
    roster
}

fn accumulate(movements: &[Movement]) -> HashMap<&ProductId, Totals> {
    // f64 addition is not associative: fold in a canonical order so any
    // permutation of the ledger yields bit-identical totals.
    let mut ordered: Vec<&Movement> = movements.iter().collect();
    ordered.sort_by(|a, b| {
        a.product_id
            .cmp(&b.product_id)
            .then_with(|| a.kind.rank().cmp(&b.kind.rank()))
            .then_with(|| a.quantity.total_cmp(&b.quantity))
            .then_with(|| {
                a.unit_price
                    .unwrap_or(0.0)
                    .total_cmp(&b.unit_price.unwrap_or(0.0))
            })
    });

    let mut totals: HashMap<&ProductId, Totals> = HashMap::new();
    for m in ordered {
        totals.entry(&m.product_id).or_default().record(m);
    }
    totals
}
