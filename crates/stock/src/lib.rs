//! Stock reconciliation domain (pure).
//!
//! Turns a farm's product roster, movement ledger and planned consumption into
//! one balance record per product. Deterministic domain logic only: no IO, no
//! HTTP, no storage. Fetching the inputs is the infra layer's job.

pub mod balance;
pub mod collation;
pub mod diagnostics;
pub mod engine;
pub mod movement;
pub mod planned;
pub mod product;
pub mod sorting;
pub mod summary;

pub use balance::StockBalance;
pub use collation::Collation;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use engine::{StockEngine, compute_balances};
pub use movement::{Movement, MovementKind};
pub use planned::{CategoryIndex, PlannedConsumption};
pub use product::{Product, UNKNOWN_PRODUCT_NAME, UNKNOWN_UNIT};
pub use sorting::{BalanceColumn, SortDirection, sort_balances};
pub use summary::StockSummary;
