//! Side channel for dirty ledger data.
//!
//! Anomalies never block the report and never change the computed balances.
//! They are collected here so callers can log or display them.

use std::collections::HashSet;

use serde::Serialize;

use farmstock_core::{MovementId, ProductId};

use crate::movement::{Movement, MovementKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Quantity below zero; summed as given.
    NegativeQuantity,
    /// Entry price below zero; weighted as given.
    NegativeUnitPrice,
    /// Movement references a product missing from the roster.
    UnknownProduct,
    /// Kind label that is neither an entry nor an exit; movement skipped.
    UnrecognizedKind { raw: String },
    /// Entry without a price; valued at zero.
    EntryWithoutPrice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub movement_id: MovementId,
    pub product_id: ProductId,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

/// Inspect `movements` in input order.
///
/// `known` is the set of product ids present in the roster.
pub(crate) fn inspect(movements: &[Movement], known: &HashSet<&ProductId>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let mut push = |m: &Movement, kind: DiagnosticKind| {
        out.push(Diagnostic {
            movement_id: m.id,
            product_id: m.product_id.clone(),
            kind,
        });
    };

    for m in movements {
        if !known.contains(&m.product_id) {
            push(m, DiagnosticKind::UnknownProduct);
        }
        if m.quantity < 0.0 {
            push(m, DiagnosticKind::NegativeQuantity);
        }
        match &m.kind {
            MovementKind::Entry => match m.unit_price {
                None => push(m, DiagnosticKind::EntryWithoutPrice),
                Some(price) if price < 0.0 => push(m, DiagnosticKind::NegativeUnitPrice),
                Some(_) => {}
            },
            MovementKind::Exit => {}
            MovementKind::Unrecognized(raw) => push(
                m,
                DiagnosticKind::UnrecognizedKind { raw: raw.clone() },
            ),
        }
    }

    out
}
