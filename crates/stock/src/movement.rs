use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use farmstock_core::{MovementId, ProductId};

/// Direction of a stock movement.
///
/// Raw ledgers carry several spellings for the same two directions (`entry`,
/// `IN`, `entrada`; `exit`, `OUT`, `saida`). They are normalized once here so
/// aggregation code only ever matches on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MovementKind {
    /// Stock increase (purchase/receipt). Carries a unit price.
    Entry,
    /// Stock decrease (consumption). Never affects cost basis.
    Exit,
    /// Anything else found in the ledger; ignored by aggregation.
    Unrecognized(String),
}

impl MovementKind {
    /// Normalize a raw kind label. Never fails.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "entry" | "in" | "entrada" => MovementKind::Entry,
            "exit" | "out" | "saida" | "saída" => MovementKind::Exit,
            _ => MovementKind::Unrecognized(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MovementKind::Entry => "entry",
            MovementKind::Exit => "exit",
            MovementKind::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, MovementKind::Unrecognized(_))
    }

    /// Stable rank used to fold movements in a canonical order.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            MovementKind::Entry => 0,
            MovementKind::Exit => 1,
            MovementKind::Unrecognized(_) => 2,
        }
    }
}

impl From<String> for MovementKind {
    fn from(value: String) -> Self {
        MovementKind::parse(&value)
    }
}

impl From<&str> for MovementKind {
    fn from(value: &str) -> Self {
        MovementKind::parse(value)
    }
}

impl From<MovementKind> for String {
    fn from(value: MovementKind) -> Self {
        value.as_str().to_string()
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only ledger line.
///
/// `date` is informational; balances do not depend on movement order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: Option<f64>,
    pub date: NaiveDate,
}

impl Movement {
    pub fn entry(
        product_id: impl Into<ProductId>,
        quantity: f64,
        unit_price: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: MovementId::new(),
            product_id: product_id.into(),
            kind: MovementKind::Entry,
            quantity,
            unit_price: Some(unit_price),
            date,
        }
    }

    pub fn exit(product_id: impl Into<ProductId>, quantity: f64, date: NaiveDate) -> Self {
        Self {
            id: MovementId::new(),
            product_id: product_id.into(),
            kind: MovementKind::Exit,
            quantity,
            unit_price: None,
            date,
        }
    }
}
