use serde::{Deserialize, Serialize};

use farmstock_core::ProductId;

/// Display name used when a movement references a product missing from the roster.
pub const UNKNOWN_PRODUCT_NAME: &str = "Produto não encontrado";

/// Unit label used when the product (and therefore its unit) is unknown.
pub const UNKNOWN_UNIT: &str = "-";

/// Agrochemical/input product as seen by the stock screen.
///
/// `unit` is an opaque label ("Kg", "L", ...). Quantities are never converted
/// between units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Product {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_active_flag_defaults_to_active() {
        let p: Product =
            serde_json::from_str(r#"{"id":"p1","name":"Glifosato","unit":"L"}"#).unwrap();
        assert!(p.active);
        assert_eq!(p.id, ProductId::new("p1"));
    }
}
