//! Inventory items and the low-stock rule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub low_stock_threshold: u32,
    /// Linked supplier id, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Uuid>,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// An item is low on stock when its quantity is at or below its threshold.
    ///
    /// Derived on demand; never stored or sent over the wire as a field.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

/// Item fields a client submits when creating or updating
///
/// Updates replace the full field set, matching the web form which always
/// submits every field. An absent `supplier` unlinks the item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub low_stock_threshold: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Uuid>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
}

impl ItemInput {
    /// Field-level checks shared by the create and update handlers
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Item name is required".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Price must be a non-negative number".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, threshold: u32) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: Uuid::new_v4(),
            name: "Widget".to_string(),
            quantity,
            low_stock_threshold: threshold,
            supplier: None,
            price: 1.0,
            category: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn low_stock_boundary() {
        assert!(item(5, 10).is_low_stock());
        assert!(item(10, 10).is_low_stock());
        assert!(!item(11, 10).is_low_stock());
        assert!(item(0, 0).is_low_stock());
    }

    #[test]
    fn input_validation() {
        let mut input = ItemInput {
            name: "Widget".to_string(),
            quantity: 1,
            ..ItemInput::default()
        };
        assert!(input.validate().is_ok());

        input.name = "   ".to_string();
        assert!(input.validate().is_err());

        input.name = "Widget".to_string();
        input.price = -0.5;
        assert!(input.validate().is_err());

        input.price = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn supplier_field_omitted_when_unset() {
        let json = serde_json::to_value(item(1, 1)).unwrap();
        assert!(json.get("supplier").is_none());
        assert!(json.get("lowStockThreshold").is_some());
    }
}
