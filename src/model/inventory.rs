//! Inventory items held by a node, and the typed operations that mutate them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Stock of one product at one holder.
///
/// Unit-level tracking is in effect when `unit_ids` is non-empty; otherwise
/// `qty` is the bulk counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub product_name: String,
    #[serde(default)]
    pub qty: u32,
    #[serde(default)]
    pub unit_ids: Vec<String>,
    #[serde(default)]
    pub supports_cold_storage: bool,
    #[serde(default)]
    pub reorder_level: Option<u32>,
    #[serde(default)]
    pub last_stock_added: Option<DateTime<Utc>>,
}

impl InventoryItem {
    /// Bulk-counted item with no unit identifiers.
    pub fn bulk(product_name: impl Into<String>, qty: u32) -> Self {
        Self {
            product_name: product_name.into(),
            qty,
            unit_ids: Vec::new(),
            supports_cold_storage: false,
            reorder_level: None,
            last_stock_added: None,
        }
    }

    /// Unit-tracked item; `qty` mirrors the number of identifiers.
    pub fn units<I, S>(product_name: impl Into<String>, unit_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unit_ids: Vec<String> = unit_ids.into_iter().map(Into::into).collect();
        Self {
            qty: unit_ids.len() as u32,
            unit_ids,
            ..Self::bulk(product_name, 0)
        }
    }

    pub fn cold_storage(mut self) -> Self {
        self.supports_cold_storage = true;
        self
    }

    pub fn with_reorder_level(mut self, level: u32) -> Self {
        self.reorder_level = Some(level);
        self
    }

    /// Case-insensitive exact product-name match.
    pub fn matches(&self, product: &str) -> bool {
        self.product_name.to_lowercase() == product.to_lowercase()
    }

    pub fn is_unit_tracked(&self) -> bool {
        !self.unit_ids.is_empty()
    }

    /// True when a reorder level is set and stock is at or below it.
    pub fn needs_reorder(&self) -> bool {
        self.reorder_level.is_some_and(|level| self.qty <= level)
    }
}

/// A typed mutation of a holder's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InventoryOperation {
    /// Receive stock. Creates the item if the holder has none yet.
    Add {
        product_name: String,
        qty: u32,
        #[serde(default)]
        unit_ids: Vec<String>,
        #[serde(default)]
        reorder_level: Option<u32>,
        #[serde(default)]
        cold_storage: Option<bool>,
    },
    /// Release stock. The item is dropped once its quantity reaches zero.
    Remove {
        product_name: String,
        qty: u32,
        #[serde(default)]
        unit_ids: Vec<String>,
    },
    SetReorderLevel {
        product_name: String,
        level: u32,
    },
}

impl InventoryOperation {
    pub fn product_name(&self) -> &str {
        match self {
            Self::Add { product_name, .. }
            | Self::Remove { product_name, .. }
            | Self::SetReorderLevel { product_name, .. } => product_name,
        }
    }

    /// Apply this operation to an inventory list in place.
    ///
    /// A unit-tracked item keeps `qty` equal to its identifier count, so
    /// operations on it must name units; bulk quantities are rejected.
    pub fn apply(&self, inventory: &mut Vec<InventoryItem>, now: DateTime<Utc>) -> Result<()> {
        let pos = inventory.iter().position(|item| item.matches(self.product_name()));

        match (self, pos) {
            (Self::Add { product_name, qty, unit_ids, reorder_level, cold_storage }, Some(i)) => {
                let item = &mut inventory[i];
                if unit_ids.is_empty() {
                    if item.is_unit_tracked() {
                        return Err(mixed_tracking(product_name, "add a bulk quantity to"));
                    }
                    item.qty = item.qty.saturating_add(*qty);
                } else {
                    if !item.is_unit_tracked() && item.qty > 0 {
                        return Err(mixed_tracking(product_name, "add unit ids to bulk"));
                    }
                    merge_ids(&mut item.unit_ids, unit_ids);
                    item.qty = item.unit_ids.len() as u32;
                }
                item.last_stock_added = Some(now);
                if let Some(level) = reorder_level {
                    item.reorder_level = Some(*level);
                }
                if let Some(cold) = cold_storage {
                    item.supports_cold_storage = *cold;
                }
                Ok(())
            }
            (Self::Add { product_name, qty, unit_ids, reorder_level, cold_storage }, None) => {
                if *qty == 0 && unit_ids.is_empty() {
                    return Err(Error::InvalidInput(format!(
                        "cannot add zero units of '{product_name}'"
                    )));
                }
                let mut ids = Vec::with_capacity(unit_ids.len());
                merge_ids(&mut ids, unit_ids);
                inventory.push(InventoryItem {
                    product_name: product_name.clone(),
                    qty: if ids.is_empty() { *qty } else { ids.len() as u32 },
                    unit_ids: ids,
                    supports_cold_storage: cold_storage.unwrap_or(false),
                    reorder_level: Some(reorder_level.unwrap_or(0)),
                    last_stock_added: Some(now),
                });
                Ok(())
            }
            (Self::Remove { product_name, qty, unit_ids }, Some(i)) => {
                let item = &mut inventory[i];
                match (item.is_unit_tracked(), unit_ids.is_empty()) {
                    (true, true) => {
                        return Err(mixed_tracking(product_name, "remove a bulk quantity from"));
                    }
                    (false, false) => {
                        return Err(mixed_tracking(product_name, "remove unit ids from bulk"));
                    }
                    (true, false) => {
                        item.unit_ids.retain(|id| !unit_ids.contains(id));
                        item.qty = item.unit_ids.len() as u32;
                    }
                    (false, true) => item.qty = item.qty.saturating_sub(*qty),
                }
                if item.qty == 0 {
                    inventory.remove(i);
                }
                Ok(())
            }
            (Self::SetReorderLevel { level, .. }, Some(i)) => {
                inventory[i].reorder_level = Some(*level);
                Ok(())
            }
            (_, None) => Err(Error::NotFound(format!(
                "inventory item '{}'",
                self.product_name()
            ))),
        }
    }
}

fn merge_ids(into: &mut Vec<String>, ids: &[String]) {
    for id in ids {
        if !into.contains(id) {
            into.push(id.clone());
        }
    }
}

fn mixed_tracking(product_name: &str, action: &str) -> Error {
    Error::InvalidInput(format!("cannot {action} unit-tracked stock of '{product_name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_matches_ignores_case() {
        let item = InventoryItem::bulk("Paracetamol 500mg", 10);
        assert!(item.matches("paracetamol 500MG"));
        assert!(!item.matches("Paracetamol"));
    }

    #[test]
    fn test_add_creates_item() {
        let mut inv = Vec::new();
        let op = InventoryOperation::Add {
            product_name: "Insulin".into(),
            qty: 2,
            unit_ids: vec!["u1".into(), "u2".into(), "u1".into()],
            reorder_level: None,
            cold_storage: Some(true),
        };
        op.apply(&mut inv, now()).unwrap();

        assert_eq!(inv.len(), 1);
        assert_eq!(inv[0].unit_ids, vec!["u1", "u2"]);
        assert!(inv[0].supports_cold_storage);
        assert_eq!(inv[0].reorder_level, Some(0));
        assert_eq!(inv[0].last_stock_added, Some(now()));
    }

    #[test]
    fn test_add_merges_into_existing() {
        let mut inv = vec![InventoryItem::units("Insulin", ["u1"])];
        let op = InventoryOperation::Add {
            product_name: "INSULIN".into(),
            qty: 2,
            unit_ids: vec!["u1".into(), "u2".into()],
            reorder_level: Some(5),
            cold_storage: None,
        };
        op.apply(&mut inv, now()).unwrap();

        assert_eq!(inv.len(), 1);
        assert_eq!(inv[0].qty, 2);
        assert_eq!(inv[0].unit_ids, vec!["u1", "u2"]);
        assert_eq!(inv[0].reorder_level, Some(5));
    }

    #[test]
    fn test_remove_to_zero_drops_item() {
        let mut inv = vec![InventoryItem::bulk("Aspirin", 4)];
        let op = InventoryOperation::Remove { product_name: "aspirin".into(), qty: 10, unit_ids: vec![] };
        op.apply(&mut inv, now()).unwrap();
        assert!(inv.is_empty());
    }

    #[test]
    fn test_removing_every_unit_drops_item() {
        let mut inv = vec![InventoryItem::units("Aspirin", ["u1", "u2", "u3"])];
        let op = InventoryOperation::Remove {
            product_name: "Aspirin".into(),
            qty: 1,
            unit_ids: vec!["u1".into(), "u2".into(), "u3".into()],
        };
        op.apply(&mut inv, now()).unwrap();
        assert!(inv.is_empty());
    }

    #[test]
    fn test_unit_qty_follows_ids() {
        let mut inv = vec![InventoryItem::units("Aspirin", ["u1", "u2", "u3"])];
        let op = InventoryOperation::Remove {
            product_name: "Aspirin".into(),
            qty: 3,
            unit_ids: vec!["u2".into()],
        };
        op.apply(&mut inv, now()).unwrap();
        assert_eq!(inv[0].qty, 2);
        assert_eq!(inv[0].unit_ids, vec!["u1", "u3"]);
    }

    #[test]
    fn test_rejects_mixed_tracking() {
        let mut inv = vec![InventoryItem::units("Aspirin", ["u1"])];
        let bulk_add = InventoryOperation::Add {
            product_name: "Aspirin".into(),
            qty: 10,
            unit_ids: vec![],
            reorder_level: None,
            cold_storage: None,
        };
        assert!(matches!(bulk_add.apply(&mut inv, now()), Err(Error::InvalidInput(_))));
        let bulk_remove = InventoryOperation::Remove { product_name: "Aspirin".into(), qty: 1, unit_ids: vec![] };
        assert!(matches!(bulk_remove.apply(&mut inv, now()), Err(Error::InvalidInput(_))));
        assert_eq!(inv[0].qty, 1);

        let mut bulk = vec![InventoryItem::bulk("Aspirin", 4)];
        let unit_add = InventoryOperation::Add {
            product_name: "Aspirin".into(),
            qty: 1,
            unit_ids: vec!["u9".into()],
            reorder_level: None,
            cold_storage: None,
        };
        assert!(matches!(unit_add.apply(&mut bulk, now()), Err(Error::InvalidInput(_))));
        assert_eq!(bulk[0], InventoryItem::bulk("Aspirin", 4));
    }

    #[test]
    fn test_remove_missing_item_is_not_found() {
        let mut inv = Vec::new();
        let op = InventoryOperation::Remove { product_name: "Aspirin".into(), qty: 1, unit_ids: vec![] };
        assert!(matches!(op.apply(&mut inv, now()), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_set_reorder_level_and_needs_reorder() {
        let mut inv = vec![InventoryItem::bulk("Aspirin", 4)];
        assert!(!inv[0].needs_reorder());
        let op = InventoryOperation::SetReorderLevel { product_name: "Aspirin".into(), level: 4 };
        op.apply(&mut inv, now()).unwrap();
        assert!(inv[0].needs_reorder());
    }

    #[test]
    fn test_operation_wire_format() {
        let op: InventoryOperation = serde_json::from_str(
            r#"{"op": "setReorderLevel", "productName": "Aspirin", "level": 3}"#,
        ).unwrap();
        assert_eq!(op, InventoryOperation::SetReorderLevel { product_name: "Aspirin".into(), level: 3 });
    }
}
