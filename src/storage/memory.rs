//! In-memory storage backend.
//!
//! This is the reference implementation of `SupplyBackend`.
//! It uses plain collections protected by RwLock.
//!
//! ## Limitations
//!
//! - **No transactions**: writes are applied immediately, one collection at
//!   a time. A query running concurrently with writes may see some of them.
//! - **Linear scans**: holders and producers are kept in insertion order and
//!   scanned; only products and unit statuses are hashed.
//!
//! Use this backend for:
//! - Testing the allocation engine end to end
//! - Embedding the planner in applications that keep the network in memory

use std::sync::Arc;
use chrono::Utc;
use hashbrown::HashMap;
use parking_lot::RwLock;
use async_trait::async_trait;

use crate::model::*;
use crate::{Error, Result};
use super::SupplyBackend;

// ============================================================================
// MemoryBackend
// ============================================================================

/// In-memory supply network.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    connections: RwLock<Vec<Connection>>,
    /// Insertion order is the aggregation order.
    holders: RwLock<Vec<Holder>>,
    /// lowercased product name → metadata
    products: RwLock<HashMap<String, ProductMeta>>,
    units: RwLock<HashMap<String, UnitStatus>>,
    producers: RwLock<Vec<Producer>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Connections
    // ========================================================================

    pub fn add_connection(&self, conn: Connection) -> Result<()> {
        conn.from.validate()?;
        conn.to.validate()?;
        for (name, value) in [("costPerUnit", conn.cost_per_unit), ("transitTimeDays", conn.transit_time_days)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::InvalidInput(format!("{name} must be non-negative, got {v}")));
                }
            }
        }
        self.inner.connections.write().push(conn);
        Ok(())
    }

    // ========================================================================
    // Holders and inventory
    // ========================================================================

    /// Register a distributor or dispenser.
    ///
    /// Unit identifiers in its inventory that the catalogue has not seen yet
    /// are registered as in stock.
    pub fn add_holder(&self, holder: Holder) -> Result<()> {
        holder.address.validate()?;
        if holder.role == Role::Producer {
            return Err(Error::InvalidInput(format!(
                "{} is a producer; register it with add_producer",
                holder.address
            )));
        }

        let mut holders = self.inner.holders.write();
        if holders.iter().any(|h| h.address == holder.address) {
            return Err(Error::ConstraintViolation(format!(
                "holder {} already exists",
                holder.address
            )));
        }

        {
            let mut units = self.inner.units.write();
            for id in holder.inventory.iter().flat_map(|item| &item.unit_ids) {
                units.entry(id.clone()).or_default();
            }
        }
        holders.push(holder);
        Ok(())
    }

    /// Apply a typed inventory mutation to one holder.
    pub fn apply_inventory(&self, address: &str, op: InventoryOperation) -> Result<()> {
        let mut holders = self.inner.holders.write();
        let holder = holders
            .iter_mut()
            .find(|h| h.address.as_str() == address)
            .ok_or_else(|| Error::NotFound(format!("holder {address}")))?;

        op.apply(&mut holder.inventory, Utc::now())?;
        drop(holders);

        if let InventoryOperation::Add { unit_ids, .. } = &op {
            let mut units = self.inner.units.write();
            for id in unit_ids {
                units.entry(id.clone()).or_default();
            }
        }
        Ok(())
    }

    pub fn holder(&self, address: &str) -> Option<Holder> {
        self.inner.holders.read().iter().find(|h| h.address.as_str() == address).cloned()
    }

    /// Items at or below their reorder level, per holder.
    pub fn reorder_alerts(&self) -> Vec<(Address, InventoryItem)> {
        self.inner
            .holders
            .read()
            .iter()
            .flat_map(|h| {
                h.inventory
                    .iter()
                    .filter(|item| item.needs_reorder())
                    .map(|item| (h.address.clone(), item.clone()))
            })
            .collect()
    }

    // ========================================================================
    // Product catalogue
    // ========================================================================

    pub fn add_product(&self, meta: ProductMeta) {
        self.inner.products.write().insert(meta.product_name.to_lowercase(), meta);
    }

    /// Mark a known unit as shipped or received.
    pub fn set_unit_in_transit(&self, unit_id: &str, in_transit: bool) -> Result<()> {
        let mut units = self.inner.units.write();
        let status = units
            .get_mut(unit_id)
            .ok_or_else(|| Error::NotFound(format!("unit {unit_id}")))?;
        status.in_transit = in_transit;
        Ok(())
    }

    /// Forget a unit's status. Returns true if it was known.
    pub fn remove_unit(&self, unit_id: &str) -> bool {
        self.inner.units.write().remove(unit_id).is_some()
    }

    // ========================================================================
    // Producers
    // ========================================================================

    pub fn add_producer(&self, producer: Producer) -> Result<()> {
        producer.address.validate()?;
        self.inner.producers.write().push(producer);
        Ok(())
    }
}

// ============================================================================
// SupplyBackend impl
// ============================================================================

#[async_trait]
impl SupplyBackend for MemoryBackend {
    async fn list_connections(&self) -> Result<Vec<Connection>> {
        Ok(self.inner.connections.read().clone())
    }

    async fn list_holders(&self) -> Result<Vec<Holder>> {
        Ok(self.inner.holders.read().clone())
    }

    async fn find_product(&self, name: &str) -> Result<Option<ProductMeta>> {
        Ok(self.inner.products.read().get(&name.to_lowercase()).cloned())
    }

    async fn unit_status(&self, unit_id: &str) -> Result<UnitStatus> {
        self.inner
            .units
            .read()
            .get(unit_id)
            .copied()
            .ok_or_else(|| Error::NotFound(format!("unit {unit_id}")))
    }

    async fn unit_statuses(&self, unit_ids: &[String]) -> Vec<(String, Result<UnitStatus>)> {
        let units = self.inner.units.read();
        unit_ids
            .iter()
            .map(|id| {
                let status = units
                    .get(id.as_str())
                    .copied()
                    .ok_or_else(|| Error::NotFound(format!("unit {id}")));
                (id.clone(), status)
            })
            .collect()
    }

    async fn list_producers(&self) -> Result<Vec<Producer>> {
        Ok(self.inner.producers.read().clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
