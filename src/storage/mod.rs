//! # Supply Backend Trait
//!
//! This is THE contract between the allocation engine and whatever store
//! holds the network. Every read the engine performs during a query is
//! defined here; writes are backend-specific.
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryBackend` | `memory` | In-memory for testing/embedding |

pub mod memory;

use async_trait::async_trait;
use crate::model::*;
use crate::Result;

pub use memory::MemoryBackend;

/// The universal read contract.
///
/// Reads are assumed consistent for the lifetime of one query. Listing
/// failures are propagated; per-unit and per-product lookups may fail
/// individually and the engine degrades around them.
#[async_trait]
pub trait SupplyBackend: Send + Sync + 'static {
    // ========================================================================
    // Connection directory
    // ========================================================================

    /// Every connection record, active or not.
    async fn list_connections(&self) -> Result<Vec<Connection>>;

    // ========================================================================
    // Entity directory
    // ========================================================================

    /// All distributors and dispensers with their embedded inventory.
    async fn list_holders(&self) -> Result<Vec<Holder>>;

    // ========================================================================
    // Product catalogue
    // ========================================================================

    /// Catalogue metadata for a product, if the catalogue knows it.
    async fn find_product(&self, name: &str) -> Result<Option<ProductMeta>>;

    /// Tracking status of one product unit.
    async fn unit_status(&self, unit_id: &str) -> Result<UnitStatus>;

    /// Batch form of [`unit_status`](Self::unit_status).
    ///
    /// Default falls back to sequential lookups, keeping per-unit failures.
    async fn unit_statuses(&self, unit_ids: &[String]) -> Vec<(String, Result<UnitStatus>)> {
        let mut out = Vec::with_capacity(unit_ids.len());
        for id in unit_ids {
            out.push((id.clone(), self.unit_status(id).await));
        }
        out
    }

    // ========================================================================
    // Producer directory
    // ========================================================================

    /// Every production-capable node with its catalogue and lead times.
    async fn list_producers(&self) -> Result<Vec<Producer>>;
}
