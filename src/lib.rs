//! # supply-path — Supply-Path Allocation Engine
//!
//! Answers one question for a multi-tier pharmaceutical distribution network
//! (producers → distributors → dispensers): *where should `N` units of a
//! product needed at node `T` come from, and if they can't all be found,
//! what should the requester be told?*
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `SupplyBackend` is the contract between engine and storage
//! 2. **Clean DTOs**: `Holder`, `Connection`, `AllocationPlan` cross all boundaries
//! 3. **Snapshot, then compute**: all I/O happens up front; planning is a pure function
//! 4. **Shortfalls are answers**: only malformed requests are errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use supply_path::{SupplyPlanner, AllocationRequest, Connection, Holder, InventoryItem, Role};
//!
//! # async fn example() -> supply_path::Result<()> {
//! let planner = SupplyPlanner::open_memory();
//! let db = planner.backend();
//! db.add_connection(Connection::new("0xD1", "0xR1", 3.0, 2.0))?;
//! db.add_holder(
//!     Holder::new("North Depot", "0xD1", Role::Distributor)
//!         .with_item(InventoryItem::bulk("Paracetamol 500mg", 40)),
//! )?;
//!
//! let plan = planner
//!     .plan(&AllocationRequest::new("Paracetamol 500mg", 10, "0xR1"))
//!     .await?;
//! println!("{}", plan.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Snapshot | `snapshot` | Read connections, holders, producers, unit statuses |
//! | Graph | `graph` | Adjacency map + Dijkstra path finder |
//! | Inventory | `inventory` | Candidate sources with available stock |
//! | Planner | `planner` | Single-source attempt, then greedy multi-source split |
//! | Advisor | `advisor` | Producer lead times or stockout message |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod storage;
pub mod snapshot;
pub mod graph;
pub mod inventory;
pub mod planner;
pub mod advisor;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Address, Role, Holder, Connection, InventoryItem, InventoryOperation,
    ProductMeta, UnitStatus, Producer, LeadTime,
    AllocationPlan, Allocation, PlanStatus, WaitRecommendation,
    ProducerOption, ProductionDays, AllocationRequest, Objective, Query,
};

// ============================================================================
// Re-exports: Storage, config, engine
// ============================================================================

pub use storage::{SupplyBackend, MemoryBackend};
pub use config::PlannerConfig;
pub use snapshot::Snapshot;
pub use planner::{plan_allocation, PriorityKey};

// ============================================================================
// Top-level planner handle
// ============================================================================

/// The primary entry point. A `SupplyPlanner` wraps a storage backend and
/// answers allocation requests against it.
pub struct SupplyPlanner<B: SupplyBackend> {
    backend: B,
    config: PlannerConfig,
}

impl<B: SupplyBackend> SupplyPlanner<B> {
    /// Create a planner with the given backend and default config.
    pub fn with_backend(backend: B) -> Self {
        Self { backend, config: PlannerConfig::default() }
    }

    /// Replace the planner config. Rejects configs that fail
    /// [`PlannerConfig::validate`].
    pub fn with_config(mut self, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Validate a request, snapshot the network and plan an allocation.
    pub async fn plan(&self, request: &AllocationRequest) -> Result<AllocationPlan> {
        // Phase 1: Validate
        let query = request.validate()?;

        // Phase 2: Snapshot
        let snapshot = Snapshot::load(&self.backend, &query).await?;

        // Phase 3: Plan
        Ok(plan_allocation(&snapshot, &query, &self.config))
    }

    /// Parse a JSON request body, plan it and render the JSON response.
    pub async fn plan_json(&self, body: &str) -> Result<String> {
        let request = AllocationRequest::from_json(body)?;
        self.plan(&request).await?.to_json()
    }

    /// Access the underlying backend (for loading data).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }
}

/// In-memory planner for testing and embedding.
impl SupplyPlanner<MemoryBackend> {
    pub fn open_memory() -> Self {
        Self::with_backend(MemoryBackend::new())
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Input validation error: {0}")]
    InvalidInput(String),

    #[error("Unsupported objective: {0}")]
    UnsupportedObjective(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
