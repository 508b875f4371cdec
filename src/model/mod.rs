//! # Supply Network Model
//!
//! Plain DTOs for the distribution network and for allocation queries.
//! These types cross every boundary: storage ↔ snapshot ↔ planner ↔ caller.
//!
//! Design rule: this module is pure data. No I/O, no state, no async.

pub mod node;
pub mod connection;
pub mod inventory;
pub mod product;
pub mod producer;
pub mod plan;
pub mod request;

pub use node::{Address, Role, Holder};
pub use connection::Connection;
pub use inventory::{InventoryItem, InventoryOperation};
pub use product::{ProductMeta, UnitStatus};
pub use producer::{Producer, LeadTime};
pub use plan::{
    AllocationPlan, Allocation, PlanStatus, PathNodes,
    WaitRecommendation, ProducerOption, ProductionDays,
};
pub use request::{AllocationRequest, Objective, Query};
