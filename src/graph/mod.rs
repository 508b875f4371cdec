//! # Supply Graph
//!
//! Adjacency view of the network, rebuilt from connection records on every
//! query. Edges follow connection direction only; parallel edges between the
//! same pair are all kept.
//!
//! ```text
//! [Connection]  ──build──▶  SupplyGraph { from → [(to, cost, time)] }
//!                                │
//!                                └──shortest_path(src, dst, objective)──▶ Route
//! ```

pub mod path;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::model::{Address, Connection};

pub use path::{Route, shortest_path};

/// One outgoing lane.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub to: Address,
    pub cost: f64,
    pub time: f64,
}

/// Directed adjacency map `address → outgoing edges`.
///
/// Only nodes with at least one outgoing edge have an entry.
#[derive(Debug, Clone, Default)]
pub struct SupplyGraph {
    adjacency: HashMap<Address, SmallVec<[Edge; 4]>>,
    edge_count: usize,
}

impl SupplyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from connection records.
    ///
    /// Inactive connections are skipped unless the config keeps them.
    /// Connections with a negative or non-finite weight are dropped.
    pub fn build(connections: &[Connection], config: &PlannerConfig) -> Self {
        let mut graph = Self::new();
        let mut skipped_inactive = 0usize;

        for conn in connections {
            if !conn.active && !config.include_inactive_connections {
                skipped_inactive += 1;
                continue;
            }
            let cost = conn.cost_per_unit.unwrap_or(config.default_cost_per_unit);
            let time = conn.transit_time_days.unwrap_or(config.default_transit_days);
            if !(cost.is_finite() && cost >= 0.0 && time.is_finite() && time >= 0.0) {
                warn!(from = %conn.from, to = %conn.to, cost, time, "dropping connection with invalid weight");
                continue;
            }
            graph.add_edge(conn.from.clone(), Edge { to: conn.to.clone(), cost, time });
        }

        debug!(
            sources = graph.adjacency.len(),
            edges = graph.edge_count,
            skipped_inactive,
            "built supply graph"
        );
        graph
    }

    pub fn add_edge(&mut self, from: Address, edge: Edge) {
        self.adjacency.entry(from).or_default().push(edge);
        self.edge_count += 1;
    }

    /// Outgoing edges of `from`, empty when it has none.
    pub fn edges(&self, from: &str) -> &[Edge] {
        self.adjacency.get(from).map(|e| e.as_slice()).unwrap_or(&[])
    }

    pub fn has_outgoing(&self, addr: &str) -> bool {
        self.adjacency.contains_key(addr)
    }

    /// Number of nodes with at least one outgoing edge.
    pub fn source_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
