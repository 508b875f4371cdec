//! Single-source shortest path over a [`SupplyGraph`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::SupplyGraph;
use crate::model::{Address, Objective, PathNodes};

/// A path from a source to the target with both accumulated metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: PathNodes,
    pub cost: f64,
    pub time: f64,
}

impl Route {
    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// The accumulated value of the given metric.
    pub fn metric(&self, objective: Objective) -> f64 {
        match objective {
            Objective::Cost => self.cost,
            Objective::Time => self.time,
        }
    }
}

/// Heap entry. `primary` is the objective, `secondary` the other metric.
struct State<'g> {
    primary: f64,
    secondary: f64,
    node: &'g str,
    prev: Option<&'g str>,
}

impl State<'_> {
    fn key(&self) -> (f64, f64, &str) {
        (self.primary, self.secondary, self.node)
    }
}

impl PartialEq for State<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State<'_> {}

impl PartialOrd for State<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State<'_> {
    // Reversed so that `BinaryHeap` pops the smallest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        let (a_primary, a_secondary, a_node) = self.key();
        let (b_primary, b_secondary, b_node) = other.key();
        b_primary
            .total_cmp(&a_primary)
            .then_with(|| b_secondary.total_cmp(&a_secondary))
            .then_with(|| b_node.cmp(a_node))
            .then_with(|| other.prev.cmp(&self.prev))
    }
}

/// Dijkstra from `source` to `target`, minimizing `objective`.
///
/// The non-chosen metric is summed along the chosen path and only breaks
/// ties. Returns `None` when the target is unreachable.
pub fn shortest_path(
    graph: &SupplyGraph,
    source: &str,
    target: &str,
    objective: Objective,
) -> Option<Route> {
    let mut heap = BinaryHeap::new();
    // node → (predecessor, cost, time) once settled
    let mut settled: HashMap<&str, (Option<&str>, f64, f64)> = HashMap::new();

    heap.push(State { primary: 0.0, secondary: 0.0, node: source, prev: None });

    while let Some(State { primary, secondary, node, prev }) = heap.pop() {
        if settled.contains_key(node) {
            continue;
        }
        let (cost, time) = match objective {
            Objective::Cost => (primary, secondary),
            Objective::Time => (secondary, primary),
        };
        settled.insert(node, (prev, cost, time));

        if node == target {
            return Some(Route { path: unwind(&settled, target), cost, time });
        }

        for edge in graph.edges(node) {
            let next = edge.to.as_str();
            if settled.contains_key(next) {
                continue;
            }
            let (step_primary, step_secondary) = match objective {
                Objective::Cost => (edge.cost, edge.time),
                Objective::Time => (edge.time, edge.cost),
            };
            heap.push(State {
                primary: primary + step_primary,
                secondary: secondary + step_secondary,
                node: next,
                prev: Some(node),
            });
        }
    }

    None
}

fn unwind(settled: &HashMap<&str, (Option<&str>, f64, f64)>, target: &str) -> PathNodes {
    let mut path = PathNodes::new();
    let mut cursor = Some(target);
    while let Some(node) = cursor {
        path.push(Address::from(node));
        cursor = settled.get(node).and_then(|(prev, _, _)| *prev);
    }
    path.reverse();
    path
}
