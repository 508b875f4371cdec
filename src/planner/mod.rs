//! Allocation planner — turns a snapshot and a query into a plan.
//!
//! The planner is synchronous and owns nothing between calls.
//!
//! ## Decision procedure
//!
//! 1. No candidates: ask the advisor.
//! 2. Single source: among candidates holding the full quantity and able to
//!    reach the target, take the best by [`PriorityKey`].
//! 3. Multi source: rank every reachable candidate by the same key and
//!    consume greedily until the requirement is met or sources run out.
//! 4. Nothing reachable: ask the advisor.
//!
//! Equal keys fall back to ascending source address.

use std::cmp::Ordering;

use hashbrown::HashMap;
use tracing::{debug, info, warn};

use crate::advisor;
use crate::config::PlannerConfig;
use crate::graph::{Route, SupplyGraph, shortest_path};
use crate::inventory::{self, Candidate};
use crate::model::*;
use crate::snapshot::Snapshot;

/// Ranking of a reachable candidate: objective value, then hop count, then
/// larger stock first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityKey {
    pub objective_value: f64,
    pub hops: usize,
    pub available_qty: u32,
}

impl PriorityKey {
    pub fn new(route: &Route, objective: Objective, available_qty: u32) -> Self {
        Self { objective_value: route.metric(objective), hops: route.hops(), available_qty }
    }
}

impl Eq for PriorityKey {}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.objective_value
            .total_cmp(&other.objective_value)
            .then(self.hops.cmp(&other.hops))
            .then(other.available_qty.cmp(&self.available_qty))
    }
}

/// A candidate with its route to the target.
#[derive(Debug, Clone)]
struct Scored<'a> {
    candidate: &'a Candidate,
    route: Route,
    key: PriorityKey,
}

impl Scored<'_> {
    fn rank(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.candidate.address.cmp(&other.candidate.address))
    }

    fn allocate(&self, qty: u32) -> Allocation {
        Allocation {
            source: self.candidate.address.clone(),
            path: self.route.path.clone(),
            unit_ids: self.candidate.unit_ids.iter().take(qty as usize).cloned().collect(),
            cost: self.route.cost,
            qty,
            eta_days: self.route.time,
        }
    }
}

/// Per-query memo of path searches, keyed by source.
struct RouteCache<'g> {
    graph: &'g SupplyGraph,
    target: &'g Address,
    objective: Objective,
    routes: HashMap<Address, Option<Route>>,
}

impl<'g> RouteCache<'g> {
    fn new(graph: &'g SupplyGraph, target: &'g Address, objective: Objective) -> Self {
        Self { graph, target, objective, routes: HashMap::new() }
    }

    fn score<'a>(&mut self, candidate: &'a Candidate) -> Option<Scored<'a>> {
        let (graph, target, objective) = (self.graph, self.target, self.objective);
        let route = self
            .routes
            .entry(candidate.address.clone())
            .or_insert_with(|| shortest_path(graph, candidate.address.as_str(), target.as_str(), objective))
            .clone();

        match route {
            Some(route) => {
                let key = PriorityKey::new(&route, objective, candidate.available_qty);
                Some(Scored { candidate, route, key })
            }
            None => {
                debug!(source = %candidate.address, target = %target, "no path to target");
                None
            }
        }
    }

    fn searches(&self) -> usize {
        self.routes.len()
    }
}

fn cold_chain_unrequested(snapshot: &Snapshot, query: &Query) -> bool {
    !query.cold_storage_required && snapshot.product.as_ref().is_some_and(|p| p.cold_chain)
}

/// Plan an allocation for a validated query over a snapshot.
pub fn plan_allocation(snapshot: &Snapshot, query: &Query, config: &PlannerConfig) -> AllocationPlan {
    let graph = SupplyGraph::build(&snapshot.connections, config);
    let agg = inventory::aggregate(&snapshot.holders, &snapshot.unit_status, &graph, query);

    debug!(
        product = %query.product_name,
        target = %query.target,
        required_qty = query.required_qty,
        objective = %query.objective,
        unit_weight = ?snapshot.product.as_ref().and_then(|p| p.unit_weight),
        cold_chain = snapshot.product.as_ref().is_some_and(|p| p.cold_chain),
        candidates = agg.candidates.len(),
        matched_records = agg.matched_records,
        "planning allocation"
    );

    if cold_chain_unrequested(snapshot, query) {
        warn!(
            product = %query.product_name,
            "catalogue marks product as cold chain but request does not require cold storage"
        );
    }

    if agg.candidates.is_empty() {
        let mut wait = advisor::advise(&query.product_name, &snapshot.producers, query.cold_storage_required);
        if !agg.product_known() {
            wait.message = advisor::not_found_message(&query.product_name);
        }
        return finish(query, AllocationPlan::partial(Vec::new(), wait));
    }

    let mut routes = RouteCache::new(&graph, &query.target, query.objective);

    // Single source.
    let mut best: Option<Scored<'_>> = None;
    for candidate in agg.candidates.iter().filter(|c| c.available_qty >= query.required_qty) {
        if let Some(scored) = routes.score(candidate) {
            if best.as_ref().is_none_or(|b| scored.rank(b) == Ordering::Less) {
                best = Some(scored);
            }
        }
    }
    if let Some(best) = best {
        debug!(source = %best.candidate.address, key = ?best.key, "single source covers request");
        return finish(query, AllocationPlan::complete(vec![best.allocate(query.required_qty)]));
    }

    // Multi source.
    let mut ranked: Vec<Scored<'_>> = agg.candidates.iter().filter_map(|c| routes.score(c)).collect();
    ranked.sort_by(|a, b| a.rank(b));
    debug!(reachable = ranked.len(), searches = routes.searches(), "splitting across sources");

    let mut remaining = query.required_qty;
    let mut allocations = Vec::new();
    for scored in &ranked {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(scored.candidate.available_qty);
        allocations.push(scored.allocate(take));
        remaining -= take;
    }

    let plan = if remaining == 0 {
        AllocationPlan::complete(allocations)
    } else if !allocations.is_empty() {
        let secured = query.required_qty - remaining;
        AllocationPlan::partial(
            allocations,
            WaitRecommendation::message(advisor::shortfall_message(&query.product_name, secured)),
        )
    } else {
        AllocationPlan::partial(
            Vec::new(),
            advisor::advise(&query.product_name, &snapshot.producers, query.cold_storage_required),
        )
    };
    finish(query, plan)
}

fn finish(query: &Query, plan: AllocationPlan) -> AllocationPlan {
    info!(
        product = %query.product_name,
        target = %query.target,
        status = ?plan.status,
        sources = plan.allocations.len(),
        allocated = plan.allocated_qty(),
        required = query.required_qty,
        "allocation planned"
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(v: f64, hops: usize, qty: u32) -> PriorityKey {
        PriorityKey { objective_value: v, hops, available_qty: qty }
    }

    #[test]
    fn test_priority_key_order() {
        assert!(key(1.0, 5, 1) < key(2.0, 1, 100));
        assert!(key(1.0, 1, 1) < key(1.0, 2, 100));
        assert!(key(1.0, 1, 100) < key(1.0, 1, 1));
        assert_eq!(key(1.0, 1, 1).cmp(&key(1.0, 1, 1)), Ordering::Equal);
    }

    fn query(qty: i64) -> Query {
        AllocationRequest::new("Aspirin", qty, "0xT").validate().unwrap()
    }

    #[test]
    fn test_route_cache_reuses_searches() {
        let conns = vec![
            Connection::new("0xA", "0xT", 5.0, 2.0),
            Connection::new("0xB", "0xT", 3.0, 5.0),
        ];
        let holders = vec![
            Holder::new("A", "0xA", Role::Distributor).with_item(InventoryItem::bulk("Aspirin", 10)),
            Holder::new("B", "0xB", Role::Distributor).with_item(InventoryItem::bulk("Aspirin", 10)),
        ];
        let graph = SupplyGraph::build(&conns, &PlannerConfig::default());
        let agg = inventory::aggregate(&holders, &HashMap::new(), &graph, &query(15));
        let target = Address::from("0xT");
        let mut cache = RouteCache::new(&graph, &target, Objective::Cost);

        for c in &agg.candidates {
            cache.score(c).unwrap();
        }
        for c in &agg.candidates {
            cache.score(c).unwrap();
        }
        assert_eq!(cache.searches(), 2);
    }

    #[test]
    fn test_cold_chain_catalogue_flag() {
        let mut snapshot = Snapshot::from_parts(Vec::new(), Vec::new(), Vec::new());
        assert!(!cold_chain_unrequested(&snapshot, &query(1)));

        let mut meta = ProductMeta::new("Aspirin");
        meta.cold_chain = true;
        snapshot.product = Some(meta);
        assert!(cold_chain_unrequested(&snapshot, &query(1)));

        let cold = AllocationRequest::new("Aspirin", 1, "0xT").cold_chain().validate().unwrap();
        assert!(!cold_chain_unrequested(&snapshot, &cold));
    }

    #[test]
    fn test_partial_shortfall_message() {
        let snapshot = Snapshot::from_parts(
            vec![Connection::new("0xA", "0xT", 1.0, 1.0)],
            vec![Holder::new("A", "0xA", Role::Distributor).with_item(InventoryItem::bulk("Aspirin", 4))],
            Vec::new(),
        );
        let plan = plan_allocation(&snapshot, &query(10), &PlannerConfig::default());

        assert_eq!(plan.status, PlanStatus::Partial);
        assert_eq!(plan.allocated_qty(), 4);
        assert_eq!(
            plan.wait_recommendation.unwrap().message,
            "Only 4 units available for Aspirin. Please wait for restock."
        );
    }

    #[test]
    fn test_unreachable_candidates_fall_back_to_advisor() {
        // A has stock and an outgoing lane, but not toward the target.
        let snapshot = Snapshot::from_parts(
            vec![Connection::new("0xA", "0xX", 1.0, 1.0)],
            vec![Holder::new("A", "0xA", Role::Distributor).with_item(InventoryItem::bulk("Aspirin", 40))],
            vec![Producer::new("Maker", "0xM").produces("Aspirin", 6)],
        );
        let plan = plan_allocation(&snapshot, &query(10), &PlannerConfig::default());

        assert_eq!(plan.status, PlanStatus::Partial);
        assert!(plan.allocations.is_empty());
        let wait = plan.wait_recommendation.unwrap();
        assert_eq!(wait.message, advisor::producers_available_message("Aspirin"));
        assert_eq!(wait.producers.unwrap()[0].production_days, ProductionDays::Days(6));
    }

    #[test]
    fn test_unit_ids_take_first_n() {
        let snapshot = Snapshot::from_parts(
            vec![Connection::new("0xA", "0xT", 1.0, 1.0)],
            vec![Holder::new("A", "0xA", Role::Distributor)
                .with_item(InventoryItem::units("Aspirin", ["u1", "u2", "u3"]))],
            Vec::new(),
        );
        let plan = plan_allocation(&snapshot, &query(2), &PlannerConfig::default());
        assert_eq!(plan.allocations[0].unit_ids, vec!["u1", "u2"]);
    }
}
