//! Inventory aggregation — which holders can ship the requested product.

use hashbrown::HashMap;
use tracing::debug;

use crate::graph::SupplyGraph;
use crate::model::{Address, Holder, InventoryItem, Query, Role, UnitStatus};

/// A holder with sourceable stock of the requested product.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub address: Address,
    pub available_qty: u32,
    /// Unit ids confirmed not in transit, in inventory order.
    pub unit_ids: Vec<String>,
}

/// Result of scanning the network for one product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Inventory records naming the product anywhere, before any filter.
    pub matched_records: usize,
    /// Surviving sources, in holder order.
    pub candidates: Vec<Candidate>,
}

impl Aggregation {
    pub fn product_known(&self) -> bool {
        self.matched_records > 0
    }
}

/// Scan `holders` for stock of `query.product_name`.
///
/// Producers and the target are never candidates. Unit-tracked items count
/// only units whose status is known and not in transit; other items count
/// their bulk quantity. With a cold-chain query, items without cold storage
/// are ignored. Holders left with nothing, or with no outgoing edge in
/// `graph`, are dropped.
pub fn aggregate(
    holders: &[Holder],
    unit_status: &HashMap<String, UnitStatus>,
    graph: &SupplyGraph,
    query: &Query,
) -> Aggregation {
    let mut agg = Aggregation::default();

    for holder in holders {
        let items: Vec<&InventoryItem> = holder.items_for(&query.product_name).collect();
        agg.matched_records += items.len();

        if holder.role == Role::Producer || holder.address == query.target || items.is_empty() {
            continue;
        }

        let mut available_qty = 0u32;
        let mut unit_ids = Vec::new();
        for item in items {
            if query.cold_storage_required && !item.supports_cold_storage {
                continue;
            }
            if item.is_unit_tracked() {
                let before = unit_ids.len();
                unit_ids.extend(
                    item.unit_ids
                        .iter()
                        .filter(|id| unit_status.get(id.as_str()).is_some_and(|s| !s.in_transit))
                        .cloned(),
                );
                available_qty = available_qty.saturating_add((unit_ids.len() - before) as u32);
            } else {
                available_qty = available_qty.saturating_add(item.qty);
            }
        }

        if available_qty == 0 {
            continue;
        }
        if !graph.has_outgoing(holder.address.as_str()) {
            debug!(holder = %holder.address, available_qty, "pruning holder with no outgoing connection");
            continue;
        }

        agg.candidates.push(Candidate {
            address: holder.address.clone(),
            available_qty,
            unit_ids,
        });
    }

    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::model::{AllocationRequest, Connection};

    fn query(qty: i64, cold: bool) -> Query {
        let mut req = AllocationRequest::new("Insulin", qty, "0xT");
        req.cold_storage_required = cold;
        req.validate().unwrap()
    }

    fn graph_from(sources: &[&str]) -> SupplyGraph {
        let conns: Vec<Connection> = sources.iter().map(|s| Connection::new(*s, "0xT", 1.0, 1.0)).collect();
        SupplyGraph::build(&conns, &PlannerConfig::default())
    }

    fn in_stock(ids: &[&str]) -> HashMap<String, UnitStatus> {
        ids.iter().map(|id| (id.to_string(), UnitStatus::default())).collect()
    }

    #[test]
    fn test_counts_units_not_in_transit() {
        let holders = vec![Holder::new("D", "0xD", Role::Distributor)
            .with_item(InventoryItem::units("insulin", ["u1", "u2", "u3"]))];
        let mut status = in_stock(&["u1", "u2", "u3"]);
        status.insert("u2".into(), UnitStatus { in_transit: true });

        let agg = aggregate(&holders, &status, &graph_from(&["0xD"]), &query(1, false));
        assert_eq!(agg.candidates.len(), 1);
        assert_eq!(agg.candidates[0].available_qty, 2);
        assert_eq!(agg.candidates[0].unit_ids, vec!["u1", "u3"]);
    }

    #[test]
    fn test_unknown_unit_status_is_unavailable() {
        let holders = vec![Holder::new("D", "0xD", Role::Distributor)
            .with_item(InventoryItem::units("Insulin", ["u1", "u2"]))];
        let agg = aggregate(&holders, &in_stock(&["u1"]), &graph_from(&["0xD"]), &query(1, false));
        assert_eq!(agg.candidates[0].available_qty, 1);
    }

    #[test]
    fn test_bulk_quantity_used_without_units() {
        let holders = vec![Holder::new("D", "0xD", Role::Distributor)
            .with_item(InventoryItem::bulk("Insulin", 12))];
        let agg = aggregate(&holders, &HashMap::new(), &graph_from(&["0xD"]), &query(1, false));
        assert_eq!(agg.candidates[0].available_qty, 12);
        assert!(agg.candidates[0].unit_ids.is_empty());
    }

    #[test]
    fn test_cold_chain_filter() {
        let holders = vec![
            Holder::new("Warm", "0xW", Role::Distributor).with_item(InventoryItem::bulk("Insulin", 5)),
            Holder::new("Cold", "0xC", Role::Distributor).with_item(InventoryItem::bulk("Insulin", 5).cold_storage()),
        ];
        let graph = graph_from(&["0xW", "0xC"]);

        let agg = aggregate(&holders, &HashMap::new(), &graph, &query(1, true));
        let addrs: Vec<&str> = agg.candidates.iter().map(|c| c.address.as_str()).collect();
        assert_eq!(addrs, vec!["0xC"]);
        assert_eq!(agg.matched_records, 2);

        let agg = aggregate(&holders, &HashMap::new(), &graph, &query(1, false));
        assert_eq!(agg.candidates.len(), 2);
    }

    #[test]
    fn test_skips_target_and_unconnected_holders() {
        let holders = vec![
            Holder::new("Target", "0xT", Role::Dispenser).with_item(InventoryItem::bulk("Insulin", 50)),
            Holder::new("Island", "0xI", Role::Distributor).with_item(InventoryItem::bulk("Insulin", 50)),
            Holder::new("D", "0xD", Role::Distributor).with_item(InventoryItem::bulk("Insulin", 0)),
        ];
        let agg = aggregate(&holders, &HashMap::new(), &graph_from(&["0xD"]), &query(1, false));
        assert!(agg.candidates.is_empty());
        assert_eq!(agg.matched_records, 3);
        assert!(agg.product_known());
    }

    #[test]
    fn test_preserves_holder_order() {
        let holders = vec![
            Holder::new("Z", "0xZ", Role::Distributor).with_item(InventoryItem::bulk("Insulin", 1)),
            Holder::new("A", "0xA", Role::Dispenser).with_item(InventoryItem::bulk("Insulin", 1)),
        ];
        let agg = aggregate(&holders, &HashMap::new(), &graph_from(&["0xA", "0xZ"]), &query(1, false));
        let addrs: Vec<&str> = agg.candidates.iter().map(|c| c.address.as_str()).collect();
        assert_eq!(addrs, vec!["0xZ", "0xA"]);
    }
}
