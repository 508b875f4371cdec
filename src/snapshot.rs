//! Request-scoped view of the network.
//!
//! A `Snapshot` is read from a [`SupplyBackend`] once per query and owned by
//! that query alone. The planner never talks to the backend directly.

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::model::*;
use crate::storage::SupplyBackend;
use crate::Result;

/// Everything the planner needs for one query.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub connections: Vec<Connection>,
    pub holders: Vec<Holder>,
    pub producers: Vec<Producer>,
    pub product: Option<ProductMeta>,
    /// Status of every unit id the query may count. Units whose lookup
    /// failed are absent and therefore unavailable.
    pub unit_status: HashMap<String, UnitStatus>,
}

impl Snapshot {
    /// Read all collaborators for `query`.
    ///
    /// Listing failures abort the load. Product-metadata and per-unit
    /// lookup failures are logged and leave the entry absent.
    pub async fn load<B: SupplyBackend + ?Sized>(backend: &B, query: &Query) -> Result<Self> {
        let connections = backend.list_connections().await?;
        let holders = backend.list_holders().await?;
        let producers = backend.list_producers().await?;

        let product = match backend.find_product(&query.product_name).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!(product = %query.product_name, error = %e, "product metadata lookup failed");
                None
            }
        };

        let wanted: Vec<String> = holders
            .iter()
            .filter(|h| h.role != Role::Producer && h.address != query.target)
            .flat_map(|h| h.items_for(&query.product_name))
            .flat_map(|item| item.unit_ids.iter().cloned())
            .collect();

        let mut unit_status = HashMap::with_capacity(wanted.len());
        for (unit_id, status) in backend.unit_statuses(&wanted).await {
            match status {
                Ok(s) => {
                    unit_status.insert(unit_id, s);
                }
                Err(e) => warn!(unit = %unit_id, error = %e, "unit status lookup failed; treating unit as unavailable"),
            }
        }

        debug!(
            connections = connections.len(),
            holders = holders.len(),
            producers = producers.len(),
            units = unit_status.len(),
            "loaded supply snapshot"
        );

        Ok(Self { connections, holders, producers, product, unit_status })
    }

    /// A snapshot with every unit of every holder marked in stock.
    ///
    /// Handy when building networks by hand.
    pub fn from_parts(connections: Vec<Connection>, holders: Vec<Holder>, producers: Vec<Producer>) -> Self {
        let unit_status = holders
            .iter()
            .flat_map(|h| &h.inventory)
            .flat_map(|item| &item.unit_ids)
            .map(|id| (id.clone(), UnitStatus::default()))
            .collect();
        Self { connections, holders, producers, product: None, unit_status }
    }
}
