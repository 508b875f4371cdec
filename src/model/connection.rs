//! Connection (directed edge) between two network nodes.

use serde::{Deserialize, Serialize};
use super::Address;

/// A directed shipping lane from one node to another.
///
/// Cost and transit time are optional on the wire; the graph builder fills
/// gaps from `PlannerConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from: Address,
    pub to: Address,
    #[serde(default)]
    pub cost_per_unit: Option<f64>,
    #[serde(default)]
    pub transit_time_days: Option<f64>,
    /// Carried on the wire; not a routing weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Connection {
    pub fn new(from: impl Into<Address>, to: impl Into<Address>, cost_per_unit: f64, transit_time_days: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            cost_per_unit: Some(cost_per_unit),
            transit_time_days: Some(transit_time_days),
            distance_km: None,
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
