//! Planner configuration.

use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Knobs that change how the network graph is built.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    /// Keep connections flagged `active = false` in the graph.
    pub include_inactive_connections: bool,
    /// Edge cost used when a connection carries none.
    pub default_cost_per_unit: f64,
    /// Edge transit time used when a connection carries none.
    pub default_transit_days: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            include_inactive_connections: false,
            default_cost_per_unit: 1.0,
            default_transit_days: 1.0,
        }
    }
}

impl PlannerConfig {
    pub fn from_json(body: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(body)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("defaultCostPerUnit", self.default_cost_per_unit),
            ("defaultTransitDays", self.default_transit_days),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        Ok(())
    }
}
