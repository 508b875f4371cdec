//! Product catalogue records.

use serde::{Deserialize, Serialize};

/// Catalogue metadata for a named product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMeta {
    pub product_name: String,
    #[serde(default)]
    pub unit_weight: Option<f64>,
    /// Catalogue flag for temperature-controlled products. Logged with the
    /// plan; the request's `coldStorageRequired` still drives filtering.
    #[serde(default)]
    pub cold_chain: bool,
}

impl ProductMeta {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self { product_name: product_name.into(), unit_weight: None, cold_chain: false }
    }

    pub fn with_unit_weight(mut self, weight: f64) -> Self {
        self.unit_weight = Some(weight);
        self
    }
}

/// Per-unit tracking status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStatus {
    pub in_transit: bool,
}
