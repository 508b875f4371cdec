//! Production-capable nodes and their lead times.

use serde::{Deserialize, Serialize};
use super::Address;

/// Days a producer needs to manufacture one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadTime {
    pub product_name: String,
    pub days: u32,
}

/// A producer and the catalogue it can manufacture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Producer {
    pub name: String,
    pub address: Address,
    #[serde(default)]
    pub products_produced: Vec<String>,
    #[serde(default)]
    pub lead_times: Vec<LeadTime>,
}

impl Producer {
    pub fn new(name: impl Into<String>, address: impl Into<Address>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            products_produced: Vec::new(),
            lead_times: Vec::new(),
        }
    }

    /// Declare a product with a known lead time.
    pub fn produces(mut self, product: impl Into<String>, days: u32) -> Self {
        let product = product.into();
        self.lead_times.push(LeadTime { product_name: product.clone(), days });
        self.products_produced.push(product);
        self
    }

    /// Declare a product without a recorded lead time.
    pub fn produces_unscheduled(mut self, product: impl Into<String>) -> Self {
        self.products_produced.push(product.into());
        self
    }

    /// Exact (case-sensitive) catalogue membership.
    pub fn makes(&self, product: &str) -> bool {
        self.products_produced.iter().any(|p| p == product)
    }

    pub fn lead_time(&self, product: &str) -> Option<u32> {
        self.lead_times.iter().find(|lt| lt.product_name == product).map(|lt| lt.days)
    }
}
