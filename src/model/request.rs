//! Allocation requests and their validated form.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use super::Address;
use crate::{Error, Result};

/// Metric minimized by the path finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Sum of per-unit edge cost.
    Cost,
    /// Sum of edge transit days.
    Time,
}

impl FromStr for Objective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cost" | "optimizeCost" => Ok(Self::Cost),
            "time" | "optimizeTime" => Ok(Self::Time),
            other => Err(Error::UnsupportedObjective(other.to_string())),
        }
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cost => f.write_str("cost"),
            Self::Time => f.write_str("time"),
        }
    }
}

/// Request as received on the wire. Nothing here is trusted until
/// [`AllocationRequest::validate`] has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub product_name: String,
    pub required_qty: i64,
    pub target_address: String,
    #[serde(default)]
    pub cold_storage_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
}

impl AllocationRequest {
    pub fn new(product_name: impl Into<String>, required_qty: i64, target_address: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            required_qty,
            target_address: target_address.into(),
            cold_storage_required: false,
            objective: None,
        }
    }

    pub fn cold_chain(mut self) -> Self {
        self.cold_storage_required = true;
        self
    }

    pub fn optimize(mut self, objective: impl Into<String>) -> Self {
        self.objective = Some(objective.into());
        self
    }

    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Check every field and resolve the objective.
    ///
    /// Cold-chain requests default to optimizing transit time, everything
    /// else to cost.
    pub fn validate(&self) -> Result<Query> {
        let product_name = self.product_name.trim();
        if product_name.is_empty() {
            return Err(Error::InvalidInput("product name must not be empty".into()));
        }
        if self.required_qty <= 0 {
            return Err(Error::InvalidInput(format!(
                "required quantity must be positive, got {}",
                self.required_qty
            )));
        }
        let required_qty = u32::try_from(self.required_qty).map_err(|_| {
            Error::InvalidInput(format!("required quantity {} is too large", self.required_qty))
        })?;
        let target = Address::parse(&self.target_address)?;

        let objective = match &self.objective {
            Some(raw) => raw.parse::<Objective>()?,
            None if self.cold_storage_required => Objective::Time,
            None => Objective::Cost,
        };

        Ok(Query {
            product_name: product_name.to_string(),
            required_qty,
            target,
            cold_storage_required: self.cold_storage_required,
            objective,
        })
    }
}

/// A validated request.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub product_name: String,
    pub required_qty: u32,
    pub target: Address,
    pub cold_storage_required: bool,
    pub objective: Objective,
}
