//! Allocation plans — the engine's output.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use super::Address;

/// Node sequence from source to target, both inclusive.
pub type PathNodes = SmallVec<[Address; 4]>;

/// Whether the request was fully covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Complete,
    Partial,
}

/// Quantity sourced from one node along one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub source: Address,
    pub path: PathNodes,
    pub unit_ids: Vec<String>,
    /// Per-unit cost accumulated along `path`.
    pub cost: f64,
    pub qty: u32,
    pub eta_days: f64,
}

/// Production lead time as reported to the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionDays {
    Days(u32),
    Unknown,
}

impl Serialize for ProductionDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Days(d) => serializer.serialize_u32(*d),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for ProductionDays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Days(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Days(d) => Ok(Self::Days(d)),
            Raw::Text(s) if s.eq_ignore_ascii_case("unknown") => Ok(Self::Unknown),
            Raw::Text(s) => Err(serde::de::Error::custom(format!("invalid production days '{s}'"))),
        }
    }
}

/// A producer able to manufacture the requested product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerOption {
    pub producer_name: String,
    pub address: Address,
    pub production_days: ProductionDays,
}

/// What to tell a requester whose need could not be fully met.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitRecommendation {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producers: Option<Vec<ProducerOption>>,
}

impl WaitRecommendation {
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), producers: None }
    }
}

/// The result of one allocation query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPlan {
    pub status: PlanStatus,
    pub allocations: Vec<Allocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_recommendation: Option<WaitRecommendation>,
}

impl AllocationPlan {
    pub fn complete(allocations: Vec<Allocation>) -> Self {
        Self { status: PlanStatus::Complete, allocations, wait_recommendation: None }
    }

    pub fn partial(allocations: Vec<Allocation>, wait: WaitRecommendation) -> Self {
        Self { status: PlanStatus::Partial, allocations, wait_recommendation: Some(wait) }
    }

    pub fn is_complete(&self) -> bool {
        self.status == PlanStatus::Complete
    }

    pub fn allocated_qty(&self) -> u32 {
        self.allocations.iter().map(|a| a.qty).sum()
    }

    /// Render as the JSON response body.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
