//! Network nodes: addresses, roles and the holders that carry stock.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use super::InventoryItem;
use crate::{Error, Result};

/// Opaque network address of a node (e.g. a wallet address like `"0xR1"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Parse and validate an address.
    ///
    /// Addresses are opaque, but must be non-empty and free of whitespace
    /// and control characters.
    pub fn parse(raw: &str) -> Result<Self> {
        let addr = Self::new(raw);
        addr.validate()?;
        Ok(addr)
    }

    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::InvalidInput("address must not be empty".into()));
        }
        if self.0.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::InvalidInput(format!("malformed address '{}'", self.0)));
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Address {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Tier of a node in the distribution network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Producer,
    Distributor,
    Dispenser,
}

/// A node that holds inventory (distributor or dispenser).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holder {
    pub name: String,
    pub address: Address,
    pub role: Role,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
}

impl Holder {
    pub fn new(name: impl Into<String>, address: impl Into<Address>, role: Role) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            role,
            inventory: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: InventoryItem) -> Self {
        self.inventory.push(item);
        self
    }

    /// Inventory items whose product name matches `product`, ignoring case.
    pub fn items_for<'a>(&'a self, product: &'a str) -> impl Iterator<Item = &'a InventoryItem> + 'a {
        self.inventory.iter().filter(move |item| item.matches(product))
    }
}
