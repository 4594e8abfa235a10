//! Grid-update instructions handed back to the host
//!
//! Operations that change cells also return the list of edits they made, so the host
//! can persist them or forward them to its own update path.

use crate::cell::CellAddress;

/// New input text for a cell; `None` clears it to null
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueUpdate {
    pub address: CellAddress,
    pub value: Option<String>,
}

impl ValueUpdate {
    pub fn new(address: CellAddress, value: Option<String>) -> Self {
        Self { address, value }
    }
}

/// New value of one attribute key; `None` removes the key
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeUpdate {
    pub address: CellAddress,
    pub key: String,
    pub value: Option<String>,
}

impl AttributeUpdate {
    pub fn set<V: Into<String>>(address: CellAddress, key: &str, value: V) -> Self {
        Self {
            address,
            key: key.to_string(),
            value: Some(value.into()),
        }
    }

    pub fn remove(address: CellAddress, key: &str) -> Self {
        Self {
            address,
            key: key.to_string(),
            value: None,
        }
    }
}
