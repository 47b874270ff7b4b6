use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of an object: a key inside a container
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ObjectAddress {
    pub container: String,
    pub key: String,
}

impl ObjectAddress {
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
        }
    }

    /// Generate the `container/key` form used in results and diagnostics
    pub fn to_path(&self) -> String {
        format!("{}/{}", self.container, self.key)
    }
}

impl fmt::Display for ObjectAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// Outcome of a successful store.
///
/// `was_update` is best effort: it reflects an existence check made before
/// the upload, so two writers racing on a fresh address may both see `false`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreResult {
    pub address: String,
    pub was_update: bool,
}

impl StoreResult {
    pub fn new(address: &ObjectAddress, was_update: bool) -> Self {
        Self {
            address: address.to_path(),
            was_update,
        }
    }
}
