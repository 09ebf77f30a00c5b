//! Catalogue model

use serde::{Deserialize, Serialize};

/// A named grouping; every article belongs to exactly one catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalogue {
    /// Unique identifier, `0` until persisted
    pub id: i64,
    /// Catalogue name, unique across the store
    pub name: String,
}

impl Catalogue {
    /// Create an unsaved catalogue; the id is assigned by the database.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}
