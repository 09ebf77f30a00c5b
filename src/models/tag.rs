//! Tag model

use serde::{Deserialize, Serialize};

/// A named label attached to any number of articles.
///
/// Tag names are unique across the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Unique identifier, `0` until persisted
    pub id: i64,
    /// Tag name
    pub name: String,
}

impl Tag {
    /// Create an unsaved tag; the id is assigned by the database.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}
