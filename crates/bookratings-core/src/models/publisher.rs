use serde::{Deserialize, Serialize};

/// A publishing house, resolved by exact name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
}

impl Publisher {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}
