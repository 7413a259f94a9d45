use serde::{Deserialize, Serialize};

/// A rating author. The id comes from the rating source and is stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
}
