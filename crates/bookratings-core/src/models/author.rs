use serde::{Deserialize, Serialize};

/// Name used when a source row leaves the author or publisher blank.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A book author, resolved by exact name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

impl Author {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Replace a blank or whitespace-only entity name with [`UNKNOWN_NAME`].
pub fn name_or_unknown(name: &str) -> &str {
    if name.trim().is_empty() { UNKNOWN_NAME } else { name }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_falls_back_to_unknown() {
        assert_eq!(name_or_unknown(""), "Unknown");
        assert_eq!(name_or_unknown("   \t"), "Unknown");
        assert_eq!(name_or_unknown("J.K. Rowling"), "J.K. Rowling");
    }

    #[test]
    fn test_name_is_not_normalized() {
        // Spelling variants stay distinct entities.
        assert_eq!(name_or_unknown(" J. K. Rowling"), " J. K. Rowling");
    }
}
