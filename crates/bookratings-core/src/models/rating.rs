use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Accepted rating values, inclusive on both ends.
pub const RATING_RANGE: RangeInclusive<i64> = 1..=10;

/// One user's rating of one catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRating {
    pub user_id: i64,
    pub book_id: i64,
    pub value: u8,
}

impl NewRating {
    /// Build a rating, rejecting values outside [`RATING_RANGE`].
    pub fn new(user_id: i64, book_id: i64, value: i64) -> Option<Self> {
        if !RATING_RANGE.contains(&value) {
            return None;
        }
        Some(Self { user_id, book_id, value: value as u8 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(NewRating::new(1, 1, 1).is_some());
        assert!(NewRating::new(1, 1, 10).is_some());
        assert!(NewRating::new(1, 1, 0).is_none());
        assert!(NewRating::new(1, 1, 11).is_none());
        assert!(NewRating::new(1, 1, -3).is_none());
    }
}
