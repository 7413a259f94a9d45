mod author_repository;
mod book_repository;
mod publisher_repository;
mod rating_repository;
mod user_repository;

pub use author_repository::{AuthorRepository, SqliteAuthorRepository};
pub use book_repository::{BookRepository, SqliteBookRepository};
pub use publisher_repository::{PublisherRepository, SqlitePublisherRepository};
pub use rating_repository::{RatingRepository, SqliteRatingRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};

use crate::error::Result;

/// Keeps `IN (...)` lists well under SQLite's bound-parameter limit.
pub(crate) const MAX_IN_PARAMS: usize = 500;

pub trait Repository {
    type Entity;
    type Id;

    fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>>;
    fn count(&self) -> Result<usize>;
}

/// `?1, ?2, ... ?n` for a dynamic `IN` clause.
pub(crate) fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?1");
        assert_eq!(placeholders(3), "?1, ?2, ?3");
    }
}
