mod connection;
mod migrations;
mod schema;

pub use connection::ConnectionPool;
pub use migrations::{get_applied_versions, run_migrations, Migration};
pub use schema::SCHEMA_VERSION;

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::models::{Author, Book, CatalogStats, NewBook, NewRating, Publisher, Rating, RATING_RANGE};

use super::queries::CatalogStatsQuery;
use super::repositories::{
    AuthorRepository, BookRepository, PublisherRepository, RatingRepository, Repository,
    SqliteAuthorRepository, SqliteBookRepository, SqlitePublisherRepository,
    SqliteRatingRepository, SqliteUserRepository, UserRepository,
};

pub fn open_database(path: &Path) -> Result<ConnectionPool> {
    let pool = ConnectionPool::open(path)?;
    {
        let conn = pool.get_connection();
        migrations::run_migrations(&conn)?;
    }
    Ok(pool)
}

pub fn open_in_memory() -> Result<ConnectionPool> {
    let pool = ConnectionPool::open_in_memory()?;
    {
        let conn = pool.get_connection();
        migrations::run_migrations(&conn)?;
    }
    Ok(pool)
}

/// Every write is committed before the call returns, so later lookups in the
/// same run see it.
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let pool = open_database(path)?;
        Ok(Self { pool })
    }

    pub fn open_in_memory() -> Result<Self> {
        let pool = open_in_memory()?;
        Ok(Self { pool })
    }

    pub fn path(&self) -> Option<&str> {
        self.pool.path()
    }

    pub fn schema_versions(&self) -> Result<Vec<u32>> {
        let conn = self.pool.get_connection();
        get_applied_versions(&conn)
    }

    // ─── Authors / publishers ───────────────────────────────

    pub fn find_author_by_name(&self, name: &str) -> Result<Option<Author>> {
        let conn = self.pool.get_connection();
        let repo = SqliteAuthorRepository::new(conn);
        repo.find_by_name(name)
    }

    pub fn create_author(&self, name: &str) -> Result<Author> {
        let conn = self.pool.get_connection();
        let repo = SqliteAuthorRepository::new(conn);
        repo.create(name)
    }

    pub fn get_author(&self, id: i64) -> Result<Option<Author>> {
        let conn = self.pool.get_connection();
        let repo = SqliteAuthorRepository::new(conn);
        repo.find_by_id(&id)
    }

    pub fn find_publisher_by_name(&self, name: &str) -> Result<Option<Publisher>> {
        let conn = self.pool.get_connection();
        let repo = SqlitePublisherRepository::new(conn);
        repo.find_by_name(name)
    }

    pub fn create_publisher(&self, name: &str) -> Result<Publisher> {
        let conn = self.pool.get_connection();
        let repo = SqlitePublisherRepository::new(conn);
        repo.create(name)
    }

    pub fn get_publisher(&self, id: i64) -> Result<Option<Publisher>> {
        let conn = self.pool.get_connection();
        let repo = SqlitePublisherRepository::new(conn);
        repo.find_by_id(&id)
    }

    // ─── Books ──────────────────────────────────────────────

    pub fn find_book_by_isbns(&self, isbns: &[&str]) -> Result<Option<Book>> {
        let conn = self.pool.get_connection();
        let repo = SqliteBookRepository::new(conn);
        repo.find_by_isbns(isbns)
    }

    pub fn create_book(&self, book: NewBook) -> Result<Book> {
        let conn = self.pool.get_connection();
        let repo = SqliteBookRepository::new(conn);
        repo.create(book)
    }

    pub fn count_books(&self) -> Result<usize> {
        let conn = self.pool.get_connection();
        let repo = SqliteBookRepository::new(conn);
        repo.count()
    }

    // ─── Users ──────────────────────────────────────────────

    pub fn existing_user_ids(&self, ids: &[i64]) -> Result<HashSet<i64>> {
        let conn = self.pool.get_connection();
        let repo = SqliteUserRepository::new(conn);
        repo.existing_ids(ids)
    }

    /// Forced-id insert scoped to one transaction.
    pub fn insert_users_with_ids(&self, ids: &[i64]) -> Result<usize> {
        let conn = self.pool.get_connection();
        let mut repo = SqliteUserRepository::new(conn);
        repo.insert_with_ids(ids)
    }

    pub fn user_exists(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get_connection();
        let repo = SqliteUserRepository::new(conn);
        repo.exists(id)
    }

    pub fn count_users(&self) -> Result<usize> {
        let conn = self.pool.get_connection();
        let repo = SqliteUserRepository::new(conn);
        repo.count()
    }

    // ─── Ratings ────────────────────────────────────────────

    pub fn rating_exists(&self, user_id: i64, book_id: i64) -> Result<bool> {
        let conn = self.pool.get_connection();
        let repo = SqliteRatingRepository::new(conn);
        repo.exists_for(user_id, book_id)
    }

    pub fn create_rating(&self, rating: NewRating) -> Result<Rating> {
        let conn = self.pool.get_connection();
        let repo = SqliteRatingRepository::new(conn);
        repo.create(rating)
    }

    pub fn get_rating(&self, id: i64) -> Result<Option<Rating>> {
        let conn = self.pool.get_connection();
        let repo = SqliteRatingRepository::new(conn);
        repo.find_by_id(&id)
    }

    pub fn count_ratings(&self) -> Result<usize> {
        let conn = self.pool.get_connection();
        let repo = SqliteRatingRepository::new(conn);
        repo.count()
    }

    // ─── Stats ──────────────────────────────────────────────

    pub fn stats(&self) -> Result<CatalogStats> {
        let conn = self.pool.get_connection();
        CatalogStatsQuery::new(conn).get_stats()
    }

    /// `(value, count)` for every accepted rating value, including zero counts.
    pub fn rating_histogram(&self) -> Result<Vec<(u8, usize)>> {
        let conn = self.pool.get_connection();
        let query = CatalogStatsQuery::new(conn);
        let mut histogram = Vec::new();
        for value in RATING_RANGE {
            let value = value as u8;
            histogram.push((value, query.count_by_rating(value)?));
        }
        Ok(histogram)
    }
}
