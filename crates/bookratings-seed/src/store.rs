use std::collections::HashSet;

use bookratings_core::{Author, Book, Database, NewBook, NewRating, Publisher, Rating};

use crate::error::Result;

/// Storage operations the seed pipeline needs. Every write must be visible
/// to the next call as soon as it returns.
pub trait SeedStore {
    fn find_author_by_name(&self, name: &str) -> Result<Option<Author>>;
    fn create_author(&self, name: &str) -> Result<Author>;

    fn find_publisher_by_name(&self, name: &str) -> Result<Option<Publisher>>;
    fn create_publisher(&self, name: &str) -> Result<Publisher>;

    /// A stored book whose ISBN equals any of `isbns`.
    fn find_book_by_isbns(&self, isbns: &[&str]) -> Result<Option<Book>>;
    fn create_book(&self, book: NewBook) -> Result<Book>;

    fn existing_user_ids(&self, ids: &[i64]) -> Result<HashSet<i64>>;
    /// Insert users with caller-chosen ids as one all-or-nothing batch.
    fn insert_users_with_ids(&self, ids: &[i64]) -> Result<usize>;
    fn user_exists(&self, id: i64) -> Result<bool>;

    fn rating_exists(&self, user_id: i64, book_id: i64) -> Result<bool>;
    fn create_rating(&self, rating: NewRating) -> Result<Rating>;
}

impl SeedStore for Database {
    fn find_author_by_name(&self, name: &str) -> Result<Option<Author>> {
        Ok(Database::find_author_by_name(self, name)?)
    }

    fn create_author(&self, name: &str) -> Result<Author> {
        Ok(Database::create_author(self, name)?)
    }

    fn find_publisher_by_name(&self, name: &str) -> Result<Option<Publisher>> {
        Ok(Database::find_publisher_by_name(self, name)?)
    }

    fn create_publisher(&self, name: &str) -> Result<Publisher> {
        Ok(Database::create_publisher(self, name)?)
    }

    fn find_book_by_isbns(&self, isbns: &[&str]) -> Result<Option<Book>> {
        Ok(Database::find_book_by_isbns(self, isbns)?)
    }

    fn create_book(&self, book: NewBook) -> Result<Book> {
        Ok(Database::create_book(self, book)?)
    }

    fn existing_user_ids(&self, ids: &[i64]) -> Result<HashSet<i64>> {
        Ok(Database::existing_user_ids(self, ids)?)
    }

    fn insert_users_with_ids(&self, ids: &[i64]) -> Result<usize> {
        Ok(Database::insert_users_with_ids(self, ids)?)
    }

    fn user_exists(&self, id: i64) -> Result<bool> {
        Ok(Database::user_exists(self, id)?)
    }

    fn rating_exists(&self, user_id: i64, book_id: i64) -> Result<bool> {
        Ok(Database::rating_exists(self, user_id, book_id)?)
    }

    fn create_rating(&self, rating: NewRating) -> Result<Rating> {
        Ok(Database::create_rating(self, rating)?)
    }
}
