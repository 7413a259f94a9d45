use rusqlite::{params, Connection};
use std::sync::MutexGuard;

use crate::error::Result;
use crate::models::{NewRating, Rating};

use super::Repository;

pub trait RatingRepository: Repository<Entity = Rating, Id = i64> {
    fn exists_for(&self, user_id: i64, book_id: i64) -> Result<bool>;
    fn create(&self, rating: NewRating) -> Result<Rating>;
}

pub struct SqliteRatingRepository<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl<'a> SqliteRatingRepository<'a> {
    pub fn new(conn: MutexGuard<'a, Connection>) -> Self {
        Self { conn }
    }
}

impl<'a> Repository for SqliteRatingRepository<'a> {
    type Entity = Rating;
    type Id = i64;

    fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>> {
        let result = self.conn.query_row(
            "SELECT id, user_id, book_id, value FROM ratings WHERE id = ?1",
            params![id],
            |row| {
                Ok(Rating {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    book_id: row.get(2)?,
                    value: row.get(3)?,
                })
            },
        );

        match result {
            Ok(rating) => Ok(Some(rating)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM ratings", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl<'a> RatingRepository for SqliteRatingRepository<'a> {
    fn exists_for(&self, user_id: i64, book_id: i64) -> Result<bool> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM ratings WHERE user_id = ?1 AND book_id = ?2")?
            .exists(params![user_id, book_id])?;
        Ok(exists)
    }

    fn create(&self, rating: NewRating) -> Result<Rating> {
        self.conn.execute(
            "INSERT INTO ratings (user_id, book_id, value) VALUES (?1, ?2, ?3)",
            params![rating.user_id, rating.book_id, rating.value],
        )?;
        Ok(Rating {
            id: self.conn.last_insert_rowid(),
            user_id: rating.user_id,
            book_id: rating.book_id,
            value: rating.value,
        })
    }
}
