use rusqlite::Connection;
use std::sync::MutexGuard;

use crate::error::Result;
use crate::models::CatalogStats;

pub struct CatalogStatsQuery<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl<'a> CatalogStatsQuery<'a> {
    pub fn new(conn: MutexGuard<'a, Connection>) -> Self {
        Self { conn }
    }

    fn count(&self, table: &str) -> Result<usize> {
        let count: usize = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get::<_, i64>(0).map(|n| n as usize)
            })?;
        Ok(count)
    }

    pub fn get_stats(&self) -> Result<CatalogStats> {
        Ok(CatalogStats {
            authors: self.count("authors")?,
            publishers: self.count("publishers")?,
            books: self.count("books")?,
            users: self.count("users")?,
            ratings: self.count("ratings")?,
            unrated_books: self.count_unrated_books()?,
        })
    }

    pub fn count_by_rating(&self, value: u8) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM ratings WHERE value = ?1",
            rusqlite::params![value],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn count_unrated_books(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM books b
             WHERE NOT EXISTS (SELECT 1 FROM ratings r WHERE r.book_id = b.id)",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
