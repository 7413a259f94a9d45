use rusqlite::{params, Connection};
use std::sync::MutexGuard;

use crate::error::Result;
use crate::models::Publisher;

use super::Repository;

pub trait PublisherRepository: Repository<Entity = Publisher, Id = i64> {
    fn find_by_name(&self, name: &str) -> Result<Option<Publisher>>;
    fn create(&self, name: &str) -> Result<Publisher>;
}

pub struct SqlitePublisherRepository<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl<'a> SqlitePublisherRepository<'a> {
    pub fn new(conn: MutexGuard<'a, Connection>) -> Self {
        Self { conn }
    }

    fn row_to_publisher(row: &rusqlite::Row) -> rusqlite::Result<Publisher> {
        Ok(Publisher {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

impl<'a> Repository for SqlitePublisherRepository<'a> {
    type Entity = Publisher;
    type Id = i64;

    fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>> {
        let result = self.conn.query_row(
            "SELECT id, name FROM publishers WHERE id = ?1",
            params![id],
            Self::row_to_publisher,
        );

        match result {
            Ok(publisher) => Ok(Some(publisher)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn count(&self) -> Result<usize> {
        let count: i64 =
            self.conn.query_row("SELECT COUNT(*) FROM publishers", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl<'a> PublisherRepository for SqlitePublisherRepository<'a> {
    fn find_by_name(&self, name: &str) -> Result<Option<Publisher>> {
        let result = self.conn.query_row(
            "SELECT id, name FROM publishers WHERE name = ?1 ORDER BY id LIMIT 1",
            params![name],
            Self::row_to_publisher,
        );

        match result {
            Ok(publisher) => Ok(Some(publisher)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn create(&self, name: &str) -> Result<Publisher> {
        self.conn.execute("INSERT INTO publishers (name) VALUES (?1)", params![name])?;
        Ok(Publisher::new(self.conn.last_insert_rowid(), name))
    }
}
