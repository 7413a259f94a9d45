use rusqlite::{params, Connection};
use std::sync::MutexGuard;

use crate::error::Result;
use crate::models::Author;

use super::Repository;

pub trait AuthorRepository: Repository<Entity = Author, Id = i64> {
    /// Exact, case-sensitive match. The lowest id wins if the name is stored twice.
    fn find_by_name(&self, name: &str) -> Result<Option<Author>>;
    fn create(&self, name: &str) -> Result<Author>;
}

pub struct SqliteAuthorRepository<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl<'a> SqliteAuthorRepository<'a> {
    pub fn new(conn: MutexGuard<'a, Connection>) -> Self {
        Self { conn }
    }
}

impl<'a> Repository for SqliteAuthorRepository<'a> {
    type Entity = Author;
    type Id = i64;

    fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>> {
        let result = self.conn.query_row(
            "SELECT id, name FROM authors WHERE id = ?1",
            params![id],
            |row| Ok(Author { id: row.get(0)?, name: row.get(1)? }),
        );

        match result {
            Ok(author) => Ok(Some(author)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM authors", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl<'a> AuthorRepository for SqliteAuthorRepository<'a> {
    fn find_by_name(&self, name: &str) -> Result<Option<Author>> {
        let result = self.conn.query_row(
            "SELECT id, name FROM authors WHERE name = ?1 ORDER BY id LIMIT 1",
            params![name],
            |row| Ok(Author { id: row.get(0)?, name: row.get(1)? }),
        );

        match result {
            Ok(author) => Ok(Some(author)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn create(&self, name: &str) -> Result<Author> {
        self.conn.execute("INSERT INTO authors (name) VALUES (?1)", params![name])?;
        Ok(Author::new(self.conn.last_insert_rowid(), name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::ConnectionPool;
    use crate::storage::database::run_migrations;

    fn pool() -> ConnectionPool {
        let pool = ConnectionPool::open_in_memory().unwrap();
        run_migrations(&pool.get_connection()).unwrap();
        pool
    }

    #[test]
    fn test_create_then_find_by_name() {
        let pool = pool();
        let repo = SqliteAuthorRepository::new(pool.get_connection());
        let created = repo.create("J.K. Rowling").unwrap();

        assert_eq!(repo.find_by_name("J.K. Rowling").unwrap(), Some(created.clone()));
        assert_eq!(repo.find_by_id(&created.id).unwrap(), Some(created));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_find_by_name_is_case_sensitive() {
        let pool = pool();
        let repo = SqliteAuthorRepository::new(pool.get_connection());
        repo.create("J.K. Rowling").unwrap();

        assert!(repo.find_by_name("j.k. rowling").unwrap().is_none());
        assert!(repo.find_by_name("J. K. Rowling").unwrap().is_none());
    }
}
