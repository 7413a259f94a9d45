use std::collections::HashSet;
use std::sync::MutexGuard;

use rusqlite::{params, params_from_iter, Connection};

use crate::error::Result;
use crate::models::User;

use super::{placeholders, Repository, MAX_IN_PARAMS};

pub trait UserRepository: Repository<Entity = User, Id = i64> {
    /// The subset of `ids` already present.
    fn existing_ids(&self, ids: &[i64]) -> Result<HashSet<i64>>;

    /// Insert users whose ids are given by the caller rather than assigned by
    /// storage. Runs as one transaction: either every id is inserted or none is.
    fn insert_with_ids(&mut self, ids: &[i64]) -> Result<usize>;

    fn exists(&self, id: i64) -> Result<bool>;
}

pub struct SqliteUserRepository<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl<'a> SqliteUserRepository<'a> {
    pub fn new(conn: MutexGuard<'a, Connection>) -> Self {
        Self { conn }
    }
}

impl<'a> Repository for SqliteUserRepository<'a> {
    type Entity = User;
    type Id = i64;

    fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>> {
        let result = self.conn.query_row(
            "SELECT id FROM users WHERE id = ?1",
            params![id],
            |row| Ok(User { id: row.get(0)? }),
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl<'a> UserRepository for SqliteUserRepository<'a> {
    fn existing_ids(&self, ids: &[i64]) -> Result<HashSet<i64>> {
        let mut found = HashSet::new();

        for chunk in ids.chunks(MAX_IN_PARAMS) {
            let sql = format!("SELECT id FROM users WHERE id IN ({})", placeholders(chunk.len()));
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| row.get::<_, i64>(0))?;
            for row in rows {
                found.insert(row?);
            }
        }

        Ok(found)
    }

    fn insert_with_ids(&mut self, ids: &[i64]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO users (id) VALUES (?1)")?;
            for id in ids {
                stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(ids.len())
    }

    fn exists(&self, id: i64) -> Result<bool> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM users WHERE id = ?1")?
            .exists(params![id])?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::{run_migrations, ConnectionPool};

    fn pool() -> ConnectionPool {
        let pool = ConnectionPool::open_in_memory().unwrap();
        run_migrations(&pool.get_connection()).unwrap();
        pool
    }

    #[test]
    fn test_explicit_ids_are_kept() {
        let pool = pool();
        let mut repo = SqliteUserRepository::new(pool.get_connection());
        assert_eq!(repo.insert_with_ids(&[42, 276725, 7]).unwrap(), 3);

        assert!(repo.exists(42).unwrap());
        assert!(repo.exists(276725).unwrap());
        assert!(!repo.exists(1).unwrap());
        assert_eq!(repo.find_by_id(&7).unwrap(), Some(User { id: 7 }));
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let pool = pool();
        let mut repo = SqliteUserRepository::new(pool.get_connection());
        repo.insert_with_ids(&[5]).unwrap();

        // 5 already exists, so the whole batch fails and 6 must not survive
        assert!(repo.insert_with_ids(&[6, 5, 8]).is_err());
        assert!(!repo.exists(6).unwrap());
        assert!(!repo.exists(8).unwrap());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_existing_ids_spans_chunks() {
        let pool = pool();
        let mut repo = SqliteUserRepository::new(pool.get_connection());
        let stored: Vec<i64> = (1..=1200).step_by(2).collect();
        repo.insert_with_ids(&stored).unwrap();

        let probe: Vec<i64> = (1..=1200).collect();
        let found = repo.existing_ids(&probe).unwrap();
        assert_eq!(found.len(), stored.len());
        assert!(found.contains(&1199));
        assert!(!found.contains(&1200));
    }
}
