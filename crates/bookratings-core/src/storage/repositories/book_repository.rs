use rusqlite::{params, params_from_iter, Connection};
use std::sync::MutexGuard;

use crate::error::Result;
use crate::models::{Book, NewBook};

use super::{placeholders, Repository};

pub trait BookRepository: Repository<Entity = Book, Id = i64> {
    /// First book whose stored ISBN equals any of `isbns`.
    fn find_by_isbns(&self, isbns: &[&str]) -> Result<Option<Book>>;
    fn create(&self, book: NewBook) -> Result<Book>;
}

pub struct SqliteBookRepository<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl<'a> SqliteBookRepository<'a> {
    pub fn new(conn: MutexGuard<'a, Connection>) -> Self {
        Self { conn }
    }

    fn row_to_book(row: &rusqlite::Row) -> rusqlite::Result<Book> {
        Ok(Book {
            id: row.get(0)?,
            isbn: row.get(1)?,
            title: row.get(2)?,
            year: row.get(3)?,
            author_id: row.get(4)?,
            publisher_id: row.get(5)?,
        })
    }
}

impl<'a> Repository for SqliteBookRepository<'a> {
    type Entity = Book;
    type Id = i64;

    fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>> {
        let result = self.conn.query_row(
            "SELECT id, isbn, title, year, author_id, publisher_id FROM books WHERE id = ?1",
            params![id],
            Self::row_to_book,
        );

        match result {
            Ok(book) => Ok(Some(book)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl<'a> BookRepository for SqliteBookRepository<'a> {
    fn find_by_isbns(&self, isbns: &[&str]) -> Result<Option<Book>> {
        if isbns.is_empty() {
            return Ok(None);
        }

        let sql = format!(
            "SELECT id, isbn, title, year, author_id, publisher_id
             FROM books WHERE isbn IN ({}) ORDER BY id LIMIT 1",
            placeholders(isbns.len())
        );
        let result = self
            .conn
            .query_row(&sql, params_from_iter(isbns.iter()), Self::row_to_book);

        match result {
            Ok(book) => Ok(Some(book)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn create(&self, book: NewBook) -> Result<Book> {
        self.conn.execute(
            "INSERT INTO books (isbn, title, year, author_id, publisher_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![book.isbn, book.title, book.year, book.author_id, book.publisher_id],
        )?;
        Ok(book.into_book(self.conn.last_insert_rowid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::{run_migrations, ConnectionPool};
    use crate::storage::repositories::{AuthorRepository, SqliteAuthorRepository};
    use crate::storage::repositories::{PublisherRepository, SqlitePublisherRepository};

    fn seeded_pool() -> (ConnectionPool, i64, i64) {
        let pool = ConnectionPool::open_in_memory().unwrap();
        run_migrations(&pool.get_connection()).unwrap();
        let author = SqliteAuthorRepository::new(pool.get_connection()).create("A").unwrap();
        let publisher = SqlitePublisherRepository::new(pool.get_connection()).create("P").unwrap();
        (pool, author.id, publisher.id)
    }

    fn new_book(isbn: &str, author_id: i64, publisher_id: i64) -> NewBook {
        NewBook {
            isbn: isbn.to_string(),
            title: "Title".to_string(),
            year: Some(1997),
            author_id,
            publisher_id,
        }
    }

    #[test]
    fn test_find_by_any_isbn() {
        let (pool, a, p) = seeded_pool();
        let repo = SqliteBookRepository::new(pool.get_connection());
        let book = repo.create(new_book("0747532699", a, p)).unwrap();

        let found = repo.find_by_isbns(&["9780747532699", "0747532699"]).unwrap();
        assert_eq!(found, Some(book));
        assert!(repo.find_by_isbns(&["9780747532699"]).unwrap().is_none());
        assert!(repo.find_by_isbns(&[]).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_isbn_rejected() {
        let (pool, a, p) = seeded_pool();
        let repo = SqliteBookRepository::new(pool.get_connection());
        repo.create(new_book("0747532699", a, p)).unwrap();
        assert!(repo.create(new_book("0747532699", a, p)).is_err());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_unknown_author_rejected_by_foreign_key() {
        let (pool, _, p) = seeded_pool();
        let repo = SqliteBookRepository::new(pool.get_connection());
        assert!(repo.create(new_book("0747532699", 999, p)).is_err());
    }
}
