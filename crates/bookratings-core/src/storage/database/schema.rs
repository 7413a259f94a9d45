use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: u32 = 1;

pub fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS authors (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS publishers (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS books (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            isbn         TEXT NOT NULL UNIQUE,
            title        TEXT NOT NULL,
            year         INTEGER,
            author_id    INTEGER NOT NULL REFERENCES authors(id),
            publisher_id INTEGER NOT NULL REFERENCES publishers(id)
        );

        -- ids come from the rating source; no AUTOINCREMENT so they are kept verbatim
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS ratings (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            book_id     INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            value       INTEGER NOT NULL CHECK(value BETWEEN 1 AND 10),
            UNIQUE (user_id, book_id)
        );
        ",
    )?;
    Ok(())
}

pub fn create_indexes(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_authors_name     ON authors(name);
        CREATE INDEX IF NOT EXISTS idx_publishers_name  ON publishers(name);
        CREATE INDEX IF NOT EXISTS idx_books_author     ON books(author_id);
        CREATE INDEX IF NOT EXISTS idx_books_publisher  ON books(publisher_id);
        CREATE INDEX IF NOT EXISTS idx_ratings_book     ON ratings(book_id);
        ",
    )?;
    Ok(())
}
