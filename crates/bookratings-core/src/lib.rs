//! Bookratings core: catalog models, SQLite storage, configuration.

pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use config::{AppConfig, CoreConfig, SeedConfig};
pub use error::{CatalogError, ExitCode, Result};
pub use models::*;

pub use storage::database::{ConnectionPool, Database, open_database, open_in_memory};

pub use storage::repositories::{
    Repository,
    AuthorRepository, SqliteAuthorRepository,
    PublisherRepository, SqlitePublisherRepository,
    BookRepository, SqliteBookRepository,
    UserRepository, SqliteUserRepository,
    RatingRepository, SqliteRatingRepository,
};

pub use storage::queries::CatalogStatsQuery;
