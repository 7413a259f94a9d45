//! Full seed run: books first, then ratings.

use std::path::Path;

use crate::catalog::import_books;
use crate::error::Result;
use crate::ratings::import_ratings;
use crate::report::SeedReport;
use crate::source::{read_books, read_ratings, RawBookRow, RawRatingRow};
use crate::store::SeedStore;

/// Both seed sources, fully read into memory.
#[derive(Debug, Clone, Default)]
pub struct SeedSources {
    pub books: Vec<RawBookRow>,
    pub ratings: Vec<RawRatingRow>,
}

impl SeedSources {
    /// Read both files before anything is written, so a missing or broken
    /// ratings file aborts the run with storage untouched.
    pub fn load(books: &Path, ratings: &Path) -> Result<Self> {
        let books = read_books(books)?;
        let ratings = read_ratings(ratings)?;
        tracing::info!("loaded {} book rows, {} rating rows", books.len(), ratings.len());
        Ok(Self { books, ratings })
    }
}

/// Import the catalog to completion, then the ratings that reference it.
pub fn run_seed<S: SeedStore + ?Sized>(store: &S, sources: &SeedSources) -> Result<SeedReport> {
    tracing::info!("importing books");
    let books = import_books(store, &sources.books)?;

    tracing::info!("importing ratings");
    let ratings = import_ratings(store, &sources.ratings)?;

    Ok(SeedReport { books, ratings })
}
