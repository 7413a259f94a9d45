//! Bookratings seed: ISBN normalization and catalog/rating reconciliation.

pub mod catalog;
pub mod error;
pub mod identifiers;
pub mod pipeline;
pub mod ratings;
pub mod report;
pub mod resolver;
pub mod source;
pub mod store;

pub use catalog::import_books;
pub use error::{Result, SeedError};
pub use identifiers::{candidates, normalize, to_ten, to_thirteen, CanonicalIsbn, IsbnCandidates};
pub use pipeline::{run_seed, SeedSources};
pub use ratings::{import_ratings, provision_users};
pub use report::{
    BookImportReport, BookOutcome, BookSkip, RatingImportReport, RatingOutcome, RatingSkip, SeedReport,
};
pub use resolver::EntityResolver;
pub use source::{read_books, read_ratings, RawBookRow, RawRatingRow};
pub use store::SeedStore;
