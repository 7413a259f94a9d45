use serde::{Deserialize, Serialize};

/// Row counts per catalog table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub authors: usize,
    pub publishers: usize,
    pub books: usize,
    pub users: usize,
    pub ratings: usize,
    pub unrated_books: usize,
}
