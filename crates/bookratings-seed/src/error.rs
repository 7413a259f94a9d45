use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed source not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("cannot read seed source {}: {reason}", path.display())]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("unsupported seed source format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("user provisioning failed, no users were added: {0}")]
    Provisioning(String),

    #[error(transparent)]
    Catalog(#[from] bookratings_core::CatalogError),
}

impl SeedError {
    /// True for failures detected before any row was imported.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SeedError::MissingSource(_)
                | SeedError::UnreadableSource { .. }
                | SeedError::UnsupportedFormat(_)
                | SeedError::Csv(_)
                | SeedError::Workbook(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;
