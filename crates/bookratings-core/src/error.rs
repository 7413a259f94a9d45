use thiserror::Error;

/// All errors that can occur in bookratings-core.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown config key: {0}")]
    UnknownConfigKey(String),

    #[error("Migration error at version {version}: {message}")]
    Migration { version: u32, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Exit codes reported by the `bookratings` binary.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
    FileSystemError = 4,
    ImportFailed = 5,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
