use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Root application configuration, loaded from `~/.config/bookratings/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub core: CoreConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Directory holding `bookratings.db`.
    pub library_path: String,
}

/// Where the two seed spreadsheets live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub seed_dir: String,
    pub books_file: String,
    pub ratings_file: String,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for CoreConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("bookratings");

        Self {
            library_path: data_dir.to_string_lossy().to_string(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed_dir: "SeedData".to_string(),
            books_file: "Book1.xlsx".to_string(),
            ratings_file: "Book2.xlsx".to_string(),
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/bookratings/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("BOOKRATINGS_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("bookratings")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn set_library_path(&mut self, path: PathBuf) {
        self.core.library_path = path.to_string_lossy().to_string();
    }

    /// Set one of the keys `bookratings config set` accepts. Derived keys such
    /// as `database_path` are read-only.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "library_path" => self.set_library_path(PathBuf::from(value)),
            "seed_dir" => self.seed.seed_dir = value.to_string(),
            "books_file" => self.seed.books_file = value.to_string(),
            "ratings_file" => self.seed.ratings_file = value.to_string(),
            _ => return Err(CatalogError::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }

    // ─── Derived paths ─────────────────────────────────────

    pub fn library_path(&self) -> PathBuf {
        PathBuf::from(&self.core.library_path)
    }

    /// Path to the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.library_path().join("bookratings.db")
    }

    pub fn books_source(&self) -> PathBuf {
        PathBuf::from(&self.seed.seed_dir).join(&self.seed.books_file)
    }

    pub fn ratings_source(&self) -> PathBuf {
        PathBuf::from(&self.seed.seed_dir).join(&self.seed.ratings_file)
    }

    /// Flat `key = value` view used by `bookratings config`.
    pub fn key_values(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        map.insert("library_path", self.library_path().to_string_lossy().to_string());
        map.insert("database_path", self.database_path().to_string_lossy().to_string());
        map.insert("seed_dir", self.seed.seed_dir.clone());
        map.insert("books_file", self.seed.books_file.clone());
        map.insert("ratings_file", self.seed.ratings_file.clone());
        map.insert("books_source", self.books_source().to_string_lossy().to_string());
        map.insert("ratings_source", self.ratings_source().to_string_lossy().to_string());
        map
    }
}
