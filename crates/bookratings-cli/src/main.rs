use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bookratings_core::{AppConfig, CatalogError, Database, ExitCode};
use bookratings_seed::{
    candidates, import_books, import_ratings, normalize, read_books, read_ratings, run_seed, SeedError,
    SeedSources,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "bookratings",
    about = "Seed a book catalog and its ratings from spreadsheet exports",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting BOOKRATINGS_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the book source, then the rating source.
    Seed {
        /// Book source (defaults to seed.seed_dir/seed.books_file).
        #[arg(long)]
        books: Option<PathBuf>,
        /// Rating source (defaults to seed.seed_dir/seed.ratings_file).
        #[arg(long)]
        ratings: Option<PathBuf>,
    },

    /// Import a single source.
    Import {
        #[command(subcommand)]
        action: ImportAction,
    },

    /// Show how raw ISBN values normalize and which candidates they match.
    Isbn {
        #[arg(required = true)]
        raw: Vec<String>,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show catalog statistics.
    Stats,

    /// Run diagnostics.
    Doctor,

    /// Show version information.
    Version,
}

#[derive(Subcommand)]
enum ImportAction {
    /// Import book rows. Rows matching an existing ISBN are skipped.
    Books { path: PathBuf },
    /// Import rating rows. Books must already be imported.
    Ratings { path: PathBuf },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show all config values.
    List,
    /// Get a specific config key.
    Get { key: String },
    /// Set a config key and write the config file.
    Set { key: String, value: String },
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json || std::env::var("BOOKRATINGS_JSON").as_deref() == Ok("1");

    let mut config = AppConfig::load()?;
    if let Ok(lib_path) = std::env::var("BOOKRATINGS_LIBRARY_PATH") {
        config.set_library_path(lib_path.into());
    }

    match cli.command {
        // ── Seed ───────────────────────────────────────────────────────────

        Commands::Seed { books, ratings } => {
            let books = books.unwrap_or_else(|| config.books_source());
            let ratings = ratings.unwrap_or_else(|| config.ratings_source());

            let sources = SeedSources::load(&books, &ratings).unwrap_or_else(|e| fail(json_output, &e, start));
            let db = open_db(&config)?;
            let report = run_seed(&db, &sources).unwrap_or_else(|e| fail(json_output, &e, start));
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":report,"meta":{"duration_ms":dur}}))?;
            } else {
                println!("{}", report.books);
                println!("{}", report.ratings);
            }
        }

        Commands::Import { action } => match action {
            ImportAction::Books { path } => {
                let rows = read_books(&path).unwrap_or_else(|e| fail(json_output, &e, start));
                let db = open_db(&config)?;
                let report = import_books(&db, &rows).unwrap_or_else(|e| fail(json_output, &e, start));
                let dur = start.elapsed().as_millis();

                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":report,"meta":{"duration_ms":dur}}))?;
                } else {
                    println!("{report}");
                }
            }

            ImportAction::Ratings { path } => {
                let rows = read_ratings(&path).unwrap_or_else(|e| fail(json_output, &e, start));
                let db = open_db(&config)?;
                let report = import_ratings(&db, &rows).unwrap_or_else(|e| fail(json_output, &e, start));
                let dur = start.elapsed().as_millis();

                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":report,"meta":{"duration_ms":dur}}))?;
                } else {
                    println!("{report}");
                    if report.users_created > 0 {
                        println!("users created: {}", report.users_created);
                    }
                }
            }
        },

        // ── Isbn ───────────────────────────────────────────────────────────

        Commands::Isbn { raw } => {
            let items: Vec<_> = raw
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "raw": r,
                        "normalized": normalize(r),
                        "candidates": candidates(r),
                    })
                })
                .collect();
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"items":items},"meta":{"duration_ms":dur}}))?;
            } else {
                for r in &raw {
                    match normalize(r) {
                        Some(isbn) => {
                            let set = candidates(r);
                            println!("{r:?} → {isbn}  [{}]", set.as_strs().join(", "));
                        }
                        None => println!("{r:?} → (empty)"),
                    }
                }
            }
        }

        // ── Config ─────────────────────────────────────────────────────────

        Commands::Config { action } => {
            let dur = start.elapsed().as_millis();
            let kv = config.key_values();
            match action {
                ConfigAction::List => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":kv,"meta":{"duration_ms":dur}}))?;
                    } else {
                        for (k, v) in &kv {
                            println!("{k} = {v}");
                        }
                    }
                }
                ConfigAction::Get { key } => match kv.get(key.as_str()) {
                    Some(val) => {
                        if json_output {
                            print_json(&serde_json::json!({"status":"ok","data":{"key":key,"value":val},"meta":{"duration_ms":dur}}))?;
                        } else {
                            println!("{val}");
                        }
                    }
                    None => {
                        if json_output {
                            print_json(&serde_json::json!({"status":"error","error":"not_found","message":format!("Unknown config key: {key}"),"meta":{"duration_ms":dur}}))?;
                        } else {
                            eprintln!("Unknown config key: {key}");
                        }
                        std::process::exit(ExitCode::NotFound.code());
                    }
                },
                ConfigAction::Set { key, value } => {
                    // Start from the file, not from env overrides.
                    let path = AppConfig::config_path();
                    let mut stored = AppConfig::load_from(&path)?;
                    match stored.set(&key, &value) {
                        Ok(()) => {
                            stored.save_to(&path)?;
                            let dur = start.elapsed().as_millis();
                            if json_output {
                                print_json(&serde_json::json!({"status":"ok","data":{"key":key,"value":value,"path":path},"meta":{"duration_ms":dur}}))?;
                            } else {
                                println!("{key} = {value} ({})", path.display());
                            }
                        }
                        Err(CatalogError::UnknownConfigKey(_)) => {
                            if json_output {
                                print_json(&serde_json::json!({"status":"error","error":"not_found","message":format!("Unknown or read-only config key: {key}"),"meta":{"duration_ms":dur}}))?;
                            } else {
                                eprintln!("Unknown or read-only config key: {key}");
                            }
                            std::process::exit(ExitCode::NotFound.code());
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }

        // ── Stats ──────────────────────────────────────────────────────────

        Commands::Stats => {
            let db = open_db(&config)?;
            let stats = db.stats()?;
            let histogram = db.rating_histogram()?;
            let dur = start.elapsed().as_millis();

            if json_output {
                let by_value: serde_json::Map<String, serde_json::Value> = histogram
                    .iter()
                    .map(|(value, count)| (value.to_string(), serde_json::json!(count)))
                    .collect();
                print_json(&serde_json::json!({
                    "status":"ok",
                    "data":{"counts":stats,"ratings_by_value":by_value},
                    "meta":{"duration_ms":dur}
                }))?;
            } else {
                println!("Catalog statistics:");
                println!("  Authors:       {}", stats.authors);
                println!("  Publishers:    {}", stats.publishers);
                println!("  Books:         {} ({} unrated)", stats.books, stats.unrated_books);
                println!("  Users:         {}", stats.users);
                println!("  Ratings:       {}", stats.ratings);
                if stats.ratings > 0 {
                    println!("  By value:");
                    for (value, count) in &histogram {
                        println!("    {value:>2}  {count}");
                    }
                }
            }
        }

        // ── Doctor ─────────────────────────────────────────────────────────

        Commands::Doctor => {
            let config_path = AppConfig::config_path();
            if config_path.exists() {
                println!("✓ Config: {}", config_path.display());
            } else {
                println!("○ Config: not found (using defaults)");
            }

            let db_path = config.database_path();
            let mut issues = 0;
            if db_path.exists() {
                match Database::open(&db_path) {
                    Ok(db) => {
                        let count = db.count_books().unwrap_or(0);
                        let ratings = db.count_ratings().unwrap_or(0);
                        println!("✓ Database: {} ({count} books, {ratings} ratings)", db_path.display());
                    }
                    Err(e) => { issues += 1; println!("✗ Database: {e}"); }
                }
            } else {
                println!("○ Database: not created yet ({})", db_path.display());
            }

            for (label, path) in [("Books source", config.books_source()), ("Ratings source", config.ratings_source())] {
                if path.is_file() {
                    println!("✓ {label}: {}", path.display());
                } else {
                    issues += 1;
                    println!("✗ {label}: missing ({})", path.display());
                }
            }

            if issues == 0 { println!("\nAll checks passed ✓"); }
            else { println!("\n{issues} issues found"); std::process::exit(ExitCode::GeneralError.code()); }
        }

        // ── Version ────────────────────────────────────────────────────────

        Commands::Version => {
            let version = env!("CARGO_PKG_VERSION");
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"version":version},"meta":{"duration_ms":dur}}))?;
            } else {
                println!("bookratings v{version}");
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn open_db(config: &AppConfig) -> Result<Database> {
    let db_path = config.database_path();
    ensure_parent(&db_path)?;
    tracing::debug!("opening {}", db_path.display());
    Ok(Database::open(&db_path)?)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Missing or unreadable sources exit with 4, a failed import with 5.
fn exit_code_for(err: &SeedError) -> ExitCode {
    if err.is_precondition() { ExitCode::FileSystemError } else { ExitCode::ImportFailed }
}

fn fail(json_output: bool, err: &SeedError, start: Instant) -> ! {
    let code = exit_code_for(err);
    let kind = match code {
        ExitCode::FileSystemError => "source_unavailable",
        _ => "import_failed",
    };

    if json_output {
        let dur = start.elapsed().as_millis();
        let envelope = serde_json::json!({"status":"error","error":kind,"message":err.to_string(),"meta":{"duration_ms":dur}});
        if let Ok(text) = serde_json::to_string_pretty(&envelope) {
            println!("{text}");
        }
    } else {
        eprintln!("Error: {err}");
    }
    std::process::exit(code.code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_flags_parse() {
        let cli = Cli::try_parse_from(["bookratings", "seed", "--books", "b.csv", "--ratings", "r.csv", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Seed { books, ratings } => {
                assert_eq!(books, Some(PathBuf::from("b.csv")));
                assert_eq!(ratings, Some(PathBuf::from("r.csv")));
            }
            _ => panic!("expected seed"),
        }
    }

    #[test]
    fn test_config_set_parses_key_and_value() {
        let cli = Cli::try_parse_from(["bookratings", "config", "set", "ratings_file", "ratings.csv"]).unwrap();
        match cli.command {
            Commands::Config { action: ConfigAction::Set { key, value } } => {
                assert_eq!(key, "ratings_file");
                assert_eq!(value, "ratings.csv");
            }
            _ => panic!("expected config set"),
        }
    }

    #[test]
    fn test_isbn_requires_a_value() {
        assert!(Cli::try_parse_from(["bookratings", "isbn"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let missing = SeedError::MissingSource(PathBuf::from("Book2.xlsx"));
        assert_eq!(exit_code_for(&missing).code(), 4);

        let provisioning = SeedError::Provisioning("UNIQUE constraint failed".into());
        assert_eq!(exit_code_for(&provisioning).code(), 5);
    }
}
