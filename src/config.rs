//! Configuration
//!
//! Command line flags with environment fallbacks. A `.env` file in the
//! working directory is loaded first when present.

use std::path::PathBuf;

use clap::Args;

use crate::{
    catalog::{Catalog, CatalogError},
    session::SessionOptions,
    storage::FileStore,
};

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Where session snapshots are kept.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding the cart and wishlist snapshots
    #[arg(long, env = "TULSI_DATA_DIR", default_value = ".tulsi", global = true)]
    pub data_dir: PathBuf,

    /// Refuse to start from a corrupt snapshot instead of discarding it
    #[arg(long, env = "TULSI_STRICT", global = true)]
    pub strict: bool,
}

/// Which catalog fixture to browse.
#[derive(Debug, Clone, Args)]
pub struct CatalogConfig {
    /// Directory containing `catalog/<name>.yml`
    #[arg(long, env = "TULSI_CATALOG_DIR", default_value = "fixtures", global = true)]
    pub catalog_dir: PathBuf,

    /// Catalog fixture name
    #[arg(long, env = "TULSI_CATALOG", default_value = "eyewear", global = true)]
    pub catalog: String,
}

/// Storefront configuration shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Snapshot storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Catalog settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load `.env` into the process environment if present.
    ///
    /// Call before parsing so `env` fallbacks can see its values.
    pub fn load_dotenv() {
        // Ignore a missing or unreadable file
        _ = dotenvy::dotenv();
    }

    /// Session options derived from these settings, using the default keys.
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            strict: self.storage.strict,
            ..SessionOptions::default()
        }
    }

    /// The snapshot backend for these settings.
    #[must_use]
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.storage.data_dir)
    }

    /// Load the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the fixture cannot be loaded.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::load(&self.catalog.catalog_dir, &self.catalog.catalog)
    }
}
