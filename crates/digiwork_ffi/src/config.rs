//! Bridge-side configuration.
//!
//! # Responsibility
//! - Resolve where the directory database lives.
//!
//! # Invariants
//! - Resolution happens once per process; later env changes are ignored.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable overriding the directory database location.
pub const DB_PATH_ENV: &str = "DIGIWORK_DB_PATH";
/// Database file name used when no override is set.
pub const DEFAULT_DB_FILE_NAME: &str = "personas.db";

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Settings the bridge needs to serve UI calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
}

impl AppConfig {
    /// Builds config from an optional raw override value.
    ///
    /// Blank overrides fall back to `<temp_dir>/personas.db`.
    pub fn from_override(db_path: Option<&str>) -> Self {
        let db_path = db_path
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        Self { db_path }
    }

    fn from_env() -> Self {
        let raw = std::env::var(DB_PATH_ENV).ok();
        Self::from_override(raw.as_deref())
    }
}

/// Returns the process-wide config, resolving it on first use.
pub fn app_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::from_env)
}
