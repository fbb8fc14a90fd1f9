// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "ShiftLens";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".shiftlens";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "shiftlens.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "SHIFTLENS_CONFIG";

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "SHIFTLENS_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

pub const ENV_HOST: &str = "SHIFTLENS_HOST";
pub const ENV_PORT: &str = "SHIFTLENS_PORT";

/// Comma-separated list of allowed browser origins
pub const ENV_CORS_ORIGINS: &str = "SHIFTLENS_CORS_ORIGINS";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "SHIFTLENS_LOG";

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "SHIFTLENS_DATA_DIR";

// =============================================================================
// Server Defaults
// =============================================================================

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Origins allowed when nothing is configured (local admin UI dev servers)
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];

/// Default log filter when neither SHIFTLENS_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info,shiftlens=info";

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Reports
// =============================================================================

/// Environment variable for the report time zone (IANA name)
pub const ENV_TIMEZONE: &str = "SHIFTLENS_TIMEZONE";

/// Zone used by the date list and date detail reports
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Rows per page when the request has no `limit`
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest accepted `limit`
pub const MAX_PAGE_LIMIT: u32 = 500;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "shiftlens.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -16000 = 16MB)
pub const SQLITE_CACHE_SIZE: &str = "-16000";

/// SQLite WAL auto-checkpoint threshold (pages)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
