//! SQLite schema definitions
//!
//! `SCHEMA` always describes the latest version; fresh databases apply it in
//! one step and older ones catch up through the versioned migrations.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- Task uploads (one screenshot per row)
-- =============================================================================
-- created_at is free text: RFC 3339 from the ingest endpoint, but imported
-- rows may carry other layouts. Readers must tolerate unparsable values.
CREATE TABLE IF NOT EXISTS task_uploads (
    id TEXT PRIMARY KEY,
    user_id TEXT,
    username TEXT NOT NULL CHECK(length(username) >= 1 AND length(username) <= 100),
    image_url TEXT NOT NULL,
    shift TEXT CHECK(shift IS NULL OR shift IN ('morning', 'evening', 'night')),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_task_uploads_created ON task_uploads(created_at);
CREATE INDEX IF NOT EXISTS idx_task_uploads_username ON task_uploads(username);
"#;

/// v2: username lookups for the report filter
pub const MIGRATION_V2: &str =
    "CREATE INDEX IF NOT EXISTS idx_task_uploads_username ON task_uploads(username)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn test_schema_version_is_positive() {
        assert!(SCHEMA_VERSION > 0);
    }

    #[test]
    fn test_schema_contains_required_tables() {
        for table in ["schema_version", "schema_migrations", "task_uploads"] {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table)),
                "Schema missing table: {}",
                table
            );
        }
    }

    #[test]
    fn test_schema_includes_latest_migration() {
        assert!(SCHEMA.contains(MIGRATION_V2));
    }
}
