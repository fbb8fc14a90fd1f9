use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::utils::time::parse_timezone;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_CORS_ORIGINS, DEFAULT_HOST, DEFAULT_PAGE_LIMIT,
    DEFAULT_PORT, DEFAULT_TIMEZONE, MAX_PAGE_LIMIT,
};
use super::storage::expand_home;

// =============================================================================
// File Config (JSON)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_origins: Option<Vec<String>>,
}

/// Reports configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReportsFileConfig {
    pub timezone: Option<String>,
    pub default_limit: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub reports: Option<ReportsFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown top-level fields (likely typos)
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                current.host = server.host;
            }
            if server.port.is_some() {
                current.port = server.port;
            }
            if server.cors_origins.is_some() {
                current.cors_origins = server.cors_origins;
            }
        }

        if let Some(reports) = other.reports {
            let current = self.reports.get_or_insert_with(ReportsFileConfig::default);
            if reports.timezone.is_some() {
                current.timezone = reports.timezone;
            }
            if reports.default_limit.is_some() {
                current.default_limit = reports.default_limit;
            }
        }

        if other.debug.is_some() {
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

/// Report engine configuration
#[derive(Debug, Clone)]
pub struct ReportsConfig {
    /// Zone for date list and date detail reports
    pub timezone: Tz,
    /// `limit` used when a request leaves it out
    pub default_limit: u32,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub reports: ReportsConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.shiftlens/shiftlens.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_home(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::resolve(cli, file_config)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer CLI/env values over merged file values and defaults
    fn resolve(cli: &CliConfig, file_config: FileConfig) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_reports = file_config.reports.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let cors_origins = cli
            .cors_origins
            .clone()
            .or(file_server.cors_origins)
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect());

        let timezone = match cli.timezone {
            Some(tz) => tz,
            None => {
                let name = file_reports
                    .timezone
                    .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
                parse_timezone(&name).with_context(|| {
                    format!("Configuration error: reports.timezone '{}' is not a known IANA zone", name)
                })?
            }
        };

        let default_limit = file_reports.default_limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        // debug: CLI/env flag takes precedence, then file config, default false
        let debug = cli.debug || file_config.debug.unwrap_or(false);

        Ok(Self {
            server: ServerConfig {
                host,
                port,
                cors_origins,
            },
            reports: ReportsConfig {
                timezone,
                default_limit,
            },
            debug,
        })
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind a random port
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if !(1..=MAX_PAGE_LIMIT).contains(&self.reports.default_limit) {
            anyhow::bail!(
                "Configuration error: reports.default_limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            );
        }

        if let Some(origin) = self
            .server
            .cors_origins
            .iter()
            .find(|o| !o.starts_with("http://") && !o.starts_with("https://"))
        {
            anyhow::bail!(
                "Configuration error: CORS origin '{}' must start with http:// or https://",
                origin
            );
        }

        if is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Server is listening on all interfaces and reports are unauthenticated"
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.shiftlens/shiftlens.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> FileConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_file_config_parse_full() {
        let config = parse(
            r#"{
                "server": { "host": "0.0.0.0", "port": 8080, "cors_origins": ["https://admin.test"] },
                "reports": { "timezone": "Asia/Kolkata", "default_limit": 50 },
                "debug": true
            }"#,
        );

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(8080));
        assert_eq!(
            server.cors_origins,
            Some(vec!["https://admin.test".to_string()])
        );
        let reports = config.reports.as_ref().unwrap();
        assert_eq!(reports.timezone.as_deref(), Some("Asia/Kolkata"));
        assert_eq!(reports.default_limit, Some(50));
        assert_eq!(config.debug, Some(true));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config = parse("{}");
        assert!(config.server.is_none());
        assert!(config.reports.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let config = parse(r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#);
        assert_eq!(
            config.server.as_ref().unwrap().host.as_deref(),
            Some("localhost")
        );
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = parse(
            r#"{ "server": { "host": "127.0.0.1", "port": 5000 }, "reports": { "timezone": "UTC" } }"#,
        );
        base.merge(parse(
            r#"{ "server": { "port": 6000 }, "reports": { "default_limit": 10 } }"#,
        ));

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(server.port, Some(6000));
        let reports = base.reports.as_ref().unwrap();
        assert_eq!(reports.timezone.as_deref(), Some("UTC"));
        assert_eq!(reports.default_limit, Some(10));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(&CliConfig::default(), FileConfig::default()).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.cors_origins.len(), DEFAULT_CORS_ORIGINS.len());
        assert_eq!(config.reports.timezone, chrono_tz::UTC);
        assert_eq!(config.reports.default_limit, DEFAULT_PAGE_LIMIT);
        assert!(!config.debug);
        config.validate().unwrap();
    }

    #[test]
    fn test_resolve_cli_overrides_file() {
        let cli = CliConfig {
            port: Some(9000),
            timezone: Some(chrono_tz::America::New_York),
            ..Default::default()
        };
        let file = parse(
            r#"{ "server": { "host": "0.0.0.0", "port": 7000 }, "reports": { "timezone": "Asia/Kolkata" } }"#,
        );
        let config = AppConfig::resolve(&cli, file).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.reports.timezone, chrono_tz::America::New_York);
    }

    #[test]
    fn test_resolve_debug_from_file() {
        let config = AppConfig::resolve(&CliConfig::default(), parse(r#"{ "debug": true }"#))
            .unwrap();
        assert!(config.debug);

        let cli = CliConfig {
            debug: true,
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli, FileConfig::default()).unwrap().debug);
    }

    #[test]
    fn test_resolve_invalid_timezone_fails() {
        let file = parse(r#"{ "reports": { "timezone": "Atlantis/Capital" } }"#);
        let err = AppConfig::resolve(&CliConfig::default(), file).unwrap_err();
        assert!(err.to_string().contains("Atlantis/Capital"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::resolve(&CliConfig::default(), FileConfig::default()).unwrap();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::resolve(&CliConfig::default(), FileConfig::default()).unwrap();
        config.reports.default_limit = MAX_PAGE_LIMIT + 1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::resolve(&CliConfig::default(), FileConfig::default()).unwrap();
        config.server.cors_origins = vec!["admin.test".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "server": { "port": 5123 } }"#).unwrap();

        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.port, 5123);
    }

    #[test]
    fn test_load_missing_config_path_fails() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/shiftlens.json")),
            ..Default::default()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
    }
}
