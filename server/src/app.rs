//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::{SqliteService, UploadRepository};
use crate::domain::reports::ReportService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub uploads: Arc<dyn UploadRepository>,
    pub reports: Arc<ReportService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let (cli_config, command) = cli::parse();

        match command.unwrap_or(Commands::Start) {
            Commands::Start => {
                // File config can turn on debug, so logging waits for it
                let config = AppConfig::load(&cli_config)?;
                Self::init_logging(config.debug);
                tracing::debug!(
                    host = %config.server.host,
                    port = config.server.port,
                    debug = config.debug,
                    "Configuration loaded"
                );

                let app = Self::init(config).await?;
                Self::start_server(app).await
            }
        }
    }

    async fn init(config: AppConfig) -> Result<Self> {
        let storage = AppStorage::init(&config).await?;

        let database = Arc::new(
            SqliteService::init(&storage)
                .await
                .context("Failed to open upload database")?,
        );
        let uploads: Arc<dyn UploadRepository> = Arc::new(database.clone());
        let reports = Arc::new(ReportService::new(
            uploads.clone(),
            config.reports.timezone,
        ));
        let shutdown = ShutdownService::new(database);

        Ok(Self {
            shutdown,
            config,
            storage,
            uploads,
            reports,
        })
    }

    fn init_logging(debug: bool) {
        let filter = log_filter(
            debug,
            std::env::var(ENV_LOG).ok(),
            std::env::var("RUST_LOG").ok(),
        );

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Signal handlers go in before anything that can block
        app.shutdown.install_signal_handlers();

        app.shutdown.start_checkpointing().await;

        tracing::info!(
            data_dir = %app.storage.data_dir().display(),
            timezone = %app.reports.timezone(),
            "ShiftLens starting"
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}

/// Pick the log filter: explicit env filters win, then the debug flag
fn log_filter(debug: bool, env_log: Option<String>, rust_log: Option<String>) -> String {
    env_log.or(rust_log).unwrap_or_else(|| {
        if debug {
            "debug".to_string()
        } else {
            DEFAULT_LOG_FILTER.to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_follows_debug() {
        assert_eq!(log_filter(true, None, None), "debug");
        assert_eq!(log_filter(false, None, None), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_log_filter_env_wins() {
        assert_eq!(
            log_filter(true, Some("warn".into()), Some("trace".into())),
            "warn"
        );
        assert_eq!(log_filter(true, None, Some("trace".into())), "trace");
    }
}
