//! Graceful shutdown
//!
//! One watch channel carries the stop signal to the HTTP server and the WAL
//! checkpoint task. Stopping waits for that task, then runs a last checkpoint
//! and closes the database.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use super::constants::SHUTDOWN_TIMEOUT_SECS;
use crate::data::SqliteService;

#[derive(Clone)]
pub struct ShutdownService {
    signal: Arc<watch::Sender<bool>>,
    database: Arc<SqliteService>,
    checkpointer: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ShutdownService {
    pub fn new(database: Arc<SqliteService>) -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal: Arc::new(signal),
            database,
            checkpointer: Arc::new(Mutex::new(None)),
        }
    }

    /// Start periodic WAL checkpoints that stop with the shutdown signal
    pub async fn start_checkpointing(&self) {
        let handle = self
            .database
            .start_checkpoint_task(self.signal.subscribe());
        if let Some(previous) = self.checkpointer.lock().await.replace(handle) {
            previous.abort();
        }
    }

    pub fn trigger(&self) {
        self.signal.send_replace(true);
    }

    /// Owned future resolving once shutdown is triggered, for axum's graceful shutdown
    pub fn wait(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.signal.subscribe();
        async move {
            let _ = rx.wait_for(|&stopped| stopped).await;
        }
    }

    /// Trigger, wait for the checkpoint task, then checkpoint and close SQLite
    pub async fn shutdown(&self) {
        tracing::debug!("Initiating graceful shutdown");
        self.trigger();

        if let Some(handle) = self.checkpointer.lock().await.take() {
            let timeout = Duration::from_secs(SHUTDOWN_TIMEOUT_SECS);
            match tokio::time::timeout(timeout, handle).await {
                Ok(Ok(())) => tracing::debug!("Checkpoint task stopped"),
                Ok(Err(e)) => tracing::warn!(error = %e, "Checkpoint task failed"),
                Err(_) => tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    "Timeout waiting for checkpoint task"
                ),
            }
        }

        if let Err(e) = self.database.checkpoint().await {
            tracing::warn!("SQLite checkpoint failed: {}", e);
        }
        self.database.close().await;
        tracing::debug!("Shutdown complete");
    }

    /// Trigger shutdown on Ctrl+C or SIGTERM
    pub fn install_signal_handlers(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            let signal = wait_for_signal().await;
            tracing::info!(signal, "Shutting down");
            service.trigger();
        });
    }
}

async fn wait_for_signal() -> &'static str {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
