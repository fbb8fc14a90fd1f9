use clap::{Parser, Subcommand};

use std::path::PathBuf;

use chrono_tz::Tz;

use super::constants::{
    ENV_CONFIG, ENV_CORS_ORIGINS, ENV_DEBUG, ENV_HOST, ENV_PORT, ENV_TIMEZONE,
};
use crate::utils::time::parse_timezone;

#[derive(Parser)]
#[command(name = "shiftlens")]
#[command(version, about = "Shift-based hourly upload reports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Time zone for date reports (IANA name, e.g. Asia/Kolkata)
    #[arg(long, global = true, env = ENV_TIMEZONE, value_parser = parse_timezone_arg)]
    pub timezone: Option<Tz>,

    /// Allowed CORS origins (comma-separated)
    #[arg(long, global = true, env = ENV_CORS_ORIGINS, value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,
}

/// Parse a report time zone from CLI/env string
fn parse_timezone_arg(s: &str) -> Result<Tz, String> {
    parse_timezone(s).ok_or_else(|| {
        format!(
            "Invalid time zone '{}'. Use an IANA name such as UTC or Asia/Kolkata",
            s
        )
    })
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub timezone: Option<Tz>,
    pub cors_origins: Option<Vec<String>>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            debug: cli.debug,
            config: cli.config,
            timezone: cli.timezone,
            cors_origins: cli.cors_origins,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}
