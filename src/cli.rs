//! Command-line argument parsing for db-relay.
//!
//! Every flag also reads from the environment, so the service can be
//! configured entirely through variables on a hosting platform.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Chat bot that runs ad-hoc SQL against Postgres, MySQL and SQL Server.
#[derive(Parser, Debug)]
#[command(name = "db-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Bot API token
    #[arg(long, env = "TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Port for the liveness endpoint
    #[arg(short = 'p', long, env = "PORT", value_name = "PORT")]
    pub port: Option<u16>,

    /// Config file path
    #[arg(short = 'c', long, env = "DB_RELAY_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path, using the platform default if not given.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }
}
