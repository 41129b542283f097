//! Command-line interface and runtime configuration
//!
//! Flags take precedence, then environment variables, then defaults. The
//! upstream API credential is environment-only so it never lands in shell
//! history or process listings.

use std::env;
use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use thiserror::Error;
use tracing::warn;

/// Default listen port when neither --port nor PORT is given
const DEFAULT_PORT: u16 = 5000;

/// Environment variable holding the upstream API credential
const API_KEY_VAR: &str = "SPOONACULAR_API_KEY";

/// Error types for configuration resolution
#[derive(Debug, Error)]
pub enum ConfigError {
    /// PORT held something that is not a port number
    #[error("Invalid PORT value: '{0}'")]
    InvalidPort(String),

    /// No platform data directory and no --data-dir override
    #[error("No data directory could be determined; pass --data-dir")]
    NoDataDir,
}

/// Cookstash - recipe box server with meal planning and cached search
#[derive(Parser, Debug)]
#[command(name = "cookstash")]
#[command(about = "Recipe box server with cached Spoonacular search")]
#[command(version)]
pub struct Cli {
    /// Port to listen on (falls back to the PORT env var, then 5000)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Directory holding recipes.json (defaults to the platform data dir)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// JSON file of starter recipes loaded when the store is empty
    #[arg(long, value_name = "FILE")]
    pub seed_file: Option<PathBuf>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the server listens on
    pub port: u16,
    /// Path of the recipe store file
    pub data_file: PathBuf,
    /// Optional starter-recipe file
    pub seed_file: Option<PathBuf>,
    /// Upstream API credential; `None` degrades the proxy routes only
    pub api_key: Option<String>,
}

impl Config {
    /// Resolves configuration from parsed CLI arguments and the environment
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let port = resolve_port(cli.port, env::var("PORT").ok())?;

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(default_data_dir)
            .ok_or(ConfigError::NoDataDir)?;

        let api_key = env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!("{API_KEY_VAR} is not set; upstream proxy routes will return errors");
        }

        Ok(Self {
            port,
            data_file: data_dir.join("recipes.json"),
            seed_file: cli.seed_file.clone(),
            api_key,
        })
    }
}

/// Picks the listen port: flag, then environment, then default
fn resolve_port(flag: Option<u16>, env_value: Option<String>) -> Result<u16, ConfigError> {
    if let Some(port) = flag {
        return Ok(port);
    }
    match env_value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(raw)),
        None => Ok(DEFAULT_PORT),
    }
}

/// Platform data directory for the store file
fn default_data_dir() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "cookstash")?;
    Some(project_dirs.data_dir().to_path_buf())
}
