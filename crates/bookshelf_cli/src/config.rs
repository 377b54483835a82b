//! Runtime configuration for the terminal host.
//!
//! # Responsibility
//! - Parse flags and `BOOKSHELF_*` environment variables.
//! - Resolve defaults into absolute paths before anything is opened.

use bookshelf_core::default_log_level;
use clap::Parser;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "bookshelf";
const DB_FILE_NAME: &str = "bookshelf.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Command-line flags.
#[derive(Debug, Clone, Parser)]
#[command(name = "bookshelf", version, about = "Manage a personal bookshelf from the terminal")]
pub struct CliArgs {
    /// Directory holding the bookshelf database.
    #[arg(long, env = "BOOKSHELF_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for rolling log files. Defaults to `<data-dir>/logs`.
    #[arg(long, env = "BOOKSHELF_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "BOOKSHELF_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Keep books in memory only; nothing is read or written.
    #[arg(long)]
    pub memory_only: bool,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub memory_only: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    /// No data dir was given and the platform has no local data directory.
    NoDataDir,
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "no platform data directory found; pass --data-dir or set BOOKSHELF_DATA_DIR"
            ),
            Self::CurrentDir(err) => write!(f, "cannot resolve relative path: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoDataDir => None,
            Self::CurrentDir(err) => Some(err),
        }
    }
}

impl AppConfig {
    /// Resolves flags against platform defaults.
    pub fn resolve(args: CliArgs) -> Result<Self, ConfigError> {
        let data_dir = match args.data_dir {
            Some(dir) => absolutize(dir)?,
            None => dirs::data_local_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(ConfigError::NoDataDir)?,
        };
        let log_dir = match args.log_dir {
            Some(dir) => absolutize(dir)?,
            None => data_dir.join(LOG_DIR_NAME),
        };

        Ok(Self {
            db_path: data_dir.join(DB_FILE_NAME),
            data_dir,
            log_dir,
            log_level: args
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            memory_only: args.memory_only,
        })
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}
