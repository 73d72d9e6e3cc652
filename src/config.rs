//! Configuration loading and management
//!
//! Handles parsing of `cardfile.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::session;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "cardfile.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listen address for the web server (ip:port)
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Card file configuration
    #[serde(default)]
    pub db: DbConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Board configuration
    #[serde(default)]
    pub board: BoardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            db: DbConfig::default(),
            session: SessionConfig::default(),
            board: BoardConfig::default(),
        }
    }
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_string()
}

/// Card file location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Path to the CSV card file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("db/todoList.csv")
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Session-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the session id cookie
    #[serde(default = "default_cookie")]
    pub cookie: String,

    /// Session lifetime (e.g. "12h", "30m")
    #[serde(default = "default_ttl")]
    pub ttl: String,
}

fn default_cookie() -> String {
    "cardfile_sid".to_string()
}

fn default_ttl() -> String {
    "12h".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie: default_cookie(),
            ttl: default_ttl(),
        }
    }
}

/// Board layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Page title
    #[serde(default = "default_title")]
    pub title: String,

    /// Status columns, in display order
    #[serde(default = "default_statuses")]
    pub statuses: Vec<String>,

    /// Status given to new cards when none is supplied
    #[serde(default = "default_status")]
    pub default_status: String,
}

fn default_title() -> String {
    "cardfile".to_string()
}

fn default_statuses() -> Vec<String> {
    vec!["todo".to_string(), "doing".to_string(), "done".to_string()]
}

fn default_status() -> String {
    "todo".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            statuses: default_statuses(),
            default_status: default_status(),
        }
    }
}

impl Config {
    /// Load configuration from a `cardfile.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults when the
    /// file is absent. A present-but-broken file is an error: the server
    /// must not silently fall back to defaults.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(Error::InvalidConfig(format!(
                "addr '{}' is not an ip:port address",
                self.addr
            )));
        }

        if self.db.path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("db.path cannot be empty".to_string()));
        }

        self.session.validate()?;
        self.board.validate()?;
        Ok(())
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<()> {
        let cookie = self.cookie.trim();
        if cookie.is_empty() {
            return Err(Error::InvalidConfig(
                "session.cookie cannot be empty".to_string(),
            ));
        }
        if !cookie
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
        {
            return Err(Error::InvalidConfig(format!(
                "session.cookie '{cookie}' must be alphanumeric plus '_' or '-'"
            )));
        }

        let ttl = session::parse_ttl(&self.ttl)
            .map_err(|err| Error::InvalidConfig(format!("session.ttl: {err}")))?;
        if ttl <= chrono::Duration::zero() {
            return Err(Error::InvalidConfig(
                "session.ttl must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl BoardConfig {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "board.title cannot be empty".to_string(),
            ));
        }

        if self.statuses.is_empty() {
            return Err(Error::InvalidConfig(
                "board.statuses cannot be empty".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for status in &self.statuses {
            let trimmed = status.trim();
            if trimmed.is_empty() {
                return Err(Error::InvalidConfig(
                    "board.statuses cannot include empty entries".to_string(),
                ));
            }
            if trimmed != status {
                return Err(Error::InvalidConfig(format!(
                    "board.statuses entry '{status}' has surrounding whitespace"
                )));
            }
            if !seen.insert(trimmed.to_string()) {
                return Err(Error::InvalidConfig(format!(
                    "board.statuses has duplicate entry '{trimmed}'"
                )));
            }
        }

        if !seen.contains(self.default_status.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "board.default_status '{}' not in board.statuses",
                self.default_status
            )));
        }

        Ok(())
    }
}
