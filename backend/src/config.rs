//! # Application Configuration
//!
//! Configuration is read from a YAML file and then patched with environment
//! variables, so a container can run with no file at all.
//!
//! ## YAML Format
//!
//! ```yaml
//! bind_address: "0.0.0.0:3000"
//! database_url: "sqlite:littlesteps.db"
//! max_connections: 5
//! cors_origins:
//!   - "http://localhost:8081"
//! log_level: "info"
//! utc_offset_minutes: -300
//! seed_catalog: true
//! users:
//!   - email: "parent@example.com"
//!     name: "Parent"
//!     token: "change-me"
//! ```
//!
//! ## Environment Overrides
//!
//! - `LITTLESTEPS_CONFIG` - path of the YAML file (default `littlesteps.yaml`)
//! - `LITTLESTEPS_BIND`
//! - `LITTLESTEPS_DATABASE_URL`
//! - `LITTLESTEPS_LOG_LEVEL`
//! - `LITTLESTEPS_UTC_OFFSET_MINUTES`

use anyhow::{anyhow, Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "LITTLESTEPS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "littlesteps.yaml";
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Account provisioned at startup. Session issuance lives outside this
/// service, so API tokens are handed out through configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapUser {
    pub email: String,
    pub name: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: String,
    pub database_url: String,
    pub max_connections: u32,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    /// Offset of the families' local time from UTC. Day boundaries for the
    /// daily summary and "today" for age calculations use this offset.
    pub utc_offset_minutes: i32,
    /// Seed the milestone/tip/article catalog into an empty database
    pub seed_catalog: bool,
    pub users: Vec<BootstrapUser>,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            database_url: "sqlite:littlesteps.db".to_string(),
            max_connections: 5,
            cors_origins: vec!["http://localhost:8081".to_string()],
            log_level: "info".to_string(),
            utc_offset_minutes: 0,
            seed_catalog: true,
            users: Vec::new(),
            source: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(&vars)
    }

    /// Load configuration using an explicit variable map
    pub fn load_from(vars: &HashMap<String, String>) -> Result<Self> {
        let mut config = match vars.get(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(path))?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(vars)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let mut config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    fn apply_overrides(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(bind) = vars.get("LITTLESTEPS_BIND") {
            self.bind_address = bind.clone();
        }
        if let Some(url) = vars.get("LITTLESTEPS_DATABASE_URL") {
            self.database_url = url.clone();
        }
        if let Some(level) = vars.get("LITTLESTEPS_LOG_LEVEL") {
            self.log_level = level.clone();
        }
        if let Some(offset) = vars.get("LITTLESTEPS_UTC_OFFSET_MINUTES") {
            self.utc_offset_minutes = offset
                .trim()
                .parse()
                .with_context(|| format!("Invalid LITTLESTEPS_UTC_OFFSET_MINUTES: {}", offset))?;
        }
        Ok(())
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.max_connections == 0 {
            return Err(anyhow!("max_connections must be at least 1"));
        }

        if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(anyhow!(
                "utc_offset_minutes must be between -{0} and {0}",
                MAX_UTC_OFFSET_MINUTES
            ));
        }

        for user in &self.users {
            if user.email.trim().is_empty() || user.token.trim().is_empty() {
                return Err(anyhow!("Bootstrap users need a non-empty email and token"));
            }
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_address))
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid UTC offset: {} minutes", self.utc_offset_minutes))
    }
}
