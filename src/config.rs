//! Layered configuration read from `.prime/prime.toml`.
//!
//! Values resolve file → environment → CLI. Missing sections fall back to
//! defaults, so an empty or absent file is valid.
//!
//! # Configuration File Format
//!
//! ```toml
//! [store]
//! db_path = ".prime/prime.db"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3141
//!
//! [mirror]
//! max_attempts = 100
//!
//! [selection]
//! max_selected = 10
//! ```
//!
//! Environment overrides: `PRIME_DB_PATH`, `PRIME_HOST`, `PRIME_PORT`,
//! `PRIME_MAX_ATTEMPTS`. A `.env` file in the working directory is loaded
//! first.

use anyhow::{Context, Result};
use prime_common::mirror::DEFAULT_MAX_ATTEMPTS;
use prime_common::selection::DEFAULT_MAX_SELECTED;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the config file and the database.
pub const PRIME_DIR: &str = ".prime";
pub const CONFIG_FILE: &str = "prime.toml";

pub fn get_prime_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(PRIME_DIR)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSection {
    /// Relative paths resolve against the project directory.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from(PRIME_DIR).join("prime.db")
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3141
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorSection {
    /// Retry budget for mirror-number generation
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for MirrorSection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSection {
    /// Most numbers that fit on one promo sheet
    #[serde(default = "default_max_selected")]
    pub max_selected: usize,
}

fn default_max_selected() -> usize {
    DEFAULT_MAX_SELECTED
}

impl Default for SelectionSection {
    fn default() -> Self {
        Self {
            max_selected: default_max_selected(),
        }
    }
}

/// Contents of `prime.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimeToml {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub mirror: MirrorSection,
    #[serde(default)]
    pub selection: SelectionSection,
}

impl PrimeToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse prime.toml")
    }

    /// Load `prime.toml` from `prime_dir`, or defaults if it doesn't exist.
    pub fn load_or_default(prime_dir: &Path) -> Result<Self> {
        let config_path = prime_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize prime.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply `PRIME_*` overrides. Unparsable values are skipped and reported.
    pub fn apply_env<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        if let Some(path) = lookup("PRIME_DB_PATH").filter(|p| !p.trim().is_empty()) {
            self.store.db_path = PathBuf::from(path);
        }
        if let Some(host) = lookup("PRIME_HOST").filter(|h| !h.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("PRIME_PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warnings.push(format!("Ignoring PRIME_PORT='{}': not a port number", port)),
            }
        }
        if let Some(attempts) = lookup("PRIME_MAX_ATTEMPTS") {
            match attempts.trim().parse() {
                Ok(attempts) => self.mirror.max_attempts = attempts,
                Err(_) => warnings.push(format!(
                    "Ignoring PRIME_MAX_ATTEMPTS='{}': not a non-negative integer",
                    attempts
                )),
            }
        }

        warnings
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.mirror.max_attempts == 0 {
            warnings.push(
                "mirror.max_attempts is 0: every mirror generation will report exhaustion"
                    .to_string(),
            );
        }
        if self.selection.max_selected == 0 {
            warnings.push(
                "selection.max_selected is 0: every non-empty promo request will be rejected"
                    .to_string(),
            );
        }
        if self.store.db_path.as_os_str().is_empty() {
            warnings.push("store.db_path is empty".to_string());
        }

        warnings
    }
}

/// Resolved configuration for one project directory.
#[derive(Debug, Clone)]
pub struct PrimeConfig {
    pub project_dir: PathBuf,
    pub prime_dir: PathBuf,
    pub toml: PrimeToml,
    /// Overrides from the environment that could not be applied
    pub env_warnings: Vec<String>,
}

impl PrimeConfig {
    /// Load `.prime/prime.toml` under `project_dir` and apply environment
    /// overrides from the process environment.
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::with_env(project_dir, |key| std::env::var(key).ok())
    }

    pub fn with_env<F>(project_dir: PathBuf, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prime_dir = get_prime_dir(&project_dir);
        let mut toml = PrimeToml::load_or_default(&prime_dir)?;
        let env_warnings = toml.apply_env(lookup);

        Ok(Self {
            project_dir,
            prime_dir,
            toml,
            env_warnings,
        })
    }

    pub fn config_path(&self) -> PathBuf {
        self.prime_dir.join(CONFIG_FILE)
    }

    /// Database path, resolved against the project directory.
    pub fn db_path(&self) -> PathBuf {
        let path = &self.toml.store.db_path;
        if path.is_absolute() {
            path.clone()
        } else {
            self.project_dir.join(path)
        }
    }

    pub fn host(&self) -> &str {
        &self.toml.server.host
    }

    pub fn port(&self) -> u16 {
        self.toml.server.port
    }

    pub fn max_attempts(&self) -> u32 {
        self.toml.mirror.max_attempts
    }

    pub fn max_selected(&self) -> usize {
        self.toml.selection.max_selected
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.env_warnings.clone();
        warnings.extend(self.toml.validate());
        warnings
    }
}
