use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::summary::{DEFAULT_API_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};

/// Environment variable holding the admin secret
pub const ADMIN_SECRET_ENV: &str = "SEMINAR_QA_ADMIN_SECRET";
/// Environment variable holding the default summary API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_PORT: u16 = 8501;

/// File-backed settings. Secrets stay in the environment and are never written here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeminarConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl SeminarConfig {
    /// Config written by `init`, with every default spelled out
    pub fn with_defaults() -> Self {
        Self {
            database: Some(default_database_path().display().to_string()),
            port: Some(DEFAULT_PORT),
            model: Some(DEFAULT_MODEL.to_string()),
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT.as_secs()),
        }
    }

    /// `explicit` (from the command line) wins over the config file
    pub fn database_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_database_path)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("seminar-qa.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("seminar_questions.db")
}

/// Admin secret from the environment, if set
pub fn admin_secret_from_env() -> Option<String> {
    std::env::var(ADMIN_SECRET_ENV).ok()
}

/// Summary API key from the environment, if set and non-empty
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SeminarConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read seminar config {}", path.display()))?;
    let config: SeminarConfig = toml::from_str(&contents)
        .with_context(|| format!("invalid seminar config {}", path.display()))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &SeminarConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "seminar config already exists at {} (run `seminar-qa init --force` to replace it)",
            path.display()
        );
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write seminar config {}", path.display()))?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }
    }
    Ok(())
}
