use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::drive::{DEFAULT_DRIVE_BASE_URL, SessionToken, now_unix};
use crate::resolver::{AmbiguityPolicy, ParentPolicy};
use crate::store::SortOrder;

const BASE_URL_ENV: &str = "DRIVEPATH_DRIVE_BASE_URL";
const ACCESS_TOKEN_ENV: &str = "DRIVEPATH_ACCESS_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub drive_base_url: String,
    /// Policy for a path segment that names several siblings.
    pub ambiguity: AmbiguityPolicy,
    /// Policy for objects with more than one parent.
    pub parents: ParentPolicy,
    pub show_docs: bool,
    pub sort: SortOrder,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            drive_base_url: DEFAULT_DRIVE_BASE_URL.to_string(),
            ambiguity: AmbiguityPolicy::default(),
            parents: ParentPolicy::default(),
            show_docs: false,
            sort: SortOrder::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cfg = Self::load_from(&config_dir()?.join("config.toml"))?;
        Ok(cfg.with_base_url(env::var(BASE_URL_ENV).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    fn with_base_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.drive_base_url = url;
        }
        self
    }
}

/// Bearer token from the environment, else from the session file left by
/// the login tool.
pub fn access_token() -> Result<String> {
    if let Ok(token) = env::var(ACCESS_TOKEN_ENV) {
        if !token.is_empty() {
            return Ok(token);
        }
    }
    token_from_session(&config_dir()?.join("session.json"), now_unix())
}

fn token_from_session(path: &Path, now: i64) -> Result<String> {
    let token = SessionToken::load(path)?.ok_or_else(|| {
        anyhow!(
            "not logged in: no session at {} and {} is unset",
            path.display(),
            ACCESS_TOKEN_ENV
        )
    })?;
    if token.is_expired(now) {
        return Err(anyhow!(
            "session at {} expired, log in again",
            path.display()
        ));
    }
    Ok(token.access_token)
}

/// Returns ~/.config/drivepath on all platforms.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("unable to locate home dir"))?;
    Ok(home.join(".config").join("drivepath"))
}
