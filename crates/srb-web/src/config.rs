//! Configuration loading for the SRB console.
//! Reads srb.toml from the current directory or the path in SRB_CONFIG.
//! A missing file means defaults; environment variables override the file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use srb_engine::{ApiSettings, ConsoleSettings};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// `Cookie` header forwarded to the data API.
    pub session_cookie: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), session_cookie: None, timeout_secs: None }
    }
}

fn default_base_url() -> String { "http://127.0.0.1:3000".to_string() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen_addr: default_listen_addr() }
    }
}

fn default_listen_addr() -> String { "127.0.0.1:3001".to_string() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// A country without observations gets `base_year + 1` as its first added year.
    #[serde(default = "default_base_year")]
    pub base_year: i32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { base_year: default_base_year() }
    }
}

fn default_base_year() -> i32 { 2020 }

impl ConsoleConfig {
    /// Load configuration from srb.toml (or SRB_CONFIG), then apply
    /// SRB_API_BASE_URL, SRB_SESSION_COOKIE and SRB_LISTEN_ADDR.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("SRB_CONFIG").unwrap_or_else(|_| "srb.toml".to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ConsoleConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SRB_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(cookie) = lookup("SRB_SESSION_COOKIE") {
            self.api.session_cookie = Some(cookie);
        }
        if let Some(addr) = lookup("SRB_LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api.base_url.clone(),
            session_cookie: self.api.session_cookie.clone(),
            timeout: self.api.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn console_settings(&self) -> ConsoleSettings {
        ConsoleSettings { base_year: self.data.base_year }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.data.base_year, 2020);
        assert!(config.api_settings().timeout.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ConsoleConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://data.internal:8080"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://data.internal:8080");
        assert_eq!(config.api_settings().timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.server.listen_addr, "127.0.0.1:3001");
        assert_eq!(config.console_settings().base_year, 2020);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsoleConfig::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_file_then_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("srb.toml");
        std::fs::write(&path, "[data]\nbase_year = 2010\n[server]\nlisten_addr = \"0.0.0.0:80\"\n").unwrap();

        let mut config = ConsoleConfig::from_file(&path).unwrap();
        let env: HashMap<&str, &str> = [("SRB_LISTEN_ADDR", "127.0.0.1:9000"), ("SRB_SESSION_COOKIE", "sid=1")]
            .into_iter()
            .collect();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.data.base_year, 2010);
        assert_eq!(config.server.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.api.session_cookie.as_deref(), Some("sid=1"));
    }
}
