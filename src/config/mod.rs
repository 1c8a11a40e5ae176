use crate::global;
use crate::workflow::WorkflowCredentials;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variables that override values from the config file.
pub mod env_keys {
    pub const WORKFLOW_URL: &str = "CAPSUM_WORKFLOW_URL";
    pub const WORKFLOW_ID: &str = "CAPSUM_WORKFLOW_ID";
    pub const WORKFLOW_TOKEN: &str = "CAPSUM_WORKFLOW_TOKEN";
    pub const HOST: &str = "CAPSUM_HOST";
    pub const PORT: &str = "CAPSUM_PORT";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub workflow: WorkflowConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Endpoint the workflow run request is POSTed to
    pub api_base_url: String,
    /// Numeric workflow id, kept as text so an unset value is just empty
    pub workflow_id: String,
    pub token: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Path to the yt-dlp executable; looked up on PATH when unset
    pub command_path: Option<String>,
    pub subtitles_dir: Option<PathBuf>,
    pub cookies_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.coze.cn/v1".to_string(),
            workflow_id: String::new(),
            token: String::new(),
            timeout_seconds: 200,
        }
    }
}

impl WorkflowConfig {
    pub fn is_configured(&self) -> bool {
        WorkflowCredentials::from_config(self).is_complete()
    }
}

impl RetrievalConfig {
    pub fn subtitles_dir(&self) -> Result<PathBuf> {
        match &self.subtitles_dir {
            Some(dir) => Ok(dir.clone()),
            None => global::subtitles_dir(),
        }
    }

    pub fn cookies_dir(&self) -> Result<PathBuf> {
        match &self.cookies_dir {
            Some(dir) => Ok(dir.clone()),
            None => global::cookies_dir(),
        }
    }
}

impl Config {
    /// Load the config file (creating it on first run) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Apply overrides from a key lookup, normally the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_empty(env_keys::WORKFLOW_URL) {
            self.workflow.api_base_url = url;
        }
        if let Some(id) = non_empty(env_keys::WORKFLOW_ID) {
            self.workflow.workflow_id = id;
        }
        if let Some(token) = non_empty(env_keys::WORKFLOW_TOKEN) {
            self.workflow.token = token;
        }
        if let Some(host) = non_empty(env_keys::HOST) {
            self.server.host = host;
        }
        if let Some(port) = non_empty(env_keys::PORT) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid {}: {}", env_keys::PORT, port),
            }
        }
    }

    pub fn is_workflow_configured(&self) -> bool {
        self.workflow.is_configured()
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Create the subtitles and cookies directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.retrieval.subtitles_dir()?, self.retrieval.cookies_dir()?] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.workflow.timeout_seconds, 200);
        assert!(!config.is_workflow_configured());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[workflow]\nworkflow_id = \"7412\"\ntoken = \"pat_x\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert!(config.is_workflow_configured());
        assert_eq!(config.workflow.api_base_url, "https://api.coze.cn/v1");
        assert_eq!(config.workflow.timeout_seconds, 200);
        assert_eq!(config.server.port, 5001);
    }

    #[test]
    fn test_save_round_trips_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.workflow.workflow_id = "99".to_string();
        config.retrieval.subtitles_dir = Some(PathBuf::from("/srv/subs"));

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.workflow.workflow_id, "99");
        assert_eq!(loaded.retrieval.subtitles_dir, Some(PathBuf::from("/srv/subs")));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (env_keys::WORKFLOW_URL, "http://localhost:9000/run"),
            (env_keys::WORKFLOW_ID, "123"),
            (env_keys::WORKFLOW_TOKEN, "secret"),
            (env_keys::PORT, "8080"),
            (env_keys::HOST, "   "),
        ]);
        let mut config = Config::default();

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.workflow.api_base_url, "http://localhost:9000/run");
        assert_eq!(config.workflow.workflow_id, "123");
        assert_eq!(config.workflow.token, "secret");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == env_keys::PORT).then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 5001);
    }

    #[test]
    fn test_workflow_requires_id_and_token() {
        let mut workflow = WorkflowConfig {
            workflow_id: "1".to_string(),
            ..Default::default()
        };
        assert!(!workflow.is_configured());
        workflow.token = "t".to_string();
        assert!(workflow.is_configured());
    }

    #[test]
    fn test_readiness_matches_workflow_credentials() {
        let cases = [("1", "t"), ("1", "  "), ("  ", "t"), ("", "")];
        for (id, token) in cases {
            let workflow = WorkflowConfig {
                workflow_id: id.to_string(),
                token: token.to_string(),
                ..Default::default()
            };
            assert_eq!(
                workflow.is_configured(),
                WorkflowCredentials::from_config(&workflow).is_complete(),
                "id {:?}, token {:?}",
                id,
                token
            );
        }
    }
}
