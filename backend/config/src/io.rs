//! Config file location and loading.

use crate::env::resolve_env_vars;
use crate::schema::AssistConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config directory.
/// Priority: `VIZASSIST_CONFIG_DIR` env > `~/.vizassist/` > `./.vizassist/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VIZASSIST_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".vizassist"),
        None => PathBuf::from(".vizassist"),
    }
}

pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read, substitute `${VAR}` references, and parse the config.
///
/// Returns `Ok(Default::default())` if the file doesn't exist.
pub async fn load_config(path: &Path) -> Result<AssistConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(AssistConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML text, resolving env references before typing it.
pub fn parse_config(raw: &str) -> Result<AssistConfig> {
    if raw.trim().is_empty() {
        return Ok(AssistConfig::default());
    }
    let value: serde_yaml::Value = serde_yaml::from_str(raw)?;
    let value = resolve_env_vars(&value)?;
    Ok(serde_yaml::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&config_file_path(dir.path())).await.unwrap();
        assert_eq!(cfg, AssistConfig::default());
    }

    #[tokio::test]
    async fn loads_yaml_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "service:\n  timeoutSecs: 7\nspeech:\n  enabled: false\n").unwrap();

        let cfg = load_config(&path).await.unwrap();
        assert_eq!(cfg.service.timeout_secs, Some(7));
        assert!(!cfg.speech.enabled());
    }

    #[tokio::test]
    async fn invalid_yaml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "service: [unclosed").unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("config.yaml"));
    }

    #[test]
    fn blank_file_is_default() {
        assert_eq!(parse_config("\n").unwrap(), AssistConfig::default());
    }
}
