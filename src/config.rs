use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Cleaner
    pub tool_command: String,
    pub unknown_members: String,
    pub clean_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub deep_check: bool,

    // Path policy
    pub protected_prefixes: Vec<String>,

    // Feedback
    pub notify_command: String,
    pub notify_icon: String,
    pub notify_timeout_secs: u64,
    pub dialog_command: String,
    pub dialog_width: u32,
    pub dialog_timeout_secs: u64,
    pub activation_delay_ms: u64,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_command: "mat2".to_string(),
            unknown_members: "omit".to_string(),
            clean_timeout_secs: 300,
            probe_timeout_secs: 2,
            deep_check: true,
            protected_prefixes: crate::paths::PROTECTED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            notify_command: "notify-send".to_string(),
            notify_icon: "edit-clear-all".to_string(),
            notify_timeout_secs: 2,
            dialog_command: "zenity".to_string(),
            dialog_width: 400,
            dialog_timeout_secs: 60,
            activation_delay_ms: 150,
            log_level: "WARN".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = config_path.with_extension("json.corrupt");
                let _ = std::fs::rename(config_path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn clean_timeout(&self) -> Duration {
        Duration::from_secs(self.clean_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }

    pub fn dialog_timeout(&self) -> Duration {
        Duration::from_secs(self.dialog_timeout_secs)
    }

    pub fn activation_delay(&self) -> Duration {
        Duration::from_millis(self.activation_delay_ms)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mat2-menu")
        .join("config.json")
}
