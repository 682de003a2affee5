//! Configuration management for MiniMon
//!
//! This module provides the configuration structures read at startup: the
//! monitored sources, their notification settings, and process-level logging
//! properties. Configuration is read once and never mutated afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable consulted for the configuration path
pub const CONFIG_ENV_VAR: &str = "MINIMON_CONFIG";

/// Configuration path used when neither a flag nor the environment provides one
pub const DEFAULT_CONFIG_PATH: &str = "/usr/minimon/config.json";

/// Title handed to the notification sink unless a source overrides it
pub const DEFAULT_NOTIFICATION_TITLE: &str = "MiniMon Notification";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed TOML config {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Sources to monitor, validated individually at startup
    #[serde(default)]
    pub monitor_sources: Vec<SourceEntry>,
    /// Process-level properties
    #[serde(default)]
    pub monitor_props: MonitorProps,
}

/// A configured source as written in the file, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Filesystem path of the directory or file
    pub path: PathBuf,
    /// Raw kind tag: `dir`, `file` or `git_file`
    pub source_type: String,
    /// Watch subdirectories too (directories only)
    #[serde(default)]
    pub recursive: bool,
    pub notification_config: NotificationConfig,
}

/// Per-source notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Seconds between ticks
    pub notification_interval: u64,
    /// Idle ceiling in seconds; 0 disables suppression
    #[serde(default)]
    pub max_idle_time: u64,
    /// Templates evaluated independently on every tick
    #[serde(default)]
    pub notification_set: Vec<NotificationTemplate>,
    /// Title passed to the sink with each message
    #[serde(default = "default_title")]
    pub title: String,
    /// Behaviour of the idle clock once idle notifications are suppressed
    #[serde(default)]
    pub idle_clock: IdleClock,
}

/// One message template. Empty texts are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    #[serde(default)]
    pub notification_head: String,
    #[serde(default)]
    pub notification_tail: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub on_change: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub on_idle: Option<String>,
}

/// What happens to elapsed idle time while idle notifications are suppressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleClock {
    /// Keep accumulating idle time (reported in logs)
    #[default]
    Running,
    /// Stop accumulating at the tick suppression begins
    Frozen,
}

/// Process-level logging properties
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorProps {
    /// Directory receiving `minimon.log`; empty disables file logging
    #[serde(default)]
    pub log_dir: String,
    #[serde(default)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Info level, human-readable, to stdout only
    Console,
}

impl LogLevel {
    /// Parse a level name case-insensitively; unknown names fall back to info
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            "console" => LogLevel::Console,
            _ => LogLevel::Info,
        }
    }

    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info | LogLevel::Console => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(LogLevel::parse_lenient(&raw))
    }
}

fn default_title() -> String {
    DEFAULT_NOTIFICATION_TITLE.to_string()
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.is_empty()))
}

impl NotificationConfig {
    /// Tick period
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.notification_interval)
    }

    /// Tick period in minutes, as reported in change messages
    pub fn interval_minutes(&self) -> f64 {
        self.notification_interval as f64 / 60.0
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            notification_interval: 60,
            max_idle_time: 0,
            notification_set: Vec::new(),
            title: default_title(),
            idle_clock: IdleClock::default(),
        }
    }
}

impl NotificationTemplate {
    pub fn change_text(&self) -> Option<&str> {
        self.on_change.as_deref()
    }

    pub fn idle_text(&self) -> Option<&str> {
        self.on_idle.as_deref()
    }
}

/// Configuration loading
impl Config {
    /// Load configuration from a file; `.toml` files are parsed as TOML and
    /// everything else as JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            Self::from_toml_str(&raw).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            Self::from_json_str(&raw).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
