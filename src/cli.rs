use std::path::PathBuf;
use clap::Parser;

use crate::config::{Config, LogLevel, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "minimon")]
#[command(author = "MiniMon Team")]
#[command(version)]
#[command(about = "Periodic activity and idle notifications for watched files and directories")]
#[command(long_about = "MiniMon watches directories, files and git-tracked files, and every notification interval tells you how much changed, or how long things have been idle. Idle reminders stop after a configurable ceiling until the next change.")]
pub struct Cli {
    /// Configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long, env = CONFIG_ENV_VAR, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override the log level from the configuration file
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Validate the configuration, list the sources and exit
    #[arg(long)]
    pub check: bool,

    /// Write notifications to the log instead of the desktop
    #[arg(long)]
    pub log_only: bool,
}

impl Cli {
    /// Effective log level: flag first, then the configuration file
    pub fn log_level(&self, config: &Config) -> LogLevel {
        self.log_level.unwrap_or(config.monitor_props.log_level)
    }
}
