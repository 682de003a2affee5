//! Notification delivery
//!
//! Delivery is best-effort. Monitors log a failed delivery and carry on; a
//! sink never gets to abort a tick.

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("desktop notifications are not supported on this platform")]
    Unsupported,
    #[error("failed to launch notifier: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("notifier exited with {0}")]
    Failed(std::process::ExitStatus),
}

/// Receives rendered messages
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, title: &str, body: &str) -> Result<(), SinkError>;
}

/// Delivers through the platform's notification daemon
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopSink;

/// Writes each message to the log instead of the desktop
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for DesktopSink {
    async fn notify(&self, title: &str, body: &str) -> Result<(), SinkError> {
        let mut command = notifier_command(title, body)?;
        let status = command.kill_on_drop(true).status().await?;
        if status.success() {
            Ok(())
        } else {
            Err(SinkError::Failed(status))
        }
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, title: &str, body: &str) -> Result<(), SinkError> {
        tracing::info!(title, "{}", body);
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn notifier_command(title: &str, body: &str) -> Result<Command, SinkError> {
    let script = format!(
        "display notification {} with title {}",
        applescript_quote(body),
        applescript_quote(title)
    );
    let mut command = Command::new("osascript");
    command.arg("-e").arg(script);
    Ok(command)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn notifier_command(title: &str, body: &str) -> Result<Command, SinkError> {
    let mut command = Command::new("notify-send");
    command.arg("--app-name=minimon").arg(title).arg(body);
    Ok(command)
}

#[cfg(not(unix))]
fn notifier_command(_title: &str, _body: &str) -> Result<Command, SinkError> {
    Err(SinkError::Unsupported)
}

#[cfg(any(target_os = "macos", test))]
fn applescript_quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
