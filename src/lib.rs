pub mod cli;
pub mod config;
pub mod logging;
pub mod monitor;
pub mod policy;
pub mod sink;
pub mod source;
pub mod supervisor;

pub use config::*;
pub use monitor::{MonitorError, MonitorState, Observation, Phase, SourceMonitor, TickOutcome};
pub use sink::{DesktopSink, LogSink, NotificationSink, SinkError};
pub use source::{ChangeSampler, GitDiffSampler, SampleError, Source, SourceError, SourceKind};
pub use supervisor::Supervisor;
