//! Source monitors
//!
//! One [`SourceMonitor`] runs per validated source. It owns its change source,
//! its timer and its [`MonitorState`]; nothing is shared with other monitors.
//! Ticks are processed strictly in order, and notifications for a tick are
//! delivered before the next tick is evaluated.

pub mod state;

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::policy::{self, Mode};
use crate::sink::NotificationSink;
use crate::source::{ChangeSampler, Source, SourceKind, TrackedFile, WriteWatcher};

pub use state::{MonitorState, Observation, Phase, TickOutcome};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("failed to subscribe to file events: {0}")]
    Watch(#[from] notify::Error),
    #[error("file event stream closed")]
    StreamClosed,
}

/// Strategy a monitor draws its change magnitude from
pub enum ChangeSource {
    Watched(WriteWatcher),
    Tracked(TrackedFile),
}

impl ChangeSource {
    /// Build the strategy for a source. Subscribing may fail for watched
    /// sources; polled sources take their baseline on the first observation.
    pub fn open(
        source: &Source,
        sampler: Arc<dyn ChangeSampler>,
    ) -> Result<Self, MonitorError> {
        match source.kind {
            SourceKind::Directory | SourceKind::File => {
                let watcher = WriteWatcher::new(&source.path, source.recursive)?;
                Ok(ChangeSource::Watched(watcher))
            }
            SourceKind::TrackedFile => {
                let file = TrackedFile::new(source.path.clone(), sampler);
                Ok(ChangeSource::Tracked(file))
            }
        }
    }

    /// Change observed since the previous tick. Writes already queued when
    /// the tick fires belong to the closing window.
    pub async fn observe(&mut self) -> Observation {
        match self {
            ChangeSource::Watched(watcher) => {
                watcher.drain_ready();
                Observation::Delta(watcher.take_pending())
            }
            ChangeSource::Tracked(file) => file.poll().await,
        }
    }

    /// Next raw event for watched sources. Polled sources never produce one.
    async fn next_event(&mut self) -> Option<notify::Result<notify::Event>> {
        match self {
            ChangeSource::Watched(watcher) => watcher.recv().await,
            ChangeSource::Tracked(_) => std::future::pending().await,
        }
    }
}

pub struct SourceMonitor {
    source: Source,
    state: MonitorState,
    sink: Arc<dyn NotificationSink>,
    sampler: Arc<dyn ChangeSampler>,
}

impl SourceMonitor {
    pub fn new(
        source: Source,
        sink: Arc<dyn NotificationSink>,
        sampler: Arc<dyn ChangeSampler>,
    ) -> Self {
        let state = MonitorState::new(&source.notification);
        Self {
            source,
            state,
            sink,
            sampler,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Run until `stop` flips to true or its sender goes away.
    ///
    /// Returns an error only when the change source cannot be opened or its
    /// event stream closes underneath the monitor.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> Result<(), MonitorError> {
        let mut changes = ChangeSource::open(&self.source, self.sampler.clone())?;

        // Prime the poll baseline. A failure here is logged and the first
        // later success takes its place.
        if let ChangeSource::Tracked(file) = &mut changes {
            file.poll().await;
        }

        let period = self.source.notification.interval();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = self.source.notification.notification_interval,
            max_idle_secs = self.source.notification.max_idle_time,
            "Monitoring started"
        );

        loop {
            if *stop.borrow() {
                break;
            }

            tokio::select! {
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                event = changes.next_event() => match event {
                    Some(Ok(event)) => {
                        if let ChangeSource::Watched(watcher) = &mut changes {
                            if watcher.record(&event) {
                                let pending = watcher.pending();
                                tracing::debug!(changes = pending, "Accumulating changes");
                            }
                        }
                    }
                    Some(Err(err)) => tracing::error!("Watcher error: {}", err),
                    None => {
                        tracing::error!("File event stream closed, stopping monitor");
                        return Err(MonitorError::StreamClosed);
                    }
                },
                _ = ticker.tick() => {
                    let observation = changes.observe().await;
                    self.tick(observation).await;
                }
            }
        }

        tracing::info!("Monitoring stopped");
        Ok(())
    }

    /// Advance the state machine and deliver whatever the tick calls for.
    /// Returns the messages that were handed to the sink.
    pub async fn tick(&mut self, observation: Observation) -> Vec<String> {
        let config = &self.source.notification;
        let outcome = self.state.advance(observation);

        let messages = match outcome {
            TickOutcome::Skipped => return Vec::new(),
            TickOutcome::Changed { magnitude } => {
                tracing::info!(changes = magnitude, "Change detected");
                policy::compose(
                    &config.notification_set,
                    Mode::Change,
                    magnitude,
                    config.interval_minutes(),
                )
            }
            TickOutcome::Idle { idle_minutes } => {
                tracing::info!("No changes detected, idle time: {:.2} minutes", idle_minutes);
                policy::compose(&config.notification_set, Mode::Idle, 0, idle_minutes)
            }
            TickOutcome::Suppressed { idle_minutes } => {
                tracing::info!(
                    "Max idle time reached ({:.2} minutes), suppressing idle notifications",
                    idle_minutes
                );
                return Vec::new();
            }
        };

        for message in &messages {
            tracing::debug!("Sending notification: {}", message);
            if let Err(err) = self.sink.notify(&config.title, message).await {
                tracing::error!("Failed to send notification: {}", err);
            }
        }

        messages
    }
}
