//! Starts one monitor per valid source and coordinates shutdown

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::config::Config;
use crate::monitor::SourceMonitor;
use crate::sink::NotificationSink;
use crate::source::{self, ChangeSampler, Source, SourceError};

pub struct Supervisor {
    sources: Vec<Source>,
    rejected: Vec<SourceError>,
    sink: Arc<dyn NotificationSink>,
    sampler: Arc<dyn ChangeSampler>,
}

impl Supervisor {
    /// Validate the configured sources. Invalid ones are logged once and
    /// never retried.
    pub fn new(
        config: &Config,
        sink: Arc<dyn NotificationSink>,
        sampler: Arc<dyn ChangeSampler>,
    ) -> Self {
        let (sources, rejected) = source::validate_all(&config.monitor_sources);
        for err in &rejected {
            tracing::warn!("{}", err);
        }

        Self {
            sources,
            rejected,
            sink,
            sampler,
        }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn rejected(&self) -> &[SourceError] {
        &self.rejected
    }

    /// Run every monitor until `stop` flips to true, then wait for all of
    /// them to wind down. Returning is the completion signal.
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        let mut monitors = JoinSet::new();

        for source in self.sources {
            let span = tracing::info_span!(
                "monitor",
                kind = %source.kind,
                path = %source.path.display()
            );
            let monitor = SourceMonitor::new(source, self.sink.clone(), self.sampler.clone());
            let stop = stop.clone();

            monitors.spawn(
                async move {
                    if let Err(err) = monitor.run(stop).await {
                        tracing::error!("Monitor terminated: {}", err);
                    }
                }
                .instrument(span),
            );
        }

        tracing::info!("Started {} monitor(s)", monitors.len());

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
                Some(joined) = monitors.join_next() => {
                    if let Err(err) = joined {
                        tracing::error!("Monitor task failed: {}", err);
                    }
                }
            }
        }

        tracing::info!("Shutting down MiniMon...");

        while let Some(joined) = monitors.join_next().await {
            if let Err(err) = joined {
                tracing::error!("Monitor task failed during shutdown: {}", err);
            }
        }
    }
}
