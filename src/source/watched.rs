use std::path::Path;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Event-driven change source: counts write notifications for one path.
///
/// The notify subscription lives as long as this value. Events are tallied
/// as they arrive and drained once per tick.
pub struct WriteWatcher {
    _watcher: RecommendedWatcher,
    event_rx: UnboundedReceiver<notify::Result<Event>>,
    pending: u64,
}

impl WriteWatcher {
    pub fn new<P: AsRef<Path>>(path: P, recursive: bool) -> notify::Result<Self> {
        let path = path.as_ref();
        let (tx, event_rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            // Receiver gone means the monitor has stopped
            let _ = tx.send(result);
        })?;

        let mode = if recursive && path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(path, mode)?;

        Ok(Self::with_receiver(watcher, event_rx))
    }

    fn with_receiver(
        watcher: RecommendedWatcher,
        event_rx: UnboundedReceiver<notify::Result<Event>>,
    ) -> Self {
        Self {
            _watcher: watcher,
            event_rx,
            pending: 0,
        }
    }

    /// Wait for the next raw notification. `None` once the stream has closed.
    pub async fn recv(&mut self) -> Option<notify::Result<Event>> {
        self.event_rx.recv().await
    }

    /// Count one event if it is a write
    pub fn record(&mut self, event: &Event) -> bool {
        if is_write(&event.kind) {
            self.pending += 1;
            true
        } else {
            false
        }
    }

    /// Record every notification already queued without waiting for more
    pub fn drain_ready(&mut self) {
        while let Ok(result) = self.event_rx.try_recv() {
            match result {
                Ok(event) => {
                    self.record(&event);
                }
                Err(err) => tracing::error!("Watcher error: {}", err),
            }
        }
    }

    /// Take the number of writes seen since the previous call
    pub fn take_pending(&mut self) -> u64 {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> u64 {
        self.pending
    }
}

/// Content writes only; metadata, renames and access are ignored
pub fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any)
    )
}
