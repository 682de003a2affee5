#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use minimon::{
    ChangeSampler, NotificationConfig, NotificationSink, NotificationTemplate, SampleError,
    SinkError, Source, SourceKind,
};

/// Records every delivered message
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn bodies(&self) -> Vec<String> {
        self.messages.lock().unwrap().iter().map(|(_, body)| body.clone()).collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.messages.lock().unwrap().iter().map(|(title, _)| title.clone()).collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, title: &str, body: &str) -> Result<(), SinkError> {
        self.messages.lock().unwrap().push((title.to_string(), body.to_string()));
        Ok(())
    }
}

/// Always fails, counting attempts
#[derive(Default)]
pub struct FailingSink {
    pub attempts: Mutex<usize>,
}

#[async_trait]
impl NotificationSink for FailingSink {
    async fn notify(&self, _title: &str, _body: &str) -> Result<(), SinkError> {
        *self.attempts.lock().unwrap() += 1;
        Err(SinkError::Unsupported)
    }
}

/// Returns scripted samples, then repeats the last successful value
pub struct ScriptedSampler {
    script: Mutex<VecDeque<Result<u64, SampleError>>>,
    last: Mutex<u64>,
}

impl ScriptedSampler {
    pub fn new(script: Vec<Result<u64, SampleError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(0),
        }
    }

    pub fn constant(value: u64) -> Self {
        Self::new(vec![Ok(value)])
    }
}

#[async_trait]
impl ChangeSampler for ScriptedSampler {
    async fn sample(&self, _path: &Path) -> Result<u64, SampleError> {
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(value)) => {
                *self.last.lock().unwrap() = value;
                Ok(value)
            }
            Some(Err(err)) => Err(err),
            None => Ok(*self.last.lock().unwrap()),
        }
    }
}

pub fn template(
    head: &str,
    on_change: Option<&str>,
    on_idle: Option<&str>,
) -> NotificationTemplate {
    NotificationTemplate {
        notification_head: head.to_string(),
        notification_tail: String::new(),
        on_change: on_change.map(String::from),
        on_idle: on_idle.map(String::from),
    }
}

pub fn notification(
    interval: u64,
    max_idle: u64,
    templates: Vec<NotificationTemplate>,
) -> NotificationConfig {
    NotificationConfig {
        notification_interval: interval,
        max_idle_time: max_idle,
        notification_set: templates,
        ..Default::default()
    }
}

pub fn source(path: PathBuf, kind: SourceKind, notification: NotificationConfig) -> Source {
    Source {
        path,
        kind,
        recursive: false,
        notification,
    }
}

pub fn sampler(sampler: ScriptedSampler) -> Arc<dyn ChangeSampler> {
    Arc::new(sampler)
}
