//! Monitored sources
//!
//! A [`Source`] is a configured entry that passed validation. Its kind is a
//! closed enum resolved once, and picks the change source strategy the
//! monitor is built with.

pub mod tracked;
pub mod watched;

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{NotificationConfig, SourceEntry};

pub use tracked::{parse_numstat, ChangeSampler, GitDiffSampler, SampleError, TrackedFile};
pub use watched::{is_write, WriteWatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Directory,
    File,
    TrackedFile,
}

impl SourceKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "dir" => Some(SourceKind::Directory),
            "file" => Some(SourceKind::File),
            "git_file" => Some(SourceKind::TrackedFile),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            SourceKind::Directory => "dir",
            SourceKind::File => "file",
            SourceKind::TrackedFile => "git_file",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Why a configured entry was not started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Missing,
    UnsupportedKind,
    ZeroInterval,
}

#[derive(Debug, Clone, Error)]
#[error("Invalid source: {kind} ({})", .path.display())]
pub struct SourceError {
    pub kind: String,
    pub path: PathBuf,
    pub reason: Rejection,
}

/// A validated source together with its notification settings
#[derive(Debug, Clone)]
pub struct Source {
    pub path: PathBuf,
    pub kind: SourceKind,
    pub recursive: bool,
    pub notification: NotificationConfig,
}

impl Source {
    /// Validate a configured entry: the kind must be known, the path must
    /// exist, and the interval must be positive
    pub fn validate(entry: &SourceEntry) -> Result<Self, SourceError> {
        let reject = |reason| SourceError {
            kind: entry.source_type.clone(),
            path: entry.path.clone(),
            reason,
        };

        let kind = SourceKind::from_tag(&entry.source_type)
            .ok_or_else(|| reject(Rejection::UnsupportedKind))?;

        if !entry.path.exists() {
            return Err(reject(Rejection::Missing));
        }

        if entry.notification_config.notification_interval == 0 {
            return Err(reject(Rejection::ZeroInterval));
        }

        Ok(Self {
            path: entry.path.clone(),
            kind,
            recursive: entry.recursive,
            notification: entry.notification_config.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Validate every entry, keeping configuration order
pub fn validate_all(entries: &[SourceEntry]) -> (Vec<Source>, Vec<SourceError>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for entry in entries {
        match Source::validate(entry) {
            Ok(source) => accepted.push(source),
            Err(err) => rejected.push(err),
        }
    }

    (accepted, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &Path, source_type: &str, interval: u64) -> SourceEntry {
        SourceEntry {
            path: path.to_path_buf(),
            source_type: source_type.to_string(),
            recursive: false,
            notification_config: NotificationConfig {
                notification_interval: interval,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_kind_tags() {
        for kind in [SourceKind::Directory, SourceKind::File, SourceKind::TrackedFile] {
            assert_eq!(SourceKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(SourceKind::from_tag("svn_file"), None);
    }

    #[test]
    fn test_validate_existing_sources() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.md");
        std::fs::write(&file, "hello").unwrap();

        let source = Source::validate(&entry(dir.path(), "dir", 60)).unwrap();
        assert_eq!(source.kind, SourceKind::Directory);

        let source = Source::validate(&entry(&file, "git_file", 60)).unwrap();
        assert_eq!(source.kind, SourceKind::TrackedFile);
        assert_eq!(source.path(), file.as_path());
    }

    #[test]
    fn test_missing_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");

        let err = Source::validate(&entry(&missing, "dir", 60)).unwrap_err();
        assert_eq!(err.reason, Rejection::Missing);
        assert_eq!(err.to_string(), format!("Invalid source: dir ({})", missing.display()));
    }

    #[test]
    fn test_unsupported_kind_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Source::validate(&entry(dir.path(), "socket", 60)).unwrap_err();

        assert_eq!(err.reason, Rejection::UnsupportedKind);
        assert!(err.to_string().starts_with("Invalid source: socket ("));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Source::validate(&entry(dir.path(), "dir", 0)).unwrap_err();
        assert_eq!(err.reason, Rejection::ZeroInterval);
    }

    #[test]
    fn test_validate_all_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![
            entry(dir.path(), "dir", 10),
            entry(&dir.path().join("missing"), "file", 10),
            entry(dir.path(), "file", 20),
        ];

        let (accepted, rejected) = validate_all(&entries);
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[1].notification.notification_interval, 20);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].reason, Rejection::Missing);
    }
}
