//! Poll-driven change source for files under git
//!
//! Each tick samples how many lines differ between the working copy of a file
//! and its last commit. The tick's delta is the absolute difference from the
//! previous successful sample.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::monitor::state::Observation;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),
    #[error("{} is not inside a git repository: {stderr}", .dir.display())]
    NotARepository { dir: PathBuf, stderr: String },
    #[error("git diff failed ({code:?}): {stderr}")]
    Diff { code: Option<i32>, stderr: String },
}

/// Samples the current change magnitude of a file
#[async_trait]
pub trait ChangeSampler: Send + Sync {
    async fn sample(&self, path: &Path) -> Result<u64, SampleError>;
}

/// Sums added and removed lines from `git diff --numstat HEAD`
#[derive(Debug, Default, Clone, Copy)]
pub struct GitDiffSampler;

impl GitDiffSampler {
    async fn repo_root(dir: &Path) -> Result<PathBuf, SampleError> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(dir)
            .output()
            .await?;

        if output.status.success() {
            let root = String::from_utf8_lossy(&output.stdout);
            Ok(PathBuf::from(root.trim()))
        } else {
            Err(SampleError::NotARepository {
                dir: dir.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl ChangeSampler for GitDiffSampler {
    async fn sample(&self, path: &Path) -> Result<u64, SampleError> {
        let file = tokio::fs::canonicalize(path).await?;
        let dir = file.parent().unwrap_or_else(|| Path::new("/"));
        let root = Self::repo_root(dir).await?;

        let output = Command::new("git")
            .args(["diff", "--numstat", "HEAD", "--"])
            .arg(&file)
            .current_dir(&root)
            .output()
            .await?;

        match output.status.code() {
            Some(0) => Ok(parse_numstat(&String::from_utf8_lossy(&output.stdout))),
            // Exit status 1 means "differences: none"
            Some(1) => Ok(0),
            code => Err(SampleError::Diff {
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

/// Sum `added + removed` over numstat lines. Binary entries (`-`) count as 0.
pub fn parse_numstat(output: &str) -> u64 {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let added = fields.next()?;
            let removed = fields.next()?;
            Some(added.parse::<u64>().unwrap_or(0) + removed.parse::<u64>().unwrap_or(0))
        })
        .sum()
}

/// Poll state for one tracked file
pub struct TrackedFile {
    path: PathBuf,
    sampler: Arc<dyn ChangeSampler>,
    last_sample: Option<u64>,
}

impl TrackedFile {
    pub fn new(path: PathBuf, sampler: Arc<dyn ChangeSampler>) -> Self {
        Self {
            path,
            sampler,
            last_sample: None,
        }
    }

    /// Take a sample and turn it into this tick's observation
    pub async fn poll(&mut self) -> Observation {
        let result = self.sampler.sample(&self.path).await;
        self.observe(result)
    }

    /// Fold a sample result into the poll state.
    ///
    /// The first success is the baseline. Failures count as "no change" and
    /// leave the last good sample (or the missing baseline) in place.
    pub fn observe(&mut self, result: Result<u64, SampleError>) -> Observation {
        let current = match result {
            Ok(current) => current,
            Err(err) => {
                tracing::error!(
                    path = %self.path.display(),
                    "Failed to sample git changes: {}",
                    err
                );
                return Observation::Delta(0);
            }
        };

        match self.last_sample.replace(current) {
            None => {
                tracing::info!(
                    path = %self.path.display(),
                    "Beginning with {} changes detected by git",
                    current
                );
                Observation::Baseline
            }
            Some(previous) => Observation::Delta(current.abs_diff(previous)),
        }
    }

    pub fn last_sample(&self) -> Option<u64> {
        self.last_sample
    }
}
