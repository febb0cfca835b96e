//! Scoped ownership of transient files.
//!
//! Paths are registered before the step that creates them runs, so an
//! abort at any point still knows everything that may exist on disk.
//! Removal happens on [`ArtifactScope::release`] or when the scope is
//! dropped, whichever comes first.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Outcome of a cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Files deleted.
    pub removed: usize,
    /// Registered paths that were never written (or already deleted).
    pub already_gone: usize,
    /// Files that could not be deleted.
    pub failed: usize,
}

/// Registry of intermediate files owned by one run.
#[derive(Debug, Default)]
pub struct ArtifactScope {
    /// Registration order.
    paths: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl ArtifactScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `path`. Registering the same path twice is a no-op.
    pub fn register(&mut self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();
        if self.seen.insert(path.clone()) {
            self.paths.push(path.clone());
        }
        path
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Delete every registered file, best effort. Failures are logged and
    /// counted, never retried.
    pub fn release(&mut self) -> CleanupReport {
        let mut report = CleanupReport::default();
        self.seen.clear();
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => report.removed += 1,
                Err(err) if err.kind() == ErrorKind::NotFound => report.already_gone += 1,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Failed to remove temporary artifact"
                    );
                    report.failed += 1;
                }
            }
        }

        tracing::debug!(
            removed = report.removed,
            already_gone = report.already_gone,
            failed = report.failed,
            "Released temporary artifacts"
        );
        report
    }
}

impl Drop for ArtifactScope {
    fn drop(&mut self) {
        if !self.paths.is_empty() {
            self.release();
        }
    }
}
