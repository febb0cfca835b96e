//! Explicit per-run state.

use std::path::{Path, PathBuf};

use slideshow_common::clock::RunClock;
use slideshow_common::error::{SlideshowError, SlideshowResult};

use crate::artifacts::{ArtifactScope, CleanupReport};
use crate::log::LogSink;
use crate::process::{run_tool, ToolInvocation, ToolOutput, ToolRunner};

/// Everything one invocation owns: identity, working directory, run log
/// and transient artifacts.
///
/// Artifacts are released when the context is finished or dropped, so an
/// early `?` return anywhere in a pipeline still cleans up.
#[derive(Debug)]
pub struct RunContext {
    clock: RunClock,
    run_id: String,
    work_dir: PathBuf,
    log: LogSink,
    artifacts: ArtifactScope,
}

impl RunContext {
    /// Start a run anchored to the current time.
    pub fn start(work_dir: impl Into<PathBuf>, log_dir: &Path) -> SlideshowResult<Self> {
        Self::with_clock(RunClock::start(), work_dir, log_dir)
    }

    pub fn with_clock(
        clock: RunClock,
        work_dir: impl Into<PathBuf>,
        log_dir: &Path,
    ) -> SlideshowResult<Self> {
        let work_dir = work_dir.into();
        std::fs::create_dir_all(&work_dir).map_err(|e| {
            SlideshowError::validation(format!(
                "Unable to use working directory {}: {e}",
                work_dir.display()
            ))
        })?;

        let run_id = clock.run_id();
        let log = LogSink::create(log_dir, &run_id)?;
        tracing::info!(run_id = %run_id, log = %log.path().display(), "Run started");

        Ok(Self {
            clock,
            run_id,
            work_dir,
            log,
            artifacts: ArtifactScope::new(),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn clock(&self) -> &RunClock {
        &self.clock
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    pub fn log_mut(&mut self) -> &mut LogSink {
        &mut self.log
    }

    pub fn artifacts(&self) -> &ArtifactScope {
        &self.artifacts
    }

    /// Run-scoped path for a transient file: `<work_dir>/slideshow_<run_id>_<name>`.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.work_dir
            .join(format!("slideshow_{}_{}", self.run_id, name))
    }

    /// Reserve a transient path and register it for cleanup.
    pub fn register_artifact(&mut self, name: &str) -> PathBuf {
        let path = self.artifact_path(name);
        self.artifacts.register(path)
    }

    /// Run an external tool with this run's log.
    pub fn run(
        &mut self,
        runner: &mut dyn ToolRunner,
        invocation: &ToolInvocation,
    ) -> SlideshowResult<ToolOutput> {
        run_tool(runner, invocation, &mut self.log)
    }

    /// Run a tool whose output is a user-facing file rather than an artifact.
    ///
    /// On failure the output is removed only if it did not exist before the
    /// call; a file the run did not create is never touched.
    pub fn run_into(
        &mut self,
        runner: &mut dyn ToolRunner,
        invocation: &ToolInvocation,
        output: &Path,
    ) -> SlideshowResult<ToolOutput> {
        let preexisting = output.exists();
        let result = self.run(runner, invocation);

        if result.is_err() && !preexisting && output.exists() {
            if let Err(err) = std::fs::remove_file(output) {
                tracing::warn!(
                    path = %output.display(),
                    error = %err,
                    "Failed to remove partial output"
                );
            }
        }
        result
    }

    /// End the run, removing every registered artifact.
    pub fn finish(mut self) -> CleanupReport {
        let report = self.artifacts.release();
        self.log.note(&format!(
            "run {} finished: removed {} artifact(s), {} already gone, {} failed",
            self.run_id, report.removed, report.already_gone, report.failed
        ));
        report
    }
}
