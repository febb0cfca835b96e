//! Per-run log file.
//!
//! Captured stdout/stderr of every external tool call is appended here.
//! Writes after creation are best-effort: a failed append is reported
//! through tracing and never aborts the run.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use slideshow_common::error::{SlideshowError, SlideshowResult};

use crate::process::{ToolInvocation, ToolOutput};

/// Append-only run log.
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    file: File,
}

impl LogSink {
    /// Create (or reopen) `<log_dir>/slideshow_<run_id>.log`.
    ///
    /// Failure to create the directory or open the file is a validation
    /// error: the run has not started any processing yet.
    pub fn create(log_dir: &Path, run_id: &str) -> SlideshowResult<Self> {
        std::fs::create_dir_all(log_dir).map_err(|e| {
            SlideshowError::validation(format!(
                "Unable to create directory for log {}: {e}",
                log_dir.display()
            ))
        })?;

        let path = log_dir.join(format!("slideshow_{run_id}.log"));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                SlideshowError::validation(format!(
                    "Unable to open log file {}: {e}",
                    path.display()
                ))
            })?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one tool call: command line, captured streams, exit status.
    pub fn record(&mut self, invocation: &ToolInvocation, output: &ToolOutput) {
        let mut entry = format!("$ {}\n", invocation.command_line());
        for stream in [&output.stdout, &output.stderr] {
            if !stream.is_empty() {
                entry.push_str(stream);
                if !stream.ends_with('\n') {
                    entry.push('\n');
                }
            }
        }
        entry.push_str(&format!("[{}: {}]\n", invocation.stage.as_str(), output.status_text()));
        self.append(&entry);
    }

    /// Append a free-form line.
    pub fn note(&mut self, line: &str) {
        let mut entry = line.to_string();
        if !entry.ends_with('\n') {
            entry.push('\n');
        }
        self.append(&entry);
    }

    fn append(&mut self, text: &str) {
        if let Err(err) = self.file.write_all(text.as_bytes()) {
            tracing::warn!(
                error = %err,
                path = %self.path.display(),
                "Failed to append to run log"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Stage;

    #[test]
    fn test_record_appends_command_and_streams() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = LogSink::create(&dir.path().join("logs"), "2024-01-01_00-00-00-1").unwrap();
        assert!(log.path().ends_with("slideshow_2024-01-01_00-00-00-1.log"));

        let invocation = ToolInvocation::new("ffprobe", Stage::Probe).arg("a.mp3");
        let output = ToolOutput {
            status: Some(0),
            stdout: "12.5\n".to_string(),
            stderr: "warning: x".to_string(),
        };
        log.record(&invocation, &output);
        log.note("second entry");

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "$ ffprobe a.mp3\n12.5\nwarning: x\n[probe: status 0]\nsecond entry\n"
        );
    }

    #[test]
    fn test_unwritable_log_dir_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let err = LogSink::create(&blocker.join("logs"), "run").unwrap_err();
        assert!(err.is_validation());
    }
}
