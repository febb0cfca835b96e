//! Run clock and per-run identity.
//!
//! Every invocation is anchored to a clock captured at start. The clock
//! provides:
//! - A timestamp-derived run id used to name the run log and transient files
//! - Elapsed wall time for the final summary
//! - `H:MM:SS` formatting of durations

use std::time::Instant;

use chrono::{DateTime, Local};

/// A run clock that records when the invocation started.
#[derive(Debug, Clone)]
pub struct RunClock {
    /// The instant the run started.
    epoch: Instant,

    /// Local wall-clock time at epoch.
    started_at: DateTime<Local>,

    /// Process id, folded into the run id.
    pid: u32,
}

impl RunClock {
    /// Create a new run clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            started_at: Local::now(),
            pid: std::process::id(),
        }
    }

    /// Create a clock from a known start time (for deterministic ids in tests).
    pub fn from_parts(started_at: DateTime<Local>, pid: u32) -> Self {
        Self {
            epoch: Instant::now(),
            started_at,
            pid,
        }
    }

    /// Timestamp-derived identifier, unique per process and second.
    pub fn run_id(&self) -> String {
        format!(
            "{}-{}",
            self.started_at.format("%Y-%m-%d_%H-%M-%S"),
            self.pid
        )
    }

    /// Local wall-clock time at run start.
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Get seconds elapsed since run start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Format whole seconds as `H:MM:SS`. Fractions are truncated.
pub fn format_hms(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}
