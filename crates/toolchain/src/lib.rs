//! Slideshow toolchain contracts.
//!
//! Everything that touches the outside world during a run lives here:
//! - [`process`]: the single "run external tool, capture, log, raise typed
//!   error" helper and the [`ToolRunner`] seam
//! - [`log`]: the per-run log file that receives captured tool output
//! - [`probe`]: media duration and audio stream inspection
//! - [`artifacts`]: scoped ownership of transient files
//! - [`context`]: the explicit per-run context passed to every component

pub mod artifacts;
pub mod context;
pub mod log;
pub mod probe;
pub mod process;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use artifacts::{ArtifactScope, CleanupReport};
pub use context::RunContext;
pub use log::LogSink;
pub use process::{run_tool, Stage, SystemRunner, ToolInvocation, ToolOutput, ToolRunner};
