//! Slideshow Common Utilities
//!
//! Shared infrastructure for all slideshow crates:
//! - Error taxonomy and result alias
//! - Run clock and per-run identity
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
