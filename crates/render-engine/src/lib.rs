//! Slideshow Render Engine
//!
//! Drives the external transcoder to turn a folder of stills and an audio
//! track into a single video file.
//!
//! # Pipeline Architecture
//!
//! ```text
//! audio.mp3 ── Probe ── DurationPlan ──┐
//!                                      ├── SlotPlan
//! images/*.jpg ── MediaSource ─────────┘      │
//!                                             ▼
//!                                  Render (one segment per slot)
//!                                             │
//!                                             ▼
//!                                  Concat (manifest, stream copy)
//!                                             │
//! audio.mp3 ──────────────────────────────────┤
//!                                             ▼
//!                                  Mux (copy video, AAC, shortest)
//!                                             │
//!                                             ▼
//!                                       slideshow.mp4
//! ```
//!
//! Every intermediate file is owned by the run's
//! [`RunContext`](slideshow_toolchain::RunContext) and removed when the run
//! ends, whether it succeeded or not.

pub mod clips;
pub mod concat;
pub mod mux;
pub mod pipeline;
pub mod source;

pub use pipeline::*;
pub use source::MediaSource;
