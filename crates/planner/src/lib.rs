//! Slideshow Planner
//!
//! Turns probed and requested durations into a concrete render plan:
//! - **Durations:** total video length and per-image display time
//! - **Slots:** the ordered (image, duration) sequence, looping the image
//!   set when it runs out
//!
//! This crate is pure computation: no I/O and no subprocesses.
//! All inputs are data; all outputs are data.

pub mod duration;
pub mod slots;

pub use duration::{resolve_durations, DurationPlan, DurationRequest, TotalDuration};
pub use slots::{plan_slots, slot_count, Slot, SlotPlan};
