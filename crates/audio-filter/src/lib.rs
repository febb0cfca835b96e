//! Slideshow Audio Filter
//!
//! Removes low-frequency wind rumble from a video's soundtrack:
//!
//! ```text
//! video ──extract──▶ f64le PCM ──high-pass──▶ f64le PCM ──reattach──▶ filtered video
//! ```
//!
//! The filter is a Butterworth high-pass built as a cascade of second-order
//! sections. This path shares no state with slideshow assembly.

pub mod highpass;
pub mod pcm;
pub mod wind;

pub use highpass::HighPassFilter;
pub use wind::{filter_wind_noise, WindFilterJob, WindFilterReport};
