//! Total and per-image duration resolution.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slideshow_common::error::{SlideshowError, SlideshowResult};

/// Requested total video duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalDuration {
    /// Follow the probed audio duration.
    #[default]
    Auto,
    /// Caller-supplied seconds, used as-is.
    Explicit(f64),
}

impl TotalDuration {
    /// Interpret a command-line value. `auto` (any case) and anything that
    /// is not a number both mean [`TotalDuration::Auto`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Self::Auto;
        }
        match trimmed.parse::<f64>() {
            Ok(secs) => Self::Explicit(secs),
            Err(_) => Self::Auto,
        }
    }
}

impl FromStr for TotalDuration {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// What the caller asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationRequest {
    pub total: TotalDuration,

    /// Fixed seconds per image. `None` or zero derives it from the total.
    pub per_image_secs: Option<f64>,
}

/// Resolved timing for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationPlan {
    /// Probed audio length.
    pub audio_secs: f64,

    /// Video length the slots must cover.
    pub total_secs: f64,

    /// How long each image is shown.
    pub per_image_secs: f64,
}

impl DurationPlan {
    /// Length of the muxed output: the shorter of audio and video.
    pub fn expected_output_secs(&self) -> f64 {
        self.audio_secs.min(self.total_secs)
    }
}

/// Resolve the plan for `image_count` images and a probed audio length.
///
/// An explicit total is not checked for positivity; a warning is emitted
/// when it is not a positive finite number.
pub fn resolve_durations(
    audio_secs: f64,
    request: &DurationRequest,
    image_count: usize,
) -> SlideshowResult<DurationPlan> {
    let total_secs = match request.total {
        TotalDuration::Auto => audio_secs,
        TotalDuration::Explicit(secs) => {
            if !(secs.is_finite() && secs > 0.0) {
                tracing::warn!(total_secs = secs, "Explicit video duration is not positive");
            }
            secs
        }
    };

    let per_image_secs = match request.per_image_secs {
        Some(secs) if secs != 0.0 => secs,
        _ => {
            if image_count == 0 {
                return Err(SlideshowError::Division { total_secs });
            }
            total_secs / image_count as f64
        }
    };

    tracing::debug!(
        audio_secs,
        total_secs,
        per_image_secs,
        image_count,
        "Resolved durations"
    );

    Ok(DurationPlan {
        audio_secs,
        total_secs,
        per_image_secs,
    })
}
