//! Slot planning: which image is shown in which fixed-length segment.
//!
//! The image set is reused cyclically for as long as the total duration
//! requires. There is no upper bound on the number of slots; callers can
//! inspect [`SlotPlan::cycles`] to warn about very long loops.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slideshow_common::error::{SlideshowError, SlideshowResult};

use crate::duration::DurationPlan;

/// One image shown for a fixed duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Position in the output, starting at zero.
    pub index: usize,
    pub image: PathBuf,
    pub duration_secs: f64,
}

/// Ordered slots covering the total duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPlan {
    pub slots: Vec<Slot>,

    /// Number of distinct images the plan cycles through.
    pub image_count: usize,
}

impl SlotPlan {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    /// How many times the image set is walked (fractional for partial loops).
    pub fn cycles(&self) -> f64 {
        if self.image_count == 0 {
            return 0.0;
        }
        self.slots.len() as f64 / self.image_count as f64
    }

    /// Whether the plan loops the image set more than `max_cycles` times.
    pub fn exceeds_cycles(&self, max_cycles: f64) -> bool {
        self.cycles() > max_cycles
    }

    /// Sum of slot durations.
    pub fn covered_secs(&self) -> f64 {
        self.slots.iter().map(|slot| slot.duration_secs).sum()
    }
}

/// `ceil(total / per_image)`, clamped at zero. A non-finite ratio yields zero.
pub fn slot_count(total_secs: f64, per_image_secs: f64) -> usize {
    let ratio = (total_secs / per_image_secs).ceil();
    if ratio.is_finite() && ratio > 0.0 {
        ratio as usize
    } else {
        0
    }
}

/// Expand `images` into slots; slot `i` shows `images[i % images.len()]`.
pub fn plan_slots(plan: &DurationPlan, images: &[PathBuf]) -> SlideshowResult<SlotPlan> {
    if images.is_empty() {
        return Err(SlideshowError::Division {
            total_secs: plan.total_secs,
        });
    }

    let count = slot_count(plan.total_secs, plan.per_image_secs);
    let slots = (0..count)
        .map(|index| Slot {
            index,
            image: images[index % images.len()].clone(),
            duration_secs: plan.per_image_secs,
        })
        .collect();

    Ok(SlotPlan {
        slots,
        image_count: images.len(),
    })
}

/// Display helper for slot tables.
pub fn image_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{resolve_durations, DurationRequest, TotalDuration};

    fn images(n: usize) -> Vec<PathBuf> {
        (0..n)
            .map(|i| PathBuf::from(format!("images/{i:03}.jpg")))
            .collect()
    }

    #[test]
    fn test_four_images_ten_seconds() {
        let plan = resolve_durations(10.0, &DurationRequest::default(), 4).unwrap();
        let slots = plan_slots(&plan, &images(4)).unwrap();

        assert_eq!(slots.len(), 4);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.index, i);
            assert_eq!(slot.image, images(4)[i]);
            assert_eq!(slot.duration_secs, 2.5);
        }
        assert_eq!(slots.cycles(), 1.0);
    }

    #[test]
    fn test_single_image_fixed_frame_duration_loops() {
        let request = DurationRequest {
            total: TotalDuration::Auto,
            per_image_secs: Some(3.0),
        };
        let plan = resolve_durations(10.0, &request, 1).unwrap();
        let slots = plan_slots(&plan, &images(1)).unwrap();

        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(|slot| slot.image == images(1)[0]));
        assert_eq!(slots.covered_secs(), 12.0);
    }

    #[test]
    fn test_wraparound_uses_modulo() {
        let plan = DurationPlan {
            audio_secs: 7.0,
            total_secs: 7.0,
            per_image_secs: 1.0,
        };
        let slots = plan_slots(&plan, &images(3)).unwrap();
        let order: Vec<_> = slots.iter().map(|s| image_label(&s.image)).collect();
        assert_eq!(
            order,
            ["000.jpg", "001.jpg", "002.jpg", "000.jpg", "001.jpg", "002.jpg", "000.jpg"]
        );
    }

    #[test]
    fn test_per_image_longer_than_total_is_one_slot() {
        assert_eq!(slot_count(4.0, 10.0), 1);
    }

    #[test]
    fn test_degenerate_ratios_yield_no_slots() {
        assert_eq!(slot_count(-5.0, 1.0), 0);
        assert_eq!(slot_count(0.0, 1.0), 0);
        assert_eq!(slot_count(5.0, 0.0), 0);
        assert_eq!(slot_count(f64::NAN, 1.0), 0);
    }

    #[test]
    fn test_exceeds_cycles() {
        let plan = DurationPlan {
            audio_secs: 600.0,
            total_secs: 600.0,
            per_image_secs: 1.0,
        };
        let slots = plan_slots(&plan, &images(2)).unwrap();
        assert_eq!(slots.cycles(), 300.0);
        assert!(slots.exceeds_cycles(50.0));
        assert!(!slots.exceeds_cycles(300.0));
    }

    #[test]
    fn test_empty_image_set_rejected() {
        let plan = DurationPlan {
            audio_secs: 1.0,
            total_secs: 1.0,
            per_image_secs: 1.0,
        };
        assert!(plan_slots(&plan, &[]).is_err());
    }
}
