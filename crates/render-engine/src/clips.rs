//! Per-slot segment rendering.

use std::path::{Path, PathBuf};

use slideshow_common::config::{SlideshowDefaults, ToolConfig};
use slideshow_common::error::{SlideshowError, SlideshowResult};
use slideshow_planner::slots::image_label;
use slideshow_planner::{Slot, SlotPlan};
use slideshow_toolchain::{RunContext, Stage, ToolInvocation, ToolRunner};

/// Run-local segment name for a slot.
pub fn segment_name(index: usize) -> String {
    format!("clip_{index}.mp4")
}

/// Seconds in the shortest form that round-trips (`2.5`, `3`, `3.3333333333333335`).
pub fn format_secs(secs: f64) -> String {
    format!("{secs}")
}

/// Loop one still for the slot's duration, scaled to the canonical size.
pub fn clip_invocation(
    ffmpeg: &str,
    slot: &Slot,
    output: &Path,
    settings: &SlideshowDefaults,
) -> ToolInvocation {
    ToolInvocation::new(ffmpeg, Stage::Render)
        .args(["-y", "-loop", "1", "-t"])
        .arg(format_secs(slot.duration_secs))
        .arg("-i")
        .path_arg(&slot.image)
        .arg("-vf")
        .arg(format!("scale={}:{}", settings.width, settings.height))
        .arg("-c:v")
        .arg(settings.video_codec.as_str())
        .arg("-pix_fmt")
        .arg(settings.pixel_format.as_str())
        .path_arg(output)
}

/// Render every slot in order. Stops at the first failure.
///
/// Each segment path is registered with the run before its subprocess
/// starts, so a failure still cleans up everything created so far.
pub fn render_clips(
    runner: &mut dyn ToolRunner,
    ctx: &mut RunContext,
    plan: &SlotPlan,
    tools: &ToolConfig,
    settings: &SlideshowDefaults,
) -> SlideshowResult<Vec<PathBuf>> {
    let mut segments = Vec::with_capacity(plan.len());

    for slot in plan.iter() {
        let output = ctx.register_artifact(&segment_name(slot.index));
        let invocation = clip_invocation(&tools.ffmpeg, slot, &output, settings);

        ctx.run(runner, &invocation).map_err(|err| match err {
            SlideshowError::Render { message } => SlideshowError::render(format!(
                "slot {} ({}): {message}",
                slot.index,
                image_label(&slot.image)
            )),
            other => other,
        })?;

        tracing::debug!(
            slot = slot.index,
            image = %slot.image.display(),
            duration_secs = slot.duration_secs,
            "Rendered segment"
        );
        segments.push(output);
    }

    tracing::info!(segments = segments.len(), "Rendered all segments");
    Ok(segments)
}
