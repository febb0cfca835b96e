//! Segment concatenation through a manifest, without re-encoding.

use std::path::{Path, PathBuf};

use slideshow_common::config::ToolConfig;
use slideshow_common::error::SlideshowResult;
use slideshow_toolchain::{RunContext, Stage, ToolInvocation, ToolRunner};

pub const MANIFEST_NAME: &str = "concat_list.txt";
pub const RAW_VIDEO_NAME: &str = "raw.mp4";

/// Concat-demuxer manifest listing `segments` in order.
///
/// Entries are written relative to `manifest_dir` when possible, since the
/// demuxer resolves relative entries against the manifest's own location.
pub fn manifest_contents(segments: &[PathBuf], manifest_dir: &Path) -> String {
    segments
        .iter()
        .map(|segment| {
            let entry = segment.strip_prefix(manifest_dir).unwrap_or(segment);
            format!("file '{}'\n", escape_entry(&entry.to_string_lossy()))
        })
        .collect()
}

/// Quote-escape for the concat demuxer: `'` becomes `'\''`.
fn escape_entry(entry: &str) -> String {
    entry.replace('\'', r"'\''")
}

pub fn concat_invocation(ffmpeg: &str, manifest: &Path, output: &Path) -> ToolInvocation {
    ToolInvocation::new(ffmpeg, Stage::Concat)
        .args(["-y", "-f", "concat", "-safe", "0", "-i"])
        .path_arg(manifest)
        .args(["-c", "copy"])
        .path_arg(output)
}

/// Join segments into one silent video. Returns the raw video path, which
/// stays registered with the run for cleanup.
pub fn assemble_clips(
    runner: &mut dyn ToolRunner,
    ctx: &mut RunContext,
    segments: &[PathBuf],
    tools: &ToolConfig,
) -> SlideshowResult<PathBuf> {
    let manifest = ctx.register_artifact(MANIFEST_NAME);
    std::fs::write(&manifest, manifest_contents(segments, ctx.work_dir()))?;

    let raw = ctx.register_artifact(RAW_VIDEO_NAME);
    ctx.run(runner, &concat_invocation(&tools.ffmpeg, &manifest, &raw))?;

    tracing::info!(
        segments = segments.len(),
        output = %raw.display(),
        "Concatenated segments"
    );
    Ok(raw)
}
