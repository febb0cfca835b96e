//! Final audio/video mux.

use std::path::Path;

use slideshow_common::config::{SlideshowDefaults, ToolConfig};
use slideshow_common::error::SlideshowResult;
use slideshow_toolchain::{RunContext, Stage, ToolInvocation, ToolRunner};

/// Copy the video stream, re-encode audio, stop at the shorter stream.
pub fn mux_invocation(
    ffmpeg: &str,
    video: &Path,
    audio: &Path,
    output: &Path,
    audio_codec: &str,
) -> ToolInvocation {
    ToolInvocation::new(ffmpeg, Stage::Mux)
        .args(["-y", "-i"])
        .path_arg(video)
        .arg("-i")
        .path_arg(audio)
        .args(["-c:v", "copy", "-c:a", audio_codec, "-shortest"])
        .path_arg(output)
}

/// Write the final file. A partial output this call created is removed on failure.
pub fn mux_audio(
    runner: &mut dyn ToolRunner,
    ctx: &mut RunContext,
    video: &Path,
    audio: &Path,
    output: &Path,
    tools: &ToolConfig,
    settings: &SlideshowDefaults,
) -> SlideshowResult<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let invocation = mux_invocation(&tools.ffmpeg, video, audio, output, &settings.audio_codec);
    ctx.run_into(runner, &invocation, output)?;

    tracing::info!(output = %output.display(), "Muxed audio into final video");
    Ok(())
}
