//! Media inspection through the external prober.

use std::path::Path;

use slideshow_common::error::{SlideshowError, SlideshowResult};

use crate::context::RunContext;
use crate::process::{Stage, ToolInvocation, ToolRunner};

/// Sample layout of a file's first audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioStreamInfo {
    pub sample_rate: u32,
    pub channels: u16,
}

/// `ffprobe -i <path> -show_entries format=duration -v quiet -of csv=p=0`
pub fn duration_invocation(ffprobe: &str, path: &Path) -> ToolInvocation {
    ToolInvocation::new(ffprobe, Stage::Probe)
        .arg("-i")
        .path_arg(path)
        .args(["-show_entries", "format=duration", "-v", "quiet", "-of", "csv=p=0"])
}

/// Container duration of `path` in seconds.
pub fn probe_duration(
    runner: &mut dyn ToolRunner,
    ctx: &mut RunContext,
    ffprobe: &str,
    path: &Path,
) -> SlideshowResult<f64> {
    let output = ctx.run(runner, &duration_invocation(ffprobe, path))?;
    let duration = parse_duration(&output.stdout)?;
    tracing::info!(path = %path.display(), duration_secs = duration, "Probed media duration");
    Ok(duration)
}

/// Parse the prober's single decimal-seconds line.
pub fn parse_duration(raw: &str) -> SlideshowResult<f64> {
    let trimmed = raw.trim();
    trimmed.parse::<f64>().map_err(|_| {
        SlideshowError::probe(format!(
            "Prober returned a non-numeric duration: {trimmed:?}"
        ))
    })
}

pub fn stream_invocation(ffprobe: &str, path: &Path) -> ToolInvocation {
    ToolInvocation::new(ffprobe, Stage::Probe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "a:0",
            "-show_entries",
            "stream=sample_rate,channels",
            "-of",
            "default=noprint_wrappers=1",
        ])
        .path_arg(path)
}

/// Sample rate and channel count of the first audio stream of `path`.
pub fn probe_audio_stream(
    runner: &mut dyn ToolRunner,
    ctx: &mut RunContext,
    ffprobe: &str,
    path: &Path,
) -> SlideshowResult<AudioStreamInfo> {
    let output = ctx.run(runner, &stream_invocation(ffprobe, path))?;
    let info = parse_stream_info(&output.stdout)?;
    tracing::info!(
        path = %path.display(),
        sample_rate = info.sample_rate,
        channels = info.channels,
        "Probed audio stream"
    );
    Ok(info)
}

/// Parse `key=value` lines for `sample_rate` and `channels`.
pub fn parse_stream_info(raw: &str) -> SlideshowResult<AudioStreamInfo> {
    let mut sample_rate = None;
    let mut channels = None;

    for line in raw.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "sample_rate" => sample_rate = value.trim().parse::<u32>().ok(),
            "channels" => channels = value.trim().parse::<u16>().ok(),
            _ => {}
        }
    }

    match (sample_rate, channels) {
        (Some(sample_rate), Some(channels)) if sample_rate > 0 && channels > 0 => {
            Ok(AudioStreamInfo {
                sample_rate,
                channels,
            })
        }
        _ => Err(SlideshowError::probe(format!(
            "No usable audio stream reported: {:?}",
            raw.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRunner;

    #[test]
    fn test_parse_duration_trims_whitespace() {
        assert_eq!(parse_duration("10.000000\n").unwrap(), 10.0);
        assert_eq!(parse_duration("  187.392 ").unwrap(), 187.392);
    }

    #[test]
    fn test_parse_duration_surfaces_raw_output() {
        let err = parse_duration("N/A\n").unwrap_err();
        assert!(matches!(err, SlideshowError::Probe { .. }));
        assert!(err.to_string().contains("\"N/A\""));
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn test_parse_stream_info_any_order() {
        let info = parse_stream_info("channels=2\nsample_rate=44100\n").unwrap();
        assert_eq!(
            info,
            AudioStreamInfo {
                sample_rate: 44100,
                channels: 2
            }
        );
    }

    #[test]
    fn test_parse_stream_info_without_audio() {
        assert!(matches!(
            parse_stream_info(""),
            Err(SlideshowError::Probe { .. })
        ));
        assert!(parse_stream_info("sample_rate=0\nchannels=1\n").is_err());
    }

    #[test]
    fn test_duration_invocation_shape() {
        let invocation = duration_invocation("ffprobe", Path::new("song.mp3"));
        assert_eq!(
            invocation.command_line(),
            "ffprobe -i song.mp3 -show_entries format=duration -v quiet -of csv=p=0"
        );
    }

    #[test]
    fn test_probe_duration_through_runner() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = RunContext::start(dir.path(), &dir.path().join("logs")).unwrap();
        let mut runner = RecordingRunner::new().with_stdout(Stage::Probe, "42.25\n");

        let secs =
            probe_duration(&mut runner, &mut ctx, "ffprobe", Path::new("song.mp3")).unwrap();
        assert_eq!(secs, 42.25);
        assert_eq!(runner.invocations().len(), 1);
    }
}
