//! Wind-noise removal for an existing video.

use std::path::{Path, PathBuf};

use serde::Serialize;
use slideshow_common::config::{AppConfig, WindFilterDefaults};
use slideshow_common::error::{SlideshowError, SlideshowResult};
use slideshow_toolchain::probe::{probe_audio_stream, AudioStreamInfo};
use slideshow_toolchain::{CleanupReport, RunContext, Stage, ToolInvocation, ToolRunner};

use crate::highpass::HighPassFilter;
use crate::pcm::{deinterleave, interleave, read_pcm, write_pcm};

pub const EXTRACTED_AUDIO_NAME: &str = "audio.f64le";
pub const FILTERED_AUDIO_NAME: &str = "filtered.f64le";

#[derive(Debug, Clone)]
pub struct WindFilterJob {
    pub input_video: PathBuf,
    pub output_path: PathBuf,
    pub cutoff_hz: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindFilterReport {
    pub output_path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: usize,
    pub cutoff_hz: f64,
    pub normalized_cutoff: f64,
    pub passthrough: bool,
    pub log_path: PathBuf,
    pub elapsed_secs: f64,
    #[serde(skip)]
    pub cleanup: CleanupReport,
}

/// Decode the first audio stream to interleaved f64le PCM.
pub fn extract_invocation(ffmpeg: &str, video: &Path, output: &Path) -> ToolInvocation {
    ToolInvocation::new(ffmpeg, Stage::ExtractAudio)
        .args(["-y", "-i"])
        .path_arg(video)
        .args(["-vn", "-map", "0:a:0", "-f", "f64le", "-acodec", "pcm_f64le"])
        .path_arg(output)
}

/// Pair the original video frames with filtered PCM, re-encoding both.
pub fn reattach_invocation(
    ffmpeg: &str,
    video: &Path,
    pcm: &Path,
    stream: AudioStreamInfo,
    output: &Path,
    settings: &WindFilterDefaults,
) -> ToolInvocation {
    ToolInvocation::new(ffmpeg, Stage::ReattachAudio)
        .args(["-y", "-i"])
        .path_arg(video)
        .args(["-f", "f64le", "-ar"])
        .arg(stream.sample_rate.to_string())
        .arg("-ac")
        .arg(stream.channels.to_string())
        .arg("-i")
        .path_arg(pcm)
        .args(["-map", "0:v:0", "-map", "1:a:0", "-c:v"])
        .arg(settings.video_codec.as_str())
        .arg("-c:a")
        .arg(settings.audio_codec.as_str())
        .path_arg(output)
}

/// Filter every channel of interleaved PCM independently.
pub fn filter_interleaved(filter: &HighPassFilter, samples: &[f64], channels: usize) -> Vec<f64> {
    let filtered: Vec<Vec<f64>> = deinterleave(samples, channels)
        .iter()
        .map(|channel| filter.apply(channel))
        .collect();
    interleave(&filtered)
}

fn validate_job(
    job: &WindFilterJob,
    config: &AppConfig,
    runner: &dyn ToolRunner,
) -> SlideshowResult<()> {
    if !job.input_video.is_file() {
        return Err(SlideshowError::FileNotFound {
            path: job.input_video.clone(),
        });
    }

    for program in [&config.tools.ffmpeg, &config.tools.ffprobe] {
        if !runner.is_available(program) {
            return Err(SlideshowError::validation(format!(
                "{program} is not installed or not on PATH"
            )));
        }
    }

    Ok(())
}

/// High-pass the soundtrack of `job.input_video` into `job.output_path`.
pub fn filter_wind_noise(
    job: &WindFilterJob,
    config: &AppConfig,
    runner: &mut dyn ToolRunner,
) -> SlideshowResult<WindFilterReport> {
    validate_job(job, config, runner)?;
    let mut ctx = RunContext::start(config.resolved_work_dir(), &config.resolved_log_dir())?;
    let tools = &config.tools;

    let stream = probe_audio_stream(runner, &mut ctx, &tools.ffprobe, &job.input_video)?;
    let filter =
        HighPassFilter::design(job.cutoff_hz, stream.sample_rate, config.wind_filter.order)?;
    tracing::info!(
        cutoff_hz = job.cutoff_hz,
        sample_rate = stream.sample_rate,
        normalized_cutoff = filter.normalized_cutoff(),
        order = filter.order(),
        "Designed high-pass filter"
    );

    let extracted = ctx.register_artifact(EXTRACTED_AUDIO_NAME);
    ctx.run(runner, &extract_invocation(&tools.ffmpeg, &job.input_video, &extracted))?;

    let channels = usize::from(stream.channels);
    let samples = read_pcm(&extracted)?;
    let filtered = filter_interleaved(&filter, &samples, channels);
    let frames = filtered.len() / channels;

    let filtered_path = ctx.register_artifact(FILTERED_AUDIO_NAME);
    write_pcm(&filtered_path, &filtered)?;
    tracing::debug!(frames, channels, "Filtered extracted audio");

    if let Some(parent) = job.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let reattach = reattach_invocation(
        &tools.ffmpeg,
        &job.input_video,
        &filtered_path,
        stream,
        &job.output_path,
        &config.wind_filter,
    );
    ctx.run_into(runner, &reattach, &job.output_path)?;

    let elapsed_secs = ctx.clock().elapsed_secs();
    let log_path = ctx.log_path().to_path_buf();
    let cleanup = ctx.finish();

    tracing::info!(output = %job.output_path.display(), elapsed_secs, "Wind filter finished");

    Ok(WindFilterReport {
        output_path: job.output_path.clone(),
        sample_rate: stream.sample_rate,
        channels: stream.channels,
        frames,
        cutoff_hz: job.cutoff_hz,
        normalized_cutoff: filter.normalized_cutoff(),
        passthrough: filter.is_passthrough(),
        log_path,
        elapsed_secs,
        cleanup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::f64_samples_to_bytes;
    use slideshow_toolchain::testing::RecordingRunner;
    use std::f64::consts::PI;

    struct Fixture {
        _root: tempfile::TempDir,
        video: PathBuf,
        work: PathBuf,
        output: PathBuf,
        config: AppConfig,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let video = root.path().join("slideshow.mp4");
        std::fs::write(&video, b"mp4").unwrap();
        let work = root.path().join("work");

        let mut config = AppConfig::default();
        config.work_dir = Some(work.clone());
        config.log_dir = Some(root.path().join("logs"));

        Fixture {
            output: root.path().join("slideshow_filtered.mp4"),
            _root: root,
            video,
            work,
            config,
        }
    }

    fn job(fx: &Fixture, cutoff_hz: f64) -> WindFilterJob {
        WindFilterJob {
            input_video: fx.video.clone(),
            output_path: fx.output.clone(),
            cutoff_hz,
        }
    }

    /// One second of stereo: left is 50 Hz rumble, right is a 2 kHz tone.
    fn stereo_pcm(sample_rate: u32) -> Vec<f64> {
        let fs = f64::from(sample_rate);
        (0..sample_rate as usize)
            .flat_map(|n| {
                let t = n as f64 / fs;
                [(2.0 * PI * 50.0 * t).sin(), (2.0 * PI * 2000.0 * t).sin()]
            })
            .collect()
    }

    #[test]
    fn test_reattach_invocation_declares_raw_format() {
        let invocation = reattach_invocation(
            "ffmpeg",
            Path::new("in.mp4"),
            Path::new("f.f64le"),
            AudioStreamInfo {
                sample_rate: 44100,
                channels: 2,
            },
            Path::new("out.mp4"),
            &WindFilterDefaults::default(),
        );
        assert_eq!(
            invocation.command_line(),
            "ffmpeg -y -i in.mp4 -f f64le -ar 44100 -ac 2 -i f.f64le -map 0:v:0 -map 1:a:0 \
             -c:v libx264 -c:a aac out.mp4"
        );
    }

    #[test]
    fn test_filter_interleaved_keeps_channels_apart() {
        let filter = HighPassFilter::design(300.0, 16000, 4).unwrap();
        let out = filter_interleaved(&filter, &stereo_pcm(16000), 2);
        assert_eq!(out.len(), 32000);

        let channels = deinterleave(&out, 2);
        assert!(channels[0][8000..].iter().all(|s| s.abs() < 0.01));
        let peak = channels[1][8000..]
            .iter()
            .fold(0.0f64, |acc, s| acc.max(s.abs()));
        assert!(peak > 0.95);
    }

    #[test]
    fn test_filter_wind_noise_end_to_end() {
        let fx = fixture();
        let mut runner = RecordingRunner::new()
            .with_stdout(Stage::Probe, "sample_rate=16000\nchannels=2\n")
            .with_output_bytes(Stage::ExtractAudio, f64_samples_to_bytes(&stereo_pcm(16000)));

        let report = filter_wind_noise(&job(&fx, 300.0), &fx.config, &mut runner).unwrap();

        assert_eq!(report.sample_rate, 16000);
        assert_eq!(report.channels, 2);
        assert_eq!(report.frames, 16000);
        assert!((report.normalized_cutoff - 0.0375).abs() < 1e-12);
        assert!(!report.passthrough);
        assert_eq!(report.cleanup.removed, 2);

        let stages: Vec<_> = runner.invocations().iter().map(|inv| inv.stage).collect();
        assert_eq!(
            stages,
            [Stage::Probe, Stage::ExtractAudio, Stage::ReattachAudio]
        );
        assert!(fx.output.exists());
        assert_eq!(std::fs::read_dir(&fx.work).unwrap().count(), 0);
    }

    #[test]
    fn test_cutoff_above_nyquist_still_produces_output() {
        let fx = fixture();
        let mut runner =
            RecordingRunner::new().with_stdout(Stage::Probe, "sample_rate=8000\nchannels=1\n");

        let report = filter_wind_noise(&job(&fx, 6000.0), &fx.config, &mut runner).unwrap();
        assert!(report.passthrough);
        assert!(fx.output.exists());
    }

    #[test]
    fn test_missing_input_video() {
        let fx = fixture();
        std::fs::remove_file(&fx.video).unwrap();
        let mut runner = RecordingRunner::new();

        let err = filter_wind_noise(&job(&fx, 300.0), &fx.config, &mut runner).unwrap_err();
        assert!(matches!(err, SlideshowError::FileNotFound { .. }));
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn test_extract_failure_is_filter_error_and_cleans_up() {
        let fx = fixture();
        let mut runner = RecordingRunner::new()
            .with_stdout(Stage::Probe, "sample_rate=16000\nchannels=1\n")
            .failing_at(Stage::ExtractAudio, 0);

        let err = filter_wind_noise(&job(&fx, 300.0), &fx.config, &mut runner).unwrap_err();
        assert!(matches!(err, SlideshowError::Filter { .. }));
        assert_eq!(std::fs::read_dir(&fx.work).unwrap().count(), 0);
        assert!(!fx.output.exists());
    }

    #[test]
    fn test_reattach_failure_removes_partial_output() {
        let fx = fixture();
        let mut runner = RecordingRunner::new()
            .with_stdout(Stage::Probe, "sample_rate=16000\nchannels=1\n")
            .failing_at(Stage::ReattachAudio, 0);

        let err = filter_wind_noise(&job(&fx, 300.0), &fx.config, &mut runner).unwrap_err();
        assert!(matches!(err, SlideshowError::Filter { .. }));
        assert!(!fx.output.exists());
    }

    #[test]
    fn test_reattach_failure_keeps_existing_output() {
        let fx = fixture();
        std::fs::write(&fx.output, b"earlier render").unwrap();
        let mut runner = RecordingRunner::new()
            .with_stdout(Stage::Probe, "sample_rate=16000\nchannels=1\n")
            .failing_at(Stage::ReattachAudio, 0)
            .without_partial_output();

        let err = filter_wind_noise(&job(&fx, 300.0), &fx.config, &mut runner).unwrap_err();
        assert!(matches!(err, SlideshowError::Filter { .. }));
        assert_eq!(std::fs::read(&fx.output).unwrap(), b"earlier render");
        assert_eq!(std::fs::read_dir(&fx.work).unwrap().count(), 0);
    }
}
