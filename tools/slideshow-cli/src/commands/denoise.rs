//! Remove wind noise from a video's audio.

use std::path::PathBuf;

use anyhow::Context;
use slideshow_audio_filter::{filter_wind_noise, WindFilterJob};
use slideshow_common::clock::format_hms;
use slideshow_common::config::AppConfig;
use slideshow_toolchain::SystemRunner;

pub fn run(
    input: PathBuf,
    cutoff: Option<f64>,
    output: PathBuf,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let job = WindFilterJob {
        input_video: input,
        output_path: output,
        cutoff_hz: cutoff.unwrap_or(config.wind_filter.cutoff_hz),
    };
    let mut runner = SystemRunner::new();

    println!("Filtering: {}", job.input_video.display());
    println!("  High-pass cutoff: {} Hz", job.cutoff_hz);

    let report = filter_wind_noise(&job, config, &mut runner).with_context(|| {
        format!(
            "Wind filtering failed; tool output is logged under {}",
            config.resolved_log_dir().display()
        )
    })?;

    if report.passthrough {
        println!(
            "  [WARN] Cutoff is above Nyquist ({} Hz); audio was not filtered",
            report.sample_rate / 2
        );
    }

    println!();
    println!("Filtered video: {}", report.output_path.display());
    println!(
        "  Audio: {} Hz, {} channel(s), normalized cutoff {:.4}",
        report.sample_rate, report.channels, report.normalized_cutoff
    );
    println!("Process took {}", format_hms(report.elapsed_secs));
    println!("Command output logged to: {}", report.log_path.display());

    Ok(())
}
