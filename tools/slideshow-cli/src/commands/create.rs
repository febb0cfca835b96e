//! Build a slideshow video.

use anyhow::Context;
use slideshow_common::clock::format_hms;
use slideshow_common::config::AppConfig;
use slideshow_render_engine::build_slideshow;
use slideshow_toolchain::SystemRunner;

use super::SlideshowArgs;

pub fn run(args: SlideshowArgs, config: &AppConfig) -> anyhow::Result<()> {
    let job = args.into_job();
    let mut runner = SystemRunner::new();

    println!("Creating slideshow from: {}", job.images_dir.display());
    println!("  Audio: {}", job.audio_path.display());
    println!("  Output: {}", job.output_path.display());

    let report = build_slideshow(&job, config, &mut runner).with_context(|| {
        format!(
            "Slideshow creation failed; tool output is logged under {}",
            config.resolved_log_dir().display()
        )
    })?;

    println!();
    println!(
        "Slideshow created: {} ({} slots over {} images, {}s each)",
        report.output_path.display(),
        report.slot_count,
        report.image_count,
        report.plan.per_image_secs
    );
    println!("  Total duration: {}", format_hms(report.plan.total_secs));
    println!("  Expected length: {}", format_hms(report.plan.expected_output_secs()));
    println!("Process took {}", format_hms(report.elapsed_secs));
    println!("Command output logged to: {}", report.log_path.display());

    Ok(())
}
