//! Dry run: probe and plan without rendering.

use slideshow_common::clock::format_hms;
use slideshow_common::config::AppConfig;
use slideshow_planner::slots::image_label;
use slideshow_render_engine::preview_slideshow;
use slideshow_toolchain::SystemRunner;

use super::SlideshowArgs;

pub fn run(args: SlideshowArgs, json: bool, config: &AppConfig) -> anyhow::Result<()> {
    let job = args.into_job();
    let mut runner = SystemRunner::new();
    let preview = preview_slideshow(&job, config, &mut runner)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    let plan = &preview.plan;
    println!("Audio duration:   {}", format_hms(plan.audio_secs));
    println!("Total duration:   {}s", plan.total_secs);
    println!("Per image:        {}s", plan.per_image_secs);
    println!("Expected output:  {}", format_hms(plan.expected_output_secs()));
    println!(
        "Slots:            {} ({} images, {:.1} cycles)",
        preview.slots.len(),
        preview.slots.image_count,
        preview.slots.cycles()
    );
    if preview.long_loop {
        println!(
            "Warning: the images repeat more than {} times; rendering may take long",
            config.slideshow.slot_warning_cycles
        );
    }
    println!();

    for slot in preview.slots.iter() {
        println!(
            "  #{:<4} {:<32} {}s",
            slot.index,
            image_label(&slot.image),
            slot.duration_secs
        );
    }

    Ok(())
}
