//! Slideshow job orchestration.
//!
//! Runs strictly in order: validate, probe, plan, render every slot,
//! concatenate, mux. The run context owns every intermediate file and
//! releases them on every exit path.

use std::path::PathBuf;

use serde::Serialize;
use slideshow_common::config::AppConfig;
use slideshow_common::error::{SlideshowError, SlideshowResult};
use slideshow_planner::{plan_slots, resolve_durations, DurationPlan, DurationRequest, SlotPlan};
use slideshow_toolchain::probe::probe_duration;
use slideshow_toolchain::{CleanupReport, RunContext, ToolRunner};

use crate::clips::render_clips;
use crate::concat::assemble_clips;
use crate::mux::mux_audio;
use crate::source::MediaSource;

/// A slideshow to build.
#[derive(Debug, Clone)]
pub struct SlideshowJob {
    /// Audio track; its duration drives the plan.
    pub audio_path: PathBuf,

    /// Folder of still images.
    pub images_dir: PathBuf,

    /// Final video path.
    pub output_path: PathBuf,

    /// Requested total and per-image durations.
    pub durations: DurationRequest,
}

/// Result of a dry run: the plan without any rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SlideshowPreview {
    pub plan: DurationPlan,
    pub slots: SlotPlan,
    /// The plan loops the images more than `slot_warning_cycles` times.
    pub long_loop: bool,
    pub log_path: PathBuf,
}

/// Summary of a finished build.
#[derive(Debug, Clone, Serialize)]
pub struct SlideshowReport {
    pub output_path: PathBuf,
    pub plan: DurationPlan,
    pub slot_count: usize,
    pub image_count: usize,
    pub log_path: PathBuf,
    pub elapsed_secs: f64,
    #[serde(skip)]
    pub cleanup: CleanupReport,
}

/// Preconditions checked before anything is probed or rendered.
pub fn validate_job(
    job: &SlideshowJob,
    config: &AppConfig,
    runner: &dyn ToolRunner,
) -> SlideshowResult<()> {
    if !job.audio_path.is_file() {
        return Err(SlideshowError::FileNotFound {
            path: job.audio_path.clone(),
        });
    }

    if !job.images_dir.is_dir() {
        return Err(SlideshowError::validation(format!(
            "Image folder not found: {}",
            job.images_dir.display()
        )));
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

/// Whether `slots` loops the image set often enough to warn about; logs the
/// warning when it does.
pub fn warn_on_long_loop(slots: &SlotPlan, max_cycles: f64) -> bool {
    if !slots.exceeds_cycles(max_cycles) {
        return false;
    }
    tracing::warn!(
        slots = slots.len(),
        images = slots.image_count,
        cycles = slots.cycles(),
        max_cycles,
        "Plan loops the image set many times; rendering may take long"
    );
    true
}

/// Discover images, probe the audio and lay out the slots.
fn prepare(
    job: &SlideshowJob,
    config: &AppConfig,
    runner: &mut dyn ToolRunner,
    ctx: &mut RunContext,
) -> SlideshowResult<(DurationPlan, SlotPlan, bool)> {
    let source = MediaSource::discover(&job.images_dir, &config.slideshow.image_extension)?;

    let audio_secs = probe_duration(runner, ctx, &config.tools.ffprobe, &job.audio_path)?;
    let plan = resolve_durations(audio_secs, &job.durations, source.len())?;
    let slots = plan_slots(&plan, source.images())?;

    let long_loop = warn_on_long_loop(&slots, config.slideshow.slot_warning_cycles);

    tracing::info!(
        audio_secs = plan.audio_secs,
        total_secs = plan.total_secs,
        per_image_secs = plan.per_image_secs,
        expected_output_secs = plan.expected_output_secs(),
        slots = slots.len(),
        images = source.len(),
        "Slideshow plan built"
    );

    Ok((plan, slots, long_loop))
}

/// Validate and plan without rendering.
pub fn preview_slideshow(
    job: &SlideshowJob,
    config: &AppConfig,
    runner: &mut dyn ToolRunner,
) -> SlideshowResult<SlideshowPreview> {
    validate_job(job, config, runner)?;
    let mut ctx = RunContext::start(config.resolved_work_dir(), &config.resolved_log_dir())?;
    let (plan, slots, long_loop) = prepare(job, config, runner, &mut ctx)?;
    let log_path = ctx.log_path().to_path_buf();
    ctx.finish();

    Ok(SlideshowPreview {
        plan,
        slots,
        long_loop,
        log_path,
    })
}

/// Build the slideshow described by `job`.
///
/// This is the main entry point for rendering.
pub fn build_slideshow(
    job: &SlideshowJob,
    config: &AppConfig,
    runner: &mut dyn ToolRunner,
) -> SlideshowResult<SlideshowReport> {
    tracing::info!(
        audio = %job.audio_path.display(),
        images = %job.images_dir.display(),
        output = %job.output_path.display(),
        "Starting slideshow build"
    );

    validate_job(job, config, runner)?;
    let mut ctx = RunContext::start(config.resolved_work_dir(), &config.resolved_log_dir())?;

    let (plan, slots, _) = prepare(job, config, runner, &mut ctx)?;
    let segments = render_clips(runner, &mut ctx, &slots, &config.tools, &config.slideshow)?;
    let raw = assemble_clips(runner, &mut ctx, &segments, &config.tools)?;
    mux_audio(
        runner,
        &mut ctx,
        &raw,
        &job.audio_path,
        &job.output_path,
        &config.tools,
        &config.slideshow,
    )?;

    let elapsed_secs = ctx.clock().elapsed_secs();
    let log_path = ctx.log_path().to_path_buf();
    let cleanup = ctx.finish();

    tracing::info!(
        output = %job.output_path.display(),
        elapsed_secs,
        removed = cleanup.removed,
        "Slideshow finished"
    );

    Ok(SlideshowReport {
        output_path: job.output_path.clone(),
        plan,
        slot_count: slots.len(),
        image_count: slots.image_count,
        log_path,
        elapsed_secs,
        cleanup,
    })
}
