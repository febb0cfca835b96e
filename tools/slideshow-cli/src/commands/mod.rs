pub mod check;
pub mod create;
pub mod denoise;
pub mod plan;

use std::path::PathBuf;

use clap::Args;
use slideshow_planner::{DurationRequest, TotalDuration};
use slideshow_render_engine::SlideshowJob;

/// Inputs shared by `create` and `plan`.
#[derive(Args)]
pub struct SlideshowArgs {
    /// Audio track; its duration sets the video length
    #[arg(long)]
    pub audio: PathBuf,

    /// Folder of images
    #[arg(long, default_value = "images")]
    pub images: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "slideshow.mp4")]
    pub output: PathBuf,

    /// Seconds each image is shown (0 or omitted splits the total evenly)
    #[arg(long)]
    pub frame_duration: Option<f64>,

    /// Total video length in seconds, or "auto" to match the audio
    #[arg(long, default_value = "auto")]
    pub video_duration: String,
}

impl SlideshowArgs {
    pub fn into_job(self) -> SlideshowJob {
        SlideshowJob {
            audio_path: self.audio,
            images_dir: self.images,
            output_path: self.output,
            durations: DurationRequest {
                total: TotalDuration::parse(&self.video_duration),
                per_image_secs: self.frame_duration,
            },
        }
    }
}
