//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SlideshowError, SlideshowResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// External tool program names.
    pub tools: ToolConfig,

    /// Slideshow encode defaults.
    pub slideshow: SlideshowDefaults,

    /// Wind-noise filter defaults.
    pub wind_filter: WindFilterDefaults,

    /// Directory for transient artifacts. `None` means the current directory.
    pub work_dir: Option<PathBuf>,

    /// Directory for run log files. `None` means `<temp>/slideshow`.
    pub log_dir: Option<PathBuf>,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Programs invoked as subprocesses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Media transcoder.
    pub ffmpeg: String,

    /// Media format prober.
    pub ffprobe: String,
}

/// Slideshow segment and mux parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowDefaults {
    /// Image file extension picked up from the image folder (without dot).
    pub image_extension: String,

    /// Segment width in pixels.
    pub width: u32,

    /// Segment height in pixels.
    pub height: u32,

    /// Segment video codec.
    pub video_codec: String,

    /// Segment pixel format.
    pub pixel_format: String,

    /// Audio codec used when muxing the final file.
    pub audio_codec: String,

    /// Warn when the plan loops the image set more than this many times.
    pub slot_warning_cycles: f64,
}

/// Wind-noise filter parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindFilterDefaults {
    /// High-pass cutoff in Hz.
    pub cutoff_hz: f64,

    /// Butterworth order (even).
    pub order: usize,

    /// Video codec for the filtered output.
    pub video_codec: String,

    /// Audio codec for the filtered output.
    pub audio_codec: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "slideshow=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tools: ToolConfig::default(),
            slideshow: SlideshowDefaults::default(),
            wind_filter: WindFilterDefaults::default(),
            work_dir: None,
            log_dir: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl Default for SlideshowDefaults {
    fn default() -> Self {
        Self {
            image_extension: "jpg".to_string(),
            width: 1280,
            height: 720,
            video_codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
            slot_warning_cycles: 50.0,
        }
    }
}

impl Default for WindFilterDefaults {
    fn default() -> Self {
        Self {
            cutoff_hz: 300.0,
            order: 4,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], a
    /// missing or malformed file is an error.
    pub fn load_from(path: &Path) -> SlideshowResult<Self> {
        if !path.exists() {
            return Err(SlideshowError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            SlideshowError::config(format!("Invalid config at {}: {e}", path.display()))
        })
    }

    /// Directory transient artifacts are written to.
    pub fn resolved_work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Directory run log files are written to.
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("slideshow"))
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("slideshow").join("config.json")
}
