//! Error types shared across slideshow crates.

use std::path::PathBuf;

/// Top-level error type for slideshow operations.
///
/// Each processing variant corresponds to one external-tool stage; a
/// failure in any of them is terminal for the run.
#[derive(Debug, thiserror::Error)]
pub enum SlideshowError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Probe error: {message}")]
    Probe { message: String },

    #[error("Cannot split {total_secs}s across zero images")]
    Division { total_secs: f64 },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Concat error: {message}")]
    Concat { message: String },

    #[error("Mux error: {message}")]
    Mux { message: String },

    #[error("Filter error: {message}")]
    Filter { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SlideshowError.
pub type SlideshowResult<T> = Result<T, SlideshowError>;

impl SlideshowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn concat(msg: impl Into<String>) -> Self {
        Self::Concat {
            message: msg.into(),
        }
    }

    pub fn mux(msg: impl Into<String>) -> Self {
        Self::Mux {
            message: msg.into(),
        }
    }

    pub fn filter(msg: impl Into<String>) -> Self {
        Self::Filter {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error is a precondition failure raised before any
    /// processing started.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::FileNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(SlideshowError::validation("missing").is_validation());
        assert!(SlideshowError::FileNotFound {
            path: PathBuf::from("audio.mp3")
        }
        .is_validation());
        assert!(!SlideshowError::mux("ffmpeg exited with status 1").is_validation());
        assert!(!SlideshowError::Division { total_secs: 10.0 }.is_validation());
    }

    #[test]
    fn test_messages_are_short_and_stage_prefixed() {
        assert_eq!(
            SlideshowError::concat("ffmpeg exited with status 1").to_string(),
            "Concat error: ffmpeg exited with status 1"
        );
        assert_eq!(
            SlideshowError::FileNotFound {
                path: PathBuf::from("songs/a.mp3")
            }
            .to_string(),
            "File not found: songs/a.mp3"
        );
    }
}
