//! Image folder discovery.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use slideshow_common::error::{SlideshowError, SlideshowResult};

/// The ordered still images of one run. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    folder: PathBuf,
    images: Vec<PathBuf>,
}

impl MediaSource {
    /// Collect `*.<extension>` files from `folder`, sorted by file name.
    ///
    /// Hidden files are skipped and the extension match is case-sensitive,
    /// as with a shell glob. An empty result is a validation error.
    pub fn discover(folder: &Path, extension: &str) -> SlideshowResult<Self> {
        if !folder.is_dir() {
            return Err(SlideshowError::validation(format!(
                "Image folder not found: {}",
                folder.display()
            )));
        }

        let mut images = Vec::new();
        for entry in std::fs::read_dir(folder)? {
            let entry = entry?;
            // Names need not be UTF-8.
            let hidden = entry.file_name().as_encoded_bytes().first() == Some(&b'.');
            let path = entry.path();
            if hidden || !path.is_file() {
                continue;
            }
            if path.extension() == Some(OsStr::new(extension)) {
                images.push(path);
            }
        }
        images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if images.is_empty() {
            return Err(SlideshowError::validation(format!(
                "No .{extension} images found in folder: {}",
                folder.display()
            )));
        }

        tracing::info!(
            folder = %folder.display(),
            images = images.len(),
            "Discovered images"
        );

        Ok(Self {
            folder: folder.to_path_buf(),
            images,
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.jpg", "c.png", ".hidden.jpg", "d.JPG", "10.jpg"] {
            std::fs::write(dir.path().join(name), b"img").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let source = MediaSource::discover(dir.path(), "jpg").unwrap();
        let names: Vec<_> = source
            .images()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["10.jpg", "a.jpg", "b.jpg"]);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn test_missing_folder_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MediaSource::discover(&dir.path().join("images"), "jpg").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_empty_folder_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cover.png"), b"img").unwrap();
        let err = MediaSource::discover(dir.path(), "jpg").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("No .jpg images"));
    }

    // macOS filesystems reject non-UTF-8 names.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_discover_keeps_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let latin1 = OsStr::from_bytes(b"caf\xe9.jpg");
        std::fs::write(dir.path().join(latin1), b"img").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"img").unwrap();
        std::fs::write(dir.path().join(OsStr::from_bytes(b".\xff.jpg")), b"img").unwrap();

        let source = MediaSource::discover(dir.path(), "jpg").unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.images()[1].file_name(), Some(latin1));
    }
}
