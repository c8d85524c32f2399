//! Image I/O boundary.
//!
//! The engine only talks to an [`ImageStore`], so runs can be exercised in
//! memory. [`FsImageStore`] is the filesystem implementation: images are
//! decoded and converted to RGB on load and encoded as RGB JPEG on save.

use crate::core::error::{AugmentError, AugmentResult};
use crate::core::types::Image;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions accepted by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "tif", "webp"];

/// Read/write capability the engine needs.
pub trait ImageStore {
    /// Candidate images directly inside `dir`, in a stable order.
    fn list_images(&self, dir: &Path) -> AugmentResult<Vec<PathBuf>>;

    /// Decode an image into RGB.
    fn load(&self, path: &Path) -> AugmentResult<Image>;

    /// Encode an RGB image to `path`.
    fn save(&self, path: &Path, image: &Image) -> AugmentResult<()>;

    /// Create `dir` (and parents) if missing.
    fn ensure_dir(&self, dir: &Path) -> AugmentResult<()>;
}

/// Filesystem-backed store.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    /// Lowercase extensions to accept; empty accepts every file.
    extensions: Vec<String>,
    jpeg_quality: u8,
}

impl FsImageStore {
    pub fn new(extensions: &[impl AsRef<str>], jpeg_quality: u8) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// Check a path against the extension filter.
    pub fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        self.extensions.iter().any(|e| *e == extension)
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }
}

impl Default for FsImageStore {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS, 95)
    }
}

impl ImageStore for FsImageStore {
    fn list_images(&self, dir: &Path) -> AugmentResult<Vec<PathBuf>> {
        let mut images = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                AugmentError::io(path, e.into())
            })?;
            if entry.file_type().is_file() && self.accepts(entry.path()) {
                images.push(entry.into_path());
            }
        }
        Ok(images)
    }

    fn load(&self, path: &Path) -> AugmentResult<Image> {
        let decoded = image::open(path).map_err(|e| AugmentError::image(path, e))?;
        Ok(decoded.to_rgb8())
    }

    fn save(&self, path: &Path, image: &Image) -> AugmentResult<()> {
        let file = File::create(path).map_err(|e| AugmentError::io(path, e))?;
        let mut output = BufWriter::new(file);
        let mut encoder = JpegEncoder::new_with_quality(&mut output, self.jpeg_quality);
        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| AugmentError::image(path, e))?;
        output.flush().map_err(|e| AugmentError::io(path, e))
    }

    fn ensure_dir(&self, dir: &Path) -> AugmentResult<()> {
        std::fs::create_dir_all(dir).map_err(|e| AugmentError::io(dir, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        Image::from_pixel(width, height, Rgb([200, 30, 60]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        write_png(&dir.path().join("b.png"), 4, 4);
        write_png(&dir.path().join("a.PNG"), 4, 4);
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let store = FsImageStore::default();
        let listed = store.list_images(dir.path()).unwrap();
        let names: Vec<_> = listed
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.png"]);
    }

    #[test]
    fn test_empty_filter_accepts_every_file() {
        let dir = TempDir::new().unwrap();
        write_png(&dir.path().join("a.png"), 2, 2);
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let store = FsImageStore::new(&[] as &[&str], 90);
        assert_eq!(store.list_images(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_list_does_not_recurse() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        write_png(&dir.path().join("sub").join("deep.png"), 2, 2);
        assert!(FsImageStore::default()
            .list_images(dir.path())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = FsImageStore::default()
            .list_images(&dir.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, AugmentError::Io { .. }));
    }

    #[test]
    fn test_save_then_load_jpeg() {
        let dir = TempDir::new().unwrap();
        let store = FsImageStore::default();
        let out_dir = dir.path().join("out").join("nested");
        store.ensure_dir(&out_dir).unwrap();

        let image = Image::from_pixel(10, 6, Rgb([120, 120, 120]));
        let path = out_dir.join("x_rotation_1.jpg");
        store.save(&path, &image).unwrap();

        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded.dimensions(), (10, 6));
        // lossy, but a flat gray survives closely
        assert!(loaded.get_pixel(5, 3)[0].abs_diff(120) <= 3);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_reports_write_failure() {
        // every write to /dev/full fails with ENOSPC
        let image = Image::from_pixel(8, 8, Rgb([1, 2, 3]));
        let err = FsImageStore::default()
            .save(Path::new("/dev/full"), &image)
            .unwrap_err();
        assert!(matches!(err, AugmentError::Io { .. }), "{:?}", err);
    }

    #[test]
    fn test_load_converts_to_rgb() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::from_pixel(3, 3, image::Luma([77]))
            .save(&path)
            .unwrap();
        let loaded = FsImageStore::default().load(&path).unwrap();
        assert_eq!(loaded.get_pixel(1, 1), &Rgb([77, 77, 77]));
    }

    #[test]
    fn test_undecodable_file_is_image_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let err = FsImageStore::default().load(&path).unwrap_err();
        assert!(matches!(err, AugmentError::Image { .. }));
    }
}
