//! Output naming: where augmented images go and what they are called.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Output directory for an input directory: a sibling named `<input><suffix>`.
///
/// Trailing separators on `input` are ignored, so `photos/` and `photos` both
/// map to `photos_aug`.
pub fn output_dir_for(input: &Path, suffix: &str) -> PathBuf {
    let trimmed: PathBuf = input.components().collect();
    let mut name = OsString::from(trimmed.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Run-wide output counter.
///
/// Starts at 1 and advances once per image actually written, across every
/// operation and every source image of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNamer {
    next: u64,
}

impl OutputNamer {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Counter value the next written image will carry.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// File name for the next output: `<stem>_<t1>_<t2>_..._<n>.jpg`.
    ///
    /// Does not advance the counter; call [`OutputNamer::commit`] once the
    /// file is on disk.
    pub fn file_name(&self, source: &Path, applied: &[impl AsRef<str>]) -> String {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut name = stem;
        for transform in applied {
            name.push('_');
            name.push_str(transform.as_ref());
        }
        format!("{}_{}.jpg", name, self.next)
    }

    /// Advance past a successfully written output.
    pub fn commit(&mut self) -> u64 {
        let written = self.next;
        self.next += 1;
        written
    }
}

impl Default for OutputNamer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dir_is_a_sibling() {
        assert_eq!(
            output_dir_for(Path::new("/data/cats"), "_aug"),
            PathBuf::from("/data/cats_aug")
        );
        assert_eq!(
            output_dir_for(Path::new("data/cats/"), "_aug"),
            PathBuf::from("data/cats_aug")
        );
        assert_eq!(
            output_dir_for(Path::new("cats"), "-out"),
            PathBuf::from("cats-out")
        );
    }

    #[test]
    fn test_single_and_chain_names() {
        let mut namer = OutputNamer::new();
        let source = Path::new("in/cat.png");
        assert_eq!(namer.file_name(source, &["rotation"]), "cat_rotation_1.jpg");
        namer.commit();
        assert_eq!(
            namer.file_name(source, &["flip", "contrast"]),
            "cat_flip_contrast_2.jpg"
        );
    }

    #[test]
    fn test_counter_only_advances_on_commit() {
        let mut namer = OutputNamer::new();
        let source = Path::new("dog.jpeg");
        let first = namer.file_name(source, &["zoom"]);
        assert_eq!(namer.file_name(source, &["zoom"]), first);
        assert_eq!(namer.commit(), 1);
        assert_eq!(namer.peek(), 2);
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let namer = OutputNamer::new();
        assert_eq!(
            namer.file_name(Path::new("a.bmp"), &["flip", "flip"]),
            "a_flip_flip_1.jpg"
        );
    }

    #[test]
    fn test_stem_keeps_inner_dots() {
        let namer = OutputNamer::new();
        assert_eq!(
            namer.file_name(Path::new("x/img.v2.png"), &["shear"]),
            "img.v2_shear_1.jpg"
        );
    }
}
