//! Naming convention for generated derivative folders and files.
//!
//! Derivatives live next to their source folder, named by appending a size
//! suffix to the folder name, and each file gets the same suffix before a
//! normalized `.jpg` extension:
//!
//! ```text
//! Trip/                   source
//! ├── dawn.png
//! Trip-1200x800/          thumbnails, fit within 1200×800
//! ├── dawn-1200x800.jpg
//! Trip-75/                icons, 75×75 top-anchored crop
//! └── dawn-75.jpg
//! ```
//!
//! Because derivatives are siblings, a recursive run over the parent would
//! find them again. [`Derivatives::is_derivative_name`] recognises them by
//! name so traversal can skip them.

use std::path::{Path, PathBuf};

/// Extension every derivative is written with.
pub const DERIVATIVE_EXTENSION: &str = "jpg";

/// A kind of derivative and the suffix it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivative {
    /// Resize to fit within `width × height`.
    Thumbnail { width: u32, height: u32 },
    /// Square crop of `size × size`.
    Icon { size: u32 },
}

impl Derivative {
    /// Suffix appended to folder names and file stems: `-1200x800` or `-75`.
    pub fn suffix(&self) -> String {
        match self {
            Derivative::Thumbnail { width, height } => format!("-{width}x{height}"),
            Derivative::Icon { size } => format!("-{size}"),
        }
    }

    /// Sibling folder that receives this derivative for `source_dir`.
    ///
    /// `photos/Trip` → `photos/Trip-1200x800`
    pub fn folder_for(&self, source_dir: &Path) -> PathBuf {
        let name = source_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent = source_dir.parent().unwrap_or_else(|| Path::new(""));
        parent.join(format!("{name}{}", self.suffix()))
    }

    /// Output filename for a source image: `dawn.png` → `dawn-75.jpg`.
    ///
    /// Only the last extension is replaced, so `a.b.jpeg` → `a.b-75.jpg`.
    pub fn file_name_for(&self, source: &Path) -> String {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{stem}{}.{DERIVATIVE_EXTENSION}", self.suffix())
    }

    /// Short label used in progress output.
    pub fn label(&self) -> String {
        match self {
            Derivative::Thumbnail { width, height } => format!("{width}x{height}"),
            Derivative::Icon { size } => format!("icon {size}"),
        }
    }
}

/// The derivative set of a run, used both to name outputs and to recognise
/// previously generated folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivatives {
    pub icon_size: u32,
}

impl Derivatives {
    pub fn new(icon_size: u32) -> Self {
        Self { icon_size }
    }

    /// Whether a directory name looks like a generated derivative folder.
    ///
    /// Matches any `-<W>x<H>` suffix, and a `-<N>` suffix only when `N` is the
    /// configured icon size, so `Trip-2019` is still a regular folder.
    pub fn is_derivative_name(&self, name: &str) -> bool {
        let Some((_, suffix)) = name.rsplit_once('-') else {
            return false;
        };
        if let Some((w, h)) = suffix.split_once('x') {
            return is_number(w) && is_number(h);
        }
        is_number(suffix) && suffix.parse::<u32>().ok() == Some(self.icon_size)
    }

    /// Descend predicate for traversal: false for derivative folders.
    pub fn should_descend(&self, dir: &Path) -> bool {
        dir.file_name()
            .map(|n| !self.is_derivative_name(&n.to_string_lossy()))
            .unwrap_or(true)
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
