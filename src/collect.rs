//! Folder traversal: which files are images, in what order, and which
//! subfolders are worth descending into.
//!
//! Both pipelines walk folders the same way, so the ordering rules live
//! here in one place:
//!
//! - Within a folder, image files come first, then subfolders; each group
//!   sorted by file name. Contact sheet packing depends on this order, so
//!   it must not depend on what the OS happens to return.
//! - Extensions are matched case-insensitively against
//!   [`ACCEPTED_EXTENSIONS`]. Dot-files and dot-folders are ignored.
//! - Recursion consults a caller-supplied `should_descend` predicate, which
//!   is how generated derivative folders are kept out of a walk.
//!
//! Folders given on the command line are validated once into an
//! [`ImageFolder`]; everything downstream can assume a real directory.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Extensions the contact sheet and thumbnail pipelines accept.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "gif", "png"];

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Not a folder: {0}")]
    NotADirectory(PathBuf),
    #[error("Failed to read directory entry: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A path checked to be an existing directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFolder {
    path: PathBuf,
}

impl ImageFolder {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CollectError> {
        let path = path.into();
        if path.is_dir() {
            Ok(Self { path })
        } else {
            Err(CollectError::NotADirectory(path))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Image files directly inside this folder, in traversal order.
    pub fn images(&self) -> impl Iterator<Item = Result<PathBuf, CollectError>> {
        collect_images(self, false, |_| true)
    }
}

/// Whether `path` names an image file we accept (by extension, not content).
pub fn is_image(path: &Path) -> bool {
    if is_hidden_name(path) {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

fn is_hidden_name(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

/// Files before folders, then by name.
fn files_first_by_name(a: &DirEntry, b: &DirEntry) -> Ordering {
    (a.file_type().is_dir(), a.file_name()).cmp(&(b.file_type().is_dir(), b.file_name()))
}

fn walker(folder: &ImageFolder, recursive: bool) -> WalkDir {
    let max_depth = if recursive { usize::MAX } else { 1 };
    WalkDir::new(folder.path())
        .max_depth(max_depth)
        .sort_by(files_first_by_name)
}

/// Lazily yield the image files under `folder` in traversal order.
///
/// With `recursive`, subfolders are visited after the folder's own images,
/// but only those for which `should_descend` returns true (and which aren't
/// hidden). Unreadable entries are yielded as errors without ending the walk.
pub fn collect_images<F>(
    folder: &ImageFolder,
    recursive: bool,
    mut should_descend: F,
) -> impl Iterator<Item = Result<PathBuf, CollectError>> + use<F>
where
    F: FnMut(&Path) -> bool,
{
    walker(folder, recursive)
        .min_depth(1)
        .into_iter()
        .filter_entry(move |e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || (!is_hidden_name(e.path()) && should_descend(e.path()))
        })
        .filter_map(|entry| match entry {
            Ok(e) if !e.file_type().is_dir() && is_image(e.path()) && e.path().is_file() => {
                Some(Ok(e.into_path()))
            }
            Ok(_) => None,
            Err(err) => Some(Err(CollectError::Walk(err))),
        })
}

/// Lazily yield `folder` itself and, with `recursive`, every descendant
/// folder `should_descend` accepts, in traversal order.
pub fn collect_folders<F>(
    folder: &ImageFolder,
    recursive: bool,
    mut should_descend: F,
) -> impl Iterator<Item = Result<ImageFolder, CollectError>> + use<F>
where
    F: FnMut(&Path) -> bool,
{
    let max_depth = if recursive { usize::MAX } else { 0 };
    walker(folder, recursive)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(move |e| {
            e.depth() == 0
                || (e.file_type().is_dir()
                    && !is_hidden_name(e.path())
                    && should_descend(e.path()))
        })
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_dir() => Some(Ok(ImageFolder {
                path: e.into_path(),
            })),
            Ok(_) => None,
            Err(err) => Some(Err(CollectError::Walk(err))),
        })
}
