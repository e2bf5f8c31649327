//! Collision-free destination names.
//!
//! When a destination already exists, a `_N` suffix is inserted (N counting
//! from 1) until a free candidate is found:
//!
//! - files: `photo.jpg` → `photo_1.jpg` → `photo_2.jpg` (before the extension)
//! - folders: `album` → `album_1` → `album_2` (appended to the folder name)
//!
//! The `*_with` variants take the existence check as a predicate so the
//! resolution logic can be tested without touching the filesystem.

use std::path::{Path, PathBuf};

use crate::scanner::path_utils::split_name;

/// First free path for `file_name` inside `dir`, checking the filesystem.
#[must_use]
pub fn next_free_name(dir: &Path, file_name: &str) -> PathBuf {
    next_free_name_with(dir, file_name, |p| p.exists())
}

/// First path for `file_name` inside `dir` for which `exists` is false.
#[must_use]
pub fn next_free_name_with<F>(dir: &Path, file_name: &str, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let candidate = dir.join(file_name);
    if !exists(&candidate) {
        return candidate;
    }

    let (stem, extension) = split_name(file_name);
    (1u64..)
        .map(|n| dir.join(format!("{stem}_{n}{extension}")))
        .find(|candidate| !exists(candidate))
        .unwrap_or(candidate)
}

/// First free folder path derived from `target`, checking the filesystem.
#[must_use]
pub fn next_free_dir(target: &Path) -> PathBuf {
    next_free_dir_with(target, |p| p.exists())
}

/// First folder path derived from `target` for which `exists` is false.
///
/// The suffix always derives from the original folder name, so the
/// sequence is `album_1`, `album_2`, never `album_1_2`.
#[must_use]
pub fn next_free_dir_with<F>(target: &Path, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    if !exists(target) {
        return target.to_path_buf();
    }

    let Some(name) = target.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return target.to_path_buf();
    };
    let parent = target.parent().unwrap_or_else(|| Path::new(""));

    (1u64..)
        .map(|n| parent.join(format!("{name}_{n}")))
        .find(|candidate| !exists(candidate))
        .unwrap_or_else(|| target.to_path_buf())
}
