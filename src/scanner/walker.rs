//! Folder scanner built on walkdir.
//!
//! # Overview
//!
//! [`FolderScanner`] walks one root folder (depth unbounded) and tags every
//! supported file it finds:
//!
//! - files directly under the root become [`ItemKind::RootFile`]
//! - deeper files become [`ItemKind::SubfolderFile`] and carry the path of
//!   their parent directory relative to the root
//! - with [`FolderPolicy::ImageFolders`], a first-level subfolder made only
//!   of images becomes a single [`ItemKind::ImageFolder`] item
//!
//! Traversal is sequential and sorted by file name so that repeated scans of
//! an unchanged tree yield identical item lists.
//!
//! A missing root is not an error: it simply yields no items.
//!
//! [`ItemKind::RootFile`]: super::ItemKind::RootFile
//! [`ItemKind::SubfolderFile`]: super::ItemKind::SubfolderFile
//! [`ItemKind::ImageFolder`]: super::ItemKind::ImageFolder

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileCategory, FileItem, FolderPolicy, ScanConfig, ScanError};

/// Items discovered under one root, plus any entries that could not be read.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// The scanned root
    pub root: PathBuf,
    /// Discovered items, in traversal order
    pub items: Vec<FileItem>,
    /// Non-fatal errors encountered while walking
    pub errors: Vec<ScanError>,
}

/// Scanner for a single root folder.
#[derive(Debug, Clone)]
pub struct FolderScanner {
    /// Root path to walk
    root: PathBuf,
    /// Scanner configuration
    config: ScanConfig,
}

impl FolderScanner {
    /// Create a new scanner for the given root.
    #[must_use]
    pub fn new(root: &Path, config: ScanConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    /// Walk the root and collect every eligible item.
    ///
    /// Unreadable entries are recorded in [`ScanResult::errors`] and the walk
    /// continues past them.
    #[must_use]
    pub fn scan(&self) -> ScanResult {
        let mut result = ScanResult {
            root: self.root.clone(),
            ..Default::default()
        };

        if !self.root.exists() {
            log::warn!("Folder does not exist, skipping: {}", self.root.display());
            return result;
        }
        if !self.root.is_dir() {
            log::warn!("Not a directory, skipping: {}", self.root.display());
            result
                .errors
                .push(ScanError::NotADirectory(self.root.clone()));
            return result;
        }

        let skip_hidden = self.config.skip_hidden;
        let mut entries = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| !(skip_hidden && is_hidden(e)));

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) => {
                    result.errors.push(self.handle_walk_error(e));
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if entry.depth() == 1
                    && self.config.folder_policy == FolderPolicy::ImageFolders
                    && self.is_image_folder(entry.path())
                {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    log::debug!("Image folder: {}", entry.path().display());
                    result.items.push(FileItem::image_folder(
                        entry.path().to_path_buf(),
                        name.clone(),
                        PathBuf::from(name),
                    ));
                    entries.skip_current_dir();
                }
                continue;
            }

            // Unfollowed symlinks and special files are not collected
            if !file_type.is_file() {
                log::trace!("Skipping non-regular entry: {}", entry.path().display());
                continue;
            }

            if !self.config.accepts(entry.path()) {
                log::trace!("Skipping unsupported type: {}", entry.path().display());
                continue;
            }

            result.items.push(self.classify(&entry));
        }

        log::debug!(
            "Scanned {}: {} items, {} errors",
            self.root.display(),
            result.items.len(),
            result.errors.len()
        );
        result
    }

    /// Tag a supported file as root-level or nested.
    fn classify(&self, entry: &DirEntry) -> FileItem {
        let path = entry.path().to_path_buf();
        let name = entry.file_name().to_string_lossy().into_owned();

        if entry.depth() == 1 {
            return FileItem::root_file(path, name);
        }

        let rel_path = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        FileItem::subfolder_file(path, name, rel_path)
    }

    /// A folder qualifies when it directly holds at least one file, every
    /// entry is an image file, and it has no subfolders.
    fn is_image_folder(&self, dir: &Path) -> bool {
        let Ok(read_dir) = std::fs::read_dir(dir) else {
            return false;
        };

        let mut images = 0usize;
        for entry in read_dir {
            let Ok(entry) = entry else {
                return false;
            };
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if self.config.skip_hidden && hidden {
                continue;
            }

            let is_file = if self.config.follow_symlinks {
                path.is_file()
            } else {
                entry.file_type().is_ok_and(|t| t.is_file())
            };
            if !is_file
                || FileCategory::from_path(&path) != Some(FileCategory::Images)
                || !self.config.accepts(&path)
            {
                return false;
            }
            images += 1;
        }
        images > 0
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.io_error().map(std::io::Error::kind) {
            Some(std::io::ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                ScanError::Io {
                    path,
                    source: std::io::Error::other(error.to_string()),
                }
            }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}
