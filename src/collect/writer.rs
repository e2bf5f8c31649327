//! Materializing one group into the output tree.
//!
//! # Overview
//!
//! A [`GroupWriter`] owns the state of one group's write pass: the group's
//! output directory, the set of content fingerprints already written and the
//! set of image folders already copied. Both sets are scoped to the group;
//! nothing is deduplicated across groups.
//!
//! Items are written in [`write_order`]: root files first, then subfolder
//! files and image folders, each part in natural order of item name.
//!
//! | Kind | Destination | Deduplication | Collision |
//! |---|---|---|---|
//! | root file | `<group>/<name>` | content hash | `name_N.ext` |
//! | subfolder file | `<group>/<rel_path>/<name>` | content hash | `name_N.ext` |
//! | image folder | `<group>/<rel_path>` | source folder path | `folder_N` |

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::groups::Group;
use super::natural::natural_cmp;
use super::naming::{next_free_dir, next_free_name};
use crate::scanner::path_utils::path_key;
use crate::scanner::{hash_to_hex, FileItem, Hash, HashError, Hasher, ItemKind};

/// Failure while writing a single item.
///
/// These never abort a run; the engine records them and moves on.
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    /// The source file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// A destination directory could not be created.
    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Copying failed.
    #[error("Cannot copy {from} to {to}: {source}")]
    Copy {
        /// Source path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Result of writing one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A file was copied to `dest`.
    Copied {
        /// Final destination path
        dest: PathBuf,
        /// Bytes copied
        bytes: u64,
    },
    /// A file's content was already written in this group.
    Duplicate,
    /// An image folder was copied to `dest`.
    FolderCopied {
        /// Final destination folder
        dest: PathBuf,
        /// Bytes copied across all files of the folder
        bytes: u64,
    },
    /// The same source folder was already copied in this group.
    FolderAlreadyCopied,
}

/// Order in which a group's items are written.
///
/// Root files come first, then everything else; each part is sorted by
/// natural order of item name. Ties keep aggregation order.
#[must_use]
pub fn write_order(group: &Group) -> Vec<&FileItem> {
    let (mut roots, mut others): (Vec<&FileItem>, Vec<&FileItem>) = group
        .items
        .iter()
        .partition(|item| item.kind == ItemKind::RootFile);

    roots.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    others.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    roots.extend(others);
    roots
}

/// Per-group write state.
#[derive(Debug)]
pub struct GroupWriter<'a> {
    group_dir: PathBuf,
    hasher: &'a Hasher,
    seen_hashes: HashSet<Hash>,
    seen_folders: HashSet<String>,
}

impl<'a> GroupWriter<'a> {
    /// Start a write pass into `group_dir`, which must already exist.
    #[must_use]
    pub fn new(group_dir: PathBuf, hasher: &'a Hasher) -> Self {
        Self {
            group_dir,
            hasher,
            seen_hashes: HashSet::new(),
            seen_folders: HashSet::new(),
        }
    }

    /// The group's output directory.
    #[must_use]
    pub fn group_dir(&self) -> &Path {
        &self.group_dir
    }

    /// Write one item according to its kind.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if hashing, directory creation or copying fails.
    /// A failed item is not remembered, so a later item with the same
    /// content or source folder is still written.
    pub fn write_item(&mut self, item: &FileItem) -> Result<ItemOutcome, WriteError> {
        match item.kind {
            ItemKind::RootFile => {
                let dir = self.group_dir.clone();
                self.write_file(item, &dir)
            }
            ItemKind::SubfolderFile => {
                let dir = self.group_dir.join(&item.rel_path);
                self.write_file(item, &dir)
            }
            ItemKind::ImageFolder => self.write_image_folder(item),
        }
    }

    fn write_file(&mut self, item: &FileItem, target_dir: &Path) -> Result<ItemOutcome, WriteError> {
        let hash = self.hasher.full_hash(&item.path)?;
        if self.seen_hashes.contains(&hash) {
            log::debug!(
                "Duplicate content {}, skipping {}",
                hash_to_hex(&hash),
                item.path.display()
            );
            return Ok(ItemOutcome::Duplicate);
        }

        fs::create_dir_all(target_dir).map_err(|source| WriteError::CreateDir {
            path: target_dir.to_path_buf(),
            source,
        })?;

        let dest = next_free_name(target_dir, &item.name);
        let bytes = copy_file_preserving(&item.path, &dest).map_err(|source| WriteError::Copy {
            from: item.path.clone(),
            to: dest.clone(),
            source,
        })?;

        self.seen_hashes.insert(hash);
        Ok(ItemOutcome::Copied { dest, bytes })
    }

    fn write_image_folder(&mut self, item: &FileItem) -> Result<ItemOutcome, WriteError> {
        let key = path_key(&item.path);
        if self.seen_folders.contains(&key) {
            log::debug!("Folder already copied, skipping {}", item.path.display());
            return Ok(ItemOutcome::FolderAlreadyCopied);
        }

        let dest = next_free_dir(&self.group_dir.join(&item.rel_path));
        let bytes = copy_dir_recursive(&item.path, &dest)?;

        self.seen_folders.insert(key);
        Ok(ItemOutcome::FolderCopied { dest, bytes })
    }
}

/// Copy a file, keeping permissions and access/modification times.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns the I/O error from the copy itself. Failing to carry over
/// timestamps is only logged.
pub fn copy_file_preserving(from: &Path, to: &Path) -> io::Result<u64> {
    let bytes = fs::copy(from, to)?;

    match fs::metadata(from) {
        Ok(meta) => {
            let atime = filetime::FileTime::from_last_access_time(&meta);
            let mtime = filetime::FileTime::from_last_modification_time(&meta);
            if let Err(e) = filetime::set_file_times(to, atime, mtime) {
                log::warn!("Could not preserve times on {}: {}", to.display(), e);
            }
        }
        Err(e) => log::warn!("Could not read metadata of {}: {}", from.display(), e),
    }

    Ok(bytes)
}

/// Copy a whole folder tree to `to`, which must not exist yet.
///
/// Returns the total number of bytes copied.
///
/// # Errors
///
/// Stops at the first directory or file that cannot be created or copied.
pub fn copy_dir_recursive(from: &Path, to: &Path) -> Result<u64, WriteError> {
    let create_dir = |path: &Path| {
        fs::create_dir_all(path).map_err(|source| WriteError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
    };

    create_dir(to)?;
    let mut bytes = 0u64;

    for entry in WalkDir::new(from).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| from.to_path_buf(), Path::to_path_buf);
            WriteError::Copy {
                from: path,
                to: to.to_path_buf(),
                source: io::Error::other(e.to_string()),
            }
        })?;

        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            create_dir(&target)?;
        } else {
            bytes += copy_file_preserving(entry.path(), &target).map_err(|source| {
                WriteError::Copy {
                    from: entry.path().to_path_buf(),
                    to: target.clone(),
                    source,
                }
            })?;
        }
    }

    Ok(bytes)
}
