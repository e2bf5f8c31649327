//! Scanner module for folder traversal and content fingerprinting.
//!
//! This module provides functionality for:
//! - Walking one root folder and tagging every supported file
//! - Content hashing with BLAKE3
//! - Unicode normalization of grouping keys
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Folder traversal and [`FileItem`] discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming, 64 KiB blocks)
//! - [`path_utils`]: NFC normalization and file name splitting
//!
//! # Example
//!
//! ```no_run
//! use filecollect::scanner::{FolderScanner, ScanConfig};
//! use std::path::Path;
//!
//! let scanner = FolderScanner::new(Path::new("photos_a"), ScanConfig::default());
//! let result = scanner.scan();
//! for item in &result.items {
//!     println!("{} -> {}", item.base_name(), item.path.display());
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Re-export main types
pub use hasher::{hash_to_hex, Hash, Hasher, HASH_BLOCK_SIZE};
pub use walker::{FolderScanner, ScanResult};

/// How a discovered item is written to the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A file found directly under the scanned root.
    RootFile,
    /// A file found one or more levels below the scanned root.
    SubfolderFile,
    /// A whole first-level subfolder of images, copied as one unit.
    ImageFolder,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::RootFile => write!(f, "root file"),
            ItemKind::SubfolderFile => write!(f, "subfolder file"),
            ItemKind::ImageFolder => write!(f, "image folder"),
        }
    }
}

/// One discovered filesystem entry eligible for merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    /// Absolute source path (a file, or a folder for [`ItemKind::ImageFolder`])
    pub path: PathBuf,
    /// Entry name including extension
    pub name: String,
    /// Write strategy for this item
    pub kind: ItemKind,
    /// Directory path relative to the scanned root.
    ///
    /// Empty for root files. For subfolder files this is the containing
    /// directory; for image folders it is the folder itself.
    pub rel_path: PathBuf,
}

impl FileItem {
    /// Create an item found directly under the scanned root.
    #[must_use]
    pub fn root_file(path: PathBuf, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
            kind: ItemKind::RootFile,
            rel_path: PathBuf::new(),
        }
    }

    /// Create an item found below the scanned root.
    #[must_use]
    pub fn subfolder_file(path: PathBuf, name: impl Into<String>, rel_path: PathBuf) -> Self {
        Self {
            path,
            name: name.into(),
            kind: ItemKind::SubfolderFile,
            rel_path,
        }
    }

    /// Create an item standing for a whole image folder.
    #[must_use]
    pub fn image_folder(path: PathBuf, name: impl Into<String>, rel_path: PathBuf) -> Self {
        Self {
            path,
            name: name.into(),
            kind: ItemKind::ImageFolder,
            rel_path,
        }
    }

    /// Derive the grouping key for this item.
    ///
    /// Root files use their file name without extension. Nested files use
    /// the name of their immediate parent folder, and image folders use
    /// their own name. Keys are NFC-normalized.
    #[must_use]
    pub fn base_name(&self) -> String {
        let raw = match self.kind {
            ItemKind::RootFile => path_utils::split_name(&self.name).0.to_string(),
            ItemKind::SubfolderFile | ItemKind::ImageFolder => self
                .rel_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path_utils::split_name(&self.name).0.to_string()),
        };
        path_utils::normalize_path_str(&raw)
    }
}

/// Category of supported file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Text and office documents
    Documents,
    /// Raster images
    Images,
    /// Audio files
    Audio,
    /// Video files
    Videos,
}

impl FileCategory {
    /// All categories, in declaration order.
    pub const ALL: [FileCategory; 4] = [
        FileCategory::Documents,
        FileCategory::Images,
        FileCategory::Audio,
        FileCategory::Videos,
    ];

    /// Lowercase extensions (without the dot) belonging to this category.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileCategory::Documents => &["txt", "doc", "docx", "pdf"],
            FileCategory::Images => &["jpg", "jpeg", "png", "gif", "bmp", "webp"],
            FileCategory::Audio => &["mp3", "wav", "flac", "m4a", "aac", "wma"],
            FileCategory::Videos => &["mp4", "avi", "mkv", "mov", "wmv", "flv"],
        }
    }

    /// Classify a path by its extension (case-insensitive).
    ///
    /// Returns `None` for unlisted extensions and extension-less names.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.extensions().contains(&extension.as_str()))
    }
}

/// How first-level subfolders are classified before aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderPolicy {
    /// Every supported file is enumerated individually.
    #[default]
    Enumerate,
    /// A first-level subfolder holding only image files becomes one
    /// [`ItemKind::ImageFolder`] item.
    ImageFolders,
}

/// Configuration for folder scanning.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Restrict scanning to these categories. Empty means all categories.
    pub categories: Vec<FileCategory>,

    /// Image folder classification.
    pub folder_policy: FolderPolicy,
}

impl ScanConfig {
    /// Restrict the scan to the given categories.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<FileCategory>) -> Self {
        self.categories = categories;
        self
    }

    /// Set the image folder classification policy.
    #[must_use]
    pub fn with_folder_policy(mut self, policy: FolderPolicy) -> Self {
        self.folder_policy = policy;
        self
    }

    /// Check whether a file path is eligible under this configuration.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        match FileCategory::from_path(path) {
            Some(category) => self.categories.is_empty() || self.categories.contains(&category),
            None => false,
        }
    }
}

/// Errors that can occur during folder scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
