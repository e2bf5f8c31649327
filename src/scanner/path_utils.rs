//! Name and path helpers shared by the scanner and the output writer.
//!
//! macOS stores file names in NFD (decomposed) form while Windows and Linux
//! usually store NFC (composed). The same visible name can therefore have
//! two byte representations:
//!
//! - NFC: `café` - 'é' is U+00E9 (single code point)
//! - NFD: `café` - 'e' U+0065 + combining acute accent U+0301
//!
//! Group keys are normalized to NFC so both spellings land in one group.
//!
//! # Example
//!
//! ```
//! use filecollect::scanner::path_utils::{normalize_path_str, split_name};
//!
//! assert_eq!(normalize_path_str("cafe\u{0301}"), "café");
//! assert_eq!(split_name("photo.final.jpg"), ("photo.final", ".jpg"));
//! ```

use std::path::Path;

use unicode_normalization::UnicodeNormalization;

/// Normalize a string to NFC (composed) form.
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Normalized comparison key for a path, suitable for `HashSet` membership.
///
/// The path is canonicalized when possible so that two spellings of the same
/// folder (relative vs absolute, `..` segments, symlinked parents) compare
/// equal. Falls back to the path as given if canonicalization fails.
#[must_use]
pub fn path_key(path: &Path) -> String {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_path_str(&resolved.to_string_lossy())
}

/// Split a file name into stem and extension (the extension keeps its dot).
///
/// Only the last dot counts, and a leading dot does not start an extension:
/// `archive.tar.gz` splits into `archive.tar` and `.gz`, while `.profile`
/// has no extension.
#[must_use]
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => name.split_at(idx),
        _ => (name, ""),
    }
}
