// audit-pilot-core/src/core/browse.rs
// ============================================================================
// Module: Audit Pilot Browse Types
// Description: Directory listings and file previews for repository browsing.
// Purpose: Model the two valid shapes of a contents response.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A contents request resolves to either a directory listing or a single-file
//! preview. Listings preserve the server's entry order and are produced fresh
//! per path; an empty listing is a valid state distinct from any failure.
//! File previews degrade gracefully: undecodable content yields a preview
//! without text while the external URL stays usable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Entry Kind
// ============================================================================

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Any other provider-reported kind (symlink, submodule).
    Other,
}

impl EntryKind {
    /// Maps a provider-reported type string onto an entry kind.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "file" => Self::File,
            "dir" => Self::Dir,
            _ => Self::Other,
        }
    }

    /// Returns the stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
            Self::Other => "other",
        }
    }
}

// ============================================================================
// SECTION: Directory Entries
// ============================================================================

/// Single entry inside a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Entry name within its directory.
    pub name: String,
    /// Repository-relative path of the entry.
    pub path: String,
    /// Entry kind.
    pub kind: EntryKind,
    /// Size in bytes, when the provider reports one.
    pub size: Option<u64>,
    /// Web URL of the entry, when available.
    pub html_url: Option<String>,
    /// Raw download URL, when available.
    pub download_url: Option<String>,
}

// ============================================================================
// SECTION: File Preview
// ============================================================================

/// Inline preview of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePreview {
    /// File name.
    pub name: String,
    /// Repository-relative path of the file.
    pub path: String,
    /// Size in bytes, when the provider reports one.
    pub size: Option<u64>,
    /// Decoded UTF-8 text, or `None` when no preview could be produced.
    pub text: Option<String>,
    /// Web URL of the file, when available.
    pub html_url: Option<String>,
}

// ============================================================================
// SECTION: Browse View
// ============================================================================

/// Content resolved for a browse request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowseContents {
    /// Directory listing in server order. May be empty.
    Listing(Vec<ContentEntry>),
    /// Single-file preview.
    File(FilePreview),
}

/// Committed result of a browse request: the path plus its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseView {
    /// Repository-relative path this view was resolved for. Empty at root.
    pub path: String,
    /// Resolved contents.
    pub contents: BrowseContents,
}

impl BrowseView {
    /// Returns true when the view is an empty directory listing.
    #[must_use]
    pub fn is_empty_dir(&self) -> bool {
        matches!(&self.contents, BrowseContents::Listing(entries) if entries.is_empty())
    }
}
