//! File descriptors and file collections.
//!
//! A [`FileDescriptor`] is what a user picks in a file dialog; a [`FileList`]
//! is what a file input holds after the pick.

use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::path::Path;

/// A file offered to an upload
///
/// Immutable once built: the engine only reads name, type and contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileDescriptor {
    name: String,
    #[serde(rename = "type")]
    mime_type: String,
    #[serde(default)]
    contents: Vec<u8>,
}

impl FileDescriptor {
    /// Create a new file descriptor
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            contents,
        }
    }

    /// Create from a path, guessing the MIME type from its extension.
    ///
    /// Nothing is read from disk; contents stay empty.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::from_path_with_contents(path, Vec::new())
    }

    /// Create from a path with explicit contents
    #[must_use]
    pub fn from_path_with_contents(path: impl AsRef<Path>, contents: Vec<u8>) -> Self {
        let name = path
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let mime_type = guess_mime_type(&name);
        Self {
            name,
            mime_type,
            contents,
        }
    }

    /// Create a text file
    #[must_use]
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, "text/plain", content.into().into_bytes())
    }

    /// Create a JSON file
    #[must_use]
    pub fn json(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, "application/json", content.into().into_bytes())
    }

    /// Create a CSV file
    #[must_use]
    pub fn csv(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, "text/csv", content.into().into_bytes())
    }

    /// Create a PNG image
    #[must_use]
    pub fn png(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self::new(name, "image/png", contents)
    }

    /// Create a PDF document
    #[must_use]
    pub fn pdf(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self::new(name, "application/pdf", contents)
    }

    /// File name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type as supplied by the caller
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Contents as bytes
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.contents.len()
    }
}

/// Ordered, read-only view of the files held by a file input
///
/// `list[i]` and `list.item(i)` agree for every in-range index; `item`
/// returns `None` past the end where indexing would panic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileList {
    files: Vec<FileDescriptor>,
}

impl FileList {
    /// Create an empty file list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the list holds no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// File at `index`, `None` when out of range
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&FileDescriptor> {
        self.files.get(index)
    }

    /// Same as [`item`](Self::item)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FileDescriptor> {
        self.item(index)
    }

    /// Iterate in selection order
    pub fn iter(&self) -> std::slice::Iter<'_, FileDescriptor> {
        self.files.iter()
    }

    /// File names in selection order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(FileDescriptor::name).collect()
    }

    /// Borrow as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[FileDescriptor] {
        &self.files
    }
}

impl Index<usize> for FileList {
    type Output = FileDescriptor;

    fn index(&self, index: usize) -> &Self::Output {
        &self.files[index]
    }
}

impl From<Vec<FileDescriptor>> for FileList {
    fn from(files: Vec<FileDescriptor>) -> Self {
        Self { files }
    }
}

impl FromIterator<FileDescriptor> for FileList {
    fn from_iter<I: IntoIterator<Item = FileDescriptor>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FileList {
    type Item = &'a FileDescriptor;
    type IntoIter = std::slice::Iter<'a, FileDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Guess MIME type from a file name's extension
///
/// Unknown or missing extensions map to `application/octet-stream`.
#[must_use]
pub fn guess_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
