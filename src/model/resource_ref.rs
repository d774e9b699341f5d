//! Book-scoped resource references

use std::fmt;

use super::BookRef;
use crate::error::{FileLinkError, Result};

/// Path separator used by book paths
pub const SEPARATOR_CHAR: char = '/';
pub const SEPARATOR_STRING: &str = "/";

/// Immutable reference to a resource: book plus a path starting with `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    book: BookRef,
    path: String,
}

impl ResourceRef {
    pub fn new(book: BookRef, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if !path.starts_with(SEPARATOR_CHAR) {
            return Err(FileLinkError::invalid_state(format!(
                "Resource path must begin with {}: {}",
                SEPARATOR_CHAR, path
            )));
        }
        Ok(Self { book, path })
    }

    pub fn book(&self) -> &BookRef {
        &self.book
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the path follows the directory convention (trailing `/`)
    pub fn is_directory_path(&self) -> bool {
        self.path.ends_with(SEPARATOR_CHAR)
    }

    /// Last path segment, keeping the trailing separator of a directory.
    ///
    /// Returns `None` when the segment itself is empty, as for `/` or `/a//`.
    ///
    /// # Examples
    /// ```ignore
    /// "/files/report.pdf" -> Some("report.pdf")
    /// "/files/archive/"   -> Some("archive/")
    /// "/"                 -> None
    /// ```
    pub fn filename(&self) -> Option<&str> {
        let without_trailing = self
            .path
            .strip_suffix(SEPARATOR_CHAR)
            .unwrap_or(&self.path);
        let start = without_trailing
            .rfind(SEPARATOR_CHAR)
            .map(|i| i + 1)
            .unwrap_or(0);
        if start >= without_trailing.len() {
            None
        } else {
            Some(&self.path[start..])
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.book.domain(), self.book.prefix(), self.path)
    }
}
