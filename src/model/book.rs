//! Book and page references

use std::fmt;

/// Reference to a book: a domain plus the book's path within it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookRef {
    domain: String,
    path: String,
}

impl BookRef {
    /// Create a book reference. The path is normalized to start with `/`
    /// and to carry no trailing `/` (except for the root book).
    pub fn new(domain: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() {
            "/".to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self {
            domain: domain.into(),
            path,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// URL prefix of the book: its path, or empty for the root book
    ///
    /// # Examples
    /// ```ignore
    /// BookRef::new("example.com", "/docs").prefix() // -> "/docs"
    /// BookRef::new("example.com", "/").prefix()     // -> ""
    /// ```
    pub fn prefix(&self) -> &str {
        if self.path == "/" {
            ""
        } else {
            &self.path
        }
    }
}

impl fmt::Display for BookRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.path)
    }
}

/// Reference to a page within a book
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRef {
    book: BookRef,
    path: String,
}

impl PageRef {
    pub fn new(book: BookRef, path: impl Into<String>) -> Self {
        Self {
            book,
            path: path.into(),
        }
    }

    pub fn book(&self) -> &BookRef {
        &self.book
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.book, self.path)
    }
}
