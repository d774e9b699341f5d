//! Local filesystem handles

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Characters escaped in the path of a `file:` URI
const FILE_URI_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A resource's file on the local filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    path: PathBuf,
    is_directory: bool,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self {
            path: path.into(),
            is_directory,
        }
    }

    /// Read the attributes of an existing path
    pub fn from_path(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path)?;
        Ok(Self {
            is_directory: metadata.is_dir(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Final component of the path
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `file:` URI of this file; directories end with `/`
    ///
    /// # Examples
    /// ```ignore
    /// LocalFile::new("/srv/my docs/a.pdf", false).to_uri() // -> "file:///srv/my%20docs/a.pdf"
    /// ```
    pub fn to_uri(&self) -> String {
        let mut path = self.path.to_string_lossy().replace('\\', "/");
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if self.is_directory && !path.ends_with('/') {
            path.push('/');
        }
        format!("file://{}", utf8_percent_encode(&path, FILE_URI_PATH))
    }
}
