//! Filesystem-backed resource store

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::{LocalFile, Resource, ResourceConnection, ResourceStore};

/// Resources stored as files below a root directory
#[derive(Debug, Clone)]
pub struct FsResourceStore {
    root: PathBuf,
}

impl FsResourceStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a book path onto the filesystem. Paths escaping the root map to
    /// nothing.
    fn file_path(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut file = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => file.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(file)
    }
}

impl ResourceStore for FsResourceStore {
    fn resource(&self, path: &str) -> io::Result<Box<dyn Resource>> {
        let file = self.file_path(path);
        if file.is_none() {
            tracing::debug!("Rejected resource path outside of store: {}", path);
        }
        Ok(Box::new(FsResource { file }))
    }
}

/// A resource that may or may not exist on disk
#[derive(Debug, Clone)]
pub struct FsResource {
    file: Option<PathBuf>,
}

impl Resource for FsResource {
    fn open(&self) -> io::Result<Box<dyn ResourceConnection>> {
        Ok(Box::new(FsConnection {
            file: self.file.clone(),
            closed: false,
        }))
    }
}

/// Reads attributes from disk on every call, so it reflects concurrent changes
#[derive(Debug)]
pub struct FsConnection {
    file: Option<PathBuf>,
    closed: bool,
}

impl FsConnection {
    fn metadata(&self) -> io::Result<Option<fs::Metadata>> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "resource connection already closed",
            ));
        }
        let Some(file) = &self.file else {
            return Ok(None);
        };
        match fs::metadata(file) {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl ResourceConnection for FsConnection {
    fn exists(&self) -> io::Result<bool> {
        Ok(self.metadata()?.is_some())
    }

    fn last_modified(&self) -> io::Result<Option<DateTime<Utc>>> {
        Ok(self
            .metadata()?
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from))
    }

    fn length(&self) -> io::Result<Option<u64>> {
        Ok(self
            .metadata()?
            .filter(|m| m.is_file())
            .map(|m| m.len()))
    }

    fn local_file(&self) -> io::Result<Option<LocalFile>> {
        match &self.file {
            Some(file) => LocalFile::from_path(file).map(Some),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "resource is outside of the store",
            )),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
