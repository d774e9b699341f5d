//! Resource stores and connections
//!
//! A [`ResourceStore`] resolves book paths to [`Resource`]s. A resource is
//! opened into a short-lived [`ResourceConnection`] that reports existence,
//! modification time, length and, when the resource is backed by a local
//! file, a [`LocalFile`] handle.

mod fs;
mod local;
mod memory;

pub use fs::FsResourceStore;
pub use local::LocalFile;
pub use memory::{MemoryResource, MemoryResourceStore};

use chrono::{DateTime, Utc};
use std::io;
use std::ops::Deref;

/// Resolves paths within a single book to resources
pub trait ResourceStore: Send + Sync {
    /// Get the resource at a book path. The resource need not exist.
    fn resource(&self, path: &str) -> io::Result<Box<dyn Resource>>;
}

/// A file-like object addressable by book path
pub trait Resource {
    fn open(&self) -> io::Result<Box<dyn ResourceConnection>>;
}

/// An open connection to a resource
pub trait ResourceConnection {
    fn exists(&self) -> io::Result<bool>;

    /// Last modification time, when known
    fn last_modified(&self) -> io::Result<Option<DateTime<Utc>>>;

    /// Length in bytes, when known
    fn length(&self) -> io::Result<Option<u64>>;

    /// Local filesystem handle, when the resource is locally accessible.
    ///
    /// Fails with [`io::ErrorKind::NotFound`] when the resource disappeared
    /// since it was last checked.
    fn local_file(&self) -> io::Result<Option<LocalFile>>;

    fn close(&mut self) -> io::Result<()>;
}

/// A connection that is closed exactly once, on every exit path.
///
/// Call [`ScopedConnection::close`] on the success path to observe close
/// errors; otherwise the connection is closed when dropped and close errors
/// are logged.
pub struct ScopedConnection {
    inner: Box<dyn ResourceConnection>,
    closed: bool,
}

impl ScopedConnection {
    pub fn open(resource: &dyn Resource) -> io::Result<Self> {
        Ok(Self {
            inner: resource.open()?,
            closed: false,
        })
    }

    pub fn close(mut self) -> io::Result<()> {
        self.closed = true;
        self.inner.close()
    }
}

impl Deref for ScopedConnection {
    type Target = dyn ResourceConnection;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.inner.close() {
                tracing::warn!("Failed to close resource connection: {}", e);
            }
        }
    }
}
