//! In-memory resource store for virtual resources without local files

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::io;

use super::{LocalFile, Resource, ResourceConnection, ResourceStore};

/// Attributes of a virtual resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryResource {
    pub last_modified: Option<DateTime<Utc>>,
    pub length: Option<u64>,
}

/// Resources known only by their attributes, never locally accessible
#[derive(Debug, Clone, Default)]
pub struct MemoryResourceStore {
    resources: IndexMap<String, MemoryResource>,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, resource: MemoryResource) {
        self.resources.insert(path.into(), resource);
    }

    pub fn with(mut self, path: impl Into<String>, resource: MemoryResource) -> Self {
        self.insert(path, resource);
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}

impl ResourceStore for MemoryResourceStore {
    fn resource(&self, path: &str) -> io::Result<Box<dyn Resource>> {
        Ok(Box::new(MemoryHandle(self.resources.get(path).cloned())))
    }
}

struct MemoryHandle(Option<MemoryResource>);

impl Resource for MemoryHandle {
    fn open(&self) -> io::Result<Box<dyn ResourceConnection>> {
        Ok(Box::new(MemoryHandle(self.0.clone())))
    }
}

impl ResourceConnection for MemoryHandle {
    fn exists(&self) -> io::Result<bool> {
        Ok(self.0.is_some())
    }

    fn last_modified(&self) -> io::Result<Option<DateTime<Utc>>> {
        Ok(self.0.as_ref().and_then(|r| r.last_modified))
    }

    fn length(&self) -> io::Result<Option<u64>> {
        Ok(self.0.as_ref().and_then(|r| r.length))
    }

    fn local_file(&self) -> io::Result<Option<LocalFile>> {
        Ok(None)
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}
