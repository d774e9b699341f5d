//! filelink: links to the files and directories of a book
//!
//! A file element references a resource of a book by path. This crate
//! renders such elements as HTML anchors: it resolves the resource, checks
//! that directory references end in `/`, and links either to the local file
//! directly or to the served resource with a last-modified token for
//! long-lived caching. The link text is the filename with an approximate
//! size, unless the element provides its own body.

pub mod commands;
pub mod config;
pub mod error;
pub mod helpers;
pub mod model;
pub mod render;
pub mod request;
pub mod resources;
pub mod server;

pub use error::{FileLinkError, Result};
pub use render::FileLinkRenderer;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use model::{BookRef, ElementResource, FileElement, PageRef, ResourceRef};
use resources::{FsResourceStore, ResourceStore};

/// Configuration file looked up in the base directory
pub const CONFIG_FILE: &str = "filelink.yml";

/// A book on disk together with its configuration
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the book's files
    pub source_dir: PathBuf,
    store: Arc<FsResourceStore>,
}

impl Site {
    /// Create a site from a directory, reading `filelink.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.book.source_dir);
        let store = Arc::new(FsResourceStore::new(&source_dir));
        Self {
            config,
            base_dir,
            source_dir,
            store,
        }
    }

    pub fn book(&self) -> BookRef {
        BookRef::new(&self.config.book.domain, &self.config.book.path)
    }

    pub fn store(&self) -> Arc<dyn ResourceStore> {
        self.store.clone()
    }

    pub fn renderer(&self) -> FileLinkRenderer {
        FileLinkRenderer::new(self.config.clone())
    }

    /// A file element for a path of this book, placed on the book's index page.
    /// A missing leading `/` is added.
    pub fn element(&self, path: &str) -> Result<FileElement> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        let book = self.book();
        let reference = ResourceRef::new(book.clone(), path)?;
        Ok(FileElement::new(PageRef::new(book, "/"))
            .with_resource(ElementResource::new(Some(self.store()), reference)))
    }
}
