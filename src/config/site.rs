//! Site configuration (filelink.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// The book whose files are linked
    pub book: BookConfig,
    /// Path the application is mounted at, e.g. `/app`
    pub context_path: String,
    pub open_file: OpenFileConfig,
    pub last_modified: LastModifiedConfig,
    pub headers: HeadersConfig,
    pub link_class: LinkClassConfig,
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            book: BookConfig::default(),
            context_path: String::new(),
            open_file: OpenFileConfig::default(),
            last_modified: LastModifiedConfig::default(),
            headers: HeadersConfig::default(),
            link_class: LinkClassConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded configuration from {:?}", path.as_ref());
        Ok(config)
    }
}

/// Book configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub domain: String,
    /// Book path; also the URL prefix of its resources
    pub path: String,
    /// Directory holding the book's files, relative to the base directory
    pub source_dir: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            path: "/".to_string(),
            source_dir: "book".to_string(),
        }
    }
}

/// Local file opening policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenFileConfig {
    pub enabled: bool,
    /// Only allow opening for requests from a loopback address
    pub local_only: bool,
    /// Client-side function called with (domain, book path, resource path)
    pub function: String,
}

impl Default for OpenFileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            local_only: true,
            function: "semanticcms_openfile_servlet.openFile".to_string(),
        }
    }
}

/// Last-modified cache-busting parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LastModifiedConfig {
    /// Request header that disables the parameter when set to `false`
    pub header: String,
    pub parameter: String,
}

impl Default for LastModifiedConfig {
    fn default() -> Self {
        Self {
            header: "X-Last-Modified-Auto".to_string(),
            parameter: "lastModified".to_string(),
        }
    }
}

/// Request headers with special meaning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadersConfig {
    /// Set to `true` while exporting a static snapshot
    pub exporting: String,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            exporting: "X-Exporting".to_string(),
        }
    }
}

/// CSS classes of body-less links
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkClassConfig {
    pub file: String,
    pub directory: String,
}

impl Default for LinkClassConfig {
    fn default() -> Self {
        Self {
            file: "semanticcms-file-file-link".to_string(),
            directory: "semanticcms-file-directory-link".to_string(),
        }
    }
}

/// Preview server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}
