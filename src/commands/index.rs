//! Write an index page linking every file of the book

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::model::FileElement;
use crate::render::{page, render_list};
use crate::request::{IdentityResponse, RequestInfo};
use crate::Site;

/// Book paths of every file and directory below the source directory
pub fn book_paths(site: &Site) -> Vec<String> {
    if !site.source_dir.exists() {
        return Vec::new();
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(&site.source_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let Ok(relative) = entry.path().strip_prefix(&site.source_dir) else {
            continue;
        };
        let mut path = String::new();
        for component in relative.components() {
            path.push('/');
            path.push_str(&component.as_os_str().to_string_lossy());
        }
        // Symlinked directories count as directories, as in the store
        if fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false) {
            path.push('/');
        }
        paths.push(path);
    }
    paths
}

/// Render the index page as exported static content
pub fn render_index(site: &Site) -> Result<String> {
    let mut elements: Vec<FileElement> = Vec::new();
    for path in book_paths(site) {
        match site.element(&path) {
            Ok(element) => elements.push(element),
            Err(e) => tracing::warn!("Skipping {}: {}", path, e),
        }
    }
    tracing::info!("Indexing {} entries", elements.len());

    let request = RequestInfo::new(site.config.context_path.clone())
        .with_header(&site.config.headers.exporting, "true");
    let mut list = String::new();
    render_list(
        &site.renderer(),
        &request,
        &IdentityResponse,
        &mut list,
        &elements,
    )?;

    let title = format!("Files of {}", site.book());
    Ok(page(&title, &list))
}

/// Write the index to a file, or print it
pub fn run(site: &Site, output: Option<&Path>) -> Result<()> {
    let html = render_index(site)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, html)?;
            tracing::info!("Wrote index to {:?}", path);
        }
        None => print!("{}", html),
    }
    Ok(())
}
