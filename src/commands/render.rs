//! Render a single file link

use anyhow::Result;
use std::net::{IpAddr, Ipv4Addr};

use crate::model::ElementBody;
use crate::request::{IdentityResponse, RequestInfo};
use crate::Site;

/// Options of the `render` command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Inline markdown shown instead of the filename
    pub body_markdown: Option<String>,
    pub id: Option<String>,
    /// Allow linking to the local file, overriding the configuration
    pub allow_open_file: bool,
    /// Render as for a static export
    pub export: bool,
    pub no_last_modified: bool,
}

/// Render the link for one path of the book
pub fn run(site: &Site, path: &str, options: &RenderOptions) -> Result<String> {
    let mut config = site.config.clone();
    if options.allow_open_file {
        config.open_file.enabled = true;
    }
    let renderer = crate::FileLinkRenderer::new(config);

    // Commands run on the same machine as the files
    let mut request = RequestInfo::new(site.config.context_path.clone())
        .with_remote_addr(IpAddr::V4(Ipv4Addr::LOCALHOST));
    if options.export {
        request = request.with_header(&site.config.headers.exporting, "true");
    }
    if options.no_last_modified {
        request = request.with_header(&site.config.last_modified.header, "false");
    }

    let mut element = site.element(path)?;
    if let Some(markdown) = &options.body_markdown {
        element = element.with_body(ElementBody::from_markdown(markdown));
    }
    if let Some(id) = &options.id {
        element = element.with_id(id.clone());
    }

    let html = renderer.render_to_string(&request, &IdentityResponse, &element)?;
    tracing::debug!("Rendered {}: {}", path, html);
    Ok(html)
}
