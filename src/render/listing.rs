//! Lists of file links

use super::FileLinkRenderer;
use crate::error::Result;
use crate::helpers::HtmlOutput;
use crate::model::FileElement;
use crate::request::{Request, Response};

/// Render elements as an HTML list, one link per item.
///
/// Every element is validated before anything is written, so an invalid
/// reference leaves `out` untouched.
pub fn render_list(
    renderer: &FileLinkRenderer,
    request: &dyn Request,
    response: &dyn Response,
    out: &mut dyn HtmlOutput,
    elements: &[FileElement],
) -> Result<()> {
    for element in elements {
        renderer.validate(request, response, element)?;
    }
    out.raw("<ul class=\"filelink-list\">\n")?;
    for element in elements {
        out.raw("<li>")?;
        renderer.render(request, response, out, element)?;
        out.raw("</li>\n")?;
    }
    out.raw("</ul>\n")?;
    Ok(())
}

/// Wrap a fragment in a minimal HTML page
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<h1>{}</h1>\n{}</body>\n</html>\n",
        crate::helpers::html_escape(title),
        crate::helpers::html_escape(title),
        body
    )
}
