//! The file content element

use pulldown_cmark::{html, Options, Parser};
use std::fmt;
use std::sync::Arc;

use super::{PageRef, ResourceRef};
use crate::resources::ResourceStore;

/// A resource reference together with the store able to resolve it.
///
/// The store is absent for references into books that are not available
/// locally; such references are rendered without resolving anything.
#[derive(Clone)]
pub struct ElementResource {
    pub store: Option<Arc<dyn ResourceStore>>,
    pub reference: ResourceRef,
}

impl ElementResource {
    pub fn new(store: Option<Arc<dyn ResourceStore>>, reference: ResourceRef) -> Self {
        Self { store, reference }
    }
}

impl fmt::Debug for ElementResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementResource")
            .field("store", &self.store.as_ref().map(|_| "<store>"))
            .field("reference", &self.reference)
            .finish()
    }
}

/// Inline body of an element, already rendered to HTML
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementBody {
    html: String,
}

impl ElementBody {
    /// An empty body; the link text falls back to the filename
    pub fn empty() -> Self {
        Self::default()
    }

    /// Body from trusted, already-rendered HTML
    pub fn from_html(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Body from plain text, escaped for HTML
    pub fn from_text(text: &str) -> Self {
        Self {
            html: crate::helpers::html_escape(text),
        }
    }

    /// Body from inline markdown. A single wrapping paragraph is removed,
    /// since the body is phrasing content inside an anchor.
    pub fn from_markdown(markdown: &str) -> Self {
        let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_SMART_PUNCTUATION;
        let parser = Parser::new_ext(markdown, options);
        let mut rendered = String::new();
        html::push_html(&mut rendered, parser);

        let trimmed = rendered.trim_end();
        let inline = trimmed
            .strip_prefix("<p>")
            .and_then(|s| s.strip_suffix("</p>"))
            .filter(|s| !s.contains("<p>"))
            .unwrap_or(trimmed);
        Self {
            html: inline.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    pub fn as_html(&self) -> &str {
        &self.html
    }
}

/// A file element: a link to a file or directory resource of a book
#[derive(Debug, Clone)]
pub struct FileElement {
    resource: Option<ElementResource>,
    body: ElementBody,
    id: Option<String>,
    page: PageRef,
}

impl FileElement {
    /// Create an element on a page, with no resource bound yet
    pub fn new(page: PageRef) -> Self {
        Self {
            resource: None,
            body: ElementBody::empty(),
            id: None,
            page,
        }
    }

    pub fn with_resource(mut self, resource: ElementResource) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn with_body(mut self, body: ElementBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn resource(&self) -> Option<&ElementResource> {
        self.resource.as_ref()
    }

    pub fn body(&self) -> &ElementBody {
        &self.body
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn page(&self) -> &PageRef {
        &self.page
    }
}

impl fmt::Display for FileElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource {
            Some(resource) => write!(f, "file({}) on {}", resource.reference, self.page),
            None => write!(f, "file(<unset>) on {}", self.page),
        }
    }
}
