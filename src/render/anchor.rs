//! Anchor element built before writing

use std::fmt;

use crate::helpers::HtmlOutput;

/// What goes between `<a>` and `</a>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorContent {
    /// Already rendered markup, written as-is
    Html(String),
    /// Plain text, escaped on output
    Text(String),
}

/// A fully resolved link, ready to be written.
///
/// Attribute values are held unescaped; escaping happens in
/// [`Anchor::write_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub id: Option<String>,
    pub class: Option<String>,
    pub href: String,
    pub onclick: Option<String>,
    pub content: AnchorContent,
    /// Approximate size written after the link as ` (size)`
    pub size: Option<String>,
}

impl Anchor {
    pub fn write_to(&self, out: &mut dyn HtmlOutput) -> fmt::Result {
        out.raw("<a")?;
        if let Some(id) = &self.id {
            out.attribute("id", id)?;
        }
        if let Some(class) = &self.class {
            out.attribute("class", class)?;
        }
        out.attribute("href", &self.href)?;
        if let Some(onclick) = &self.onclick {
            out.attribute("onclick", onclick)?;
        }
        out.raw(">")?;
        match &self.content {
            AnchorContent::Html(html) => out.raw(html)?,
            AnchorContent::Text(text) => out.text(text)?,
        }
        out.raw("</a>")?;
        if let Some(size) = &self.size {
            out.text(" (")?;
            out.text(size)?;
            out.text(")")?;
        }
        Ok(())
    }
}
