//! Index of pages combined into a single response

use crate::model::PageRef;

/// When several pages are rendered into one document, element ids are
/// prefixed with the page's position so they stay unique.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    pages: Vec<PageRef>,
}

impl PageIndex {
    pub fn new(pages: Vec<PageRef>) -> Self {
        Self { pages }
    }

    pub fn index_of(&self, page: &PageRef) -> Option<usize> {
        self.pages.iter().position(|p| p == page)
    }

    /// Id of an element within its page, unique across the combined document
    ///
    /// # Examples
    /// ```ignore
    /// index.ref_id_in_page(&second_page, "downloads") // -> "page1-downloads"
    /// ```
    pub fn ref_id_in_page(&self, page: &PageRef, id: &str) -> String {
        match self.index_of(page) {
            Some(index) => format!("page{}-{}", index, id),
            None => id.to_string(),
        }
    }
}
