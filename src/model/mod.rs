//! Content model: books, pages, resource references and file elements

mod book;
mod element;
mod resource_ref;

pub use book::{BookRef, PageRef};
pub use element::{ElementBody, ElementResource, FileElement};
pub use resource_ref::{ResourceRef, SEPARATOR_CHAR, SEPARATOR_STRING};
