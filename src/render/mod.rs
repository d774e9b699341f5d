//! Rendering of file elements as HTML links

mod anchor;
mod file;
mod listing;

pub use anchor::{Anchor, AnchorContent};
pub use file::FileLinkRenderer;
pub use listing::{page, render_list};
