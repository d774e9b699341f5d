//! Helper functions for rendering links
//!
//! Escaping, URL encoding and the small formatters used when emitting
//! file links.

mod html;
mod last_modified;
mod size;
mod url;

pub use html::*;
pub use last_modified::*;
pub use size::*;
pub use url::*;
