//! Request and response capabilities used while rendering
//!
//! The renderer only needs a handful of things from the surrounding web
//! request: the context path, header lookup, the client address, and URL
//! rewriting on the response. These are traits so any host can adapt its
//! own request types.

mod http;
mod info;
mod page_index;
mod response;

pub use http::HttpRequest;
pub use info::RequestInfo;
pub use page_index::PageIndex;
pub use response::{IdentityResponse, SessionResponse};

use std::net::IpAddr;

/// The current request
pub trait Request {
    /// Path the application is mounted at; empty for the root
    fn context_path(&self) -> &str;

    /// Header value by case-insensitive name
    fn header(&self, name: &str) -> Option<&str>;

    fn remote_addr(&self) -> Option<IpAddr> {
        None
    }

    /// Pages combined into the current response, if more than one
    fn page_index(&self) -> Option<&PageIndex> {
        None
    }
}

/// The current response
pub trait Response {
    /// Rewrite an outgoing URL, e.g. to carry a session id
    fn encode_url(&self, url: &str) -> String;
}

/// Whether a header is present with the given value, ignoring ASCII case
pub fn header_equals(request: &dyn Request, name: &str, value: &str) -> bool {
    request
        .header(name)
        .map(|v| v.trim().eq_ignore_ascii_case(value))
        .unwrap_or(false)
}
