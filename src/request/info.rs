//! Plain request values

use indexmap::IndexMap;
use std::net::IpAddr;

use super::{PageIndex, Request};

/// A request described by plain values
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    context_path: String,
    /// Keyed by lowercase header name
    headers: IndexMap<String, String>,
    remote_addr: Option<IpAddr>,
    page_index: Option<PageIndex>,
}

impl RequestInfo {
    pub fn new(context_path: impl Into<String>) -> Self {
        Self {
            context_path: context_path.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_remote_addr(mut self, addr: IpAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    pub fn with_page_index(mut self, page_index: PageIndex) -> Self {
        self.page_index = Some(page_index);
        self
    }
}

impl Request for RequestInfo {
    fn context_path(&self) -> &str {
        &self.context_path
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn remote_addr(&self) -> Option<IpAddr> {
        self.remote_addr
    }

    fn page_index(&self) -> Option<&PageIndex> {
        self.page_index.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::header_equals;

    #[test]
    fn test_headers_ignore_case() {
        let request = RequestInfo::new("/app").with_header("X-Exporting", "TRUE");
        assert_eq!(request.header("x-exporting"), Some("TRUE"));
        assert!(header_equals(&request, "X-EXPORTING", "true"));
        assert!(!header_equals(&request, "X-Other", "true"));
        assert_eq!(request.context_path(), "/app");
    }
}
