//! Adapter from HTTP request parts

use axum::http::HeaderMap;
use std::net::IpAddr;

use super::Request;

/// A live HTTP request, as seen by the preview server
#[derive(Debug, Clone)]
pub struct HttpRequest<'a> {
    context_path: &'a str,
    headers: &'a HeaderMap,
    remote_addr: Option<IpAddr>,
}

impl<'a> HttpRequest<'a> {
    pub fn new(context_path: &'a str, headers: &'a HeaderMap, remote_addr: Option<IpAddr>) -> Self {
        Self {
            context_path,
            headers,
            remote_addr,
        }
    }
}

impl Request for HttpRequest<'_> {
    fn context_path(&self) -> &str {
        self.context_path
    }

    fn header(&self, name: &str) -> Option<&str> {
        // HeaderMap lookups are case-insensitive; non-visible values are ignored
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn remote_addr(&self) -> Option<IpAddr> {
        self.remote_addr
    }
}
