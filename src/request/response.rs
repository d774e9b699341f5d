//! Response URL rewriting

use super::Response;

/// Leaves URLs untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResponse;

impl Response for IdentityResponse {
    fn encode_url(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Carries a session id in URLs, for clients without cookies
#[derive(Debug, Clone)]
pub struct SessionResponse {
    session_id: String,
}

impl SessionResponse {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

impl Response for SessionResponse {
    /// Insert `;jsessionid=<id>` before the query string or fragment
    fn encode_url(&self, url: &str) -> String {
        // file: links never carry a session
        if url.starts_with("file:") {
            return url.to_string();
        }
        let split = url.find(['?', '#']).unwrap_or(url.len());
        format!(
            "{};jsessionid={}{}",
            &url[..split],
            self.session_id,
            &url[split..]
        )
    }
}
