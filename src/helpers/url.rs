//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that may not appear unescaped in a URI path
const URI_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode a URL path, leaving `/` and other path-safe characters.
///
/// Non-ASCII characters are encoded as UTF-8.
///
/// # Examples
/// ```ignore
/// encode_uri_path("/docs/my report.pdf") // -> "/docs/my%20report.pdf"
/// ```
pub fn encode_uri_path(path: &str) -> String {
    utf8_percent_encode(path, URI_PATH).to_string()
}

/// Join the context path, book prefix and resource path of a served resource
///
/// # Examples
/// ```ignore
/// served_path("/app", "/docs", "/report.pdf") // -> "/app/docs/report.pdf"
/// ```
pub fn served_path(context_path: &str, book_prefix: &str, path: &str) -> String {
    let mut url = String::with_capacity(context_path.len() + book_prefix.len() + path.len());
    url.push_str(context_path.trim_end_matches('/'));
    url.push_str(book_prefix);
    url.push_str(path);
    url
}

/// Append a single query parameter, respecting an existing query string
pub fn append_query_param(url: &str, name: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, separator, name, value)
}
