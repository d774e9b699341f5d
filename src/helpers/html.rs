//! HTML escaping and the output capability used by renderers

use std::fmt;

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Encode text as a double-quoted JavaScript string literal.
///
/// The result is safe to embed in an HTML attribute once attribute-escaped,
/// and never closes a surrounding `<script>` element.
///
/// # Examples
/// ```ignore
/// js_string(r#"a "b""#) // -> "\"a \\\"b\\\"\""
/// ```
pub fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' | '>' | '&' | '\'' | '\u{2028}' | '\u{2029}' => {
                out.push_str(&format!("\\u{:04x}", c as u32))
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Sink for HTML output.
///
/// Text and attribute values are escaped; [`HtmlOutput::raw`] writes markup
/// verbatim. Every [`fmt::Write`] is an output, so a `String` works directly.
pub trait HtmlOutput {
    fn raw(&mut self, html: &str) -> fmt::Result;

    fn text(&mut self, text: &str) -> fmt::Result {
        self.raw(&html_escape(text))
    }

    /// Write ` name="value"` with the value escaped
    fn attribute(&mut self, name: &str, value: &str) -> fmt::Result {
        self.raw(" ")?;
        self.raw(name)?;
        self.raw("=\"")?;
        self.raw(&html_escape(value))?;
        self.raw("\"")
    }
}

impl<W: fmt::Write> HtmlOutput for W {
    fn raw(&mut self, html: &str) -> fmt::Result {
        self.write_str(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_js_string() {
        assert_eq!(js_string("/docs"), r#""/docs""#);
        assert_eq!(js_string(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(js_string("</script>"), r#""\u003c/script\u003e""#);
        assert_eq!(js_string("it's"), r#""it\u0027s""#);
        assert_eq!(js_string("a\nb"), r#""a\nb""#);
    }

    #[test]
    fn test_output_on_string() {
        let mut out = String::new();
        out.raw("<a").unwrap();
        out.attribute("title", "a \"quoted\" <title>").unwrap();
        out.raw(">").unwrap();
        out.text("1 < 2").unwrap();
        out.raw("</a>").unwrap();
        assert_eq!(
            out,
            r#"<a title="a &quot;quoted&quot; &lt;title&gt;">1 &lt; 2</a>"#
        );
    }
}
