//! File element link rendering
//!
//! Resolves the element's resource, checks the directory convention against
//! the filesystem, then chooses between a direct `file:` link (for clients
//! allowed to open local files) and a served URL carrying a last-modified
//! token for long-lived caching.

use std::io;
use std::net::IpAddr;

use super::{Anchor, AnchorContent};
use crate::config::SiteConfig;
use crate::error::{FileLinkError, Result};
use crate::helpers::{
    append_query_param, approximate_size, encode_last_modified, encode_uri_path, js_string,
    served_path, HtmlOutput,
};
use crate::model::{FileElement, ResourceRef, SEPARATOR_CHAR};
use crate::request::{header_equals, Request, Response};
use crate::resources::{LocalFile, ScopedConnection};

/// Renders file elements as links
#[derive(Debug, Clone)]
pub struct FileLinkRenderer {
    config: SiteConfig,
}

impl FileLinkRenderer {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Write the link for a file element
    pub fn render(
        &self,
        request: &dyn Request,
        response: &dyn Response,
        out: &mut dyn HtmlOutput,
        element: &FileElement,
    ) -> Result<()> {
        self.write(request, response, Some(out), element)
    }

    /// Check the element's reference without producing output.
    ///
    /// Lets callers fail before any part of a page has been written.
    pub fn validate(
        &self,
        request: &dyn Request,
        response: &dyn Response,
        element: &FileElement,
    ) -> Result<()> {
        self.write(request, response, None, element)
    }

    pub fn render_to_string(
        &self,
        request: &dyn Request,
        response: &dyn Response,
        element: &FileElement,
    ) -> Result<String> {
        let mut html = String::new();
        self.render(request, response, &mut html, element)?;
        Ok(html)
    }

    /// Validate the element and, when `out` is given, write its link.
    ///
    /// The resource connection is opened at most once and closed on every
    /// path out of this call.
    pub fn write(
        &self,
        request: &dyn Request,
        response: &dyn Response,
        out: Option<&mut dyn HtmlOutput>,
        element: &FileElement,
    ) -> Result<()> {
        let binding = element.resource().ok_or_else(|| {
            FileLinkError::invalid_state(format!("Resource not set on file: {}", element))
        })?;
        let reference = &binding.reference;

        let resource = match &binding.store {
            Some(store) => Some(store.resource(reference.path())?),
            None => None,
        };
        let conn = match &resource {
            Some(resource) => Some(ScopedConnection::open(resource.as_ref())?),
            None => None,
        };

        let local_file = match &conn {
            Some(conn) => find_local_file(conn)?,
            None => None,
        };
        let is_directory = check_directory(reference, local_file.as_ref())?;

        if let Some(out) = out {
            let anchor = self.build_anchor(
                request,
                response,
                element,
                reference,
                conn.as_ref(),
                local_file.as_ref(),
                is_directory,
            )?;
            anchor.write_to(out)?;
        }

        if let Some(conn) = conn {
            conn.close()?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn build_anchor(
        &self,
        request: &dyn Request,
        response: &dyn Response,
        element: &FileElement,
        reference: &ResourceRef,
        conn: Option<&ScopedConnection>,
        local_file: Option<&LocalFile>,
        is_directory: bool,
    ) -> Result<Anchor> {
        let has_body = !element.body().is_empty();
        let book = reference.book();

        let open_target =
            local_file.filter(|_| self.is_open_file_allowed(request) && !self.is_exporting(request));

        let id = element.id().map(|id| match request.page_index() {
            Some(index) => index.ref_id_in_page(element.page(), id),
            None => id.to_string(),
        });

        let class = if has_body {
            None
        } else if is_directory {
            Some(self.config.link_class.directory.clone())
        } else {
            Some(self.config.link_class.file.clone())
        };

        let href = match open_target {
            Some(file) => response.encode_url(&file.to_uri()),
            None => {
                let path = served_path(request.context_path(), book.prefix(), reference.path());
                let mut url = encode_uri_path(&path);
                if let Some(token) = self.last_modified_token(request, conn, is_directory)? {
                    url = append_query_param(&url, &self.config.last_modified.parameter, &token);
                }
                response.encode_url(&url)
            }
        };

        let onclick = open_target.map(|_| {
            format!(
                "{}({}, {}, {}); return false;",
                self.config.open_file.function,
                js_string(book.domain()),
                js_string(book.path()),
                js_string(reference.path())
            )
        });

        let content = if has_body {
            AnchorContent::Html(element.body().as_html().to_string())
        } else {
            AnchorContent::Text(display_name(reference, local_file, is_directory)?)
        };

        let size = match conn {
            Some(conn) if !has_body && !is_directory => {
                if conn.exists()? {
                    conn.length()?.map(approximate_size)
                } else {
                    None
                }
            }
            _ => None,
        };

        tracing::debug!(
            "File link {}: directory={}, local={}, open_file={}",
            reference,
            is_directory,
            local_file.is_some(),
            open_target.is_some()
        );

        Ok(Anchor {
            id,
            class,
            href,
            onclick,
            content,
            size,
        })
    }

    /// Token for the last-modified parameter, when one should be added
    fn last_modified_token(
        &self,
        request: &dyn Request,
        conn: Option<&ScopedConnection>,
        is_directory: bool,
    ) -> Result<Option<String>> {
        let Some(conn) = conn else {
            return Ok(None);
        };
        if is_directory || header_equals(request, &self.config.last_modified.header, "false") {
            return Ok(None);
        }
        if !conn.exists()? {
            return Ok(None);
        }
        Ok(conn
            .last_modified()?
            .and_then(|time| encode_last_modified(&time)))
    }

    /// Whether the client may open local files directly
    pub fn is_open_file_allowed(&self, request: &dyn Request) -> bool {
        let policy = &self.config.open_file;
        if !policy.enabled {
            return false;
        }
        !policy.local_only || request.remote_addr().map(is_loopback).unwrap_or(false)
    }

    /// Whether the request is producing a static export
    pub fn is_exporting(&self, request: &dyn Request) -> bool {
        header_equals(request, &self.config.headers.exporting, "true")
    }
}

/// Local file of an existing resource. A resource removed since the
/// existence check counts as not locally available.
fn find_local_file(conn: &ScopedConnection) -> Result<Option<LocalFile>> {
    if !conn.exists()? {
        return Ok(None);
    }
    match conn.local_file() {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::trace!("Resource removed before its local file was read: {}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Directories are named with a trailing separator. Without a local file
/// the name is trusted; otherwise it must agree with the filesystem.
fn check_directory(reference: &ResourceRef, local_file: Option<&LocalFile>) -> Result<bool> {
    let Some(file) = local_file else {
        return Ok(reference.is_directory_path());
    };
    let is_directory = file.is_directory();
    if is_directory && !reference.is_directory_path() {
        return Err(FileLinkError::invalid_state(format!(
            "References to directories must end in slash ({}): {}",
            SEPARATOR_CHAR, reference
        )));
    }
    if !is_directory && reference.is_directory_path() {
        return Err(FileLinkError::invalid_state(format!(
            "References to files must not end in slash ({}): {}",
            SEPARATOR_CHAR, reference
        )));
    }
    Ok(is_directory)
}

fn display_name(
    reference: &ResourceRef,
    local_file: Option<&LocalFile>,
    is_directory: bool,
) -> Result<String> {
    match local_file {
        Some(file) => {
            let mut name = file.name();
            if is_directory {
                name.push(SEPARATOR_CHAR);
            }
            Ok(name)
        }
        None => reference.filename().map(str::to_string).ok_or_else(|| {
            FileLinkError::invalid_state(format!(
                "Invalid filename for file: {}",
                reference.path()
            ))
        }),
    }
}

fn is_loopback(addr: IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => v4.is_loopback(),
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(|v4| v4.is_loopback())
            .unwrap_or_else(|| v6.is_loopback()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookRef, ElementBody, ElementResource, PageRef};
    use crate::request::{IdentityResponse, PageIndex, RequestInfo, SessionResponse};
    use crate::resources::{Resource, ResourceConnection, ResourceStore};
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// What `local_file()` does on the fake connection
    #[derive(Clone)]
    enum Local {
        None,
        File(LocalFile),
        Vanished,
        Broken,
    }

    #[derive(Clone)]
    struct FakeStore {
        exists: bool,
        local: Local,
        last_modified: Option<DateTime<Utc>>,
        length: Option<u64>,
        opens: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
    }

    impl FakeStore {
        fn report() -> Self {
            Self {
                exists: true,
                local: Local::File(LocalFile::new("/srv/docs/files/report.pdf", false)),
                last_modified: Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
                length: Some(4300),
                opens: Arc::new(AtomicUsize::new(0)),
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn directory() -> Self {
            Self {
                local: Local::File(LocalFile::new("/srv/docs/files", true)),
                length: None,
                ..Self::report()
            }
        }

        fn opens(&self) -> usize {
            self.opens.load(Ordering::SeqCst)
        }

        fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    impl ResourceStore for FakeStore {
        fn resource(&self, _path: &str) -> io::Result<Box<dyn Resource>> {
            Ok(Box::new(self.clone()))
        }
    }

    impl Resource for FakeStore {
        fn open(&self) -> io::Result<Box<dyn ResourceConnection>> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(self.clone()))
        }
    }

    impl ResourceConnection for FakeStore {
        fn exists(&self) -> io::Result<bool> {
            Ok(self.exists)
        }

        fn last_modified(&self) -> io::Result<Option<DateTime<Utc>>> {
            Ok(self.last_modified)
        }

        fn length(&self) -> io::Result<Option<u64>> {
            Ok(self.length)
        }

        fn local_file(&self) -> io::Result<Option<LocalFile>> {
            match &self.local {
                Local::None => Ok(None),
                Local::File(file) => Ok(Some(file.clone())),
                Local::Vanished => Err(io::Error::new(io::ErrorKind::NotFound, "gone")),
                Local::Broken => Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            }
        }

        fn close(&mut self) -> io::Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn book() -> BookRef {
        BookRef::new("example.com", "/docs")
    }

    fn page() -> PageRef {
        PageRef::new(book(), "/index.html")
    }

    fn element(store: Option<&FakeStore>, path: &str) -> FileElement {
        let store = store.map(|s| Arc::new(s.clone()) as Arc<dyn ResourceStore>);
        let reference = ResourceRef::new(book(), path).unwrap();
        FileElement::new(page()).with_resource(ElementResource::new(store, reference))
    }

    fn renderer() -> FileLinkRenderer {
        FileLinkRenderer::new(SiteConfig::default())
    }

    fn open_file_renderer() -> FileLinkRenderer {
        let mut config = SiteConfig::default();
        config.open_file.enabled = true;
        FileLinkRenderer::new(config)
    }

    fn request() -> RequestInfo {
        RequestInfo::new("/app")
    }

    fn local_request() -> RequestInfo {
        request().with_remote_addr("127.0.0.1".parse().unwrap())
    }

    #[test]
    fn test_served_file_link() {
        let store = FakeStore::report();
        let html = renderer()
            .render_to_string(&request(), &IdentityResponse, &element(Some(&store), "/files/report.pdf"))
            .unwrap();
        assert_eq!(
            html,
            r#"<a class="semanticcms-file-file-link" href="/app/docs/files/report.pdf?lastModified=s44we8">report.pdf</a> (4.2 KB)"#
        );
        assert_eq!(store.opens(), 1);
        assert_eq!(store.closes(), 1);
    }

    #[test]
    fn test_open_file_link() {
        let store = FakeStore::report();
        let html = open_file_renderer()
            .render_to_string(
                &local_request(),
                &IdentityResponse,
                &element(Some(&store), "/files/report.pdf"),
            )
            .unwrap();
        assert_eq!(
            html,
            r#"<a class="semanticcms-file-file-link" href="file:///srv/docs/files/report.pdf" onclick="semanticcms_openfile_servlet.openFile(&quot;example.com&quot;, &quot;/docs&quot;, &quot;/files/report.pdf&quot;); return false;">report.pdf</a> (4.2 KB)"#
        );
    }

    #[test]
    fn test_open_file_requires_local_client() {
        let store = FakeStore::report();
        let remote = request().with_remote_addr("203.0.113.9".parse().unwrap());
        let html = open_file_renderer()
            .render_to_string(&remote, &IdentityResponse, &element(Some(&store), "/files/report.pdf"))
            .unwrap();
        assert!(html.contains(r#"href="/app/docs/files/report.pdf?lastModified=s44we8""#));
        assert!(!html.contains("onclick"));

        let mut config = SiteConfig::default();
        config.open_file.enabled = true;
        config.open_file.local_only = false;
        let html = FileLinkRenderer::new(config)
            .render_to_string(&remote, &IdentityResponse, &element(Some(&store), "/files/report.pdf"))
            .unwrap();
        assert!(html.contains(r#"href="file:///srv/docs/files/report.pdf""#));
        assert!(html.contains("onclick="));
    }

    #[test]
    fn test_mapped_loopback_allows_open_file() {
        let request = request().with_remote_addr("::ffff:127.0.0.1".parse().unwrap());
        assert!(open_file_renderer().is_open_file_allowed(&request));
        let request = RequestInfo::new("").with_remote_addr("::1".parse().unwrap());
        assert!(open_file_renderer().is_open_file_allowed(&request));
        assert!(!renderer().is_open_file_allowed(&request));
    }

    #[test]
    fn test_exporting_disables_open_file() {
        let store = FakeStore::report();
        let exporting = local_request().with_header("X-Exporting", "True");
        let html = open_file_renderer()
            .render_to_string(&exporting, &IdentityResponse, &element(Some(&store), "/files/report.pdf"))
            .unwrap();
        assert!(html.contains(r#"href="/app/docs/files/report.pdf?lastModified=s44we8""#));
        assert!(!html.contains("onclick"));
    }

    #[test]
    fn test_header_disables_last_modified() {
        let store = FakeStore::report();
        let request = request().with_header("X-Last-Modified-Auto", "FALSE");
        let html = renderer()
            .render_to_string(&request, &IdentityResponse, &element(Some(&store), "/files/report.pdf"))
            .unwrap();
        assert!(html.contains(r#"href="/app/docs/files/report.pdf""#));
        assert!(html.ends_with(" (4.2 KB)"));
    }

    #[test]
    fn test_unknown_last_modified_is_omitted() {
        let store = FakeStore {
            last_modified: None,
            ..FakeStore::report()
        };
        let html = renderer()
            .render_to_string(&request(), &IdentityResponse, &element(Some(&store), "/files/report.pdf"))
            .unwrap();
        assert!(html.contains(r#"href="/app/docs/files/report.pdf""#));
    }

    #[test]
    fn test_body_replaces_name_class_and_size() {
        let store = FakeStore::report();
        let element = element(Some(&store), "/files/report.pdf")
            .with_body(ElementBody::from_markdown("the *annual* report"));
        let html = renderer()
            .render_to_string(&request(), &IdentityResponse, &element)
            .unwrap();
        assert_eq!(
            html,
            r#"<a href="/app/docs/files/report.pdf?lastModified=s44we8">the <em>annual</em> report</a>"#
        );
    }

    #[test]
    fn test_local_directory() {
        let store = FakeStore::directory();
        let html = renderer()
            .render_to_string(&request(), &IdentityResponse, &element(Some(&store), "/files/"))
            .unwrap();
        assert_eq!(
            html,
            r#"<a class="semanticcms-file-directory-link" href="/app/docs/files/">files/</a>"#
        );
        assert_eq!(store.closes(), 1);
    }

    #[test]
    fn test_directory_without_slash_fails() {
        let store = FakeStore::directory();
        let mut out = String::new();
        let err = renderer()
            .render(&request(), &IdentityResponse, &mut out, &element(Some(&store), "/files"))
            .unwrap_err();
        assert!(err.is_invalid_state());
        assert!(err.to_string().contains("must end in slash"));
        assert!(out.is_empty());
        assert_eq!(store.closes(), 1);
    }

    #[test]
    fn test_file_with_slash_fails() {
        let store = FakeStore::report();
        let err = renderer()
            .validate(&request(), &IdentityResponse, &element(Some(&store), "/files/report.pdf/"))
            .unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn test_validate_only() {
        let store = FakeStore::directory();
        renderer()
            .validate(&request(), &IdentityResponse, &element(Some(&store), "/files/"))
            .unwrap();
        let err = renderer()
            .validate(&request(), &IdentityResponse, &element(Some(&store), "/files"))
            .unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(store.opens(), 2);
        assert_eq!(store.closes(), 2);
    }

    #[test]
    fn test_missing_resource_binding() {
        let element = FileElement::new(page());
        let err = renderer()
            .validate(&request(), &IdentityResponse, &element)
            .unwrap_err();
        assert!(err.is_invalid_state());
        assert!(err.to_string().contains("Resource not set"));
    }

    #[test]
    fn test_unresolved_reference() {
        let html = renderer()
            .render_to_string(&request(), &IdentityResponse, &element(None, "/other/"))
            .unwrap();
        assert_eq!(
            html,
            r#"<a class="semanticcms-file-directory-link" href="/app/docs/other/">other/</a>"#
        );

        let html = renderer()
            .render_to_string(&request(), &IdentityResponse, &element(None, "/other/notes.txt"))
            .unwrap();
        assert_eq!(
            html,
            r#"<a class="semanticcms-file-file-link" href="/app/docs/other/notes.txt">notes.txt</a>"#
        );
    }

    #[test]
    fn test_empty_filename_fails() {
        let mut out = String::new();
        let err = renderer()
            .render(&request(), &IdentityResponse, &mut out, &element(None, "/"))
            .unwrap_err();
        assert!(err.is_invalid_state());
        // Validation alone does not derive a filename
        renderer()
            .validate(&request(), &IdentityResponse, &element(None, "/"))
            .unwrap();
    }

    #[test]
    fn test_vanished_resource_is_not_local() {
        let store = FakeStore {
            local: Local::Vanished,
            ..FakeStore::report()
        };
        let html = open_file_renderer()
            .render_to_string(&local_request(), &IdentityResponse, &element(Some(&store), "/files/report.pdf"))
            .unwrap();
        assert_eq!(
            html,
            r#"<a class="semanticcms-file-file-link" href="/app/docs/files/report.pdf?lastModified=s44we8">report.pdf</a> (4.2 KB)"#
        );
        assert_eq!(store.closes(), 1);
    }

    #[test]
    fn test_other_io_errors_propagate() {
        let store = FakeStore {
            local: Local::Broken,
            ..FakeStore::report()
        };
        let err = renderer()
            .validate(&request(), &IdentityResponse, &element(Some(&store), "/files/report.pdf"))
            .unwrap_err();
        assert!(matches!(err, FileLinkError::Io(_)));
        assert_eq!(store.closes(), 1);
    }

    #[test]
    fn test_nonexistent_resource() {
        let store = FakeStore {
            exists: false,
            local: Local::None,
            ..FakeStore::report()
        };
        let html = renderer()
            .render_to_string(&request(), &IdentityResponse, &element(Some(&store), "/files/report.pdf"))
            .unwrap();
        assert_eq!(
            html,
            r#"<a class="semanticcms-file-file-link" href="/app/docs/files/report.pdf">report.pdf</a>"#
        );
    }

    #[test]
    fn test_element_id_in_page() {
        let store = FakeStore::report();
        let element = element(Some(&store), "/files/report.pdf").with_id("download");

        let html = renderer()
            .render_to_string(&request(), &IdentityResponse, &element)
            .unwrap();
        assert!(html.starts_with(r#"<a id="download" class="#));

        let other = PageRef::new(book(), "/other.html");
        let combined = request().with_page_index(PageIndex::new(vec![other, page()]));
        let html = renderer()
            .render_to_string(&combined, &IdentityResponse, &element)
            .unwrap();
        assert!(html.starts_with(r#"<a id="page1-download" class="#));
    }

    #[test]
    fn test_response_rewrites_href() {
        let store = FakeStore::report();
        let html = renderer()
            .render_to_string(
                &request(),
                &SessionResponse::new("s1"),
                &element(Some(&store), "/files/report.pdf"),
            )
            .unwrap();
        assert!(html.contains(r#"href="/app/docs/files/report.pdf;jsessionid=s1?lastModified=s44we8""#));
    }

    #[test]
    fn test_special_characters_are_encoded() {
        let store = FakeStore {
            local: Local::None,
            ..FakeStore::report()
        };
        let html = renderer()
            .render_to_string(&request(), &IdentityResponse, &element(Some(&store), "/R&D notes <1>.txt"))
            .unwrap();
        assert_eq!(
            html,
            r#"<a class="semanticcms-file-file-link" href="/app/docs/R&amp;D%20notes%20%3C1%3E.txt?lastModified=s44we8">R&amp;D notes &lt;1&gt;.txt</a> (4.2 KB)"#
        );
    }

    #[test]
    fn test_virtual_resource() {
        use crate::resources::{MemoryResource, MemoryResourceStore};

        let store = MemoryResourceStore::new().with(
            "/manual.pdf",
            MemoryResource {
                last_modified: Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
                length: Some(2 * 1024 * 1024),
            },
        );
        let other_book = BookRef::new("docs.example.org", "/manuals");
        let reference = ResourceRef::new(other_book, "/manual.pdf").unwrap();
        let element = FileElement::new(page())
            .with_resource(ElementResource::new(Some(Arc::new(store)), reference));

        // Never local, so open-file does not apply even when allowed
        let html = open_file_renderer()
            .render_to_string(&local_request(), &IdentityResponse, &element)
            .unwrap();
        assert_eq!(
            html,
            r#"<a class="semanticcms-file-file-link" href="/app/manuals/manual.pdf?lastModified=s44we8">manual.pdf</a> (2.0 MB)"#
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let store = FakeStore::report();
        let element = element(Some(&store), "/files/report.pdf").with_id("a");
        let first = renderer()
            .render_to_string(&request(), &IdentityResponse, &element)
            .unwrap();
        let second = renderer()
            .render_to_string(&request(), &IdentityResponse, &element)
            .unwrap();
        assert_eq!(first, second);
    }
}
