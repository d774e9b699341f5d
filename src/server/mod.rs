//! Preview server for a book
//!
//! Directory paths are answered with a listing of rendered file links; files
//! are served from the book's source directory. Requests carrying the
//! last-modified parameter get long-lived caching headers, since the
//! parameter changes whenever the file does.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::model::FileElement;
use crate::render::{page, render_list};
use crate::request::{HttpRequest, IdentityResponse};
use crate::{FileLinkRenderer, Site};

/// Cache policy for URLs that carry a last-modified token
const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Server state
struct ServerState {
    site: Site,
    renderer: FileLinkRenderer,
}

/// Start the preview server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState {
        site: site.clone(),
        renderer: site.renderer(),
    });

    let app = Router::new()
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let root = format!(
        "{}{}/",
        site.config.context_path.trim_end_matches('/'),
        site.book().prefix()
    );
    println!("Server running at http://{}:{}{}", ip, port, root);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Strip the context path and book prefix from a request path
fn book_path<'a>(site: &Site, path: &'a str) -> Option<&'a str> {
    let context_path = site.config.context_path.trim_end_matches('/');
    let rest = path.strip_prefix(context_path)?;
    let rest = rest.strip_prefix(site.book().prefix())?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Whether the query string carries the named parameter
fn has_query_param(query: Option<&str>, name: &str) -> bool {
    query
        .map(|q| {
            q.split('&')
                .any(|pair| pair.split('=').next() == Some(name))
        })
        .unwrap_or(false)
}

/// Fallback handler serving listings and files
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let Some(raw_path) = book_path(&state.site, request.uri().path()).map(str::to_string) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    if raw_path.ends_with('/') {
        let path = percent_decode_str(&raw_path).decode_utf8_lossy().into_owned();
        return match render_directory(&state, &request, remote, &path) {
            Ok(Some(html)) => Html(html).into_response(),
            Ok(None) => (StatusCode::NOT_FOUND, "Not found").into_response(),
            Err(e) => {
                tracing::error!("Failed to list {}: {}", path, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        };
    }

    let immutable = has_query_param(
        request.uri().query(),
        &state.site.config.last_modified.parameter,
    );

    // ServeDir resolves paths relative to its root
    let (mut parts, body) = request.into_parts();
    let target = match parts.uri.query() {
        Some(query) => format!("{}?{}", raw_path, query),
        None => raw_path,
    };
    parts.uri = match target.parse::<Uri>() {
        Ok(uri) => uri,
        Err(_) => return (StatusCode::BAD_REQUEST, "Bad request").into_response(),
    };

    let mut service = ServeDir::new(&state.site.source_dir);
    match service.try_call(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let mut response = response.into_response();
            if immutable && response.status().is_success() {
                response.headers_mut().insert(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static(IMMUTABLE_CACHE_CONTROL),
                );
            }
            response
        }
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Listing page for a directory of the book, or `None` when it does not exist
fn render_directory(
    state: &ServerState,
    request: &Request<Body>,
    remote: SocketAddr,
    path: &str,
) -> Result<Option<String>> {
    let site = &state.site;
    let dir_element = site.element(path)?;
    // Rejects paths that escape the book, and files addressed as directories
    let http_request = HttpRequest::new(
        &site.config.context_path,
        request.headers(),
        Some(remote.ip()),
    );
    state
        .renderer
        .validate(&http_request, &IdentityResponse, &dir_element)?;

    let dir = site.source_dir.join(path.trim_start_matches('/'));
    if path.split('/').any(|segment| segment == "..") || !dir.is_dir() {
        return Ok(None);
    }

    let mut names: Vec<(String, bool)> = fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .map(|e| {
            // Follows symlinks, like the store does
            let is_dir = fs::metadata(e.path()).map(|m| m.is_dir()).unwrap_or(false);
            (e.file_name().to_string_lossy().into_owned(), is_dir)
        })
        .collect();
    names.sort();

    let mut elements: Vec<FileElement> = Vec::with_capacity(names.len());
    for (name, is_dir) in names {
        let suffix = if is_dir { "/" } else { "" };
        match site.element(&format!("{}{}{}", path, name, suffix)) {
            Ok(element) => elements.push(element),
            Err(e) => tracing::warn!("Skipping {}{}: {}", path, name, e),
        }
    }

    let mut list = String::new();
    render_list(
        &state.renderer,
        &http_request,
        &IdentityResponse,
        &mut list,
        &elements,
    )?;

    let title = format!("Index of {}", path);
    Ok(Some(page(&title, &list)))
}
