//! Domain to wire conversions shared by the handlers.

use actix_web::{HttpRequest, http::header};
use quill_core::domain::{Page, Post, PostStatus, ShareForm, ShareState};
use quill_core::services::ShareOutcome;
use quill_shared::dto::{PageMeta, PostListResponse, PostResponse, ShareFormData, ShareResponse};
use url::Url;

use crate::middleware::error::{AppError, field_map};
use crate::state::AppState;

pub fn post_response(post: Post) -> PostResponse {
    let url = post.detail_path();
    PostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        slug: post.slug,
        body: post.body,
        status: status_name(post.status).to_string(),
        publish: post.publish,
        created_at: post.created_at,
        updated_at: post.updated_at,
        url,
    }
}

pub fn post_list_response(page: Page<Post>) -> PostListResponse {
    let meta = PageMeta {
        number: page.number,
        total_pages: page.total_pages,
        total_items: page.total_items,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        next_page: page.next_page_number(),
        previous_page: page.previous_page_number(),
    };
    PostListResponse {
        posts: page.items.into_iter().map(post_response).collect(),
        page: meta,
    }
}

pub fn share_response(outcome: ShareOutcome) -> ShareResponse {
    let sent = outcome.sent();
    let errors = field_map(&outcome.errors);
    let ShareForm {
        name,
        email,
        to,
        comments,
    } = outcome.form;

    ShareResponse {
        post: post_response(outcome.post),
        state: match outcome.state {
            ShareState::Unsubmitted => "unsubmitted",
            ShareState::Submitted => "submitted",
        }
        .to_string(),
        sent,
        form: ShareFormData {
            name,
            email,
            to,
            comments,
        },
        errors,
    }
}

pub fn status_name(status: PostStatus) -> &'static str {
    match status {
        PostStatus::Draft => "draft",
        PostStatus::Published => "published",
    }
}

pub fn parse_status(raw: &str) -> Option<PostStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "draft" => Some(PostStatus::Draft),
        "published" => Some(PostStatus::Published),
        _ => None,
    }
}

/// Base URL that share links are resolved against.
///
/// The configured public URL wins. Otherwise the scheme and host the client
/// used are taken from the request, and the host must be one of the allowed
/// hosts. Forwarded headers are only consulted behind a trusted proxy.
pub fn site_url(state: &AppState, req: &HttpRequest) -> Result<Url, AppError> {
    if let Some(url) = &state.site_url {
        return Ok(url.clone());
    }

    let (scheme, host) = if state.trust_proxy_headers {
        let info = req.connection_info();
        (info.scheme().to_string(), info.host().to_string())
    } else {
        direct_origin(req)
    };

    if !host_allowed(&host, &state.allowed_hosts) {
        tracing::warn!(host = %host, "Rejected share link for a host outside ALLOWED_HOSTS");
        return Err(AppError::BadRequest(format!("Invalid HTTP_HOST header: '{host}'.")));
    }

    Url::parse(&format!("{scheme}://{host}/"))
        .map_err(|e| AppError::BadRequest(format!("Invalid HTTP_HOST header: {e}")))
}

/// Scheme and host of the connection itself, ignoring `X-Forwarded-*`.
fn direct_origin(req: &HttpRequest) -> (String, String) {
    let config = req.app_config();
    let scheme = req
        .uri()
        .scheme_str()
        .unwrap_or(if config.secure() { "https" } else { "http" });
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| req.uri().authority().map(|authority| authority.as_str()))
        .unwrap_or_else(|| config.host());
    (scheme.to_string(), host.to_string())
}

/// Match `host` (port ignored) against allowed patterns: exact names,
/// `.example.com` for a domain and its subdomains, or `*`.
pub fn host_allowed(host: &str, allowed: &[String]) -> bool {
    let name = strip_port(host).to_ascii_lowercase();
    if name.is_empty() {
        return false;
    }
    allowed.iter().any(|pattern| {
        let pattern = pattern.to_ascii_lowercase();
        match pattern.strip_prefix('.') {
            _ if pattern == "*" => true,
            Some(domain) => name == domain || name.ends_with(&pattern),
            None => name == pattern,
        }
    })
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return host.find(']').map_or(host, |end| &host[..=end]);
    }
    host.split(':').next().unwrap_or(host)
}
