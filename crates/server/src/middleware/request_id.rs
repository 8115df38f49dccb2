//! Request ID middleware for request tracing and correlation.
//!
//! An `x-request-id` supplied by the caller is kept when it is a short plain
//! token; otherwise a UUID v4 is generated. The ID is recorded on the
//! `http_request` span, tagged on the Sentry scope and echoed back in the
//! response headers.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied ID that is kept.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Caller IDs end up in log lines, so only short plain tokens are accepted.
fn is_usable(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
}

/// The caller's request ID if usable, otherwise a fresh UUID v4.
fn request_id_for(headers: &HeaderMap) -> String {
    match headers.get(REQUEST_ID_HEADER).map(HeaderValue::to_str) {
        Some(Ok(id)) if is_usable(id) => id.to_owned(),
        Some(_) => {
            tracing::debug!("Replacing unusable upstream request ID");
            Uuid::new_v4().to_string()
        }
        None => Uuid::new_v4().to_string(),
    }
}

/// Middleware that tags every request with a request ID.
///
/// Handlers and the response both see the resolved ID in `x-request-id`.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request_id_for(request.headers());

    tracing::Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let header = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header {
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
