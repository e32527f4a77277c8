//! Request correlation IDs.
//!
//! Every response carries an `x-request-id` header. An ID supplied by an
//! upstream proxy is kept; otherwise one is minted per request. The same ID
//! lands in the `http_request` tracing span, on the Sentry scope, and in the
//! request extensions for handlers that want to quote it.

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request ID, inbound and outbound.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// A request's correlation ID, available to handlers via `Extension`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Attach a correlation ID to the request and echo it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = upstream_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(&REQUEST_ID_HEADER, value);
    }
    response
}

/// The proxy-supplied ID, when one arrived and is valid UTF-8.
fn upstream_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|header| header.to_str().ok())
        .map(String::from)
}
