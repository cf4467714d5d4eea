//! HTTP 请求追踪
//!
//! `TraceLayer` 的 span 与响应日志: 每个请求一个 `http` span, 携带
//! request_id / method / route, 响应时按状态码分级记录延迟。

use std::time::Duration;

use axum::extract::MatchedPath;
use http::{Request, Response, StatusCode};
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::Span;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Span per request, keyed by the matched route template
#[derive(Clone, Copy, Debug, Default)]
pub struct RouteSpan;

impl<B> MakeSpan<B> for RouteSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "http",
            request_id = %request_id(request),
            method = %request.method(),
            route = %route_label(request),
        )
    }
}

/// Logs status and latency; 4xx/5xx at warn
#[derive(Clone, Copy, Debug, Default)]
pub struct LogResponse;

impl<B> OnResponse<B> for LogResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status();
        let latency_ms = latency.as_millis() as u64;
        match outcome(status) {
            Outcome::ServerError => tracing::warn!(
                status = status.as_u16(),
                latency_ms,
                "Request completed with server error"
            ),
            Outcome::ClientError => tracing::warn!(
                status = status.as_u16(),
                latency_ms,
                "Request completed with client error"
            ),
            Outcome::Success => tracing::info!(
                status = status.as_u16(),
                latency_ms,
                "Request completed"
            ),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Success,
    ClientError,
    ServerError,
}

fn outcome(status: StatusCode) -> Outcome {
    if status.is_server_error() {
        Outcome::ServerError
    } else if status.is_client_error() {
        Outcome::ClientError
    } else {
        Outcome::Success
    }
}

fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

/// Route template (`/api/categories/{id}`) when routed, else the raw path
fn route_label<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label_falls_back_to_path() {
        let req = Request::get("/api/categories/42?x=1").body(()).unwrap();
        assert_eq!(route_label(&req), "/api/categories/42");
    }

    #[test]
    fn test_request_id_from_header() {
        let req = Request::get("/")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(())
            .unwrap();
        assert_eq!(request_id(&req), "abc-123");

        let bare = Request::get("/").body(()).unwrap();
        assert_eq!(request_id(&bare), "-");
    }

    #[test]
    fn test_outcome_by_status() {
        assert_eq!(outcome(StatusCode::OK), Outcome::Success);
        assert_eq!(outcome(StatusCode::CREATED), Outcome::Success);
        assert_eq!(outcome(StatusCode::CONFLICT), Outcome::ClientError);
        assert_eq!(outcome(StatusCode::INTERNAL_SERVER_ERROR), Outcome::ServerError);
    }
}
