//! Response envelope
//!
//! Success bodies always leave with a 2xx status, even when empty. Errors carry a short
//! machine-readable `error` kind, an optional `details` message, a non-2xx status and
//! `Cache-Control: no-store`.

use crate::read_through::ReadThroughError;
use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

/// Header telling clients whether the payload came from the cache
pub const X_CACHE: &str = "x-cache";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    NoStore,
    /// Brief shared/edge caching
    Edge {
        s_maxage: u32,
        stale_while_revalidate: u32,
    },
}

impl CachePolicy {
    pub const fn edge(s_maxage: u32, stale_while_revalidate: u32) -> Self {
        Self::Edge {
            s_maxage,
            stale_while_revalidate,
        }
    }

    pub fn header_value(&self) -> String {
        match self {
            CachePolicy::NoStore => "no-store".to_string(),
            CachePolicy::Edge {
                s_maxage,
                stale_while_revalidate,
            } => format!(
                "public, s-maxage={}, stale-while-revalidate={}",
                s_maxage, stale_while_revalidate
            ),
        }
    }
}

/// A 200 JSON response with the given caching policy
pub fn ok_json<T: Serialize>(body: &T, policy: CachePolicy) -> Response {
    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, policy.header_value())],
        Json(body),
    )
        .into_response()
}

/// Like [`ok_json`], also tagging the response with `x-cache: HIT|MISS`
pub fn ok_json_cached<T: Serialize>(body: &T, policy: CachePolicy, cache_hit: bool) -> Response {
    let mut response = ok_json(body, policy);
    let marker = if cache_hit { "HIT" } else { "MISS" };
    response
        .headers_mut()
        .insert(X_CACHE, HeaderValue::from_static(marker));
    response
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    details: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, details: Option<String>) -> Self {
        Self {
            status,
            kind,
            details,
        }
    }

    /// A required request parameter is absent or blank
    pub fn missing_input(code: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, None)
    }

    pub fn source_unavailable(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "source_unavailable",
            Some(details.into()),
        )
    }

    pub fn cache_unavailable(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "cache_unavailable",
            Some(details.into()),
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", None)
    }

    pub fn admin_disabled() -> Self {
        Self::new(StatusCode::FORBIDDEN, "admin_disabled", None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl From<ReadThroughError> for ApiError {
    fn from(err: ReadThroughError) -> Self {
        error!(error = %err, "read-through request failed");
        match err {
            ReadThroughError::Cache(inner) => Self::cache_unavailable(inner.to_string()),
            ReadThroughError::Source(inner) => Self::source_unavailable(inner.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind,
            details: self.details,
        };
        (
            self.status,
            [(header::CACHE_CONTROL, CachePolicy::NoStore.header_value())],
            Json(body),
        )
            .into_response()
    }
}
