use crate::http::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use cache_system::CacheStore;
use chrono::{DateTime, Utc};
use record_source::SourceOfRecord;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub cache: String,
    pub database: String,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "ok"
    }
}

/// Ping both backends
pub async fn probe(cache: &dyn CacheStore, source: &dyn SourceOfRecord) -> HealthReport {
    let (cache_result, source_result) = tokio::join!(cache.ping(), source.ping());

    let cache = match cache_result {
        Ok(_) => "ok".to_string(),
        Err(e) => {
            warn!(error = %e, "cache health check failed");
            format!("unavailable: {}", e)
        }
    };
    let database = match source_result {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            warn!(error = %e, "database health check failed");
            format!("unavailable: {}", e)
        }
    };

    let status = if cache == "ok" && database == "ok" {
        "ok"
    } else {
        "degraded"
    };

    HealthReport {
        status,
        cache,
        database,
        checked_at: Utc::now(),
    }
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Response {
    let report = probe(state.cache.as_ref(), state.source.as_ref()).await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, [(header::CACHE_CONTROL, "no-store")], Json(report)).into_response()
}
