// src/error.rs
//! Failures that can abort a dashboard recomputation.
//!
//! Per-row problems in the payload are *not* errors here: they are collected
//! into `LoadReport::rejected` and surfaced next to the rendered dashboard.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Network failure, timeout or non-2xx status from the catalog.
    #[error("catalog fetch failed: {0}")]
    Transport(String),

    /// Body was not a JSON array of rows.
    #[error("catalog payload is malformed: {0}")]
    Payload(String),

    /// Caller supplied a filter value outside its allowed domain.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl DashboardError {
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::Transport(_) => "transport",
            DashboardError::Payload(_) => "payload",
            DashboardError::InvalidQuery(_) => "invalid_query",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DashboardError::Transport(_) | DashboardError::Payload(_) => StatusCode::BAD_GATEWAY,
            DashboardError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        DashboardError::Transport(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (self.status(), Json(body)).into_response()
    }
}
