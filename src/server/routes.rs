//! Route handlers for the crawl API

use crate::server::AppState;
use crate::service::CrawlOutcome;
use crate::storage::CrawlRecord;
use crate::PageMetaError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct CrawlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CrawlResponse {
    pub url: CrawlRecord,
    pub metadata: Option<crate::metadata::PageMetadata>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Error returned by a handler, rendered as `{"error": ...}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    record: Option<CrawlRecord>,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            record: None,
        }
    }
}

impl From<PageMetaError> for ApiError {
    fn from(err: PageMetaError) -> Self {
        let status = match &err {
            PageMetaError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            PageMetaError::NotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_crawl_failure() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", err);
        }
        Self {
            status,
            message: err.to_string(),
            record: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.record {
            Some(record) => json!({ "error": self.message, "url": record }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

/// A failed crawl still produced a record; report it alongside the error
fn outcome_response(
    outcome: CrawlOutcome,
    success: StatusCode,
) -> Result<(StatusCode, Json<CrawlResponse>), ApiError> {
    match outcome.failure {
        None => {
            let metadata = outcome.record.metadata.clone();
            Ok((
                success,
                Json(CrawlResponse {
                    url: outcome.record,
                    metadata,
                }),
            ))
        }
        Some(err) => {
            let mut api_error = ApiError::from(err);
            api_error.record = Some(outcome.record);
            Err(api_error)
        }
    }
}

pub async fn list_urls(
    State(state): State<AppState>,
) -> Result<Json<Vec<CrawlRecord>>, ApiError> {
    Ok(Json(state.service.list()?))
}

pub async fn create_url(
    State(state): State<AppState>,
    request: Result<Json<CrawlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CrawlResponse>), ApiError> {
    // Malformed, mistyped or non-JSON bodies are all bad requests
    let Json(request) = request.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let url = match request.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => return Err(ApiError::bad_request("url is required")),
    };

    let outcome = state.service.crawl_and_store(&url).await?;
    outcome_response(outcome, StatusCode::CREATED)
}

pub async fn recrawl_url(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<CrawlResponse>), ApiError> {
    let outcome = state.service.recrawl(id).await?;
    outcome_response(outcome, StatusCode::OK)
}

pub async fn delete_url(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.service.delete(id)?;
    Ok(Json(MessageResponse { message: "Deleted" }))
}

pub async fn delete_all_urls(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.service.delete_all()?;
    Ok(Json(MessageResponse {
        message: "All URLs deleted",
    }))
}
