//! Request handlers.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use url::Url;

use listings::{fetch_jobs, HttpSession, JobRecord, SourceConfig};

use crate::app::AppState;
use crate::email::{render_digest, send_digest};
use crate::store::{self, Company, NewCompany};

/// Errors surfaced to API clients as `{"detail": ...}` with a status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(format!("Database error: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    database: String,
}

/// Health check endpoint
///
/// Returns 200 OK if the database answers, 503 Service Unavailable otherwise.
pub async fn health(Extension(state): Extension<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                database: "ok".to_string(),
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded".to_string(),
                database: format!("error: {e}"),
            }),
        ),
    }
}

#[derive(Serialize)]
pub struct CompanyList {
    companies: Vec<Company>,
}

pub async fn list_companies(
    Extension(state): Extension<AppState>,
) -> Result<Json<CompanyList>, ApiError> {
    let companies = store::list_companies(&state.pool).await?;
    Ok(Json(CompanyList { companies }))
}

/// Company creation payload. Field aliases accommodate older clients.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    #[serde(alias = "company")]
    name: Option<String>,

    #[serde(alias = "careers")]
    list_url: Option<String>,

    #[serde(alias = "keywords")]
    role_keywords: Option<String>,

    #[serde(alias = "post_days", alias = "postdays")]
    max_age_days: Option<i64>,

    detail_fetch_limit: Option<i64>,

    active: Option<bool>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    ok: bool,
    id: i64,
}

pub async fn create_company(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let name = payload
        .name
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| missing_fields())?;
    let list_url = payload
        .list_url
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| missing_fields())?;

    if store::name_exists(&state.pool, &name).await? {
        return Err(ApiError::Conflict(
            "Company with this name already exists".to_string(),
        ));
    }

    let company = NewCompany {
        name,
        list_url,
        role_keywords: payload
            .role_keywords
            .unwrap_or_else(|| "software,developer,engineer".to_string()),
        max_age_days: payload.max_age_days.unwrap_or(7),
        detail_fetch_limit: payload.detail_fetch_limit.unwrap_or(40),
        active: payload.active.unwrap_or(true),
    };

    let id = store::insert_company(&state.pool, &company).await?;
    info!(id, name = %company.name, "company created");
    Ok(Json(CreatedResponse { ok: true, id }))
}

fn missing_fields() -> ApiError {
    ApiError::BadRequest("name/company and list_url/careers are required".to_string())
}

#[derive(Serialize)]
pub struct OkResponse {
    ok: bool,
}

pub async fn delete_company(
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, ApiError> {
    if !store::delete_company(&state.pool, id).await? {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }
    Ok(Json(OkResponse { ok: true }))
}

pub async fn reset_companies(
    Extension(state): Extension<AppState>,
) -> Result<Json<OkResponse>, ApiError> {
    store::reset_companies(&state.pool).await?;
    Ok(Json(OkResponse { ok: true }))
}

#[derive(Debug, Deserialize)]
pub struct RunQuery {
    #[serde(default)]
    dry_run: bool,
}

#[derive(Serialize)]
pub struct RunResponse {
    ok: bool,
    company: String,
    ran: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    jobs: Option<Vec<JobRecord>>,
}

/// Run the pipeline for one company and mail (or return) the digest.
pub async fn run_company(
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<RunQuery>,
) -> Result<Json<RunResponse>, ApiError> {
    let company = store::find_company(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

    // Only the one supported site for now
    let host = Url::parse(&company.list_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default();
    if !host.contains("amazon.jobs") {
        warn!(id, %host, "unsupported listing host");
        return Ok(Json(RunResponse {
            ok: true,
            company: company.name,
            ran: false,
            reason: Some("Only Amazon Jobs is supported.".to_string()),
            count: None,
            jobs: None,
        }));
    }

    let keywords = SourceConfig::parse_keywords(&company.role_keywords);
    let config = SourceConfig::new()
        .with_keywords(keywords.iter().map(String::as_str))
        .with_max_age_days(company.max_age_days)
        .with_detail_fetch_budget(company.detail_fetch_limit.max(0) as usize);

    let session = HttpSession::connect()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open HTTP session: {e}")))?;

    info!(id, company = %company.name, dry_run = query.dry_run, "pipeline run starting");
    let outcome = fetch_jobs(&session, &config).await;

    if query.dry_run {
        return Ok(Json(RunResponse {
            ok: true,
            company: company.name,
            ran: true,
            reason: None,
            count: Some(outcome.jobs.len()),
            jobs: Some(outcome.jobs),
        }));
    }

    let recipient = state
        .config
        .recipient_email
        .clone()
        .ok_or_else(|| ApiError::Internal("RECIPIENT_EMAIL env var missing".to_string()))?;

    let html = render_digest(&company.name, &keywords, company.max_age_days, &outcome.jobs);
    let subject = format!(
        "[JobWatch] {} roles (≤{}d)",
        company.name, company.max_age_days
    );

    send_digest(&state.config, &recipient, &subject, html)
        .await
        .map_err(|e| {
            error!(error = %e, "digest delivery failed");
            ApiError::Internal(format!("Email send failed: {e}"))
        })?;

    Ok(Json(RunResponse {
        ok: true,
        company: company.name,
        ran: true,
        reason: None,
        count: Some(outcome.jobs.len()),
        jobs: None,
    }))
}
