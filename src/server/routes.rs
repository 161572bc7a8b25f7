use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::question::Question;
use crate::server::AppState;
use crate::storage::QuestionStore;
use crate::Error;

/// Header carrying the admin secret
pub const ADMIN_HEADER: &str = "x-admin-secret";

#[derive(Deserialize)]
pub struct SubmitParams {
    pub text: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SummaryParams {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(e: Error) -> ApiError {
    let status = match &e {
        Error::InvalidInput(_) | Error::MissingCredential => StatusCode::BAD_REQUEST,
        Error::SummaryRequestFailed(_) => StatusCode::BAD_GATEWAY,
        Error::StorageUnavailable(_) | Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("{}", e);
    }
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            kind: e.kind().to_string(),
        }),
    )
}

/// Run a store operation on the blocking pool.
///
/// SQLite calls hold the connection mutex and may wait on `busy_timeout`,
/// so they stay off the async worker threads.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&QuestionStore) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| api_error(Error::StorageUnavailable(format!("storage task failed: {}", e))))?
        .map_err(api_error)
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    if !state.admin.is_configured() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "admin access is disabled on this server".to_string(),
                kind: "admin_disabled".to_string(),
            }),
        ));
    }

    let provided = headers
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if state.admin.verify(provided) {
        Ok(())
    } else {
        tracing::warn!("Rejected admin request with bad secret");
        Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "incorrect admin secret".to_string(),
                kind: "unauthorized".to_string(),
            }),
        ))
    }
}

pub async fn submit_question(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitParams>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Json(params) = payload.map_err(|e| api_error(Error::InvalidInput(e.body_text())))?;
    let id = with_store(&state, move |store| store.add_question(&params.text)).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (total, questions) = with_store(&state, move |store| {
        let total = store.count()?;
        let questions = match params.limit {
            Some(limit) => store.recent(limit)?,
            None => store.list_questions()?,
        };
        Ok((total, questions))
    })
    .await?;

    Ok(Json(serde_json::json!({
        "total": total,
        "questions": questions,
    })))
}

pub async fn admin_list_questions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Question>>, ApiError> {
    require_admin(&state, &headers)?;
    let records = with_store(&state, |store| store.list_records()).await?;
    Ok(Json(records))
}

pub async fn admin_clear_questions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers)?;
    with_store(&state, |store| store.clear_all()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// An empty body means "use the server's default key"
fn parse_summary_params(body: &[u8]) -> Result<SummaryParams, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SummaryParams::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| api_error(Error::InvalidInput(format!("malformed summary request: {}", e))))
}

pub async fn admin_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&state, &headers)?;
    let params = parse_summary_params(&body)?;

    let api_key = params
        .api_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| state.default_api_key.clone())
        .unwrap_or_default();

    // Snapshot first; the store lock is released before the network call.
    let questions = with_store(&state, |store| store.list_questions()).await?;
    let summary = state
        .summarizer
        .summarize(&api_key, &questions)
        .await
        .map_err(api_error)?;

    Ok(Json(serde_json::json!({ "summary": summary })))
}
