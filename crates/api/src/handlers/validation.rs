//! Handlers for the `/validations` resource.
//!
//! Owns the submission flow (create record, dispatch to the engine) and
//! every read surface over a record: raw detail, terminal-state wait,
//! normalized details, and the plain-text report.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use medlearn_core::error::CoreError;
use medlearn_core::jurisdiction::region_for_state;
use medlearn_core::normalize::status::{clamp_score, resolve_validation_status};
use medlearn_core::normalize::{normalize_validation_details, NormalizedValidationDetails};
use medlearn_core::polling::{poll_until_terminal, PollOutcome};
use medlearn_core::record_status;
use medlearn_core::report::build_report_text;
use medlearn_db::models::validation::{CreateValidationRecord, ValidationRecord};
use medlearn_db::repositories::ValidationRepo;
use medlearn_validator::{ValidationRequest, ValidationResponse, FILE_UPLOAD_SENTINEL};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::HistoryParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_USER: &str = "anonymous";

/// Request body for submitting a note for validation.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitValidation {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1, max = 100))]
    pub file_type: String,
    /// Inline note text. Either this or `file_url` must be set.
    pub content: Option<String>,
    /// Storage URL for an uploaded note.
    pub file_url: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub state: String,
}

/// Response body for a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitResult {
    pub record: ValidationRecord,
    pub dispatch: ValidationResponse,
}

/// Normalized details plus the presentation-level verdict derived from
/// them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsResult {
    pub details: NormalizedValidationDetails,
    /// `passed` / `warning` / `failed`.
    pub overall_status: &'static str,
    /// Score clamped to `[0, 100]` for display.
    pub display_score: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/validations
///
/// Create a record in the `processing` state, then dispatch the note to
/// the external engine. Dispatch failure surfaces as an error while the
/// record stays in `processing`; the result webhook or a retry can still
/// resolve it.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitValidation>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let inline_content = input
        .content
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    if inline_content.is_none() && input.file_url.is_none() {
        return Err(AppError::BadRequest(
            "Either content or file_url must be provided".to_string(),
        ));
    }

    let region = region_for_state(&input.state);
    let record = ValidationRepo::create(
        &state.pool,
        &CreateValidationRecord {
            user_id: input.user_id.clone(),
            file_name: input.file_name.clone(),
            file_type: input.file_type.clone(),
            file_url: input.file_url.clone(),
            state: input.state.clone(),
            region: region.to_string(),
        },
    )
    .await?;

    let content = if input.file_url.is_some() {
        FILE_UPLOAD_SENTINEL.to_string()
    } else {
        inline_content.unwrap_or_default().to_string()
    };
    let request = ValidationRequest {
        validation_id: record.id.to_string(),
        file_name: input.file_name,
        file_type: input.file_type,
        content,
        file_url: input.file_url,
        state: input.state,
        region: region.to_string(),
        user_id: input.user_id,
    };

    let dispatch = state.validator.dispatch(&request).await?;

    // "unknown" is the fill-in for engines that acknowledge without an id;
    // do not persist it over a real value from a later callback.
    let record = if dispatch.execution_id != "unknown" {
        ValidationRepo::set_external_execution_id(&state.pool, record.id, &dispatch.execution_id)
            .await?
            .unwrap_or(record)
    } else {
        record
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: SubmitResult { record, dispatch },
        }),
    ))
}

/// GET /api/v1/validations?user_id=&limit=
///
/// List one user's non-archived validation history, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<impl IntoResponse> {
    let user_id = params.user_id.as_deref().unwrap_or(DEFAULT_USER);
    let records = ValidationRepo::list_by_user(&state.pool, user_id, params.limit).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/validations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = find_record(&state, id).await?;
    Ok(Json(DataResponse { data: record }))
}

/// GET /api/v1/validations/{id}/wait
///
/// Block until the record reaches a terminal state or the polling budget
/// is exhausted. A timeout responds `202 Accepted` with the still-pending
/// record; nothing is marked failed on the caller's behalf.
pub async fn wait(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    // Resolve existence up front so a bad id is a 404, not a five-minute
    // wait.
    let record = find_record(&state, id).await?;
    if record_status::is_terminal(&record.status) {
        return Ok((StatusCode::OK, Json(DataResponse { data: record })));
    }

    let pool = state.pool.clone();
    let outcome = poll_until_terminal(&state.config.poll, || {
        let pool = pool.clone();
        async move {
            let record = ValidationRepo::find_by_id(&pool, id).await?;
            Ok::<_, sqlx::Error>(
                record.filter(|r| record_status::is_terminal(&r.status)),
            )
        }
    })
    .await;

    match outcome {
        PollOutcome::Terminal(record) => Ok((StatusCode::OK, Json(DataResponse { data: record }))),
        PollOutcome::TimedOut => {
            let record = find_record(&state, id).await?;
            Ok((StatusCode::ACCEPTED, Json(DataResponse { data: record })))
        }
        PollOutcome::Aborted(msg) => Err(AppError::InternalError(msg)),
    }
}

/// GET /api/v1/validations/{id}/details
///
/// Normalize the record's stored result payload and return it together
/// with the presentation verdict.
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = find_record(&state, id).await?;
    let details = normalize_validation_details(record.result_details.as_ref(), &record.snapshot());
    let summary = &details.overall_summary;
    let overall_status =
        resolve_validation_status(summary.status.as_deref(), summary.score).as_str();
    let display_score = summary.score.map(clamp_score);

    Ok(Json(DataResponse {
        data: DetailsResult {
            details,
            overall_status,
            display_score,
        },
    }))
}

/// GET /api/v1/validations/{id}/report
///
/// Render the record as a downloadable plain-text report.
pub async fn report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = find_record(&state, id).await?;
    let snapshot = record.snapshot();
    let details = normalize_validation_details(record.result_details.as_ref(), &snapshot);
    let text = build_report_text(&snapshot, &details);

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    ))
}

async fn find_record(state: &AppState, id: Uuid) -> AppResult<ValidationRecord> {
    ValidationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Validation",
            id,
        }))
}
