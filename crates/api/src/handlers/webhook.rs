//! Handler for the inbound validator result callback.
//!
//! The external engine posts here exactly once per run when it finishes.
//! The payload shape beyond `validationId` and `status` is not
//! contractual; whatever arrives is stored raw and normalized into the
//! derived result columns in one write.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use medlearn_core::error::CoreError;
use medlearn_core::normalize::coerce::{get_first, get_text};
use medlearn_core::normalize::{derive_result_fields, RecordSnapshot};
use medlearn_core::record_status;
use medlearn_db::models::validation::UpdateValidationResult;
use medlearn_db::repositories::ValidationRepo;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Acknowledgement returned to the engine.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
    pub validation_id: Uuid,
}

/// POST /api/v1/webhooks/validator
///
/// Persist a terminal result. `status` values other than `completed` all
/// resolve the record as `failed`; an unknown status must never leave a
/// record processing forever.
pub async fn receive_result(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let validation_id = payload
        .get("validationId")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing validationId".to_string()))?;
    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing status".to_string()))?;

    let id = Uuid::parse_str(validation_id)
        .map_err(|_| AppError::BadRequest("validationId must be a valid UUID".to_string()))?;

    let record = ValidationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Validation",
            id,
        }))?;

    let terminal_status = if status == "completed" {
        record_status::STATUS_COMPLETED
    } else {
        record_status::STATUS_FAILED
    };

    let update = build_result_update(&payload, &record.snapshot(), terminal_status);

    ValidationRepo::update_result(&state.pool, id, &update)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Archived validation records cannot be updated".to_string(),
            ))
        })?;

    tracing::info!(validation_id = %id, status = terminal_status, "validation result persisted");

    Ok(Json(WebhookAck {
        success: true,
        message: format!("Validation marked {terminal_status}"),
        validation_id: id,
    }))
}

/// Assemble the stored update from a callback payload.
///
/// The result document lives under `resultDetails` (an object or an
/// embedded JSON string); `results` and `details` are accepted as legacy
/// spellings, and a payload carrying neither is stored as the document
/// itself. The summary prefers the engine's `resultSummary` over its
/// transport-level `message`, then the derived compliance summary.
fn build_result_update(
    payload: &Value,
    record: &RecordSnapshot,
    status: &str,
) -> UpdateValidationResult {
    let raw = get_first(payload, &["resultDetails", "results", "details"]).unwrap_or(payload);
    let derived = derive_result_fields(Some(raw), record);

    let result_summary = get_text(payload, "resultSummary")
        .or_else(|| get_text(payload, "message"))
        .or_else(|| derived.compliance_summary.clone());
    let external_execution_id = get_text(payload, "executionId");

    UpdateValidationResult {
        status: status.to_string(),
        result_summary,
        result_details: Some(raw.clone()),
        compliance_summary: derived.compliance_summary,
        overall_score: derived.overall_score,
        lcd_results: derived.lcd_results,
        recommendations: derived.recommendations,
        external_execution_id,
    }
}
