//! Handler for the raw dispatch proxy.
//!
//! Lets trusted frontends post a fully formed dispatch payload without
//! knowing the engine's URL. No record is created here; callers that want
//! lifecycle tracking use the `/validations` submission flow instead.
//!
//! Unlike the rest of the API this endpoint answers in a
//! `{success, data|error}` envelope, the contract the proxy's existing
//! consumers expect.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medlearn_validator::{DispatchError, ValidationRequest};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/validator/trigger
///
/// Forward the payload to the engine and relay its acknowledgement.
/// Responds 400 on a malformed payload, 503 when no engine is
/// configured, and 502 when the engine rejects the request or cannot be
/// reached.
pub async fn trigger(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<Response> {
    if !payload.is_object() {
        return Err(AppError::BadRequest("Invalid dispatch payload".to_string()));
    }
    if payload
        .get("validationId")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .is_none()
    {
        return Err(AppError::BadRequest("Missing validationId".to_string()));
    }

    let request: ValidationRequest = serde_json::from_value(payload)
        .map_err(|e| AppError::BadRequest(format!("Invalid dispatch payload: {e}")))?;

    match state.validator.dispatch(&request).await {
        Ok(ack) => Ok(Json(json!({"success": true, "data": ack})).into_response()),
        Err(DispatchError::NotConfigured) => Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "Validation service is not configured",
            })),
        )
            .into_response()),
        Err(err) => {
            tracing::error!(error = %err, "Dispatch proxy failed");
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "success": false,
                    "error": "Could not reach the validation service",
                })),
            )
                .into_response())
        }
    }
}
