//! Handlers for the admin reports overview.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use medlearn_core::error::CoreError;
use medlearn_db::repositories::ValidationRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/validations?limit=
///
/// Cross-user overview, newest first, archived records included.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let records = ValidationRepo::list_all(&state.pool, params.limit).await?;
    Ok(Json(DataResponse { data: records }))
}

/// POST /api/v1/admin/validations/{id}/archive
///
/// Archive a terminal record. A missing record and one still processing
/// both answer 404: neither is archivable.
pub async fn archive(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = ValidationRepo::archive(&state.pool, id).await?.ok_or(
        AppError::Core(CoreError::NotFound {
            entity: "Validation",
            id,
        }),
    )?;
    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/admin/validations/{id}
///
/// Permanently delete a record, archived or not.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let deleted = ValidationRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Validation",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
