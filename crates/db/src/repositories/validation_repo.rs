//! Repository for the `validation_history` table.

use medlearn_core::record_status;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::validation::{
    CreateValidationRecord, UpdateValidationResult, ValidationRecord,
};

// ---------------------------------------------------------------------------
// Column list
// ---------------------------------------------------------------------------

const COLUMNS: &str = "\
    id, user_id, file_name, file_type, file_url, state, region, status, \
    result_summary, result_details, compliance_summary, overall_score, \
    lcd_results, recommendations, external_execution_id, created_at, \
    updated_at";

const DEFAULT_HISTORY_LIMIT: i64 = 10;
const DEFAULT_ADMIN_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 100;

/// Provides CRUD operations for validation history records.
pub struct ValidationRepo;

impl ValidationRepo {
    /// Create a new record in the `processing` state.
    pub async fn create(
        pool: &PgPool,
        dto: &CreateValidationRecord,
    ) -> Result<ValidationRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO validation_history \
                 (user_id, file_name, file_type, file_url, state, region, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ValidationRecord>(&query)
            .bind(&dto.user_id)
            .bind(&dto.file_name)
            .bind(&dto.file_type)
            .bind(&dto.file_url)
            .bind(&dto.state)
            .bind(&dto.region)
            .bind(record_status::STATUS_PROCESSING)
            .fetch_one(pool)
            .await
    }

    /// Find a record by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ValidationRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM validation_history WHERE id = $1");
        sqlx::query_as::<_, ValidationRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one user's non-archived records, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ValidationRecord>, sqlx::Error> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        let query = format!(
            "SELECT {COLUMNS} FROM validation_history \
             WHERE user_id = $1 AND status <> $2 \
             ORDER BY created_at DESC LIMIT $3"
        );
        sqlx::query_as::<_, ValidationRecord>(&query)
            .bind(user_id)
            .bind(record_status::STATUS_ARCHIVED)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List records across all users for the admin overview, newest first.
    /// Archived records are included there so they can be purged.
    pub async fn list_all(
        pool: &PgPool,
        limit: Option<i64>,
    ) -> Result<Vec<ValidationRecord>, sqlx::Error> {
        let limit = limit
            .unwrap_or(DEFAULT_ADMIN_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        let query = format!(
            "SELECT {COLUMNS} FROM validation_history \
             ORDER BY created_at DESC LIMIT $1"
        );
        sqlx::query_as::<_, ValidationRecord>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Record the execution id handed back by the validator at dispatch.
    pub async fn set_external_execution_id(
        pool: &PgPool,
        id: Uuid,
        execution_id: &str,
    ) -> Result<Option<ValidationRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE validation_history \
             SET external_execution_id = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ValidationRecord>(&query)
            .bind(id)
            .bind(execution_id)
            .fetch_optional(pool)
            .await
    }

    /// Write a terminal result. Archived records are frozen and never
    /// updated; `None` means the record is missing or archived.
    pub async fn update_result(
        pool: &PgPool,
        id: Uuid,
        update: &UpdateValidationResult,
    ) -> Result<Option<ValidationRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE validation_history SET \
                 status = $2, \
                 result_summary = $3, \
                 result_details = $4, \
                 compliance_summary = $5, \
                 overall_score = $6, \
                 lcd_results = $7, \
                 recommendations = $8, \
                 external_execution_id = COALESCE($9, external_execution_id), \
                 updated_at = NOW() \
             WHERE id = $1 AND status <> $10 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ValidationRecord>(&query)
            .bind(id)
            .bind(&update.status)
            .bind(&update.result_summary)
            .bind(&update.result_details)
            .bind(&update.compliance_summary)
            .bind(update.overall_score)
            .bind(&update.lcd_results)
            .bind(&update.recommendations)
            .bind(&update.external_execution_id)
            .bind(record_status::STATUS_ARCHIVED)
            .fetch_optional(pool)
            .await
    }

    /// Archive a record. In-flight records cannot be archived; `None`
    /// means the record is missing or still processing.
    pub async fn archive(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ValidationRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE validation_history \
             SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status <> $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ValidationRecord>(&query)
            .bind(id)
            .bind(record_status::STATUS_ARCHIVED)
            .bind(record_status::STATUS_PROCESSING)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a record. Returns `false` when nothing matched.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM validation_history WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
