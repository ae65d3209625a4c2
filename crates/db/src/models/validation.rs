//! Validation history entity model and DTOs.

use medlearn_core::normalize::RecordSnapshot;
use medlearn_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `validation_history` table.
///
/// `result_details` holds the raw validator payload as received;
/// `compliance_summary`, `overall_score`, `lcd_results` and
/// `recommendations` are derived from it when a terminal result is
/// persisted, so list views never have to re-normalize the full payload.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ValidationRecord {
    pub id: Uuid,
    pub user_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_url: Option<String>,
    pub state: String,
    pub region: String,
    pub status: String,
    pub result_summary: Option<String>,
    pub result_details: Option<Value>,
    pub compliance_summary: Option<String>,
    pub overall_score: Option<i64>,
    pub lcd_results: Option<Value>,
    pub recommendations: Option<Value>,
    pub external_execution_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ValidationRecord {
    /// Read-only view of the fields the normalizer consults as fallbacks.
    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            id: self.id.to_string(),
            file_name: self.file_name.clone(),
            file_type: self.file_type.clone(),
            state: self.state.clone(),
            region: self.region.clone(),
            status: self.status.clone(),
            result_summary: self.result_summary.clone(),
            compliance_summary: self.compliance_summary.clone(),
            overall_score: self.overall_score,
            lcd_results: self.lcd_results.clone(),
            created_at: self.created_at,
        }
    }
}

/// DTO for creating a new validation record. Inserted with status
/// `processing`; result fields start empty.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateValidationRecord {
    pub user_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_url: Option<String>,
    pub state: String,
    pub region: String,
}

/// Fields written when a terminal result arrives.
#[derive(Debug, Clone)]
pub struct UpdateValidationResult {
    pub status: String,
    pub result_summary: Option<String>,
    pub result_details: Option<Value>,
    pub compliance_summary: Option<String>,
    pub overall_score: Option<i64>,
    pub lcd_results: Option<Value>,
    pub recommendations: Option<Value>,
    pub external_execution_id: Option<String>,
}
