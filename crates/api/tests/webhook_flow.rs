//! Database-backed tests for the validator callback lifecycle.
//!
//! Each test gets its own provisioned schema via `#[sqlx::test]`. Records
//! are seeded through the repository layer, results are delivered through
//! the HTTP webhook, and outcomes are verified through both the repository
//! and the read endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app_with_pool, get, post_json};
use medlearn_db::models::validation::CreateValidationRecord;
use medlearn_db::repositories::ValidationRepo;
use serde_json::json;
use sqlx::PgPool;

const WEBHOOK_PATH: &str = "/api/v1/webhooks/validator";

fn new_record(user_id: &str) -> CreateValidationRecord {
    CreateValidationRecord {
        user_id: user_id.to_string(),
        file_name: "note.pdf".to_string(),
        file_type: "application/pdf".to_string(),
        file_url: None,
        state: "California".to_string(),
        region: "West".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Test: a completed callback persists the derived result fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn completed_callback_persists_derived_result(pool: PgPool) {
    let record = ValidationRepo::create(&pool, &new_record("clinician-7"))
        .await
        .unwrap();

    let app = build_test_app_with_pool(pool.clone());
    let response = post_json(
        app.clone(),
        WEBHOOK_PATH,
        json!({
            "validationId": record.id.to_string(),
            "status": "completed",
            "resultDetails": {
                "overallSummary": {"score": "94%"},
                "lcdChecks": [{"lcd": "L123", "status": "Met"}]
            }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["success"], true);

    let stored = ValidationRepo::find_by_id(&pool, record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "completed");
    assert_eq!(stored.overall_score, Some(94));
    assert_eq!(stored.lcd_results.as_ref().unwrap().as_array().unwrap().len(), 1);

    // The read side normalizes the stored entry to a pass.
    let response = get(app, &format!("/api/v1/validations/{}/details", record.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let details = body_json(response).await;
    assert_eq!(details["data"]["details"]["lcdChecks"][0]["status"], "pass");
    assert_eq!(details["data"]["displayScore"], 94);
}

// ---------------------------------------------------------------------------
// Test: redelivering a callback overwrites the terminal fields in place
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn redelivered_callback_overwrites_terminal_result(pool: PgPool) {
    let record = ValidationRepo::create(&pool, &new_record("clinician-7"))
        .await
        .unwrap();

    let app = build_test_app_with_pool(pool.clone());
    let payload = |score: &str| {
        json!({
            "validationId": record.id.to_string(),
            "status": "completed",
            "resultDetails": {"overallSummary": {"score": score}}
        })
    };

    let first = post_json(app.clone(), WEBHOOK_PATH, payload("94%")).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app, WEBHOOK_PATH, payload("88%")).await;
    assert_eq!(second.status(), StatusCode::OK);

    let stored = ValidationRepo::find_by_id(&pool, record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "completed");
    assert_eq!(stored.overall_score, Some(88));
}

// ---------------------------------------------------------------------------
// Test: a callback for an unknown record answers 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn callback_for_unknown_record_returns_404(pool: PgPool) {
    let app = build_test_app_with_pool(pool);
    let response = post_json(
        app,
        WEBHOOK_PATH,
        json!({
            "validationId": "11111111-2222-3333-4444-555555555555",
            "status": "completed"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: archived records are frozen against late callbacks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn archived_record_rejects_late_callback(pool: PgPool) {
    let record = ValidationRepo::create(&pool, &new_record("clinician-7"))
        .await
        .unwrap();

    let app = build_test_app_with_pool(pool.clone());
    let complete = post_json(
        app.clone(),
        WEBHOOK_PATH,
        json!({
            "validationId": record.id.to_string(),
            "status": "completed",
            "resultDetails": {"overallSummary": {"score": 90}}
        }),
    )
    .await;
    assert_eq!(complete.status(), StatusCode::OK);

    let archived = post_json(
        app.clone(),
        &format!("/api/v1/admin/validations/{}/archive", record.id),
        json!({}),
    )
    .await;
    assert_eq!(archived.status(), StatusCode::OK);

    let late = post_json(
        app,
        WEBHOOK_PATH,
        json!({
            "validationId": record.id.to_string(),
            "status": "completed",
            "resultDetails": {"overallSummary": {"score": 10}}
        }),
    )
    .await;
    assert_eq!(late.status(), StatusCode::CONFLICT);

    // The archived result is untouched.
    let stored = ValidationRepo::find_by_id(&pool, record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "archived");
    assert_eq!(stored.overall_score, Some(90));
}
