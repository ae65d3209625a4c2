//! Validation result normalization.
//!
//! The external workflow engine returns compliance analysis as a loosely
//! structured document whose shape is not contractually fixed: fields move,
//! arrays arrive as strings, scores arrive as prose. This module converts
//! whatever arrived (plus the owning record's stored fields as fallbacks)
//! into a canonical [`NormalizedValidationDetails`] that the API and report
//! builder can rely on.
//!
//! Normalization is a total, pure function: it never errors, holds no
//! state, and running it twice over the same input yields identical output.
//! It runs once when the webhook persists a result and again on every read,
//! as a defensive second pass over whatever is actually stored.

pub mod coerce;
pub mod lcd;
pub mod recommendation;
pub mod status;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Timestamp;
use coerce::{get, get_first, get_text, parse_details, to_string_array};
use lcd::{build_lcd_checks, extract_raw_lcd_entries, NormalizedLcdCheck};
use recommendation::{
    normalize_recommendation_collection, NormalizedRecommendation, Priority,
    RecommendationDefaults,
};

/// The stored record fields the normalizer cross-references as fallbacks.
///
/// This is a read-only snapshot so the normalizer stays independent of the
/// persistence layer.
#[derive(Debug, Clone)]
pub struct RecordSnapshot {
    pub id: String,
    pub file_name: String,
    pub file_type: String,
    pub state: String,
    pub region: String,
    pub status: String,
    pub result_summary: Option<String>,
    pub compliance_summary: Option<String>,
    pub overall_score: Option<i64>,
    pub lcd_results: Option<Value>,
    pub created_at: Timestamp,
}

/// Jurisdiction and tracing metadata extracted from the payload, with
/// record fields as fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub validation_id: Option<String>,
    /// Medicare Administrative Contractor (payer) identifier.
    pub mac: Option<String>,
    pub state: Option<String>,
    pub region_hint: Option<String>,
    pub generated_at: Option<String>,
    pub patient_info_redacted: Option<String>,
    pub file_type: Option<String>,
}

/// Narrative clinical documentation sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    pub chief_complaint: Option<String>,
    pub hpi: Option<String>,
    pub interventions: Option<String>,
    pub plan: Option<String>,
    pub medical_necessity: Option<String>,
    pub comorbidities: Option<String>,
    pub consent: Option<String>,
    pub documentation: Option<String>,
    pub photos_measurements: Option<String>,
    /// Raw wound-assessment blob; structured separately into
    /// [`WoundAssessment`].
    pub wound_assessment: Option<Value>,
}

/// Structured wound assessment, present only when the payload carried one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WoundAssessment {
    pub location: Option<String>,
    pub size: Option<serde_json::Map<String, Value>>,
    pub edges: Option<String>,
    pub base: Option<String>,
    pub exudate: Option<String>,
    pub infection_signs: Option<String>,
    pub surrounding_skin: Option<String>,
}

/// The payload's overall verdict block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    pub status: Option<String>,
    pub summary_text: Option<String>,
    pub key_findings: Vec<String>,
    pub next_steps: Vec<String>,
    /// Unclamped; clamp with [`status::clamp_score`] before display.
    pub score: Option<i64>,
}

/// Canonical, renderable shape of one validation result.
///
/// Ephemeral by design: recomputed from the record's raw fields on every
/// normalization call, never persisted in this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedValidationDetails {
    pub meta: Meta,
    pub sections: Sections,
    pub wound_assessment: Option<WoundAssessment>,
    pub overall_summary: OverallSummary,
    pub lcd_checks: Vec<NormalizedLcdCheck>,
    pub recommendations: Vec<NormalizedRecommendation>,
}

/// Fields derived from a result payload for storage alongside the raw
/// details, produced once when a terminal result is persisted.
#[derive(Debug, Clone)]
pub struct StoredDerivation {
    pub details: NormalizedValidationDetails,
    pub overall_score: Option<i64>,
    pub compliance_summary: Option<String>,
    /// Raw per-rule LCD entries as extracted, `None` when there are none.
    pub lcd_results: Option<Value>,
    /// Storage-time recommendation aggregate (text-only dedup key).
    pub recommendations: Option<Value>,
}

/// Normalize a raw result payload against its owning record.
pub fn normalize_validation_details(
    raw_details: Option<&Value>,
    record: &RecordSnapshot,
) -> NormalizedValidationDetails {
    let raw = parse_details(raw_details);
    let empty = Value::Object(Default::default());
    let summary = get_first(&raw, &["overallSummary", "summary"]).unwrap_or(&empty);

    // First present value wins, then a single extraction pass; a present
    // but unparseable value does not fall through to later candidates.
    let score_source = get_first(summary, &["complianceScore", "score"])
        .cloned()
        .or_else(|| record.overall_score.map(Value::from))
        .or_else(|| get(&raw, "overallScore").cloned());
    let score = coerce::extract_numeric_score(score_source.as_ref());

    let summary_text = get_text(summary, "summary")
        .or_else(|| get_text(summary, "message"))
        .or_else(|| get_text(summary, "description"))
        .or_else(|| record.result_summary.clone())
        .or_else(|| record.compliance_summary.clone());

    let sections = build_sections(get(&raw, "sections").unwrap_or(&raw));
    let wound_assessment = build_wound_assessment(sections.wound_assessment.as_ref());
    let lcd_checks = build_lcd_checks(&raw, record.lcd_results.as_ref());
    let recommendations = aggregate_for_display(&raw, &lcd_checks);

    NormalizedValidationDetails {
        meta: build_meta(get(&raw, "meta"), record),
        sections,
        wound_assessment,
        overall_summary: OverallSummary {
            status: get_text(summary, "complianceStatus")
                .or_else(|| get_text(summary, "status"))
                .or_else(|| Some(record.status.clone())),
            summary_text,
            key_findings: to_string_array(get(summary, "keyFindings")),
            next_steps: to_string_array(get(summary, "nextSteps")),
            score,
        },
        lcd_checks,
        recommendations,
    }
}

/// Normalize a payload and derive the fields persisted next to it.
pub fn derive_result_fields(
    raw_details: Option<&Value>,
    record: &RecordSnapshot,
) -> StoredDerivation {
    let details = normalize_validation_details(raw_details, record);
    let raw = parse_details(raw_details);

    let raw_lcds = extract_raw_lcd_entries(&raw, record.lcd_results.as_ref());
    let stored_recs = aggregate_for_storage(&raw, &details.lcd_checks);

    StoredDerivation {
        overall_score: details.overall_summary.score,
        compliance_summary: details.overall_summary.summary_text.clone(),
        lcd_results: (!raw_lcds.is_empty()).then(|| Value::Array(raw_lcds)),
        recommendations: if stored_recs.is_empty() {
            None
        } else {
            serde_json::to_value(&stored_recs).ok()
        },
        details,
    }
}

/// Collect recommendations from all four payload sources in precedence
/// order: top-level, overall-summary, next-steps (tagged high), then each
/// LCD check's own list.
fn recommendation_sources(
    raw: &Value,
    lcd_checks: &[NormalizedLcdCheck],
) -> Vec<NormalizedRecommendation> {
    let mut collected = normalize_recommendation_collection(
        get(raw, "recommendations"),
        &RecommendationDefaults {
            priority: Some(Priority::Medium),
            category: None,
            source: Some("AI Analysis".to_string()),
        },
    );

    let summary = get(raw, "overallSummary");
    collected.extend(normalize_recommendation_collection(
        summary.and_then(|s| get(s, "recommendations")),
        &RecommendationDefaults {
            priority: Some(Priority::Medium),
            category: None,
            source: Some("Overall Summary".to_string()),
        },
    ));
    collected.extend(normalize_recommendation_collection(
        summary.and_then(|s| get(s, "nextSteps")),
        &RecommendationDefaults {
            priority: Some(Priority::High),
            category: None,
            source: Some("Next Steps".to_string()),
        },
    ));

    for check in lcd_checks {
        collected.extend(check.recommendations.iter().cloned());
    }

    collected
}

/// Display-time aggregate: de-duplicated by priority + lowercase text
/// (first occurrence wins), sorted high > medium > low.
pub fn aggregate_for_display(
    raw: &Value,
    lcd_checks: &[NormalizedLcdCheck],
) -> Vec<NormalizedRecommendation> {
    let mut aggregate: Vec<NormalizedRecommendation> = Vec::new();

    for rec in recommendation_sources(raw, lcd_checks) {
        let key = (rec.priority.rank(), rec.text.to_lowercase());
        if !aggregate
            .iter()
            .any(|existing| (existing.priority.rank(), existing.text.to_lowercase()) == key)
        {
            aggregate.push(rec);
        }
    }

    aggregate.sort_by_key(|rec| rec.priority.rank());
    aggregate
}

/// Storage-time aggregate: de-duplicated by lowercase text alone (first
/// occurrence wins), source order preserved.
///
/// Intentionally a different key than [`aggregate_for_display`]: the stored
/// column collapses a recommendation repeated at different priorities into
/// one entry, keeping terminal updates idempotent, while the display
/// aggregate keeps them apart for on-screen grouping.
pub fn aggregate_for_storage(
    raw: &Value,
    lcd_checks: &[NormalizedLcdCheck],
) -> Vec<NormalizedRecommendation> {
    let mut aggregate: Vec<NormalizedRecommendation> = Vec::new();

    for rec in recommendation_sources(raw, lcd_checks) {
        let key = rec.text.to_lowercase();
        if !aggregate
            .iter()
            .any(|existing| existing.text.to_lowercase() == key)
        {
            aggregate.push(rec);
        }
    }

    aggregate
}

fn build_meta(raw_meta: Option<&Value>, record: &RecordSnapshot) -> Meta {
    let empty = Value::Object(Default::default());
    let meta = raw_meta.unwrap_or(&empty);

    Meta {
        validation_id: get_text(meta, "validationId").or_else(|| Some(record.id.clone())),
        mac: get_text(meta, "mac"),
        state: get_text(meta, "state").or_else(|| Some(record.state.clone())),
        region_hint: get_text(meta, "regionHint").or_else(|| Some(record.region.clone())),
        generated_at: get_text(meta, "generatedAt"),
        patient_info_redacted: get_text(meta, "patient_info_redacted"),
        file_type: get_text(meta, "fileType").or_else(|| Some(record.file_type.clone())),
    }
}

fn build_sections(sections: &Value) -> Sections {
    Sections {
        chief_complaint: get_text(sections, "chiefComplaint")
            .or_else(|| get_text(sections, "complaint")),
        hpi: get_text(sections, "hpi").or_else(|| get_text(sections, "history")),
        interventions: get_text(sections, "interventionsToDate")
            .or_else(|| get_text(sections, "interventions")),
        plan: get_text(sections, "plan"),
        medical_necessity: get_text(sections, "medicalNecessity")
            .or_else(|| get_text(sections, "justification")),
        comorbidities: get_text(sections, "comorbidities"),
        consent: get_text(sections, "consent"),
        documentation: get_text(sections, "supportingDocumentation"),
        photos_measurements: get_text(sections, "photosMeasurements"),
        wound_assessment: get(sections, "woundAssessment").cloned(),
    }
}

fn build_wound_assessment(raw: Option<&Value>) -> Option<WoundAssessment> {
    let wound = raw?;
    if !wound.is_object() {
        return None;
    }

    let size = match get(wound, "size") {
        Some(Value::Object(map)) => Some(map.clone()),
        _ => None,
    };

    Some(WoundAssessment {
        location: get_text(wound, "location"),
        size,
        edges: get_text(wound, "edges"),
        base: get_text(wound, "base"),
        exudate: get_text(wound, "exudate"),
        infection_signs: get_text(wound, "infectionSigns"),
        surrounding_skin: get_text(wound, "surroundingSkin"),
    })
}

#[cfg(test)]
mod tests {
    use super::lcd::LcdStatus;
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record() -> RecordSnapshot {
        RecordSnapshot {
            id: "11111111-2222-3333-4444-555555555555".to_string(),
            file_name: "patient_note_001.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            state: "California".to_string(),
            region: "West".to_string(),
            status: "completed".to_string(),
            result_summary: None,
            compliance_summary: None,
            overall_score: None,
            lcd_results: None,
            created_at: chrono::Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn malformed_inputs_yield_complete_defaults() {
        let record = record();
        let inputs = [None, Some(json!("not json")), Some(json!({})), Some(json!(42))];

        for input in inputs {
            let details = normalize_validation_details(input.as_ref(), &record);
            assert!(details.lcd_checks.is_empty());
            assert!(details.recommendations.is_empty());
            assert!(details.overall_summary.key_findings.is_empty());
            assert!(details.overall_summary.next_steps.is_empty());
            assert_eq!(details.overall_summary.score, None);
            assert!(details.wound_assessment.is_none());
            assert!(details.sections.chief_complaint.is_none());
            // Record fallbacks still populate the meta block.
            assert_eq!(details.meta.validation_id.as_deref(), Some(record.id.as_str()));
            assert_eq!(details.meta.state.as_deref(), Some("California"));
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = json!({
            "overallSummary": {"score": "94%", "keyFindings": "a; b"},
            "lcdChecks": [{"lcd": "L123", "status": "Met"}],
            "recommendations": ["Elevate the limb"]
        });
        let record = record();
        let first = normalize_validation_details(Some(&raw), &record);
        let second = normalize_validation_details(Some(&raw), &record);
        assert_eq!(first, second);
    }

    #[test]
    fn score_parsed_from_summary_text() {
        let raw = json!({"overallSummary": {"score": "94%"}});
        let details = normalize_validation_details(Some(&raw), &record());
        assert_eq!(details.overall_summary.score, Some(94));
    }

    #[test]
    fn score_falls_back_to_stored_column() {
        let mut record = record();
        record.overall_score = Some(77);
        let details = normalize_validation_details(Some(&json!({})), &record);
        assert_eq!(details.overall_summary.score, Some(77));
    }

    #[test]
    fn present_but_unparseable_score_does_not_fall_through() {
        let mut record = record();
        record.overall_score = Some(77);
        let raw = json!({"overallSummary": {"score": "pending"}});
        let details = normalize_validation_details(Some(&raw), &record);
        assert_eq!(details.overall_summary.score, None);
    }

    #[test]
    fn summary_text_falls_back_to_record_summaries() {
        let mut record = record();
        record.result_summary = Some("stored summary".to_string());
        let details = normalize_validation_details(Some(&json!({})), &record);
        assert_eq!(
            details.overall_summary.summary_text.as_deref(),
            Some("stored summary")
        );
    }

    #[test]
    fn json_string_details_are_decoded() {
        let raw = json!("{\"overallSummary\": {\"score\": 88}}");
        let details = normalize_validation_details(Some(&raw), &record());
        assert_eq!(details.overall_summary.score, Some(88));
    }

    #[test]
    fn display_aggregation_dedups_case_and_spacing() {
        let raw = json!({
            "recommendations": ["Elevate the limb"],
            "overallSummary": {"recommendations": ["elevate the limb  "]}
        });
        let recs = aggregate_for_display(&raw, &[]);
        assert_eq!(recs.len(), 1);
        // First occurrence's casing wins.
        assert_eq!(recs[0].text, "Elevate the limb");
    }

    #[test]
    fn display_key_includes_priority_but_storage_key_does_not() {
        // Same text at two priorities: nextSteps entries are tagged high,
        // top-level entries medium.
        let raw = json!({
            "recommendations": ["Elevate the limb"],
            "overallSummary": {"nextSteps": ["elevate the limb"]}
        });

        let display = aggregate_for_display(&raw, &[]);
        assert_eq!(display.len(), 2);
        // Sorted high first.
        assert_eq!(display[0].priority, Priority::High);
        assert_eq!(display[1].priority, Priority::Medium);

        let storage = aggregate_for_storage(&raw, &[]);
        assert_eq!(storage.len(), 1);
        assert_eq!(storage[0].text, "Elevate the limb");
        assert_eq!(storage[0].priority, Priority::Medium);
    }

    #[test]
    fn lcd_recommendations_join_the_aggregate() {
        let raw = json!({
            "lcdChecks": [{
                "lcd": "L123",
                "status": "partial",
                "recommendations": ["Document wound depth"]
            }]
        });
        let record = record();
        let details = normalize_validation_details(Some(&raw), &record);
        assert_eq!(details.recommendations.len(), 1);
        assert_eq!(details.recommendations[0].source.as_deref(), Some("LCD L123"));
    }

    #[test]
    fn completed_webhook_payload_end_to_end() {
        let raw = json!({
            "overallSummary": {"score": "94%"},
            "lcdChecks": [{"lcd": "L123", "status": "Met"}]
        });
        let derived = derive_result_fields(Some(&raw), &record());

        assert_eq!(derived.overall_score, Some(94));
        assert_eq!(derived.details.lcd_checks.len(), 1);
        assert_eq!(derived.details.lcd_checks[0].status, LcdStatus::Pass);

        let stored_lcds = derived.lcd_results.expect("raw entries stored");
        assert_eq!(stored_lcds, json!([{"lcd": "L123", "status": "Met"}]));
    }

    #[test]
    fn empty_payload_derives_no_stored_fields() {
        let derived = derive_result_fields(Some(&json!({})), &record());
        assert_eq!(derived.overall_score, None);
        assert!(derived.lcd_results.is_none());
        assert!(derived.recommendations.is_none());
    }

    #[test]
    fn sections_resolve_alternate_keys() {
        let raw = json!({
            "sections": {
                "complaint": "non-healing ulcer",
                "history": "6 weeks duration",
                "interventions": "offloading",
                "justification": "conservative care failed",
                "woundAssessment": {
                    "location": "left heel",
                    "size": {"length": "2cm", "width": "1cm"},
                    "infectionSigns": "none"
                }
            }
        });
        let details = normalize_validation_details(Some(&raw), &record());
        assert_eq!(details.sections.chief_complaint.as_deref(), Some("non-healing ulcer"));
        assert_eq!(details.sections.hpi.as_deref(), Some("6 weeks duration"));
        assert_eq!(details.sections.interventions.as_deref(), Some("offloading"));
        assert_eq!(
            details.sections.medical_necessity.as_deref(),
            Some("conservative care failed")
        );

        let wound = details.wound_assessment.expect("wound assessment present");
        assert_eq!(wound.location.as_deref(), Some("left heel"));
        assert_eq!(wound.infection_signs.as_deref(), Some("none"));
        assert_eq!(wound.size.expect("size map").len(), 2);
    }

    #[test]
    fn top_level_sections_accepted_without_wrapper() {
        // Payloads sometimes inline section fields at the top level.
        let raw = json!({"plan": "weekly debridement"});
        let details = normalize_validation_details(Some(&raw), &record());
        assert_eq!(details.sections.plan.as_deref(), Some("weekly debridement"));
    }

    #[test]
    fn meta_prefers_payload_values() {
        let raw = json!({
            "meta": {
                "validationId": "payload-id",
                "mac": "Noridian",
                "generatedAt": "2025-06-01T12:00:00Z"
            }
        });
        let details = normalize_validation_details(Some(&raw), &record());
        assert_eq!(details.meta.validation_id.as_deref(), Some("payload-id"));
        assert_eq!(details.meta.mac.as_deref(), Some("Noridian"));
        assert_eq!(details.meta.region_hint.as_deref(), Some("West"));
    }
}
