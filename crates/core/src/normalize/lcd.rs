//! LCD compliance check normalization.
//!
//! Each LCD (Local Coverage Determination) entry in the raw payload names a
//! coverage policy check and a loosely worded outcome. Entries are mapped to
//! [`NormalizedLcdCheck`] with a fixed status enum; free-text outcomes that
//! match nothing map to `Fail`, the safe default.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{extract_numeric_score, get, get_first, get_text, scalar_to_string, to_array, to_string_array};
use super::recommendation::{
    normalize_recommendation_collection, NormalizedRecommendation, Priority,
    RecommendationDefaults,
};

/// Outcome of a single LCD check after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LcdStatus {
    Pass,
    Partial,
    Fail,
    Na,
}

impl LcdStatus {
    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            LcdStatus::Pass => "Pass",
            LcdStatus::Partial => "Partial",
            LcdStatus::Na => "N/A",
            LcdStatus::Fail => "Not Met",
        }
    }
}

/// A normalized LCD compliance check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLcdCheck {
    pub id: String,
    pub title: String,
    pub status: LcdStatus,
    pub summary: Option<String>,
    pub score: Option<i64>,
    pub reasons: Vec<String>,
    pub evidence: Vec<String>,
    pub recommendations: Vec<NormalizedRecommendation>,
}

/// Map a free-text LCD outcome onto the fixed status enum.
///
/// Matching is case-insensitive. Unrecognized outcomes map to `Fail`
/// rather than erroring: an outcome we cannot read must not present as
/// compliant.
pub fn normalize_lcd_status(value: Option<&Value>) -> LcdStatus {
    let text = value
        .and_then(scalar_to_string)
        .unwrap_or_default()
        .to_lowercase();

    match text.as_str() {
        "pass" | "passed" | "met" | "compliant" | "complete" => LcdStatus::Pass,
        "partial" | "partially met" | "warning" | "needs improvement" => LcdStatus::Partial,
        "na" | "n/a" | "not applicable" => LcdStatus::Na,
        _ => LcdStatus::Fail,
    }
}

/// Pull the raw LCD entry list out of a payload, falling back to the
/// record's stored `lcd_results` column when the payload has none.
pub fn extract_raw_lcd_entries(raw: &Value, fallback: Option<&Value>) -> Vec<Value> {
    let source = get_first(raw, &["lcdChecks", "lcd_results", "lcdCompliance"]).or(fallback);
    to_array(source)
}

/// Normalize every LCD entry found in the payload (or fallback column).
pub fn build_lcd_checks(raw: &Value, fallback: Option<&Value>) -> Vec<NormalizedLcdCheck> {
    extract_raw_lcd_entries(raw, fallback)
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_lcd_check(entry, index))
        .collect()
}

fn normalize_lcd_check(entry: &Value, index: usize) -> NormalizedLcdCheck {
    // A bare scalar entry is treated as a description-only check.
    let scalar_entry;
    let entry = if entry.is_object() {
        entry
    } else {
        scalar_entry = serde_json::json!({
            "description": scalar_to_string(entry).unwrap_or_default(),
        });
        &scalar_entry
    };

    let status = normalize_lcd_status(get_first(entry, &["status", "outcome", "compliance"]));
    let score = extract_numeric_score(get_first(entry, &["score", "complianceScore"]));

    let title = get_text(entry, "title")
        .or_else(|| get_text(entry, "name"))
        .or_else(|| get_text(entry, "lcd").map(|lcd| format!("LCD {lcd}")))
        .unwrap_or_else(|| format!("LCD Check {}", index + 1));

    let reasons = to_string_array(get_first(
        entry,
        &["reasons", "reason", "details", "missing_elements", "assessment"],
    ));
    let evidence = to_string_array(get_first(
        entry,
        &["evidence", "supportingEvidence", "documentation", "documents"],
    ));

    let recommendations = normalize_recommendation_collection(
        get_first(entry, &["recommendations", "suggestions", "actions"]),
        &RecommendationDefaults {
            priority: Some(Priority::Medium),
            category: None,
            source: Some(title.clone()),
        },
    );

    NormalizedLcdCheck {
        id: get(entry, "id")
            .or_else(|| get(entry, "lcd"))
            .and_then(scalar_to_string)
            .unwrap_or_else(|| index.to_string()),
        title,
        status,
        summary: get_text(entry, "summary")
            .or_else(|| get_text(entry, "assessment"))
            .or_else(|| get_text(entry, "description")),
        score,
        reasons,
        evidence,
        recommendations,
    }
}
