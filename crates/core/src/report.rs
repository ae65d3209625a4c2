//! Plain-text validation report rendering.
//!
//! Produces the downloadable report for a validation record from its
//! normalized details. Rendering is presentation-only: scores are clamped
//! here and nowhere earlier.

use crate::normalize::{NormalizedValidationDetails, RecordSnapshot};
use crate::normalize::status::{clamp_score, resolve_validation_status};

const RULE: &str = "==================================================";
const SUBRULE: &str = "--------------------------------------------------";

/// Render a validation record and its normalized details as a plain-text
/// report.
pub fn build_report_text(record: &RecordSnapshot, details: &NormalizedValidationDetails) -> String {
    let summary = &details.overall_summary;
    let status = resolve_validation_status(summary.status.as_deref(), summary.score);

    let mut out = String::new();
    let mut line = |text: &str| {
        out.push_str(text);
        out.push('\n');
    };

    line("MEDLEARN WOUND CARE VALIDATION REPORT");
    line(RULE);
    line("");
    line(&format!("File: {}", record.file_name));
    line(&format!("State: {} ({})", record.state, record.region));
    line(&format!(
        "Validated: {}",
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    line("");

    line("SUMMARY");
    line(SUBRULE);
    line(&format!("Status: {}", status.label()));
    if let Some(score) = summary.score {
        line(&format!("Score: {}/100", clamp_score(score)));
    }
    if let Some(text) = &summary.summary_text {
        line(text);
    }
    if !summary.key_findings.is_empty() {
        line("");
        line("Key Findings:");
        for finding in &summary.key_findings {
            line(&format!("  - {finding}"));
        }
    }
    line("");

    let sections = &details.sections;
    let narrative: [(&str, &Option<String>); 9] = [
        ("Chief Complaint", &sections.chief_complaint),
        ("History of Present Illness", &sections.hpi),
        ("Interventions to Date", &sections.interventions),
        ("Plan", &sections.plan),
        ("Medical Necessity", &sections.medical_necessity),
        ("Comorbidities", &sections.comorbidities),
        ("Consent", &sections.consent),
        ("Supporting Documentation", &sections.documentation),
        ("Photos / Measurements", &sections.photos_measurements),
    ];
    if narrative.iter().any(|(_, value)| value.is_some()) {
        line("CLINICAL DOCUMENTATION");
        line(SUBRULE);
        for (label, value) in narrative {
            if let Some(text) = value {
                line(&format!("{label}: {text}"));
            }
        }
        line("");
    }

    if !details.lcd_checks.is_empty() {
        line("LCD COMPLIANCE");
        line(SUBRULE);
        for check in &details.lcd_checks {
            line(&format!("[{}] {}", check.status.label(), check.title));
            if let Some(summary) = &check.summary {
                line(&format!("  {summary}"));
            }
            for reason in &check.reasons {
                line(&format!("  - {reason}"));
            }
        }
        line("");
    }

    if !details.recommendations.is_empty() {
        line("RECOMMENDATIONS");
        line(SUBRULE);
        for rec in &details.recommendations {
            let source = rec
                .source
                .as_deref()
                .map(|s| format!(" ({s})"))
                .unwrap_or_default();
            line(&format!(
                "[{}] {}{}",
                rec.priority.as_str().to_uppercase(),
                rec.text,
                source
            ));
        }
        line("");
    }

    line(RULE);
    line("Generated by MedLearn Validation");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_validation_details;
    use chrono::TimeZone;
    use serde_json::json;

    fn record() -> RecordSnapshot {
        RecordSnapshot {
            id: "rec-1".to_string(),
            file_name: "note.pdf".to_string(),
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
    fn full_report_includes_all_sections() {
        let raw = json!({
            "overallSummary": {
                "status": "partial",
                "score": 95,
                "summary": "Documentation mostly complete",
                "keyFindings": ["missing wound depth"]
            },
            "sections": {"plan": "weekly debridement"},
            "lcdChecks": [{"lcd": "L123", "status": "Met"}],
            "recommendations": ["Document wound depth"]
        });
        let record = record();
        let details = normalize_validation_details(Some(&raw), &record);
        let report = build_report_text(&record, &details);

        assert!(report.starts_with("MEDLEARN WOUND CARE VALIDATION REPORT"));
        assert!(report.contains("File: note.pdf"));
        assert!(report.contains("State: California (West)"));
        // Partial-like status text outranks the 95 score.
        assert!(report.contains("Status: Partially Compliant"));
        assert!(report.contains("Score: 95/100"));
        assert!(report.contains("  - missing wound depth"));
        assert!(report.contains("Plan: weekly debridement"));
        assert!(report.contains("[Pass] LCD L123"));
        assert!(report.contains("[MEDIUM] Document wound depth (AI Analysis)"));
    }

    #[test]
    fn out_of_range_score_is_clamped_for_display() {
        let raw = json!({"overallSummary": {"score": 130}});
        let record = record();
        let details = normalize_validation_details(Some(&raw), &record);
        assert_eq!(details.overall_summary.score, Some(130));

        let report = build_report_text(&record, &details);
        assert!(report.contains("Score: 100/100"));
    }

    #[test]
    fn sparse_details_skip_optional_sections() {
        let record = record();
        let details = normalize_validation_details(None, &record);
        let report = build_report_text(&record, &details);

        assert!(!report.contains("CLINICAL DOCUMENTATION"));
        assert!(!report.contains("LCD COMPLIANCE"));
        assert!(!report.contains("RECOMMENDATIONS"));
        // Unrecognized status text and no score fail closed.
        assert!(report.contains("Status: Non-Compliant"));
    }
}
