//! Overall validation status resolution and score clamping.

use serde::{Deserialize, Serialize};

/// Overall compliance verdict shown for a completed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Passed,
    Warning,
    Failed,
}

impl OverallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallStatus::Passed => "passed",
            OverallStatus::Warning => "warning",
            OverallStatus::Failed => "failed",
        }
    }

    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            OverallStatus::Passed => "Fully Compliant",
            OverallStatus::Warning => "Partially Compliant",
            OverallStatus::Failed => "Non-Compliant",
        }
    }
}

/// Resolve the overall verdict from a free-text status and a numeric score.
///
/// Status text takes precedence: a recognizably pass-like or partial-like
/// status decides the verdict outright. The score is only consulted when
/// the text is absent or matches neither set (>= 90 passes, >= 70 warns).
pub fn resolve_validation_status(status_text: Option<&str>, score: Option<i64>) -> OverallStatus {
    let text = status_text.unwrap_or("").trim().to_lowercase();

    if matches!(text.as_str(), "pass" | "passed" | "compliant") {
        return OverallStatus::Passed;
    }
    if matches!(text.as_str(), "warning" | "partial" | "partially compliant") {
        return OverallStatus::Warning;
    }

    match score {
        Some(s) if s >= 90 => OverallStatus::Passed,
        Some(s) if s >= 70 => OverallStatus::Warning,
        _ => OverallStatus::Failed,
    }
}

/// Clamp a score to the displayable `[0, 100]` range.
///
/// The normalizer deliberately stores whatever the validator reported;
/// clamping happens only here, at the presentation boundary.
pub fn clamp_score(score: i64) -> i64 {
    score.clamp(0, 100)
}
