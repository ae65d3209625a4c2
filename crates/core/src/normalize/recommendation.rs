//! Recommendation normalization.
//!
//! Recommendations arrive from four independent places in the raw payload
//! (top-level list, overall summary, next steps, per-LCD lists) and can be
//! plain strings or objects with any of several text keys. Everything is
//! flattened into [`NormalizedRecommendation`] here; aggregation and
//! de-duplication live in the parent module because they span LCD checks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{first_text, scalar_to_string, to_array};

/// Keys tried, in order, when resolving a recommendation's text.
const RECOMMENDATION_TEXT_KEYS: &[&str] = &[
    "text",
    "description",
    "suggestion",
    "recommendation",
    "action",
    "summary",
];

/// Recommendation priority, ordered high > medium > low for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank; lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse a free-text priority; anything unrecognized is `Medium`.
    fn from_value(value: Option<&Value>, default: Priority) -> Priority {
        let Some(text) = value.and_then(scalar_to_string) else {
            return default;
        };
        match text.to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

/// A single actionable recommendation after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecommendation {
    pub id: String,
    /// Always non-empty; entries with no resolvable text are dropped.
    pub text: String,
    pub priority: Priority,
    pub category: Option<String>,
    pub source: Option<String>,
}

/// Defaults applied to entries that do not carry their own fields.
#[derive(Debug, Clone, Default)]
pub struct RecommendationDefaults {
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub source: Option<String>,
}

/// Normalize a raw recommendation collection.
///
/// Accepts any shape `to_array` accepts. String entries become
/// recommendations with the default priority/category/source; object
/// entries resolve their text through the ordered accessor list and fall
/// back to the defaults field by field. Entries with no resolvable text
/// are dropped silently.
pub fn normalize_recommendation_collection(
    value: Option<&Value>,
    defaults: &RecommendationDefaults,
) -> Vec<NormalizedRecommendation> {
    let default_priority = defaults.priority.unwrap_or(Priority::Medium);
    let fallback_id = |index: usize| {
        format!(
            "{}-{}",
            defaults.source.as_deref().unwrap_or("rec"),
            index
        )
    };

    to_array(value)
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(map) => {
                let text = first_text(map, RECOMMENDATION_TEXT_KEYS)?;
                Some(NormalizedRecommendation {
                    id: map
                        .get("id")
                        .and_then(scalar_to_string)
                        .unwrap_or_else(|| fallback_id(index)),
                    text,
                    priority: Priority::from_value(map.get("priority"), default_priority),
                    category: map
                        .get("category")
                        .and_then(scalar_to_string)
                        .or_else(|| defaults.category.clone()),
                    source: map
                        .get("source")
                        .and_then(scalar_to_string)
                        .or_else(|| defaults.source.clone()),
                })
            }
            other => {
                let text = scalar_to_string(other)?;
                Some(NormalizedRecommendation {
                    id: fallback_id(index),
                    text,
                    priority: default_priority,
                    category: defaults.category.clone(),
                    source: defaults.source.clone(),
                })
            }
        })
        .collect()
}
