//! State-to-region jurisdiction lookup.
//!
//! The validation region is derived deterministically from the selected US
//! state at submission time and selects which LCD rule set the external
//! validator applies. States without a mapping fall back to `"Unknown"`
//! rather than rejecting the submission.

/// Region assigned when a state has no entry in the lookup table.
pub const UNKNOWN_REGION: &str = "Unknown";

const STATE_TO_REGION: &[(&str, &str)] = &[
    ("California", "West"),
    ("Oregon", "West"),
    ("Washington", "West"),
    ("Nevada", "West"),
    ("Arizona", "Southwest"),
    ("Texas", "Southwest"),
    ("New Mexico", "Southwest"),
    ("Colorado", "Southwest"),
    ("Florida", "Southeast"),
    ("Georgia", "Southeast"),
    ("North Carolina", "Southeast"),
    ("South Carolina", "Southeast"),
    ("Virginia", "Southeast"),
    ("Tennessee", "Southeast"),
    ("Kentucky", "Southeast"),
    ("Alabama", "Southeast"),
    ("Mississippi", "Southeast"),
    ("Louisiana", "Southeast"),
    ("Arkansas", "Southeast"),
    ("Illinois", "Midwest"),
    ("Indiana", "Midwest"),
    ("Iowa", "Midwest"),
    ("Kansas", "Midwest"),
    ("Michigan", "Midwest"),
    ("Minnesota", "Midwest"),
    ("Missouri", "Midwest"),
    ("Nebraska", "Midwest"),
    ("North Dakota", "Midwest"),
    ("Ohio", "Midwest"),
    ("South Dakota", "Midwest"),
    ("Wisconsin", "Midwest"),
    ("New York", "Northeast"),
    ("Pennsylvania", "Northeast"),
    ("New Jersey", "Northeast"),
    ("Connecticut", "Northeast"),
    ("Massachusetts", "Northeast"),
    ("Rhode Island", "Northeast"),
    ("Vermont", "Northeast"),
    ("New Hampshire", "Northeast"),
    ("Maine", "Northeast"),
    ("Maryland", "Northeast"),
    ("Delaware", "Northeast"),
    ("West Virginia", "Northeast"),
];

/// Resolve the validation region for a US state.
pub fn region_for_state(state: &str) -> &'static str {
    STATE_TO_REGION
        .iter()
        .find(|(s, _)| *s == state)
        .map(|(_, region)| *region)
        .unwrap_or(UNKNOWN_REGION)
}
