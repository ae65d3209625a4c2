//! Well-known validation record status constants.
//!
//! These must match the values stored in the `validation_history.status`
//! column and the statuses reported by the external validator callback.

/// The record was created and dispatched; no terminal result has arrived.
pub const STATUS_PROCESSING: &str = "processing";

/// The validator returned a result payload.
pub const STATUS_COMPLETED: &str = "completed";

/// The validator reported a failure for this run.
pub const STATUS_FAILED: &str = "failed";

/// An administrator archived the record. No further mutation except delete.
pub const STATUS_ARCHIVED: &str = "archived";

/// Whether a status admits no further automatic transitions.
pub fn is_terminal(status: &str) -> bool {
    matches!(status, STATUS_COMPLETED | STATUS_FAILED | STATUS_ARCHIVED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_is_not_terminal() {
        assert!(!is_terminal(STATUS_PROCESSING));
    }

    #[test]
    fn completed_failed_archived_are_terminal() {
        assert!(is_terminal(STATUS_COMPLETED));
        assert!(is_terminal(STATUS_FAILED));
        assert!(is_terminal(STATUS_ARCHIVED));
    }

    #[test]
    fn unknown_status_is_not_terminal() {
        assert!(!is_terminal("dispatch_failed"));
    }
}
