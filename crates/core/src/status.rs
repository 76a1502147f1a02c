//! Ticket status vocabulary and related enumerations.
//!
//! Status values are stored as text columns and validated here; the CHECK
//! constraints in `0001_initial.sql` mirror these slices.

use crate::error::CoreError;

pub const STATUS_NEW_ISSUE: &str = "new_issue";
pub const STATUS_PENDING_ASSIGNMENT: &str = "pending_assignment";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_WAITING_FOR_CUSTOMER: &str = "waiting_for_customer";
pub const STATUS_CUSTOMER_FOLLOW_UP: &str = "customer_follow_up";
pub const STATUS_RESOLVED: &str = "resolved";
pub const STATUS_CLOSED: &str = "closed";
pub const STATUS_PAUSED: &str = "paused";

/// All valid ticket status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_NEW_ISSUE,
    STATUS_PENDING_ASSIGNMENT,
    STATUS_IN_PROGRESS,
    STATUS_WAITING_FOR_CUSTOMER,
    STATUS_CUSTOMER_FOLLOW_UP,
    STATUS_RESOLVED,
    STATUS_CLOSED,
    STATUS_PAUSED,
];

/// Statuses under which a ticket no longer counts as open work.
///
/// Paused tickets are additionally exempt from SLA and idle pressure, so
/// monitoring queries exclude all three of these.
pub const INACTIVE_STATUSES: &[&str] = &[STATUS_RESOLVED, STATUS_CLOSED, STATUS_PAUSED];

pub const CLOSING_REASON_CUSTOMER_COMPLETED: &str = "customer_completed";
pub const CLOSING_REASON_ON_HOLD: &str = "on_hold";
pub const CLOSING_REASON_BUG_REPORT: &str = "bug_report";
pub const CLOSING_REASON_FEATURE_REQUEST: &str = "feature_request";
pub const CLOSING_REASON_OTHER: &str = "other";

/// All valid closing reason type values.
pub const VALID_CLOSING_REASONS: &[&str] = &[
    CLOSING_REASON_CUSTOMER_COMPLETED,
    CLOSING_REASON_ON_HOLD,
    CLOSING_REASON_BUG_REPORT,
    CLOSING_REASON_FEATURE_REQUEST,
    CLOSING_REASON_OTHER,
];

/// All valid contact method values for a ticket.
pub const VALID_CONTACT_METHODS: &[&str] =
    &["email", "wechat", "enterprise_wechat", "feishu", "phone"];

/// Inclusive urgency bounds (1 = urgent .. 4 = low).
pub const URGENCY_MIN: i32 = 1;
pub const URGENCY_MAX: i32 = 4;

/// A resolved or closed ticket; replies from customers are rejected and
/// satisfaction ratings become possible.
pub fn is_terminal(status: &str) -> bool {
    matches!(status, STATUS_RESOLVED | STATUS_CLOSED)
}

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid ticket status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate a closing reason type string.
pub fn validate_closing_reason(reason: &str) -> Result<(), CoreError> {
    if VALID_CLOSING_REASONS.contains(&reason) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid closing reason '{reason}'. Must be one of: {}",
            VALID_CLOSING_REASONS.join(", ")
        )))
    }
}

/// Validate a contact method string.
pub fn validate_contact_method(method: &str) -> Result<(), CoreError> {
    if VALID_CONTACT_METHODS.contains(&method) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid contact method '{method}'. Must be one of: {}",
            VALID_CONTACT_METHODS.join(", ")
        )))
    }
}

/// Validate an urgency value (1 = urgent .. 4 = low).
pub fn validate_urgency(urgency: i32) -> Result<(), CoreError> {
    if (URGENCY_MIN..=URGENCY_MAX).contains(&urgency) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid urgency {urgency}. Must be between {URGENCY_MIN} and {URGENCY_MAX}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_statuses_validate() {
        for status in VALID_STATUSES {
            assert!(validate_status(status).is_ok());
        }
    }

    #[test]
    fn unknown_status_rejected() {
        let result = validate_status("reopened");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid ticket status"));
    }

    #[test]
    fn terminal_statuses() {
        assert!(is_terminal(STATUS_RESOLVED));
        assert!(is_terminal(STATUS_CLOSED));
        assert!(!is_terminal(STATUS_PAUSED));
        assert!(!is_terminal(STATUS_IN_PROGRESS));
    }

    #[test]
    fn urgency_bounds() {
        assert!(validate_urgency(1).is_ok());
        assert!(validate_urgency(4).is_ok());
        assert!(validate_urgency(0).is_err());
        assert!(validate_urgency(5).is_err());
    }

    #[test]
    fn closing_reason_vocabulary() {
        assert!(validate_closing_reason("bug_report").is_ok());
        assert!(validate_closing_reason("because").is_err());
    }
}
