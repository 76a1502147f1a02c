//! Ticket-type tree invariant.
//!
//! Ticket types form an adjacency-list tree; only leaf nodes may be
//! attached to tickets. The check runs at ticket create/update time with
//! the child count supplied by the repository layer.

use crate::error::CoreError;
use crate::types::DbId;

/// Reject non-leaf ticket types at assignment time.
pub fn validate_leaf_assignment(ticket_type_id: DbId, child_count: i64) -> Result<(), CoreError> {
    if child_count > 0 {
        Err(CoreError::Validation(format!(
            "Ticket type {ticket_type_id} has {child_count} child type(s); only leaf types can be assigned to tickets"
        )))
    } else {
        Ok(())
    }
}
