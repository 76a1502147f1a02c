//! Ticket lifecycle transition rules.
//!
//! Pure decision functions: given the current ticket state and the acting
//! user, decide whether a transition is allowed and what it changes. The
//! repository layer applies these decisions inside a row-locked transaction
//! so the state change and its audit row commit together.

use crate::error::CoreError;
use crate::roles;
use crate::status::{
    self, STATUS_CUSTOMER_FOLLOW_UP, STATUS_IN_PROGRESS, STATUS_NEW_ISSUE, STATUS_PAUSED,
    STATUS_PENDING_ASSIGNMENT, STATUS_WAITING_FOR_CUSTOMER,
};
use crate::types::{DbId, Timestamp};

/// Status a ticket auto-transitions to when assigned, if any.
///
/// Assignment of an unstarted ticket moves it into `in_progress`; tickets
/// already being worked keep their status.
pub fn assign_auto_status(current_status: &str) -> Option<&'static str> {
    match current_status {
        STATUS_NEW_ISSUE | STATUS_PENDING_ASSIGNMENT => Some(STATUS_IN_PROGRESS),
        _ => None,
    }
}

/// Reject assignment/transfer targets that cannot work tickets.
pub fn validate_assignee_role(role: &str) -> Result<(), CoreError> {
    if roles::is_support_capable(role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Tickets can only be assigned to support-capable users, not role '{role}'"
        )))
    }
}

/// Who may initiate a transfer: admin roles, or the current assignee.
pub fn validate_transfer_actor(
    actor_role: &str,
    actor_id: DbId,
    current_assignee: Option<DbId>,
) -> Result<(), CoreError> {
    if roles::is_admin(actor_role) || current_assignee == Some(actor_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only admins or the current assignee may transfer a ticket".to_string(),
        ))
    }
}

/// What a new reply does to the ticket, depending on who wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyEffects {
    /// Status the ticket moves to, if the reply changes it.
    pub new_status: Option<&'static str>,
    /// The reply came from a customer (stamps `last_customer_reply_at`).
    pub is_customer_reply: bool,
    /// The reply is the first support-side reply (stamps `first_replied_at`,
    /// stopping the IR SLA clock).
    pub is_first_support_reply: bool,
}

/// Gate a reply on the ticket's status and the actor's role.
///
/// Replies to resolved/closed tickets are rejected unless the actor is
/// support-capable; internal notes are support-only.
pub fn validate_reply(
    current_status: &str,
    actor_role: &str,
    is_internal: bool,
) -> Result<(), CoreError> {
    if status::is_terminal(current_status) && !roles::is_support_capable(actor_role) {
        return Err(CoreError::Validation(
            "Closed or resolved tickets cannot be replied to".to_string(),
        ));
    }
    if is_internal && !roles::is_support_capable(actor_role) {
        return Err(CoreError::Forbidden(
            "Only support staff may add internal notes".to_string(),
        ));
    }
    Ok(())
}

/// Decide the side effects of a (non-internal) reply.
pub fn reply_effects(
    actor_role: &str,
    current_status: &str,
    first_replied_at: Option<Timestamp>,
) -> ReplyEffects {
    if roles::is_support_capable(actor_role) {
        ReplyEffects {
            new_status: None,
            is_customer_reply: false,
            is_first_support_reply: first_replied_at.is_none(),
        }
    } else {
        ReplyEffects {
            new_status: (current_status == STATUS_WAITING_FOR_CUSTOMER)
                .then_some(STATUS_CUSTOMER_FOLLOW_UP),
            is_customer_reply: true,
            is_first_support_reply: false,
        }
    }
}

/// Gate a pause request: needs a reason, and the ticket must not already be
/// paused.
pub fn validate_pause(current_status: &str, reason: &str) -> Result<(), CoreError> {
    if current_status == STATUS_PAUSED {
        return Err(CoreError::Validation(
            "Ticket is already paused".to_string(),
        ));
    }
    if reason.trim().is_empty() {
        return Err(CoreError::Validation(
            "A pause reason must be provided".to_string(),
        ));
    }
    Ok(())
}

/// Gate a resume request: only paused tickets resume.
pub fn validate_resume(current_status: &str) -> Result<(), CoreError> {
    if current_status != STATUS_PAUSED {
        return Err(CoreError::Validation("Ticket is not paused".to_string()));
    }
    Ok(())
}

/// Status a paused ticket resumes to.
///
/// `recorded` is the `old_status` of the most recent status-history row
/// whose `new_status` was `paused`. When history is incomplete (no such
/// row, or it somehow recorded `paused` itself), fall back to
/// `in_progress` when assigned, else `pending_assignment`.
pub fn resume_target(recorded: Option<&str>, has_assignee: bool) -> &str {
    match recorded {
        Some(prior) if prior != STATUS_PAUSED => prior,
        _ => resume_fallback(has_assignee),
    }
}

/// Fallback resume status when no usable pause history exists.
pub fn resume_fallback(has_assignee: bool) -> &'static str {
    if has_assignee {
        STATUS_IN_PROGRESS
    } else {
        STATUS_PENDING_ASSIGNMENT
    }
}

/// Gate a satisfaction rating.
///
/// Only the ticket's creator or submitter may rate, only once the ticket is
/// resolved or closed, and only once ever.
pub fn validate_rating(
    current_status: &str,
    already_rated: bool,
    is_creator_or_submitter: bool,
    rating: i32,
) -> Result<(), CoreError> {
    if !status::is_terminal(current_status) {
        return Err(CoreError::Validation(
            "Only closed or resolved tickets can be rated".to_string(),
        ));
    }
    if already_rated {
        return Err(CoreError::Conflict(
            "This ticket has already been rated".to_string(),
        ));
    }
    if !is_creator_or_submitter {
        return Err(CoreError::Forbidden(
            "Only the ticket creator or submitter may rate it".to_string(),
        ));
    }
    if !(1..=5).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Invalid rating {rating}. Must be between 1 and 5"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_CUSTOMER, ROLE_SUPPORT, ROLE_SYSTEM_ADMIN};
    use crate::status::{STATUS_CLOSED, STATUS_RESOLVED};
    use chrono::Utc;

    #[test]
    fn assignment_starts_unstarted_tickets() {
        assert_eq!(assign_auto_status(STATUS_NEW_ISSUE), Some(STATUS_IN_PROGRESS));
        assert_eq!(
            assign_auto_status(STATUS_PENDING_ASSIGNMENT),
            Some(STATUS_IN_PROGRESS)
        );
        assert_eq!(assign_auto_status(STATUS_IN_PROGRESS), None);
        assert_eq!(assign_auto_status(STATUS_WAITING_FOR_CUSTOMER), None);
    }

    #[test]
    fn only_support_capable_users_are_assignable() {
        assert!(validate_assignee_role(ROLE_SUPPORT).is_ok());
        assert!(validate_assignee_role(ROLE_CUSTOMER).is_err());
    }

    #[test]
    fn transfer_actor_must_be_admin_or_assignee() {
        assert!(validate_transfer_actor(ROLE_SYSTEM_ADMIN, 1, Some(2)).is_ok());
        assert!(validate_transfer_actor(ROLE_SUPPORT, 2, Some(2)).is_ok());
        // A support user who does not own the ticket may not transfer it.
        assert!(validate_transfer_actor(ROLE_SUPPORT, 3, Some(2)).is_err());
        assert!(validate_transfer_actor(ROLE_SUPPORT, 3, None).is_err());
    }

    #[test]
    fn customer_reply_bumps_waiting_to_follow_up() {
        let effects = reply_effects(ROLE_CUSTOMER, STATUS_WAITING_FOR_CUSTOMER, None);
        assert_eq!(effects.new_status, Some(STATUS_CUSTOMER_FOLLOW_UP));
        assert!(effects.is_customer_reply);
        assert!(!effects.is_first_support_reply);

        // Any other status is left alone.
        let effects = reply_effects(ROLE_CUSTOMER, STATUS_IN_PROGRESS, None);
        assert_eq!(effects.new_status, None);
    }

    #[test]
    fn first_support_reply_stops_the_ir_clock_once() {
        let effects = reply_effects(ROLE_SUPPORT, STATUS_IN_PROGRESS, None);
        assert!(effects.is_first_support_reply);
        assert!(!effects.is_customer_reply);

        let effects = reply_effects(ROLE_SUPPORT, STATUS_IN_PROGRESS, Some(Utc::now()));
        assert!(!effects.is_first_support_reply);
    }

    #[test]
    fn terminal_tickets_reject_customer_replies() {
        assert!(validate_reply(STATUS_CLOSED, ROLE_CUSTOMER, false).is_err());
        assert!(validate_reply(STATUS_RESOLVED, ROLE_CUSTOMER, false).is_err());
        assert!(validate_reply(STATUS_CLOSED, ROLE_SUPPORT, false).is_ok());
        assert!(validate_reply(STATUS_IN_PROGRESS, ROLE_CUSTOMER, false).is_ok());
    }

    #[test]
    fn internal_notes_are_support_only() {
        assert!(validate_reply(STATUS_IN_PROGRESS, ROLE_CUSTOMER, true).is_err());
        assert!(validate_reply(STATUS_IN_PROGRESS, ROLE_SUPPORT, true).is_ok());
    }

    #[test]
    fn pause_needs_a_reason_and_a_running_ticket() {
        assert!(validate_pause(STATUS_IN_PROGRESS, "waiting on vendor").is_ok());
        assert!(validate_pause(STATUS_IN_PROGRESS, "   ").is_err());
        assert!(validate_pause(STATUS_PAUSED, "again").is_err());
    }

    #[test]
    fn resume_requires_paused() {
        assert!(validate_resume(STATUS_PAUSED).is_ok());
        assert!(validate_resume(STATUS_IN_PROGRESS).is_err());
    }

    #[test]
    fn resume_restores_recorded_status() {
        assert_eq!(resume_target(Some(STATUS_IN_PROGRESS), false), STATUS_IN_PROGRESS);
        assert_eq!(
            resume_target(Some(STATUS_WAITING_FOR_CUSTOMER), true),
            STATUS_WAITING_FOR_CUSTOMER
        );
    }

    #[test]
    fn resume_falls_back_when_history_is_unusable() {
        // No history row at all.
        assert_eq!(resume_target(None, true), STATUS_IN_PROGRESS);
        assert_eq!(resume_target(None, false), STATUS_PENDING_ASSIGNMENT);
        // A degenerate row recording `paused` as the prior status.
        assert_eq!(resume_target(Some(STATUS_PAUSED), true), STATUS_IN_PROGRESS);
    }

    #[test]
    fn rating_rules() {
        assert!(validate_rating(STATUS_RESOLVED, false, true, 5).is_ok());
        assert!(validate_rating(STATUS_CLOSED, false, true, 1).is_ok());
        // Wrong phase.
        assert!(validate_rating(STATUS_IN_PROGRESS, false, true, 5).is_err());
        // Second rating attempt is rejected regardless of actor.
        assert!(validate_rating(STATUS_RESOLVED, true, true, 5).is_err());
        assert!(validate_rating(STATUS_RESOLVED, true, false, 5).is_err());
        // Not the creator/submitter.
        assert!(validate_rating(STATUS_RESOLVED, false, false, 5).is_err());
        // Out-of-range score.
        assert!(validate_rating(STATUS_RESOLVED, false, true, 0).is_err());
        assert!(validate_rating(STATUS_RESOLVED, false, true, 6).is_err());
    }
}
