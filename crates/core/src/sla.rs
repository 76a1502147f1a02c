//! SLA deadline calculation and missed-deadline predicates.
//!
//! Deadlines are naive wall-clock offsets from the ticket's creation time;
//! there is no business-hours calendar. [`compute_deadlines`] is called
//! exactly once, at ticket creation, against the company's SLA config
//! snapshot at that moment — deadlines on existing tickets are never
//! recomputed.

use chrono::Duration;

use crate::types::Timestamp;

/// The pair of deadlines tracked per ticket.
///
/// A `None` deadline means the company does not track that SLA; such a
/// deadline is never considered missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaDeadlines {
    /// Initial-response deadline: first support-side reply must land by then.
    pub ir_deadline: Option<Timestamp>,
    /// Resolution deadline: the ticket must reach `resolved` by then.
    pub resolution_deadline: Option<Timestamp>,
}

/// Compute both deadlines from the company SLA config.
///
/// Pure and deterministic: `deadline = created_at + minutes`, independently
/// per deadline, `None` minutes propagating to a `None` deadline.
pub fn compute_deadlines(
    created_at: Timestamp,
    response_minutes: Option<i32>,
    resolution_minutes: Option<i32>,
) -> SlaDeadlines {
    SlaDeadlines {
        ir_deadline: response_minutes.map(|m| created_at + Duration::minutes(m as i64)),
        resolution_deadline: resolution_minutes.map(|m| created_at + Duration::minutes(m as i64)),
    }
}

/// Whether the initial-response SLA has been missed.
///
/// Missed iff the first support reply landed after the deadline, or no
/// first reply exists and the deadline has passed. A `None` deadline is
/// never missed.
pub fn is_ir_missed(
    ir_deadline: Option<Timestamp>,
    first_replied_at: Option<Timestamp>,
    now: Timestamp,
) -> bool {
    match ir_deadline {
        None => false,
        Some(deadline) => match first_replied_at {
            Some(replied) => replied > deadline,
            None => now > deadline,
        },
    }
}

/// Whether the resolution SLA has been missed. Symmetric to [`is_ir_missed`]
/// with `resolved_at` as the stopping event.
pub fn is_resolution_missed(
    resolution_deadline: Option<Timestamp>,
    resolved_at: Option<Timestamp>,
    now: Timestamp,
) -> bool {
    match resolution_deadline {
        None => false,
        Some(deadline) => match resolved_at {
            Some(resolved) => resolved > deadline,
            None => now > deadline,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn deadlines_are_created_at_plus_minutes() {
        let deadlines = compute_deadlines(t0(), Some(240), Some(2880));
        assert_eq!(deadlines.ir_deadline, Some(t0() + Duration::minutes(240)));
        assert_eq!(
            deadlines.resolution_deadline,
            Some(t0() + Duration::minutes(2880))
        );
    }

    #[test]
    fn missing_config_yields_no_deadline() {
        let deadlines = compute_deadlines(t0(), None, None);
        assert_eq!(deadlines.ir_deadline, None);
        assert_eq!(deadlines.resolution_deadline, None);

        // Each side propagates independently.
        let partial = compute_deadlines(t0(), Some(60), None);
        assert!(partial.ir_deadline.is_some());
        assert!(partial.resolution_deadline.is_none());
    }

    #[test]
    fn compute_is_idempotent() {
        let a = compute_deadlines(t0(), Some(240), Some(2880));
        let b = compute_deadlines(t0(), Some(240), Some(2880));
        assert_eq!(a, b);
    }

    #[test]
    fn null_deadline_is_never_missed() {
        // Regardless of other fields.
        assert!(!is_ir_missed(None, None, t0() + Duration::days(365)));
        assert!(!is_ir_missed(
            None,
            Some(t0() + Duration::days(30)),
            t0() + Duration::days(365)
        ));
        assert!(!is_resolution_missed(None, None, t0() + Duration::days(365)));
    }

    #[test]
    fn unreplied_ticket_misses_after_deadline() {
        let deadline = t0() + Duration::minutes(240);
        // Scenario A: immediately after creation, not missed.
        assert!(!is_ir_missed(Some(deadline), None, t0()));
        // Scenario B: one minute past the deadline with no reply.
        assert!(is_ir_missed(
            Some(deadline),
            None,
            deadline + Duration::minutes(1)
        ));
    }

    #[test]
    fn first_reply_freezes_the_predicate() {
        let deadline = t0() + Duration::minutes(240);
        let replied = t0() + Duration::minutes(10);
        // Scenario C: replied in time; `now` long past the deadline is ignored.
        assert!(!is_ir_missed(
            Some(deadline),
            Some(replied),
            deadline + Duration::days(7)
        ));
        // A late first reply stays missed forever.
        assert!(is_ir_missed(
            Some(deadline),
            Some(deadline + Duration::minutes(1)),
            deadline
        ));
    }

    #[test]
    fn resolution_predicate_mirrors_ir() {
        let deadline = t0() + Duration::minutes(2880);
        assert!(!is_resolution_missed(Some(deadline), None, t0()));
        assert!(is_resolution_missed(
            Some(deadline),
            None,
            deadline + Duration::minutes(1)
        ));
        assert!(!is_resolution_missed(
            Some(deadline),
            Some(deadline - Duration::minutes(5)),
            deadline + Duration::days(1)
        ));
    }
}
