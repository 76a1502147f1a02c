//! Ticket lifecycle engine.
//!
//! Orchestrates each transition: permission checks against the acting
//! user, the transactional state change through `TicketRepo`, and the
//! explicit event published for the notification dispatcher. Handlers stay
//! thin; dispatch side effects never fail the triggering operation.

pub mod context;
pub mod lifecycle;

pub use lifecycle::LifecycleEngine;
