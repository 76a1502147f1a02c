//! Pure domain logic for the helpdesk platform.
//!
//! No I/O lives here: this crate holds the role/status/channel vocabulary,
//! the SLA deadline calculator, the ticket lifecycle transition rules, the
//! notification template renderer, and the ticket-type tree invariant. The
//! `db` and `events` crates apply these decisions against PostgreSQL and the
//! delivery channels.

pub mod channels;
pub mod error;
pub mod lifecycle;
pub mod roles;
pub mod sla;
pub mod status;
pub mod template;
pub mod ticket_types;
pub mod types;
