//! Append-only audit trail rows: status changes and transfers.

use helpdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `ticket_status_history` table. Written exactly once per
/// observed status transition, never mutated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketStatusHistory {
    pub id: DbId,
    pub ticket_id: DbId,
    pub changed_by: Option<DbId>,
    pub old_status: String,
    pub new_status: String,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

/// A row from the `ticket_transfer_history` table. One per assignment or
/// transfer that actually changed the assignee.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketTransferHistory {
    pub id: DbId,
    pub ticket_id: DbId,
    pub transferred_by: Option<DbId>,
    pub transferred_from: Option<DbId>,
    pub transferred_to: Option<DbId>,
    pub reason: String,
    pub created_at: Timestamp,
}
