//! Ticket reply entity model and DTO.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `ticket_replies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketReply {
    pub id: DbId,
    pub ticket_id: DbId,
    pub user_id: Option<DbId>,
    pub content: String,
    /// Internal notes are visible to support staff only and trigger no
    /// customer-facing notification.
    pub is_internal: bool,
    pub created_at: Timestamp,
}

/// DTO for adding a reply.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReply {
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub is_internal: bool,
}
