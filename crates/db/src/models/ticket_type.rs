//! Ticket type tree node model and DTO.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ticket_types` table. Adjacency-list tree; only leaf
/// nodes may be attached to tickets.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketType {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a ticket type.
#[derive(Debug, Deserialize)]
pub struct CreateTicketType {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}
