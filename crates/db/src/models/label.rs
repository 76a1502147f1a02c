//! Ticket label model and DTO.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ticket_labels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketLabel {
    pub id: DbId,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a label.
#[derive(Debug, Deserialize)]
pub struct CreateLabel {
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
}
