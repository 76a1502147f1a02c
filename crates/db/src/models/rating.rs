//! Ticket satisfaction rating entity model and DTO.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ticket_satisfaction_ratings` table. At most one per
/// ticket, enforced by a unique constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketSatisfactionRating {
    pub id: DbId,
    pub ticket_id: DbId,
    pub rated_by: Option<DbId>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for submitting a rating.
#[derive(Debug, Deserialize)]
pub struct CreateRating {
    pub rating: i32,
    pub comment: Option<String>,
}
