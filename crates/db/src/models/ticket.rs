//! Ticket entity model and DTOs.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub company_id: DbId,
    pub created_by: Option<DbId>,
    pub submitted_by: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub status: String,
    /// System-assigned priority, copied from the company SLA config.
    pub priority: i32,
    /// User-assigned urgency, 1 (urgent) .. 4 (low).
    pub urgency: i32,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub contact_method: String,
    pub contact_info: Option<String>,
    pub ticket_type_id: Option<DbId>,
    pub url_slug: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub last_activity_at: Timestamp,
    pub first_replied_at: Option<Timestamp>,
    pub last_customer_reply_at: Option<Timestamp>,
    pub last_support_reply_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    pub paused_at: Option<Timestamp>,
    pub pause_reason: Option<String>,
    pub closing_reason_type: Option<String>,
    pub closing_reason_detail: Option<String>,
    pub sla_ir_deadline: Option<Timestamp>,
    pub sla_resolution_deadline: Option<Timestamp>,
}

/// DTO for creating a ticket.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicket {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub company_id: DbId,
    pub urgency: Option<i32>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub contact_method: Option<String>,
    pub contact_info: Option<String>,
    pub ticket_type_id: Option<DbId>,
}

/// DTO for an explicit status change (resolve, close, reopen, ...).
#[derive(Debug, Deserialize)]
pub struct ChangeStatus {
    pub status: String,
    pub reason: Option<String>,
    /// Required semantics only when the new status is `closed`.
    pub closing_reason_type: Option<String>,
    pub closing_reason_detail: Option<String>,
}

/// DTO for assignment and transfer requests.
#[derive(Debug, Deserialize)]
pub struct AssignTicket {
    pub assigned_to: DbId,
    pub reason: Option<String>,
}

/// DTO for a pause request.
#[derive(Debug, Deserialize)]
pub struct PauseTicket {
    pub reason: String,
}
