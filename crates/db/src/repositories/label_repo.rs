//! Repository for ticket labels and their ticket links.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::label::{CreateLabel, TicketLabel};

const COLUMNS: &str = "id, name, color, description, created_at";

pub struct LabelRepo;

impl LabelRepo {
    /// Create a label.
    pub async fn create(pool: &PgPool, input: &CreateLabel) -> Result<TicketLabel, sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_labels (name, color, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TicketLabel>(&query)
            .bind(&input.name)
            .bind(input.color.as_deref().unwrap_or("#3f51b5"))
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Attach a label to a ticket (idempotent).
    pub async fn attach(pool: &PgPool, ticket_id: DbId, label_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO ticket_label_links (ticket_id, label_id) \
             VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(ticket_id)
        .bind(label_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Labels on a ticket.
    pub async fn list_for_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketLabel>, sqlx::Error> {
        sqlx::query_as::<_, TicketLabel>(
            "SELECT l.id, l.name, l.color, l.description, l.created_at \
             FROM ticket_labels l \
             JOIN ticket_label_links k ON k.label_id = l.id \
             WHERE k.ticket_id = $1 \
             ORDER BY l.name",
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await
    }
}
