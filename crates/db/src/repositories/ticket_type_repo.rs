//! Repository for the `ticket_types` adjacency-list tree.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::ticket_type::{CreateTicketType, TicketType};

const COLUMNS: &str = "id, name, description, parent_id, is_active, created_at";

pub struct TicketTypeRepo;

impl TicketTypeRepo {
    /// Create a ticket type node, optionally under a parent.
    pub async fn create(pool: &PgPool, input: &CreateTicketType) -> Result<TicketType, sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_types (name, description, parent_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TicketType>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.parent_id)
            .fetch_one(pool)
            .await
    }

    /// Find a type by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TicketType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ticket_types WHERE id = $1");
        sqlx::query_as::<_, TicketType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of active children under a node. Zero means the node is a
    /// leaf and may be attached to tickets.
    pub async fn child_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ticket_types WHERE parent_id = $1 AND is_active = true",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// List all active types.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<TicketType>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM ticket_types WHERE is_active = true ORDER BY name");
        sqlx::query_as::<_, TicketType>(&query).fetch_all(pool).await
    }
}
