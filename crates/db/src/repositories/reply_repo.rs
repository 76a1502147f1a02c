//! Read access to ticket replies.
//!
//! Replies are inserted by `TicketRepo::add_reply` inside the reply
//! transition transaction.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::reply::TicketReply;

pub struct ReplyRepo;

impl ReplyRepo {
    /// Replies on a ticket, oldest first. Internal notes are filtered out
    /// for non-support viewers.
    pub async fn list_for_ticket(
        pool: &PgPool,
        ticket_id: DbId,
        include_internal: bool,
    ) -> Result<Vec<TicketReply>, sqlx::Error> {
        sqlx::query_as::<_, TicketReply>(
            "SELECT id, ticket_id, user_id, content, is_internal, created_at \
             FROM ticket_replies \
             WHERE ticket_id = $1 AND (is_internal = false OR $2) \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(ticket_id)
        .bind(include_internal)
        .fetch_all(pool)
        .await
    }
}
