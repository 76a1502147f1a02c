//! Read access to ticket satisfaction ratings.
//!
//! Ratings are inserted by `TicketRepo::rate` inside the rating
//! transaction, which enforces the one-per-ticket rule.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::rating::TicketSatisfactionRating;

pub struct RatingRepo;

impl RatingRepo {
    /// The rating for a ticket, if one exists.
    pub async fn find_for_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Option<TicketSatisfactionRating>, sqlx::Error> {
        sqlx::query_as::<_, TicketSatisfactionRating>(
            "SELECT id, ticket_id, rated_by, rating, comment, created_at \
             FROM ticket_satisfaction_ratings \
             WHERE ticket_id = $1",
        )
        .bind(ticket_id)
        .fetch_optional(pool)
        .await
    }
}
