//! Repository for the `tickets` table and its lifecycle transitions.
//!
//! Every transition method opens a transaction, locks the ticket row with
//! `SELECT ... FOR UPDATE`, re-validates the state precondition through
//! `helpdesk_core::lifecycle`, applies the update, and writes the audit row
//! before committing. Concurrent transitions on the same ticket serialize
//! on the row lock, so each observed transition produces its own audit row.

use helpdesk_core::error::CoreError;
use helpdesk_core::lifecycle;
use helpdesk_core::sla::SlaDeadlines;
use helpdesk_core::status::{self, STATUS_CLOSED, STATUS_PAUSED, STATUS_RESOLVED};
use helpdesk_core::types::{DbId, Timestamp};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::rating::TicketSatisfactionRating;
use crate::models::reply::TicketReply;
use crate::models::ticket::{CreateTicket, Ticket};

/// Column list for `tickets` queries.
const COLUMNS: &str = "id, title, description, company_id, created_by, submitted_by, assigned_to, \
     status, priority, urgency, category, subcategory, contact_method, contact_info, \
     ticket_type_id, url_slug, created_at, updated_at, last_activity_at, first_replied_at, \
     last_customer_reply_at, last_support_reply_at, resolved_at, closed_at, paused_at, \
     pause_reason, closing_reason_type, closing_reason_detail, sla_ir_deadline, \
     sla_resolution_deadline";

/// Error type for lifecycle transitions: a database failure or a domain
/// rule violation detected inside the transaction.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Domain(#[from] CoreError),
}

/// Result of an assignment: the updated ticket plus whether the assignee
/// actually changed (a same-user re-assign is a silent no-op).
#[derive(Debug)]
pub struct AssignOutcome {
    pub ticket: Ticket,
    pub assignee_changed: bool,
}

/// Provides CRUD and transition operations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Create a ticket with its SLA deadline snapshot.
    ///
    /// `submitted_by` defaults to `created_by`; `priority` comes from the
    /// company SLA config (3 when none exists). `created_at` is supplied by
    /// the caller so the deadlines are exact offsets of it, and it doubles
    /// as the initial `last_activity_at`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTicket,
        created_by: DbId,
        priority: i32,
        created_at: Timestamp,
        deadlines: SlaDeadlines,
        url_slug: &str,
    ) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets \
                (title, description, company_id, created_by, submitted_by, priority, urgency, \
                 category, subcategory, contact_method, contact_info, ticket_type_id, url_slug, \
                 created_at, last_activity_at, sla_ir_deadline, sla_resolution_deadline) \
             VALUES ($1, $2, $3, $4, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13, $14, $15) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.company_id)
            .bind(created_by)
            .bind(priority)
            .bind(input.urgency.unwrap_or(3))
            .bind(&input.category)
            .bind(&input.subcategory)
            .bind(input.contact_method.as_deref().unwrap_or("email"))
            .bind(&input.contact_info)
            .bind(input.ticket_type_id)
            .bind(url_slug)
            .bind(created_at)
            .bind(deadlines.ir_deadline)
            .bind(deadlines.resolution_deadline)
            .fetch_one(pool)
            .await
    }

    /// Find a ticket by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tickets with optional status / company filters, most recently
    /// active first. Admin-scope listing.
    pub async fn list_all(
        pool: &PgPool,
        status: Option<&str>,
        company_id: Option<DbId>,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE ($1::text IS NULL OR status = $1) \
               AND ($2::bigint IS NULL OR company_id = $2) \
             ORDER BY last_activity_at DESC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(status)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// List tickets visible to a support user: assigned to them, or waiting
    /// for assignment.
    pub async fn list_for_support(pool: &PgPool, user_id: DbId) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE assigned_to = $1 OR status = 'pending_assignment' \
             ORDER BY last_activity_at DESC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List all tickets belonging to a company. Customer-scope listing.
    pub async fn list_for_company(pool: &PgPool, company_id: DbId) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets WHERE company_id = $1 ORDER BY last_activity_at DESC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Assign the ticket to a support-capable user.
    ///
    /// Auto-transitions `new_issue` / `pending_assignment` tickets to
    /// `in_progress`. Writes a transfer-history row only when the assignee
    /// actually changes; re-assigning the same user is a no-op, not an
    /// error.
    pub async fn assign(
        pool: &PgPool,
        ticket_id: DbId,
        new_assignee: DbId,
        actor_id: DbId,
        reason: Option<&str>,
    ) -> Result<AssignOutcome, TransitionError> {
        let mut tx = pool.begin().await?;
        let ticket = Self::lock(&mut tx, ticket_id).await?;

        let assignee_changed = ticket.assigned_to != Some(new_assignee);
        let auto_status = lifecycle::assign_auto_status(&ticket.status);

        // Re-assigning the current assignee of a started ticket changes
        // nothing; skip the write entirely.
        if !assignee_changed && auto_status.is_none() {
            tx.commit().await?;
            return Ok(AssignOutcome {
                ticket,
                assignee_changed,
            });
        }

        let query = format!(
            "UPDATE tickets \
             SET assigned_to = $2, status = COALESCE($3, status), \
                 last_activity_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_id)
            .bind(new_assignee)
            .bind(auto_status)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(new_status) = auto_status {
            Self::insert_status_history(
                &mut tx,
                ticket_id,
                actor_id,
                &ticket.status,
                new_status,
                Some("Ticket assignment"),
            )
            .await?;
        }
        if assignee_changed {
            Self::insert_transfer_history(
                &mut tx,
                ticket_id,
                actor_id,
                ticket.assigned_to,
                new_assignee,
                reason.unwrap_or("Ticket assignment"),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(AssignOutcome {
            ticket: updated,
            assignee_changed,
        })
    }

    /// Transfer the ticket to a different support-capable user.
    ///
    /// Only admins or the current assignee may transfer; a transfer to the
    /// current assignee is rejected as a no-op.
    pub async fn transfer(
        pool: &PgPool,
        ticket_id: DbId,
        new_assignee: DbId,
        actor_id: DbId,
        actor_role: &str,
        reason: Option<&str>,
    ) -> Result<Ticket, TransitionError> {
        let mut tx = pool.begin().await?;
        let ticket = Self::lock(&mut tx, ticket_id).await?;

        lifecycle::validate_transfer_actor(actor_role, actor_id, ticket.assigned_to)?;
        if ticket.assigned_to == Some(new_assignee) {
            return Err(CoreError::Validation(
                "Ticket is already assigned to this user".to_string(),
            )
            .into());
        }

        let query = format!(
            "UPDATE tickets \
             SET assigned_to = $2, last_activity_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_id)
            .bind(new_assignee)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_transfer_history(
            &mut tx,
            ticket_id,
            actor_id,
            ticket.assigned_to,
            new_assignee,
            reason.unwrap_or("Ticket transfer"),
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Pause the ticket, recording the prior status in the history row so
    /// resume can restore it.
    pub async fn pause(
        pool: &PgPool,
        ticket_id: DbId,
        actor_id: DbId,
        reason: &str,
    ) -> Result<Ticket, TransitionError> {
        let mut tx = pool.begin().await?;
        let ticket = Self::lock(&mut tx, ticket_id).await?;

        lifecycle::validate_pause(&ticket.status, reason)?;

        let query = format!(
            "UPDATE tickets \
             SET status = 'paused', pause_reason = $2, paused_at = NOW(), \
                 last_activity_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_id)
            .bind(reason)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_status_history(
            &mut tx,
            ticket_id,
            actor_id,
            &ticket.status,
            STATUS_PAUSED,
            Some(reason),
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Resume a paused ticket to the status recorded when it was paused.
    ///
    /// The target is the `old_status` of the most recent history row whose
    /// `new_status = 'paused'`; without a usable row the ticket falls back
    /// to `in_progress` when assigned, else `pending_assignment`.
    pub async fn resume(
        pool: &PgPool,
        ticket_id: DbId,
        actor_id: DbId,
    ) -> Result<Ticket, TransitionError> {
        let mut tx = pool.begin().await?;
        let ticket = Self::lock(&mut tx, ticket_id).await?;

        lifecycle::validate_resume(&ticket.status)?;

        let recorded: Option<String> = sqlx::query_scalar(
            "SELECT old_status FROM ticket_status_history \
             WHERE ticket_id = $1 AND new_status = 'paused' \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1",
        )
        .bind(ticket_id)
        .fetch_optional(&mut *tx)
        .await?;

        let target =
            lifecycle::resume_target(recorded.as_deref(), ticket.assigned_to.is_some()).to_string();

        let query = format!(
            "UPDATE tickets \
             SET status = $2, pause_reason = NULL, paused_at = NULL, \
                 last_activity_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_id)
            .bind(&target)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_status_history(
            &mut tx,
            ticket_id,
            actor_id,
            STATUS_PAUSED,
            &target,
            Some("Ticket resumed"),
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Add a reply and apply its side effects to the ticket.
    ///
    /// Customer replies stamp `last_customer_reply_at` and bump
    /// `waiting_for_customer` tickets to `customer_follow_up`; support
    /// replies stamp `last_support_reply_at` and, the first time,
    /// `first_replied_at` (the IR SLA stop). Internal notes only touch
    /// `last_activity_at`.
    pub async fn add_reply(
        pool: &PgPool,
        ticket_id: DbId,
        author_id: DbId,
        author_role: &str,
        content: &str,
        is_internal: bool,
    ) -> Result<(Ticket, TicketReply), TransitionError> {
        let mut tx = pool.begin().await?;
        let ticket = Self::lock(&mut tx, ticket_id).await?;

        lifecycle::validate_reply(&ticket.status, author_role, is_internal)?;

        let reply = sqlx::query_as::<_, TicketReply>(
            "INSERT INTO ticket_replies (ticket_id, user_id, content, is_internal) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, ticket_id, user_id, content, is_internal, created_at",
        )
        .bind(ticket_id)
        .bind(author_id)
        .bind(content)
        .bind(is_internal)
        .fetch_one(&mut *tx)
        .await?;

        let updated = if is_internal {
            let query = format!(
                "UPDATE tickets SET last_activity_at = $2, updated_at = NOW() \
                 WHERE id = $1 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, Ticket>(&query)
                .bind(ticket_id)
                .bind(reply.created_at)
                .fetch_one(&mut *tx)
                .await?
        } else {
            let effects =
                lifecycle::reply_effects(author_role, &ticket.status, ticket.first_replied_at);

            let query = format!(
                "UPDATE tickets \
                 SET last_activity_at = $2, updated_at = NOW(), \
                     status = COALESCE($3, status), \
                     last_customer_reply_at = CASE WHEN $4 THEN $2 ELSE last_customer_reply_at END, \
                     last_support_reply_at = CASE WHEN $4 THEN last_support_reply_at ELSE $2 END, \
                     first_replied_at = CASE WHEN $5 THEN $2 ELSE first_replied_at END \
                 WHERE id = $1 \
                 RETURNING {COLUMNS}"
            );
            let updated = sqlx::query_as::<_, Ticket>(&query)
                .bind(ticket_id)
                .bind(reply.created_at)
                .bind(effects.new_status)
                .bind(effects.is_customer_reply)
                .bind(effects.is_first_support_reply)
                .fetch_one(&mut *tx)
                .await?;

            if let Some(new_status) = effects.new_status {
                Self::insert_status_history(
                    &mut tx,
                    ticket_id,
                    author_id,
                    &ticket.status,
                    new_status,
                    Some("Customer follow-up"),
                )
                .await?;
            }
            updated
        };

        tx.commit().await?;
        Ok((updated, reply))
    }

    /// Explicit status change (resolve, close, reopen, ...).
    ///
    /// Stamps `resolved_at` / `closed_at` on entry to those states and
    /// records closing reasons on close. Writing the current status again
    /// is a no-op with no history row. `paused` must go through
    /// [`TicketRepo::pause`] so the pause reason is captured.
    pub async fn set_status(
        pool: &PgPool,
        ticket_id: DbId,
        actor_id: DbId,
        new_status: &str,
        reason: Option<&str>,
        closing_reason_type: Option<&str>,
        closing_reason_detail: Option<&str>,
    ) -> Result<Ticket, TransitionError> {
        status::validate_status(new_status)?;
        if new_status == STATUS_PAUSED {
            return Err(CoreError::Validation(
                "Use the pause operation to pause a ticket".to_string(),
            )
            .into());
        }
        if let Some(closing_reason) = closing_reason_type {
            status::validate_closing_reason(closing_reason)?;
        }

        let mut tx = pool.begin().await?;
        let ticket = Self::lock(&mut tx, ticket_id).await?;

        if ticket.status == new_status {
            tx.commit().await?;
            return Ok(ticket);
        }

        let query = format!(
            "UPDATE tickets \
             SET status = $2, last_activity_at = NOW(), updated_at = NOW(), \
                 resolved_at = CASE WHEN $2 = '{STATUS_RESOLVED}' THEN NOW() ELSE resolved_at END, \
                 closed_at = CASE WHEN $2 = '{STATUS_CLOSED}' THEN NOW() ELSE closed_at END, \
                 closing_reason_type = COALESCE($3, closing_reason_type), \
                 closing_reason_detail = COALESCE($4, closing_reason_detail) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_id)
            .bind(new_status)
            .bind(closing_reason_type)
            .bind(closing_reason_detail)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_status_history(&mut tx, ticket_id, actor_id, &ticket.status, new_status, reason)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Record a satisfaction rating, exactly once per ticket.
    pub async fn rate(
        pool: &PgPool,
        ticket_id: DbId,
        actor_id: DbId,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<TicketSatisfactionRating, TransitionError> {
        let mut tx = pool.begin().await?;
        let ticket = Self::lock(&mut tx, ticket_id).await?;

        let already_rated: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM ticket_satisfaction_ratings WHERE ticket_id = $1)",
        )
        .bind(ticket_id)
        .fetch_one(&mut *tx)
        .await?;

        let is_creator_or_submitter =
            ticket.created_by == Some(actor_id) || ticket.submitted_by == Some(actor_id);
        lifecycle::validate_rating(&ticket.status, already_rated, is_creator_or_submitter, rating)?;

        let inserted = sqlx::query_as::<_, TicketSatisfactionRating>(
            "INSERT INTO ticket_satisfaction_ratings (ticket_id, rated_by, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, ticket_id, rated_by, rating, comment, created_at",
        )
        .bind(ticket_id)
        .bind(actor_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(inserted)
    }

    /// Add a follower to a ticket (idempotent).
    pub async fn add_follower(
        pool: &PgPool,
        ticket_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO ticket_followers (ticket_id, user_id) \
             VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(ticket_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Whether a user follows a ticket.
    pub async fn is_follower(
        pool: &PgPool,
        ticket_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM ticket_followers WHERE ticket_id = $1 AND user_id = $2)",
        )
        .bind(ticket_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Lock the ticket row for the duration of the transaction.
    async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        ticket_id: DbId,
    ) -> Result<Ticket, TransitionError> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Ticket",
                    id: ticket_id,
                }
                .into()
            })
    }

    async fn insert_status_history(
        tx: &mut Transaction<'_, Postgres>,
        ticket_id: DbId,
        changed_by: DbId,
        old_status: &str,
        new_status: &str,
        reason: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO ticket_status_history (ticket_id, changed_by, old_status, new_status, reason) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(ticket_id)
        .bind(changed_by)
        .bind(old_status)
        .bind(new_status)
        .bind(reason)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn insert_transfer_history(
        tx: &mut Transaction<'_, Postgres>,
        ticket_id: DbId,
        transferred_by: DbId,
        transferred_from: Option<DbId>,
        transferred_to: DbId,
        reason: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO ticket_transfer_history \
                (ticket_id, transferred_by, transferred_from, transferred_to, reason) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(ticket_id)
        .bind(transferred_by)
        .bind(transferred_from)
        .bind(transferred_to)
        .bind(reason)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
