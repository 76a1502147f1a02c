//! Lifecycle transition orchestration.
//!
//! Each operation follows the same shape: resolve and authorize the actor,
//! run the transactional transition in `TicketRepo`, then publish the
//! corresponding [`TicketEvent`]. Publishing is fire-and-forget — the
//! dispatcher consumes from its own subscription and a delivery failure can
//! never roll back the ticket mutation.

use chrono::Utc;
use helpdesk_core::channels::{
    EVENT_TICKET_ASSIGNED, EVENT_TICKET_CREATED, EVENT_TICKET_PAUSED,
    EVENT_TICKET_REPLIED_BY_CUSTOMER, EVENT_TICKET_REPLIED_BY_SUPPORT,
    EVENT_TICKET_STATUS_CHANGED, EVENT_TICKET_TRANSFERRED,
};
use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;
use helpdesk_core::{lifecycle, roles, sla, status, ticket_types};
use helpdesk_db::models::rating::{CreateRating, TicketSatisfactionRating};
use helpdesk_db::models::reply::{CreateReply, TicketReply};
use helpdesk_db::models::ticket::{AssignTicket, ChangeStatus, CreateTicket, PauseTicket, Ticket};
use helpdesk_db::models::user::User;
use helpdesk_db::repositories::{CompanyRepo, TicketRepo, TicketTypeRepo, UserRepo};
use helpdesk_events::TicketEvent;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::engine::context;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Orchestrates ticket lifecycle transitions.
pub struct LifecycleEngine;

impl LifecycleEngine {
    /// Create a ticket: SLA snapshot, slug, leaf-type check, `ticket_created`
    /// event.
    pub async fn create_ticket(
        state: &AppState,
        auth: &AuthUser,
        input: CreateTicket,
    ) -> AppResult<Ticket> {
        input
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if let Some(urgency) = input.urgency {
            status::validate_urgency(urgency)?;
        }
        if let Some(method) = &input.contact_method {
            status::validate_contact_method(method)?;
        }

        let actor = Self::actor_user(state, auth).await?;
        if !auth.is_support_capable() && actor.company_id != Some(input.company_id) {
            return Err(CoreError::Forbidden(
                "Customers may only open tickets for their own company".to_string(),
            )
            .into());
        }

        let company = CompanyRepo::find_by_id(&state.pool, input.company_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Company",
                id: input.company_id,
            })?;

        // Only leaf nodes of the type tree are assignable.
        if let Some(type_id) = input.ticket_type_id {
            TicketTypeRepo::find_by_id(&state.pool, type_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "TicketType",
                    id: type_id,
                })?;
            let children = TicketTypeRepo::child_count(&state.pool, type_id).await?;
            ticket_types::validate_leaf_assignment(type_id, children)?;
        }

        // SLA deadlines are computed exactly once, from the config snapshot
        // at this moment; later config changes never touch this ticket.
        let sla_config = CompanyRepo::get_sla_config(&state.pool, company.id).await?;
        let now = Utc::now();
        let deadlines = sla::compute_deadlines(
            now,
            sla_config.as_ref().and_then(|c| c.response_minutes),
            sla_config.as_ref().and_then(|c| c.resolution_minutes),
        );
        let priority = sla_config.as_ref().map(|c| c.priority_level).unwrap_or(3);
        let slug = Uuid::new_v4().simple().to_string();

        let ticket =
            TicketRepo::create(&state.pool, &input, actor.id, priority, now, deadlines, &slug)
                .await?;

        let mut payload =
            context::base_context(&state.pool, &state.config.site_url, &ticket, Some(&actor))
                .await?;
        payload["mention_user_id"] = json!(actor.id);
        state.event_bus.publish(
            TicketEvent::new(EVENT_TICKET_CREATED)
                .with_ticket(ticket.id, ticket.company_id)
                .with_actor(actor.id)
                .with_target_user(actor.id)
                .with_payload(payload),
        );

        Ok(ticket)
    }

    /// Assign a ticket (admin roles only).
    pub async fn assign(
        state: &AppState,
        auth: &AuthUser,
        ticket_id: DbId,
        input: AssignTicket,
    ) -> AppResult<Ticket> {
        auth.require_admin()?;

        let assignee = UserRepo::find_by_id(&state.pool, input.assigned_to)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: input.assigned_to,
            })?;
        lifecycle::validate_assignee_role(&assignee.role)?;

        let actor = Self::actor_user(state, auth).await?;
        let outcome = TicketRepo::assign(
            &state.pool,
            ticket_id,
            assignee.id,
            actor.id,
            input.reason.as_deref(),
        )
        .await?;

        if outcome.assignee_changed {
            let mut payload = context::base_context(
                &state.pool,
                &state.config.site_url,
                &outcome.ticket,
                Some(&actor),
            )
            .await?;
            payload["mention_user_id"] = json!(assignee.id);
            state.event_bus.publish(
                TicketEvent::new(EVENT_TICKET_ASSIGNED)
                    .with_ticket(outcome.ticket.id, outcome.ticket.company_id)
                    .with_actor(actor.id)
                    .with_target_user(assignee.id)
                    .with_payload(payload),
            );
        }

        Ok(outcome.ticket)
    }

    /// Transfer a ticket to a different support-capable user.
    pub async fn transfer(
        state: &AppState,
        auth: &AuthUser,
        ticket_id: DbId,
        input: AssignTicket,
    ) -> AppResult<Ticket> {
        if !auth.is_support_capable() {
            return Err(CoreError::Forbidden(
                "Only support staff may transfer tickets".to_string(),
            )
            .into());
        }

        let assignee = UserRepo::find_by_id(&state.pool, input.assigned_to)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: input.assigned_to,
            })?;
        lifecycle::validate_assignee_role(&assignee.role)?;

        let actor = Self::actor_user(state, auth).await?;
        let ticket = TicketRepo::transfer(
            &state.pool,
            ticket_id,
            assignee.id,
            actor.id,
            &actor.role,
            input.reason.as_deref(),
        )
        .await?;

        let mut payload =
            context::base_context(&state.pool, &state.config.site_url, &ticket, Some(&actor))
                .await?;
        payload["mention_user_id"] = json!(assignee.id);
        state.event_bus.publish(
            TicketEvent::new(EVENT_TICKET_TRANSFERRED)
                .with_ticket(ticket.id, ticket.company_id)
                .with_actor(actor.id)
                .with_target_user(assignee.id)
                .with_payload(payload),
        );

        Ok(ticket)
    }

    /// Pause a ticket (support staff or the ticket's creator/submitter).
    pub async fn pause(
        state: &AppState,
        auth: &AuthUser,
        ticket_id: DbId,
        input: PauseTicket,
    ) -> AppResult<Ticket> {
        let ticket = Self::find_ticket(state, ticket_id).await?;
        Self::require_support_or_owner(auth, &ticket)?;

        let actor = Self::actor_user(state, auth).await?;
        let updated = TicketRepo::pause(&state.pool, ticket_id, actor.id, &input.reason).await?;

        let mut payload =
            context::base_context(&state.pool, &state.config.site_url, &updated, Some(&actor))
                .await?;
        payload["pause_reason"] = json!(input.reason);
        let mut event = TicketEvent::new(EVENT_TICKET_PAUSED)
            .with_ticket(updated.id, updated.company_id)
            .with_actor(actor.id)
            .with_payload(payload);
        if let Some(assignee) = updated.assigned_to {
            event = event.with_target_user(assignee);
        }
        state.event_bus.publish(event);

        Ok(updated)
    }

    /// Resume a paused ticket to its pre-pause status.
    pub async fn resume(state: &AppState, auth: &AuthUser, ticket_id: DbId) -> AppResult<Ticket> {
        let ticket = Self::find_ticket(state, ticket_id).await?;
        Self::require_support_or_owner(auth, &ticket)?;

        let actor = Self::actor_user(state, auth).await?;
        let updated = TicketRepo::resume(&state.pool, ticket_id, actor.id).await?;

        let mut payload =
            context::base_context(&state.pool, &state.config.site_url, &updated, Some(&actor))
                .await?;
        payload["old_status"] = json!(ticket.status);
        payload["new_status"] = json!(updated.status);
        let mut event = TicketEvent::new(EVENT_TICKET_STATUS_CHANGED)
            .with_ticket(updated.id, updated.company_id)
            .with_actor(actor.id)
            .with_payload(payload);
        if let Some(assignee) = updated.assigned_to {
            event = event.with_target_user(assignee);
        }
        state.event_bus.publish(event);

        Ok(updated)
    }

    /// Add a reply, driving the reply-driven status changes and SLA stop.
    pub async fn add_reply(
        state: &AppState,
        auth: &AuthUser,
        ticket_id: DbId,
        input: CreateReply,
    ) -> AppResult<(Ticket, TicketReply)> {
        input
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let ticket = Self::find_ticket(state, ticket_id).await?;
        let actor = Self::actor_user(state, auth).await?;

        let allowed = roles::is_support_capable(&actor.role)
            || ticket.created_by == Some(actor.id)
            || ticket.submitted_by == Some(actor.id)
            || (actor.company_id.is_some() && actor.company_id == Some(ticket.company_id))
            || TicketRepo::is_follower(&state.pool, ticket_id, actor.id).await?;
        if !allowed {
            return Err(CoreError::Forbidden(
                "You may not reply to this ticket".to_string(),
            )
            .into());
        }

        let (updated, reply) = TicketRepo::add_reply(
            &state.pool,
            ticket_id,
            actor.id,
            &actor.role,
            &input.content,
            input.is_internal,
        )
        .await?;

        // Internal notes never notify customers.
        if !reply.is_internal {
            let mut payload =
                context::base_context(&state.pool, &state.config.site_url, &updated, Some(&actor))
                    .await?;
            payload["reply_excerpt"] = json!(context::reply_excerpt(&input.content));

            let mut event = if roles::is_support_capable(&actor.role) {
                let mut event = TicketEvent::new(EVENT_TICKET_REPLIED_BY_SUPPORT);
                if let Some(creator) = updated.created_by {
                    event = event.with_target_user(creator);
                }
                event
            } else {
                payload["mention_user_id"] = json!(updated.assigned_to);
                let mut event = TicketEvent::new(EVENT_TICKET_REPLIED_BY_CUSTOMER);
                if let Some(assignee) = updated.assigned_to {
                    event = event.with_target_user(assignee);
                }
                event
            };
            event = event
                .with_ticket(updated.id, updated.company_id)
                .with_actor(actor.id)
                .with_payload(payload);
            state.event_bus.publish(event);
        }

        Ok((updated, reply))
    }

    /// Explicit status change (resolve, close, reopen, ...). Support only.
    pub async fn change_status(
        state: &AppState,
        auth: &AuthUser,
        ticket_id: DbId,
        input: ChangeStatus,
    ) -> AppResult<Ticket> {
        if !auth.is_support_capable() {
            return Err(CoreError::Forbidden(
                "Only support staff may change ticket status".to_string(),
            )
            .into());
        }

        let prior = Self::find_ticket(state, ticket_id).await?;
        let actor = Self::actor_user(state, auth).await?;
        let updated = TicketRepo::set_status(
            &state.pool,
            ticket_id,
            actor.id,
            &input.status,
            input.reason.as_deref(),
            input.closing_reason_type.as_deref(),
            input.closing_reason_detail.as_deref(),
        )
        .await?;

        if updated.status != prior.status {
            let mut payload =
                context::base_context(&state.pool, &state.config.site_url, &updated, Some(&actor))
                    .await?;
            payload["old_status"] = json!(prior.status);
            payload["new_status"] = json!(updated.status);
            let mut event = TicketEvent::new(EVENT_TICKET_STATUS_CHANGED)
                .with_ticket(updated.id, updated.company_id)
                .with_actor(actor.id)
                .with_payload(payload);
            if let Some(creator) = updated.created_by {
                event = event.with_target_user(creator);
            }
            state.event_bus.publish(event);
        }

        Ok(updated)
    }

    /// Record a satisfaction rating (creator/submitter, once, terminal
    /// status only — enforced in the transaction).
    pub async fn rate(
        state: &AppState,
        auth: &AuthUser,
        ticket_id: DbId,
        input: CreateRating,
    ) -> AppResult<TicketSatisfactionRating> {
        let rating = TicketRepo::rate(
            &state.pool,
            ticket_id,
            auth.user_id,
            input.rating,
            input.comment.as_deref(),
        )
        .await?;
        Ok(rating)
    }

    /// Start following a ticket.
    pub async fn follow(state: &AppState, auth: &AuthUser, ticket_id: DbId) -> AppResult<()> {
        Self::find_ticket(state, ticket_id).await?;
        TicketRepo::add_follower(&state.pool, ticket_id, auth.user_id).await?;
        Ok(())
    }

    async fn find_ticket(state: &AppState, ticket_id: DbId) -> AppResult<Ticket> {
        TicketRepo::find_by_id(&state.pool, ticket_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFound {
                    entity: "Ticket",
                    id: ticket_id,
                })
            })
    }

    async fn actor_user(state: &AppState, auth: &AuthUser) -> AppResult<User> {
        UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFound {
                    entity: "User",
                    id: auth.user_id,
                })
            })
    }

    fn require_support_or_owner(auth: &AuthUser, ticket: &Ticket) -> Result<(), AppError> {
        if auth.is_support_capable()
            || ticket.created_by == Some(auth.user_id)
            || ticket.submitted_by == Some(auth.user_id)
        {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "Only support staff or the ticket creator may do this".to_string(),
            )))
        }
    }
}
