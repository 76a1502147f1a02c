//! Handlers for the `/tickets` resource.
//!
//! All endpoints require authentication. Visibility is role-scoped: admins
//! see everything, support users see their own and unassigned work, and
//! customers see their company's tickets.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::status::STATUS_PENDING_ASSIGNMENT;
use helpdesk_core::types::DbId;
use helpdesk_db::models::rating::CreateRating;
use helpdesk_db::models::reply::CreateReply;
use helpdesk_db::models::ticket::{AssignTicket, ChangeStatus, CreateTicket, PauseTicket, Ticket};
use helpdesk_db::repositories::{
    HistoryRepo, LabelRepo, RatingRepo, ReplyRepo, TicketRepo, UserRepo,
};
use serde::Deserialize;

use crate::engine::LifecycleEngine;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /tickets`.
#[derive(Debug, Deserialize)]
pub struct TicketQuery {
    pub status: Option<String>,
    pub company_id: Option<DbId>,
}

/// POST /api/v1/tickets
pub async fn create_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTicket>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let ticket = LifecycleEngine::create_ticket(&state, &auth, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": ticket })),
    ))
}

/// GET /api/v1/tickets
///
/// Role-scoped listing: admins may filter freely; support users get their
/// assigned plus pending-assignment tickets; customers get their company's
/// tickets.
pub async fn list_tickets(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TicketQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let tickets = if auth.is_admin() {
        TicketRepo::list_all(&state.pool, params.status.as_deref(), params.company_id).await?
    } else if auth.is_support_capable() {
        TicketRepo::list_for_support(&state.pool, auth.user_id).await?
    } else {
        let user = UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: auth.user_id,
            })?;
        match user.company_id {
            Some(company_id) => TicketRepo::list_for_company(&state.pool, company_id).await?,
            None => Vec::new(),
        }
    };

    Ok(Json(serde_json::json!({ "data": tickets })))
}

/// GET /api/v1/tickets/{id}
///
/// Full detail: the ticket plus replies (internal notes only for support),
/// both audit trails, labels, and the rating if present.
pub async fn get_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let ticket = find_visible_ticket(&state, &auth, ticket_id).await?;

    let include_internal = auth.is_support_capable();
    let replies = ReplyRepo::list_for_ticket(&state.pool, ticket_id, include_internal).await?;
    let status_history = HistoryRepo::status_history(&state.pool, ticket_id).await?;
    let transfer_history = HistoryRepo::transfer_history(&state.pool, ticket_id).await?;
    let labels = LabelRepo::list_for_ticket(&state.pool, ticket_id).await?;
    let rating = RatingRepo::find_for_ticket(&state.pool, ticket_id).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "ticket": ticket,
            "replies": replies,
            "status_history": status_history,
            "transfer_history": transfer_history,
            "labels": labels,
            "satisfaction_rating": rating,
        }
    })))
}

/// POST /api/v1/tickets/{id}/assign
pub async fn assign_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
    Json(input): Json<AssignTicket>,
) -> AppResult<Json<serde_json::Value>> {
    let ticket = LifecycleEngine::assign(&state, &auth, ticket_id, input).await?;
    Ok(Json(serde_json::json!({ "data": ticket })))
}

/// POST /api/v1/tickets/{id}/transfer
pub async fn transfer_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
    Json(input): Json<AssignTicket>,
) -> AppResult<Json<serde_json::Value>> {
    let ticket = LifecycleEngine::transfer(&state, &auth, ticket_id, input).await?;
    Ok(Json(serde_json::json!({ "data": ticket })))
}

/// POST /api/v1/tickets/{id}/pause
pub async fn pause_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
    Json(input): Json<PauseTicket>,
) -> AppResult<Json<serde_json::Value>> {
    let ticket = LifecycleEngine::pause(&state, &auth, ticket_id, input).await?;
    Ok(Json(serde_json::json!({ "data": ticket })))
}

/// POST /api/v1/tickets/{id}/resume
pub async fn resume_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let ticket = LifecycleEngine::resume(&state, &auth, ticket_id).await?;
    Ok(Json(serde_json::json!({ "data": ticket })))
}

/// POST /api/v1/tickets/{id}/replies
pub async fn add_reply(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
    Json(input): Json<CreateReply>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let (ticket, reply) = LifecycleEngine::add_reply(&state, &auth, ticket_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": { "ticket": ticket, "reply": reply } })),
    ))
}

/// POST /api/v1/tickets/{id}/status
pub async fn change_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
    Json(input): Json<ChangeStatus>,
) -> AppResult<Json<serde_json::Value>> {
    let ticket = LifecycleEngine::change_status(&state, &auth, ticket_id, input).await?;
    Ok(Json(serde_json::json!({ "data": ticket })))
}

/// POST /api/v1/tickets/{id}/rating
pub async fn rate_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
    Json(input): Json<CreateRating>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let rating = LifecycleEngine::rate(&state, &auth, ticket_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": rating })),
    ))
}

/// POST /api/v1/tickets/{id}/follow
pub async fn follow_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
) -> AppResult<StatusCode> {
    LifecycleEngine::follow(&state, &auth, ticket_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a ticket and enforce role-scoped visibility.
async fn find_visible_ticket(
    state: &AppState,
    auth: &AuthUser,
    ticket_id: DbId,
) -> Result<Ticket, AppError> {
    let ticket = TicketRepo::find_by_id(&state.pool, ticket_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Ticket",
            id: ticket_id,
        })?;

    if auth.is_admin() {
        return Ok(ticket);
    }
    if auth.is_support_capable() {
        if ticket.assigned_to == Some(auth.user_id) || ticket.status == STATUS_PENDING_ASSIGNMENT {
            return Ok(ticket);
        }
        return Err(CoreError::Forbidden(
            "This ticket is assigned to another support user".to_string(),
        )
        .into());
    }

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    if user.company_id == Some(ticket.company_id) {
        Ok(ticket)
    } else {
        Err(CoreError::Forbidden("This ticket belongs to another company".to_string()).into())
    }
}
