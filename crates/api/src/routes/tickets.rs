//! Route definitions for the `/tickets` resource.
//!
//! All endpoints require authentication; per-operation authorization lives
//! in the lifecycle engine.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET    /               -> list_tickets
/// POST   /               -> create_ticket
/// GET    /{id}           -> get_ticket
/// POST   /{id}/assign    -> assign_ticket
/// POST   /{id}/transfer  -> transfer_ticket
/// POST   /{id}/pause     -> pause_ticket
/// POST   /{id}/resume    -> resume_ticket
/// POST   /{id}/replies   -> add_reply
/// POST   /{id}/status    -> change_status
/// POST   /{id}/rating    -> rate_ticket
/// POST   /{id}/follow    -> follow_ticket
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list_tickets).post(tickets::create_ticket))
        .route("/{id}", get(tickets::get_ticket))
        .route("/{id}/assign", post(tickets::assign_ticket))
        .route("/{id}/transfer", post(tickets::transfer_ticket))
        .route("/{id}/pause", post(tickets::pause_ticket))
        .route("/{id}/resume", post(tickets::resume_ticket))
        .route("/{id}/replies", post(tickets::add_reply))
        .route("/{id}/status", post(tickets::change_status))
        .route("/{id}/rating", post(tickets::rate_ticket))
        .route("/{id}/follow", post(tickets::follow_ticket))
}
