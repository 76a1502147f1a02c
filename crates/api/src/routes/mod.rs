//! Route tree for the `/api/v1` prefix.

pub mod auth;
pub mod health;
pub mod monitoring;
pub mod notifications;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
///
/// /tickets                                 list, create
/// /tickets/{id}                            detail
/// /tickets/{id}/assign                     assign (admin)
/// /tickets/{id}/transfer                   transfer (admin or assignee)
/// /tickets/{id}/pause                      pause
/// /tickets/{id}/resume                     resume
/// /tickets/{id}/replies                    add reply
/// /tickets/{id}/status                     explicit status change
/// /tickets/{id}/rating                     satisfaction rating
/// /tickets/{id}/follow                     follow
///
/// /monitoring/sla/ir                       approaching + missed IR SLA
/// /monitoring/sla/resolution               approaching + missed resolution SLA
/// /monitoring/idle                         idle tickets
/// /monitoring/pending-assignment           unassigned queue
///
/// /notification-logs                       delivery audit trail (admin)
/// /notification-templates                  list, create, update (admin)
/// /notification-preferences                per-user channel preferences
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tickets", tickets::router())
        .nest("/monitoring", monitoring::router())
        .merge(notifications::router())
}
