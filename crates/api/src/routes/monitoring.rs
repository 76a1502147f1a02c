//! Route definitions for the `/monitoring` dashboards (admin roles).

use axum::routing::get;
use axum::Router;

use crate::handlers::monitoring;
use crate::state::AppState;

/// Routes mounted at `/monitoring`.
///
/// ```text
/// GET /sla/ir              -> sla_ir
/// GET /sla/resolution      -> sla_resolution
/// GET /idle                -> idle_tickets
/// GET /pending-assignment  -> pending_assignment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sla/ir", get(monitoring::sla_ir))
        .route("/sla/resolution", get(monitoring::sla_resolution))
        .route("/idle", get(monitoring::idle_tickets))
        .route("/pending-assignment", get(monitoring::pending_assignment))
}
