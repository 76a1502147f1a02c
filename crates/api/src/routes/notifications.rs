//! Route definitions for notification logs, templates, and preferences.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at the `/api/v1` root.
///
/// ```text
/// GET  /notification-logs            -> list_logs (admin)
/// GET  /notification-templates       -> list_templates (admin)
/// POST /notification-templates       -> create_template (admin)
/// PUT  /notification-templates/{id}  -> update_template (admin)
/// GET  /notification-preferences     -> get_preferences
/// PUT  /notification-preferences     -> update_preferences
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notification-logs", get(notifications::list_logs))
        .route(
            "/notification-templates",
            get(notifications::list_templates).post(notifications::create_template),
        )
        .route(
            "/notification-templates/{id}",
            put(notifications::update_template),
        )
        .route(
            "/notification-preferences",
            get(notifications::get_preferences).put(notifications::update_preferences),
        )
}
