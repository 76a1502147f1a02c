//! Handlers for `/monitoring` — SLA and idle-ticket dashboards.
//!
//! Admin roles only. These are the same read-side queries the background
//! SLA scanner runs; here they feed the dashboard directly.

use axum::extract::{Query, State};
use axum::Json;
use helpdesk_db::repositories::MonitoringRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Default lookahead for approaching-IR queries (1 hour).
const DEFAULT_IR_WARNING_MINUTES: i64 = 60;

/// Default lookahead for approaching-resolution queries (24 hours).
const DEFAULT_RESOLUTION_WARNING_MINUTES: i64 = 1440;

/// Default idle threshold in days.
const DEFAULT_IDLE_DAYS: i64 = 3;

/// Query parameters for the SLA monitoring endpoints.
#[derive(Debug, Deserialize)]
pub struct SlaQuery {
    /// Lookahead window for "approaching" results, in minutes.
    pub warning_minutes: Option<i64>,
}

/// Query parameters for the idle-ticket endpoint.
#[derive(Debug, Deserialize)]
pub struct IdleQuery {
    pub idle_days: Option<i64>,
}

/// GET /api/v1/monitoring/sla/ir
pub async fn sla_ir(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SlaQuery>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let window = params.warning_minutes.unwrap_or(DEFAULT_IR_WARNING_MINUTES);

    let approaching = MonitoringRepo::approaching_ir(&state.pool, window).await?;
    let missed = MonitoringRepo::missed_ir(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "approaching_ir_sla": approaching,
            "missed_ir_sla": missed,
        }
    })))
}

/// GET /api/v1/monitoring/sla/resolution
pub async fn sla_resolution(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SlaQuery>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let window = params
        .warning_minutes
        .unwrap_or(DEFAULT_RESOLUTION_WARNING_MINUTES);

    let approaching = MonitoringRepo::approaching_resolution(&state.pool, window).await?;
    let missed = MonitoringRepo::missed_resolution(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "approaching_resolution_sla": approaching,
            "missed_resolution_sla": missed,
        }
    })))
}

/// GET /api/v1/monitoring/idle
pub async fn idle_tickets(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IdleQuery>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let idle_days = params.idle_days.unwrap_or(DEFAULT_IDLE_DAYS);

    let idle = MonitoringRepo::idle(&state.pool, idle_days).await?;

    Ok(Json(serde_json::json!({
        "data": { "idle_tickets": idle }
    })))
}

/// GET /api/v1/monitoring/pending-assignment
pub async fn pending_assignment(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let tickets = MonitoringRepo::pending_assignment(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "data": { "pending_assignment": tickets }
    })))
}
