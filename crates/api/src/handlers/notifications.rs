//! Handlers for notification templates, delivery logs, and per-user
//! channel preferences.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use helpdesk_core::channels::{VALID_CHANNELS, VALID_EVENT_TYPES};
use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;
use helpdesk_db::models::notification::{CreateTemplate, UpdateTemplate};
use helpdesk_db::repositories::{
    NotificationLogRepo, NotificationPreferenceRepo, TemplateRepo,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum page size for log listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for log listing.
const DEFAULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Delivery logs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notification-logs`.
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub ticket_id: Option<DbId>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/notification-logs
///
/// Admin-only audit trail of delivery attempts, newest first.
pub async fn list_logs(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let logs = NotificationLogRepo::list(
        &state.pool,
        params.ticket_id,
        params.status.as_deref(),
        limit,
        offset,
    )
    .await?;

    Ok(Json(serde_json::json!({ "data": logs })))
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notification-templates`.
#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    pub company_id: Option<DbId>,
}

/// GET /api/v1/notification-templates
pub async fn list_templates(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TemplateQuery>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let templates = TemplateRepo::list(&state.pool, params.company_id).await?;
    Ok(Json(serde_json::json!({ "data": templates })))
}

/// POST /api/v1/notification-templates
pub async fn create_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTemplate>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    auth.require_admin()?;

    if !VALID_EVENT_TYPES.contains(&input.event_type.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid event type '{}'",
            input.event_type
        ))));
    }
    if !VALID_CHANNELS.contains(&input.channel.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid channel '{}'",
            input.channel
        ))));
    }

    let template = TemplateRepo::create(&state.pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": template })),
    ))
}

/// PUT /api/v1/notification-templates/{id}
pub async fn update_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;

    let template = TemplateRepo::update(&state.pool, template_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "NotificationTemplate",
            id: template_id,
        })?;

    Ok(Json(serde_json::json!({ "data": template })))
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Request body for `PUT /notification-preferences`.
#[derive(Debug, Deserialize)]
pub struct UpdatePreferences {
    pub email_enabled: Option<bool>,
    pub feishu_enabled: Option<bool>,
    pub enterprise_wechat_enabled: Option<bool>,
}

/// GET /api/v1/notification-preferences
///
/// The authenticated user's channel preferences; defaults when no row
/// exists yet.
pub async fn get_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let prefs = NotificationPreferenceRepo::get_for_user(&state.pool, auth.user_id).await?;
    match prefs {
        Some(prefs) => Ok(Json(serde_json::json!({ "data": prefs }))),
        None => Ok(Json(serde_json::json!({
            "data": {
                "user_id": auth.user_id,
                "email_enabled": true,
                "feishu_enabled": false,
                "enterprise_wechat_enabled": false,
            }
        }))),
    }
}

/// PUT /api/v1/notification-preferences
pub async fn update_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdatePreferences>,
) -> AppResult<Json<serde_json::Value>> {
    let current = NotificationPreferenceRepo::get_for_user(&state.pool, auth.user_id).await?;
    let (email, feishu, wecom) = match &current {
        Some(p) => (p.email_enabled, p.feishu_enabled, p.enterprise_wechat_enabled),
        None => (true, false, false),
    };

    let prefs = NotificationPreferenceRepo::upsert(
        &state.pool,
        auth.user_id,
        input.email_enabled.unwrap_or(email),
        input.feishu_enabled.unwrap_or(feishu),
        input.enterprise_wechat_enabled.unwrap_or(wecom),
    )
    .await?;

    Ok(Json(serde_json::json!({ "data": prefs })))
}
