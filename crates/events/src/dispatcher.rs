//! Event-to-notification dispatch engine.
//!
//! [`NotificationDispatcher`] subscribes to the event bus and, for every
//! event, resolves the effective templates, renders them against the event
//! payload, and delivers through the channel senders. One
//! `notification_logs` row is created `pending` per attempt and moved to
//! `sent` or `failed`; no error ever propagates back to the operation that
//! published the event.
//!
//! There is no retry loop here: `retry_failed` is reserved for an external
//! retry job working off the log table.

use std::sync::Arc;
use std::time::Duration;

use helpdesk_core::channels::{CHANNEL_EMAIL, CHANNEL_ENTERPRISE_WECHAT, CHANNEL_FEISHU};
use helpdesk_core::template;
use helpdesk_db::models::notification::NotificationTemplate;
use helpdesk_db::repositories::{
    CompanyRepo, NotificationLogRepo, NotificationPreferenceRepo, TemplateRepo, UserRepo,
};
use helpdesk_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::TicketEvent;
use crate::delivery::SenderRegistry;
use crate::resolve::resolve_effective;

/// Upper bound on one delivery attempt, over and above the senders' own
/// HTTP timeouts. A stuck SMTP connection must not stall the dispatch loop.
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// Routes ticket events to notification channels.
pub struct NotificationDispatcher {
    pool: DbPool,
    senders: Arc<SenderRegistry>,
}

impl NotificationDispatcher {
    /// Create a new dispatcher with the given database pool and senders.
    pub fn new(pool: DbPool, senders: Arc<SenderRegistry>) -> Self {
        Self { pool, senders }
    }

    /// Run the main dispatch loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<TicketEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.dispatch_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to dispatch event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Dispatch one event through every effective template.
    pub async fn dispatch_event(
        &self,
        event: &TicketEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let templates = TemplateRepo::list_active(&self.pool, &event.event_type).await?;
        let effective = resolve_effective(templates, event.company_id);

        if effective.is_empty() {
            tracing::debug!(
                event_type = %event.event_type,
                company_id = ?event.company_id,
                "No active notification templates for event"
            );
            return Ok(());
        }

        for tpl in &effective {
            if let Err(e) = self.dispatch_template(event, tpl).await {
                tracing::error!(
                    error = %e,
                    template = %tpl.name,
                    event_type = %event.event_type,
                    "Failed to dispatch template"
                );
            }
        }

        Ok(())
    }

    /// Render and deliver one template, logging the attempt.
    async fn dispatch_template(
        &self,
        event: &TicketEvent,
        tpl: &NotificationTemplate,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let subject = template::render(&tpl.subject_template, &event.payload);
        let body = template::render(&tpl.body_template, &event.payload);

        let recipient = match tpl.channel.as_str() {
            CHANNEL_EMAIL => match self.email_recipient(event).await? {
                Some(recipient) => recipient,
                // No recipient is not a failure, just a non-applicable
                // template; no log row is written.
                None => {
                    tracing::debug!(
                        template = %tpl.name,
                        event_type = %event.event_type,
                        "Email template has no recipient; skipping"
                    );
                    return Ok(());
                }
            },
            CHANNEL_FEISHU | CHANNEL_ENTERPRISE_WECHAT => {
                let Some(company_id) = event.company_id else {
                    tracing::warn!(
                        template = %tpl.name,
                        channel = %tpl.channel,
                        "Chat-webhook template requires a company scope; skipping"
                    );
                    return Ok(());
                };
                let provider =
                    CompanyRepo::get_enabled_chat_provider(&self.pool, company_id, &tpl.channel)
                        .await?;
                match provider.and_then(|p| p.webhook_url).filter(|u| !u.is_empty()) {
                    Some(url) => url,
                    None => {
                        tracing::warn!(
                            company_id,
                            channel = %tpl.channel,
                            "No enabled webhook config for company; skipping"
                        );
                        return Ok(());
                    }
                }
            }
            other => {
                tracing::warn!(channel = other, "Unsupported notification channel");
                return Ok(());
            }
        };

        let mentions = self.mentions_for_channel(event, &tpl.channel).await?;

        // Log before sending, terminal status after.
        let log_id = NotificationLogRepo::create_pending(
            &self.pool,
            event.actor_user_id,
            event.company_id,
            event.ticket_id,
            &tpl.channel,
            &recipient,
            &subject,
        )
        .await?;

        let Some(sender) = self.senders.get(&tpl.channel) else {
            NotificationLogRepo::mark_failed(&self.pool, log_id, "No sender registered for channel")
                .await?;
            return Ok(());
        };

        match tokio::time::timeout(
            SEND_TIMEOUT,
            sender.deliver(&recipient, &subject, &body, &mentions),
        )
        .await
        {
            Ok(Ok(())) => {
                NotificationLogRepo::mark_sent(&self.pool, log_id).await?;
            }
            Ok(Err(e)) => {
                tracing::error!(
                    error = %e,
                    channel = %tpl.channel,
                    template = %tpl.name,
                    "Notification delivery failed"
                );
                NotificationLogRepo::mark_failed(&self.pool, log_id, &e.to_string()).await?;
            }
            Err(_) => {
                tracing::error!(
                    channel = %tpl.channel,
                    template = %tpl.name,
                    "Notification delivery timed out"
                );
                NotificationLogRepo::mark_failed(&self.pool, log_id, "Delivery timed out").await?;
            }
        }

        Ok(())
    }

    /// Resolve the email recipient for an event.
    ///
    /// The target user's address wins when present and their preference
    /// allows email; otherwise the payload's `default_email_recipient`
    /// (populated from the ticket contact info) applies; otherwise `None`.
    async fn email_recipient(&self, event: &TicketEvent) -> Result<Option<String>, sqlx::Error> {
        if let Some(user_id) = event.target_user_id {
            if let Some(user) = UserRepo::find_by_id(&self.pool, user_id).await? {
                if let Some(email) = user.email {
                    if NotificationPreferenceRepo::email_enabled(&self.pool, user_id).await? {
                        return Ok(Some(email));
                    }
                }
            }
        }
        Ok(event
            .payload
            .get("default_email_recipient")
            .and_then(|v| v.as_str())
            .map(str::to_string))
    }

    /// Map the payload's `mention_user_id` to the channel's platform id.
    async fn mentions_for_channel(
        &self,
        event: &TicketEvent,
        channel: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        let Some(user_id) = event
            .payload
            .get("mention_user_id")
            .and_then(|v| v.as_i64())
        else {
            return Ok(Vec::new());
        };
        let Some(user) = UserRepo::find_by_id(&self.pool, user_id).await? else {
            return Ok(Vec::new());
        };
        let platform_id = match channel {
            CHANNEL_FEISHU => user.feishu_id,
            CHANNEL_ENTERPRISE_WECHAT => user.enterprise_wechat_id,
            _ => None,
        };
        Ok(platform_id.into_iter().collect())
    }
}
