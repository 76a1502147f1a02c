//! Periodic SLA / idle-ticket scan.
//!
//! [`SlaScanScheduler`] runs as a background task, periodically executing
//! the monitoring queries and publishing one event per newly-affected
//! ticket (`ticket_sla_ir_warning`, `ticket_sla_ir_missed`, the resolution
//! pair, and `ticket_idle_warning`). Delivery then flows through the
//! normal notification dispatcher.
//!
//! Deduplication is in-memory for the process lifetime: a ticket is
//! announced once per category, and a restart may re-announce. Paused
//! tickets never appear — the monitoring queries exclude them.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use helpdesk_core::channels::{
    EVENT_TICKET_IDLE_WARNING, EVENT_TICKET_SLA_IR_MISSED, EVENT_TICKET_SLA_IR_WARNING,
    EVENT_TICKET_SLA_RESOLUTION_MISSED, EVENT_TICKET_SLA_RESOLUTION_WARNING,
};
use helpdesk_core::types::DbId;
use helpdesk_db::models::ticket::Ticket;
use helpdesk_db::repositories::{CompanyRepo, MonitoringRepo};
use helpdesk_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::bus::{EventBus, TicketEvent};

/// How often the scheduler runs the monitoring queries.
const SCAN_INTERVAL: Duration = Duration::from_secs(60);

/// Default lookahead for "approaching deadline" warnings.
const DEFAULT_WARNING_WINDOW_MINUTES: i64 = 60;

/// Default idle threshold in days.
const DEFAULT_IDLE_DAYS: i64 = 3;

/// Background service scanning for SLA and idle violations.
pub struct SlaScanScheduler {
    pool: DbPool,
    bus: Arc<EventBus>,
    site_url: String,
    warning_window_minutes: i64,
    idle_days: i64,
    announced: HashSet<(&'static str, DbId)>,
}

impl SlaScanScheduler {
    /// Create a scheduler with the default window and idle threshold.
    pub fn new(pool: DbPool, bus: Arc<EventBus>, site_url: String) -> Self {
        Self {
            pool,
            bus,
            site_url,
            warning_window_minutes: DEFAULT_WARNING_WINDOW_MINUTES,
            idle_days: DEFAULT_IDLE_DAYS,
            announced: HashSet::new(),
        }
    }

    /// Run the scan loop.
    ///
    /// Executes one scan per tick and exits gracefully when the provided
    /// [`CancellationToken`] is cancelled.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(SCAN_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("SLA scan scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.scan_once().await {
                        tracing::error!(error = %e, "SLA scan failed");
                    }
                }
            }
        }
    }

    /// One full scan over all five monitoring categories.
    pub async fn scan_once(&mut self) -> Result<(), sqlx::Error> {
        let window = self.warning_window_minutes;

        let approaching_ir = MonitoringRepo::approaching_ir(&self.pool, window).await?;
        self.announce(EVENT_TICKET_SLA_IR_WARNING, approaching_ir).await?;

        let missed_ir = MonitoringRepo::missed_ir(&self.pool).await?;
        self.announce(EVENT_TICKET_SLA_IR_MISSED, missed_ir).await?;

        let approaching_resolution =
            MonitoringRepo::approaching_resolution(&self.pool, window).await?;
        self.announce(EVENT_TICKET_SLA_RESOLUTION_WARNING, approaching_resolution)
            .await?;

        let missed_resolution = MonitoringRepo::missed_resolution(&self.pool).await?;
        self.announce(EVENT_TICKET_SLA_RESOLUTION_MISSED, missed_resolution)
            .await?;

        let idle = MonitoringRepo::idle(&self.pool, self.idle_days).await?;
        self.announce(EVENT_TICKET_IDLE_WARNING, idle).await?;

        Ok(())
    }

    /// Publish one event per ticket not yet announced in this category.
    async fn announce(
        &mut self,
        event_type: &'static str,
        tickets: Vec<Ticket>,
    ) -> Result<(), sqlx::Error> {
        let mut published = 0usize;

        for ticket in tickets {
            if !self.announced.insert((event_type, ticket.id)) {
                continue;
            }

            let company_name = CompanyRepo::find_by_id(&self.pool, ticket.company_id)
                .await?
                .map(|c| c.name)
                .unwrap_or_default();

            let payload = serde_json::json!({
                "ticket_id": ticket.id,
                "ticket_title": ticket.title,
                "ticket_status": ticket.status,
                "company_name": company_name,
                "sla_ir_deadline": ticket.sla_ir_deadline,
                "sla_resolution_deadline": ticket.sla_resolution_deadline,
                "last_activity_at": ticket.last_activity_at,
                "ticket_url": format!("{}/tickets/{}", self.site_url, ticket.id),
            });

            let mut event = TicketEvent::new(event_type)
                .with_ticket(ticket.id, ticket.company_id)
                .with_payload(payload);
            if let Some(assignee) = ticket.assigned_to {
                event = event.with_target_user(assignee);
            }
            self.bus.publish(event);
            published += 1;
        }

        if published > 0 {
            tracing::info!(event_type, count = published, "SLA scan published events");
        }
        Ok(())
    }
}
