//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`TicketEvent`]s.
//! Lifecycle transitions publish here; the notification dispatcher consumes
//! from its own subscription, so delivery runs fire-and-forget relative to
//! the request path.

use chrono::{DateTime, Utc};
use helpdesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// TicketEvent
// ---------------------------------------------------------------------------

/// A domain event emitted by a ticket lifecycle transition.
///
/// The `payload` carries the template context: a flat JSON object whose
/// keys are the `{{ variables }}` available to notification templates,
/// snapshotted at publish time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketEvent {
    /// Event name, e.g. `"ticket_created"` (see
    /// `helpdesk_core::channels::VALID_EVENT_TYPES`).
    pub event_type: String,

    /// The ticket the event concerns, if any.
    pub ticket_id: Option<DbId>,

    /// Company scope used for template override resolution and chat
    /// provider lookup. `None` restricts resolution to global templates.
    pub company_id: Option<DbId>,

    /// The user whose action triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Direct recipient for user-addressed channels (email).
    pub target_user_id: Option<DbId>,

    /// Template context variables.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl TicketEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            ticket_id: None,
            company_id: None,
            actor_user_id: None,
            target_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the ticket and its company.
    pub fn with_ticket(mut self, ticket_id: DbId, company_id: DbId) -> Self {
        self.ticket_id = Some(ticket_id);
        self.company_id = Some(company_id);
        self
    }

    /// Attach the acting user.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Attach a direct notification recipient.
    pub fn with_target_user(mut self, user_id: DbId) -> Self {
        self.target_user_id = Some(user_id);
        self
    }

    /// Set the template context payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`TicketEvent`].
pub struct EventBus {
    sender: broadcast::Sender<TicketEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// publishing never blocks or fails the triggering operation.
    pub fn publish(&self, event: TicketEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<TicketEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
