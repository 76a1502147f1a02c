//! Helpdesk event bus and notification infrastructure.
//!
//! This crate provides the building blocks for event-driven notification
//! delivery:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`TicketEvent`] — the canonical domain event envelope emitted by
//!   lifecycle transitions.
//! - [`resolve`] — company-overrides-global template resolution.
//! - [`delivery`] — channel senders (SMTP email, Feishu and Enterprise
//!   WeChat webhooks) behind the [`ChannelSender`] capability.
//! - [`NotificationDispatcher`] — background service rendering templates
//!   and delivering them, one `notification_logs` row per attempt.
//! - [`SlaScanScheduler`] — periodic SLA / idle scan publishing warning
//!   events back onto the bus.

pub mod bus;
pub mod delivery;
pub mod dispatcher;
pub mod resolve;
pub mod sla_scan;

pub use bus::{EventBus, TicketEvent};
pub use delivery::email::{EmailConfig, EmailSender};
pub use delivery::feishu::FeishuSender;
pub use delivery::wecom::WeComSender;
pub use delivery::{ChannelSender, DeliveryError, SenderRegistry};
pub use dispatcher::NotificationDispatcher;
pub use sla_scan::SlaScanScheduler;
