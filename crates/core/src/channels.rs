//! Notification channel and event-type name constants.
//!
//! Channel names double as the `provider` key of a company chat provider
//! config and as the `channel` column of notification templates and logs.

/// Email via SMTP relay.
pub const CHANNEL_EMAIL: &str = "email";
/// Feishu (Lark) group webhook, interactive card payload.
pub const CHANNEL_FEISHU: &str = "feishu";
/// Enterprise WeChat (WeCom) group webhook, markdown payload.
pub const CHANNEL_ENTERPRISE_WECHAT: &str = "enterprise_wechat";

/// All channels a template may target.
pub const VALID_CHANNELS: &[&str] = &[CHANNEL_EMAIL, CHANNEL_FEISHU, CHANNEL_ENTERPRISE_WECHAT];

pub const EVENT_TICKET_CREATED: &str = "ticket_created";
pub const EVENT_TICKET_STATUS_CHANGED: &str = "ticket_status_changed";
pub const EVENT_TICKET_REPLIED_BY_SUPPORT: &str = "ticket_replied_by_support";
pub const EVENT_TICKET_REPLIED_BY_CUSTOMER: &str = "ticket_replied_by_customer";
pub const EVENT_TICKET_ASSIGNED: &str = "ticket_assigned";
pub const EVENT_TICKET_TRANSFERRED: &str = "ticket_transferred";
pub const EVENT_TICKET_PAUSED: &str = "ticket_paused";
pub const EVENT_TICKET_SLA_IR_WARNING: &str = "ticket_sla_ir_warning";
pub const EVENT_TICKET_SLA_IR_MISSED: &str = "ticket_sla_ir_missed";
pub const EVENT_TICKET_SLA_RESOLUTION_WARNING: &str = "ticket_sla_resolution_warning";
pub const EVENT_TICKET_SLA_RESOLUTION_MISSED: &str = "ticket_sla_resolution_missed";
pub const EVENT_TICKET_IDLE_WARNING: &str = "ticket_idle_warning";

/// All event types a template may subscribe to.
pub const VALID_EVENT_TYPES: &[&str] = &[
    EVENT_TICKET_CREATED,
    EVENT_TICKET_STATUS_CHANGED,
    EVENT_TICKET_REPLIED_BY_SUPPORT,
    EVENT_TICKET_REPLIED_BY_CUSTOMER,
    EVENT_TICKET_ASSIGNED,
    EVENT_TICKET_TRANSFERRED,
    EVENT_TICKET_PAUSED,
    EVENT_TICKET_SLA_IR_WARNING,
    EVENT_TICKET_SLA_IR_MISSED,
    EVENT_TICKET_SLA_RESOLUTION_WARNING,
    EVENT_TICKET_SLA_RESOLUTION_MISSED,
    EVENT_TICKET_IDLE_WARNING,
];
