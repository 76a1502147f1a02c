//! External delivery channels.
//!
//! Each channel implements [`ChannelSender`]: deliver a rendered subject
//! and body to one recipient, optionally @mentioning platform user ids.
//! New channels are added by implementing the trait and registering the
//! sender, not by modifying the dispatcher.

pub mod email;
pub mod feishu;
pub mod wecom;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_core::channels::{CHANNEL_EMAIL, CHANNEL_ENTERPRISE_WECHAT, CHANNEL_FEISHU};

use email::{EmailConfig, EmailSender};
use feishu::FeishuSender;
use wecom::WeComSender;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for delivery failures across all channels.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),

    /// The webhook endpoint answered 2xx but rejected the message.
    #[error("Webhook rejected the message: {0}")]
    Rejected(String),
}

// ---------------------------------------------------------------------------
// ChannelSender
// ---------------------------------------------------------------------------

/// The delivery capability every channel variant implements.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Deliver one message. `mentions` holds platform-specific user ids to
    /// @mention; channels without mention support ignore it.
    async fn deliver(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        mentions: &[String],
    ) -> Result<(), DeliveryError>;
}

// ---------------------------------------------------------------------------
// SenderRegistry
// ---------------------------------------------------------------------------

/// Maps channel names to their sender implementations.
#[derive(Default)]
pub struct SenderRegistry {
    senders: HashMap<String, Arc<dyn ChannelSender>>,
}

impl SenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the sender for a channel.
    pub fn register(&mut self, channel: impl Into<String>, sender: Arc<dyn ChannelSender>) {
        self.senders.insert(channel.into(), sender);
    }

    /// The sender for a channel, if registered.
    pub fn get(&self, channel: &str) -> Option<Arc<dyn ChannelSender>> {
        self.senders.get(channel).cloned()
    }

    /// Build the standard registry: Feishu and WeCom webhooks always, email
    /// only when SMTP is configured.
    pub fn standard(email_config: Option<EmailConfig>) -> Self {
        let mut registry = Self::new();
        if let Some(config) = email_config {
            registry.register(CHANNEL_EMAIL, Arc::new(EmailSender::new(config)));
        } else {
            tracing::warn!("SMTP not configured; email notifications disabled");
        }
        registry.register(CHANNEL_FEISHU, Arc::new(FeishuSender::new()));
        registry.register(CHANNEL_ENTERPRISE_WECHAT, Arc::new(WeComSender::new()));
        registry
    }
}
