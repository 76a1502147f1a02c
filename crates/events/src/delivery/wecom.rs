//! Enterprise WeChat (WeCom) group webhook delivery.
//!
//! Posts a markdown message with the subject as a heading. Mentions use
//! the `<@userid>` syntax plus the `mentioned_list` field. WeCom answers
//! HTTP 200 with `errcode != 0` for rejected messages.

use std::time::Duration;

use async_trait::async_trait;

use super::{ChannelSender, DeliveryError};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers markdown notifications to Enterprise WeChat group webhooks.
pub struct WeComSender {
    client: reqwest::Client,
}

impl WeComSender {
    /// Create a new sender with a pre-configured HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client }
    }

    /// Build the markdown payload.
    fn build_payload(subject: &str, body: &str, mentions: &[String]) -> serde_json::Value {
        let mut content = format!("### {subject}\n\n{body}");
        let ids: Vec<&String> = mentions.iter().filter(|id| !id.is_empty()).collect();
        if !ids.is_empty() {
            let mention_str: Vec<String> = ids.iter().map(|id| format!("<@{id}>")).collect();
            content.push('\n');
            content.push_str(&mention_str.join(" "));
        }

        serde_json::json!({
            "msgtype": "markdown",
            "markdown": {
                "content": content,
                "mentioned_list": ids,
            }
        })
    }
}

impl Default for WeComSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelSender for WeComSender {
    async fn deliver(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        mentions: &[String],
    ) -> Result<(), DeliveryError> {
        let payload = Self::build_payload(subject, body, mentions);

        let response = self.client.post(recipient).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap_or_default();
        let errcode = parsed.get("errcode").and_then(|v| v.as_i64()).unwrap_or(0);
        if errcode != 0 {
            return Err(DeliveryError::Rejected(text));
        }

        tracing::info!(webhook = recipient, "Enterprise WeChat notification sent");
        Ok(())
    }
}
