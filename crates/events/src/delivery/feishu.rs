//! Feishu (Lark) group webhook delivery.
//!
//! Posts an interactive card with the subject as the header and the body as
//! `lark_md` content. Mentions are appended as `<at user_id="..."></at>`
//! tags. The endpoint answers HTTP 200 even for rejected messages, so the
//! JSON `StatusCode` / `code` field is checked as well.

use std::time::Duration;

use async_trait::async_trait;

use super::{ChannelSender, DeliveryError};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers notification cards to Feishu group webhooks.
pub struct FeishuSender {
    client: reqwest::Client,
}

impl FeishuSender {
    /// Create a new sender with a pre-configured HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client }
    }

    /// Build the interactive-card payload.
    fn build_payload(subject: &str, body: &str, mentions: &[String]) -> serde_json::Value {
        let mut content = body.to_string();
        let mention_tags: Vec<String> = mentions
            .iter()
            .filter(|id| !id.is_empty())
            .map(|id| format!("<at user_id=\"{id}\"></at>"))
            .collect();
        if !mention_tags.is_empty() {
            content.push_str("\n\n");
            content.push_str(&mention_tags.join(" "));
        }

        serde_json::json!({
            "msg_type": "interactive",
            "card": {
                "config": {"wide_screen_mode": true},
                "header": {
                    "title": {"tag": "plain_text", "content": subject},
                    "template": "blue"
                },
                "elements": [
                    {"tag": "div", "text": {"tag": "lark_md", "content": content}}
                ]
            }
        })
    }
}

impl Default for FeishuSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelSender for FeishuSender {
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

        // Webhook errors come back as 200 with a non-zero code.
        let text = response.text().await?;
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap_or_default();
        let code = parsed
            .get("StatusCode")
            .or_else(|| parsed.get("code"))
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        if code != 0 {
            return Err(DeliveryError::Rejected(text));
        }

        tracing::info!(webhook = recipient, "Feishu notification sent");
        Ok(())
    }
}
