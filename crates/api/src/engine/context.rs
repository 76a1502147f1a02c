//! Notification context building.
//!
//! Events carry a flat JSON payload whose keys are the `{{ variables }}`
//! usable in notification templates. The payload is a snapshot taken at
//! publish time; the dispatcher never re-reads ticket state.

use helpdesk_db::models::ticket::Ticket;
use helpdesk_db::models::user::User;
use helpdesk_db::repositories::CompanyRepo;
use helpdesk_db::DbPool;
use serde_json::json;

/// Build the base template context for a ticket event.
///
/// Includes `default_email_recipient` (from the ticket contact info) only
/// when the ticket's contact method is email.
pub async fn base_context(
    pool: &DbPool,
    site_url: &str,
    ticket: &Ticket,
    actor: Option<&User>,
) -> Result<serde_json::Value, sqlx::Error> {
    let company_name = CompanyRepo::find_by_id(pool, ticket.company_id)
        .await?
        .map(|c| c.name)
        .unwrap_or_default();

    let mut context = json!({
        "ticket_id": ticket.id,
        "ticket_title": ticket.title,
        "ticket_status": ticket.status,
        "ticket_urgency": ticket.urgency,
        "company_name": company_name,
        "site_url": site_url,
        "ticket_url": format!("{site_url}/tickets/{}", ticket.id),
        "sla_ir_deadline": ticket.sla_ir_deadline,
        "sla_resolution_deadline": ticket.sla_resolution_deadline,
    });

    if let Some(actor) = actor {
        context["actor_username"] = json!(actor.username);
    }
    if ticket.contact_method == "email" {
        if let Some(info) = &ticket.contact_info {
            if !info.is_empty() {
                context["default_email_recipient"] = json!(info);
            }
        }
    }

    Ok(context)
}

/// Trim reply content to a short excerpt for notification bodies.
pub fn reply_excerpt(content: &str) -> String {
    const MAX_EXCERPT_CHARS: usize = 200;
    if content.chars().count() <= MAX_EXCERPT_CHARS {
        content.to_string()
    } else {
        let head: String = content.chars().take(MAX_EXCERPT_CHARS).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_replies_pass_through() {
        assert_eq!(reply_excerpt("short"), "short");
    }

    #[test]
    fn long_replies_are_truncated_at_char_boundaries() {
        let long = "工".repeat(300);
        let excerpt = reply_excerpt(&long);
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 203);
    }
}
