//! Notification template override resolution.
//!
//! A company-specific template strictly overrides the global template for
//! the same channel; channels with no company-specific template fall back
//! to the global one. Without a company scope only global templates apply.
//! The result holds at most one template per channel.

use std::collections::HashSet;

use helpdesk_core::types::DbId;
use helpdesk_db::models::notification::NotificationTemplate;

/// Select the effective templates for one event in one company scope.
///
/// `templates` is the active-template list for a single event type, mixing
/// global rows (`company_id = None`) and rows for any company; rows for
/// other companies are discarded.
pub fn resolve_effective(
    templates: Vec<NotificationTemplate>,
    company_id: Option<DbId>,
) -> Vec<NotificationTemplate> {
    let Some(company_id) = company_id else {
        return templates
            .into_iter()
            .filter(|t| t.company_id.is_none())
            .collect();
    };

    let (company_templates, global_templates): (Vec<_>, Vec<_>) = templates
        .into_iter()
        .filter(|t| t.company_id.is_none() || t.company_id == Some(company_id))
        .partition(|t| t.company_id == Some(company_id));

    let mut covered_channels: HashSet<String> = HashSet::new();
    let mut effective = Vec::new();

    for template in company_templates {
        covered_channels.insert(template.channel.clone());
        effective.push(template);
    }
    for template in global_templates {
        if !covered_channels.contains(&template.channel) {
            effective.push(template);
        }
    }

    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn template(id: i64, company_id: Option<i64>, channel: &str) -> NotificationTemplate {
        NotificationTemplate {
            id,
            name: format!("tpl-{id}"),
            company_id,
            event_type: "ticket_created".to_string(),
            channel: channel.to_string(),
            is_active: true,
            subject_template: "subject".to_string(),
            body_template: "body".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn company_template_overrides_global_for_same_channel() {
        let templates = vec![template(1, None, "email"), template(2, Some(7), "email")];

        let effective = resolve_effective(templates.clone(), Some(7));
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].id, 2);

        // A different company gets the global one.
        let effective = resolve_effective(templates, Some(8));
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].id, 1);
    }

    #[test]
    fn global_fills_channels_the_company_does_not_cover() {
        let templates = vec![
            template(1, None, "email"),
            template(2, None, "feishu"),
            template(3, Some(7), "feishu"),
        ];

        let mut effective = resolve_effective(templates, Some(7));
        effective.sort_by_key(|t| t.id);
        let ids: Vec<_> = effective.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn no_company_scope_uses_only_globals() {
        let templates = vec![template(1, None, "email"), template(2, Some(7), "email")];
        let effective = resolve_effective(templates, None);
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].id, 1);
    }

    #[test]
    fn other_companies_rows_are_discarded() {
        let templates = vec![template(2, Some(7), "email")];
        let effective = resolve_effective(templates, Some(9));
        assert!(effective.is_empty());
    }
}
