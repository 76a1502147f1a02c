//! Notification template rendering.
//!
//! Templates are plain text with `{{ variable }}` placeholders substituted
//! from a JSON context. Dotted paths (`{{ ticket.title }}`) traverse nested
//! objects. Unknown variables render as the empty string so a half-filled
//! context degrades to a sparse message rather than an error — notification
//! rendering must never fail the triggering operation.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").expect("placeholder regex"));

/// Render a template string against a JSON context.
pub fn render(template: &str, context: &Value) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            lookup(context, &caps[1])
        })
        .into_owned()
}

/// Resolve a dotted path into the context, stringifying scalars.
fn lookup(context: &Value, path: &str) -> String {
    let mut current = context;
    for segment in path.split('.') {
        match current.get(segment) {
            Some(value) => current = value,
            None => return String::new(),
        }
    }
    match current {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // Arrays/objects have no sensible inline form; render compact JSON.
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_simple_variables() {
        let ctx = json!({"ticket_id": 42, "ticket_title": "Printer on fire"});
        assert_eq!(
            render("Ticket #{{ ticket_id }}: {{ticket_title}}", &ctx),
            "Ticket #42: Printer on fire"
        );
    }

    #[test]
    fn dotted_paths_traverse_objects() {
        let ctx = json!({"ticket": {"id": 7, "company": {"name": "Acme"}}});
        assert_eq!(
            render("{{ ticket.company.name }} / #{{ ticket.id }}", &ctx),
            "Acme / #7"
        );
    }

    #[test]
    fn unknown_variables_render_empty() {
        let ctx = json!({"present": "yes"});
        assert_eq!(render("[{{ missing }}]{{ present }}", &ctx), "[]yes");
        assert_eq!(render("{{ a.b.c }}", &ctx), "");
    }

    #[test]
    fn null_and_bool_values() {
        let ctx = json!({"gone": null, "flag": true});
        assert_eq!(render("<{{ gone }}> {{ flag }}", &ctx), "<> true");
    }

    #[test]
    fn text_without_placeholders_is_untouched() {
        let ctx = json!({});
        assert_eq!(render("no placeholders { here }", &ctx), "no placeholders { here }");
    }

    #[test]
    fn whitespace_inside_braces_is_tolerated() {
        let ctx = json!({"x": "v"});
        assert_eq!(render("{{x}} {{ x }} {{  x  }}", &ctx), "v v v");
    }
}
