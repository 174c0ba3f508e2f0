//! `{{name}}` placeholder rendering for custom request templates.

use serde_json::Value;
use std::collections::HashMap;

/// Render `template` with every `{{key}}` in its strings replaced by `bindings[key]`.
///
/// Keys without a binding are left verbatim. Substituted text is not scanned
/// again, so a prompt that itself contains `{{model}}` is sent as written.
pub fn render(template: &Value, bindings: &HashMap<String, String>) -> Value {
    match template {
        Value::String(text) => Value::String(substitute(text, bindings)),
        Value::Array(items) => Value::Array(items.iter().map(|v| render(v, bindings)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), render(value, bindings)))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => template.clone(),
    }
}

fn substitute(text: &str, bindings: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        match bindings.get(&after_open[..end]) {
            Some(value) => {
                out.push_str(value);
                rest = &after_open[end + 2..];
            }
            None => {
                // Advance one brace so "{{{x}}}" still finds "{{x}}".
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}
