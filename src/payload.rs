//! Request body construction.
//!
//! The default body is an OpenAI-style chat completion request. Operators whose
//! endpoint expects another shape supply a JSON template instead; see
//! [`crate::template`].

use crate::config::ReportConfig;
use crate::error::{ReportError, ReportResult};
use crate::logging::log_debug;
use crate::template;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_TOP_P: f64 = 0.9;

/// The prompts for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptPair<'a> {
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
}

impl<'a> PromptPair<'a> {
    pub fn new(system_prompt: &'a str, user_prompt: &'a str) -> Self {
        Self {
            system_prompt,
            user_prompt,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Default chat-completion body.
///
/// `model` is skipped rather than sent as `null`; several providers reject an
/// explicit null model.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    top_p: f64,
    stream: bool,
}

/// Build the request body for `prompts` according to `config`.
///
/// # Errors
///
/// Returns [`ReportError::ConfigurationError`] if the configured request
/// template is not valid JSON.
pub fn build(config: &ReportConfig, prompts: &PromptPair<'_>) -> ReportResult<Value> {
    let model = config.api_model.as_deref().filter(|m| !m.is_empty());

    match config.request_template.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            let template: Value = serde_json::from_str(raw).map_err(|e| {
                ReportError::configuration_error(format!(
                    "Invalid REPORT_API_REQUEST_TEMPLATE_JSON: {e}"
                ))
            })?;
            log_debug!(
                template_kind = crate::json_path::kind_name(&template),
                "Rendering custom request template"
            );
            Ok(template::render(&template, &bindings(model, prompts)))
        }
        _ => default_payload(model, prompts),
    }
}

/// Placeholder bindings for a custom template. An unset model binds to `""`.
pub fn bindings(model: Option<&str>, prompts: &PromptPair<'_>) -> HashMap<String, String> {
    HashMap::from([
        ("model".to_string(), model.unwrap_or_default().to_string()),
        ("system_prompt".to_string(), prompts.system_prompt.to_string()),
        ("user_prompt".to_string(), prompts.user_prompt.to_string()),
    ])
}

fn default_payload(model: Option<&str>, prompts: &PromptPair<'_>) -> ReportResult<Value> {
    let request = ChatCompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: prompts.system_prompt,
            },
            ChatMessage {
                role: "user",
                content: prompts.user_prompt,
            },
        ],
        temperature: DEFAULT_TEMPERATURE,
        top_p: DEFAULT_TOP_P,
        stream: false,
    };

    serde_json::to_value(&request).map_err(|e| {
        ReportError::configuration_error(format!("Failed to serialize default payload: {e}"))
    })
}
