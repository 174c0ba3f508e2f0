use crate::error::{ReportError, ReportResult};
use crate::logging::log_debug;
use crate::report::DEFAULT_SYSTEM_PROMPT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response path used when neither `REPORT_API_RESPONSE_PATHS` nor
/// `REPORT_API_RESPONSE_PATH` is set.
pub const DEFAULT_RESPONSE_PATH: &str = "choices.0.message.content";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;
pub const DEFAULT_AUTH_HEADER: &str = "Authorization";
pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";

pub const ENV_API_URL: &str = "REPORT_API_URL";
pub const ENV_API_KEY: &str = "REPORT_API_KEY";
pub const ENV_API_MODEL: &str = "REPORT_API_MODEL";
pub const ENV_API_TIMEOUT: &str = "REPORT_API_TIMEOUT";
pub const ENV_RESPONSE_PATHS: &str = "REPORT_API_RESPONSE_PATHS";
pub const ENV_RESPONSE_PATH: &str = "REPORT_API_RESPONSE_PATH";
pub const ENV_AUTH_HEADER: &str = "REPORT_API_AUTH_HEADER";
pub const ENV_AUTH_SCHEME: &str = "REPORT_API_AUTH_SCHEME";
pub const ENV_EXTRA_HEADERS_JSON: &str = "REPORT_API_EXTRA_HEADERS_JSON";
pub const ENV_REQUEST_TEMPLATE_JSON: &str = "REPORT_API_REQUEST_TEMPLATE_JSON";
pub const ENV_STRIP_THINK: &str = "REPORT_STRIP_THINK";
pub const ENV_SYSTEM_PROMPT: &str = "REPORT_SYSTEM_PROMPT";

/// Settings for one report API endpoint.
///
/// Resolved once and treated as read-only for the duration of a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub api_model: Option<String>,
    pub timeout_seconds: u64,
    /// Dotted paths tried, in order, before the built-in fallbacks.
    pub response_paths: Vec<String>,
    pub auth_header_name: String,
    /// Prefix for the API key; an empty scheme sends the raw key.
    pub auth_scheme: String,
    /// Merged after the content-type and auth headers, so they may override both.
    pub extra_headers: BTreeMap<String, String>,
    /// Raw JSON body template with `{{model}}`, `{{system_prompt}}` and
    /// `{{user_prompt}}` placeholders.
    pub request_template: Option<String>,
    pub strip_think_blocks: bool,
    /// Replaces [`DEFAULT_SYSTEM_PROMPT`] when set.
    pub system_prompt: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: None,
            api_model: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            response_paths: vec![DEFAULT_RESPONSE_PATH.to_string()],
            auth_header_name: DEFAULT_AUTH_HEADER.to_string(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            extra_headers: BTreeMap::new(),
            request_template: None,
            strip_think_blocks: true,
            system_prompt: None,
        }
    }
}

impl ReportConfig {
    /// Create a configuration for `api_url` with every other setting at its default.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration is complete
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ConfigurationError`] if the API URL is empty or
    /// the timeout is zero.
    pub fn validate(&self) -> ReportResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(ReportError::configuration_error(format!(
                "Missing required env var: {ENV_API_URL}"
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ReportError::configuration_error(
                "Timeout must be a positive number of seconds",
            ));
        }
        Ok(())
    }

    /// The system prompt to send: the configured override or the built-in one.
    pub fn system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    /// Load configuration from the `REPORT_*` environment variables
    /// This is the ONLY method that should access environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ConfigurationError`] if `REPORT_API_URL` is
    /// missing, the timeout is not a positive integer, or the extra headers
    /// are not a JSON object of strings.
    pub fn from_env() -> ReportResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Empty or whitespace-only values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> ReportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_url = get(ENV_API_URL).ok_or_else(|| {
            ReportError::configuration_error(format!("Missing required env var: {ENV_API_URL}"))
        })?;

        let timeout_seconds = match get(ENV_API_TIMEOUT) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        let response_paths = match get(ENV_RESPONSE_PATHS) {
            Some(csv) => split_paths(&csv),
            None => split_paths(
                &get(ENV_RESPONSE_PATH).unwrap_or_else(|| DEFAULT_RESPONSE_PATH.to_string()),
            ),
        };

        let extra_headers = match get(ENV_EXTRA_HEADERS_JSON) {
            Some(raw) => parse_extra_headers(&raw)?,
            None => BTreeMap::new(),
        };

        let config = Self {
            api_url,
            api_key: get(ENV_API_KEY),
            api_model: get(ENV_API_MODEL),
            timeout_seconds,
            response_paths,
            auth_header_name: get(ENV_AUTH_HEADER)
                .unwrap_or_else(|| DEFAULT_AUTH_HEADER.to_string()),
            auth_scheme: get(ENV_AUTH_SCHEME).unwrap_or_else(|| DEFAULT_AUTH_SCHEME.to_string()),
            extra_headers,
            request_template: get(ENV_REQUEST_TEMPLATE_JSON),
            strip_think_blocks: get(ENV_STRIP_THINK).map_or(true, |raw| parse_flag(&raw)),
            system_prompt: get(ENV_SYSTEM_PROMPT),
        };

        config.validate()?;

        log_debug!(
            api_url = %config.api_url,
            has_api_key = config.api_key.is_some(),
            has_model = config.api_model.is_some(),
            timeout_seconds = config.timeout_seconds,
            response_paths = config.response_paths.len(),
            extra_headers = config.extra_headers.len(),
            has_request_template = config.request_template.is_some(),
            strip_think_blocks = config.strip_think_blocks,
            "Report API configuration loaded and validated"
        );

        Ok(config)
    }
}

/// Split a comma-separated path list, trimming entries and dropping empty ones.
pub fn split_paths(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}

/// `1`, `true`, `yes` and `on` (any case) are true; everything else is false.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_timeout(raw: &str) -> ReportResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(seconds),
        _ => Err(ReportError::configuration_error(format!(
            "Invalid {ENV_API_TIMEOUT}: expected a positive integer, got {raw:?}"
        ))),
    }
}

fn parse_extra_headers(raw: &str) -> ReportResult<BTreeMap<String, String>> {
    serde_json::from_str(raw).map_err(|e| {
        ReportError::configuration_error(format!("Invalid {ENV_EXTRA_HEADERS_JSON}: {e}"))
    })
}
