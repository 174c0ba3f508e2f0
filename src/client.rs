//! Cloud report client: one POST per call, then extract, normalize and strip.

use crate::config::{split_paths, ReportConfig};
use crate::error::{ReportError, ReportResult};
use crate::json_path;
use crate::logging::{log_debug, log_info};
use crate::normalize::ResponseNormalizer;
use crate::payload::{self, PromptPair};
use crate::think::ThinkBlockStripper;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Paths tried after the configured ones, covering the common provider shapes.
pub const FALLBACK_RESPONSE_PATHS: [&str; 8] = [
    "choices.0.message.final",
    "choices.0.message.answer",
    "choices.0.message.content",
    "choices.0.text",
    "response.output_text",
    "output_text",
    "data.text",
    "text",
];

/// Anything that can turn a prompt pair into report text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> ReportResult<String>;
}

/// Progress of a single [`CloudReportClient::generate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Idle,
    Building,
    Sending,
    Decoding,
    Extracting,
    Normalizing,
    Stripping,
    Done,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Building => "building",
            Self::Sending => "sending",
            Self::Decoding => "decoding",
            Self::Extracting => "extracting",
            Self::Normalizing => "normalizing",
            Self::Stripping => "stripping",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Per-call bookkeeping; created fresh by every `generate`.
struct GenerationRun {
    id: Uuid,
    stage: GenerationStage,
}

impl GenerationRun {
    fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            stage: GenerationStage::Idle,
        }
    }

    fn advance(&mut self, next: GenerationStage) {
        log_debug!(
            generation_id = %self.id,
            from = %self.stage,
            to = %next,
            "Report generation stage transition"
        );
        self.stage = next;
    }

    fn fail(&self, error: ReportError) -> ReportError {
        log_debug!(
            generation_id = %self.id,
            stage = %self.stage,
            error_category = ?error.category(),
            "Report generation failed"
        );
        error
    }
}

/// Provider-agnostic client for a chat/completion-style report API.
///
/// Holds only its configuration; the HTTP client is built per call, so no
/// sockets or pools outlive a call and concurrent calls need no locking.
#[derive(Debug, Clone)]
pub struct CloudReportClient {
    config: ReportConfig,
}

impl CloudReportClient {
    /// Create a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ConfigurationError`] if the configuration is
    /// incomplete.
    pub fn new(config: ReportConfig) -> ReportResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a client from the `REPORT_*` environment variables.
    pub fn from_env() -> ReportResult<Self> {
        Self::new(ReportConfig::from_env()?)
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate report text for the prompt pair.
    ///
    /// # Errors
    ///
    /// - [`ReportError::ConfigurationError`] for an unusable configuration,
    ///   template or header.
    /// - [`ReportError::TransportError`] when the request cannot be completed
    ///   within `timeout_seconds`.
    /// - [`ReportError::RemoteError`] for non-2xx responses.
    /// - [`ReportError::InvalidResponseError`] for non-JSON bodies.
    /// - [`ReportError::ExtractionError`] when no response path resolves.
    /// - [`ReportError::EmptyResponseError`] when nothing is left after
    ///   normalization and stripping.
    pub async fn generate(&self, system_prompt: &str, user_prompt: &str) -> ReportResult<String> {
        let mut run = GenerationRun::start();
        let prompts = PromptPair::new(system_prompt, user_prompt);

        run.advance(GenerationStage::Building);
        let (body, headers) = self.prepare(&prompts).map_err(|e| run.fail(e))?;

        run.advance(GenerationStage::Sending);
        let raw = self.send(body, headers).await.map_err(|e| run.fail(e))?;

        run.advance(GenerationStage::Decoding);
        let decoded: Value = serde_json::from_str(&raw)
            .map_err(|e| run.fail(ReportError::invalid_response(&raw, e.to_string())))?;

        run.advance(GenerationStage::Extracting);
        let paths = candidate_paths(&self.config.response_paths);
        let (path, value) = extract_first(&decoded, &paths).map_err(|e| run.fail(e))?;
        log_debug!(
            generation_id = %run.id,
            path = %path,
            "Resolved response path"
        );

        run.advance(GenerationStage::Normalizing);
        let mut text = ResponseNormalizer::new(self.config.strip_think_blocks).normalize(value);

        if self.config.strip_think_blocks {
            run.advance(GenerationStage::Stripping);
            text = ThinkBlockStripper::strip(&text);
        }

        if text.is_empty() {
            return Err(run.fail(ReportError::empty_response()));
        }

        run.advance(GenerationStage::Done);
        log_info!(
            generation_id = %run.id,
            text_length = text.len(),
            "Report text generated"
        );
        Ok(text)
    }

    fn prepare(&self, prompts: &PromptPair<'_>) -> ReportResult<(Vec<u8>, HeaderMap)> {
        self.config.validate()?;
        let payload = payload::build(&self.config, prompts)?;
        let body = serde_json::to_vec(&payload).map_err(|e| {
            ReportError::configuration_error(format!("Failed to serialize payload: {e}"))
        })?;
        Ok((body, build_headers(&self.config)?))
    }

    async fn send(&self, body: Vec<u8>, headers: HeaderMap) -> ReportResult<String> {
        let timeout_seconds = self.config.timeout_seconds;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| {
                ReportError::configuration_error(format!("Failed to build HTTP client: {e}"))
            })?;

        log_debug!(
            url = %self.config.api_url,
            body_length = body.len(),
            header_count = headers.len(),
            timeout_seconds = timeout_seconds,
            "Sending report API request"
        );

        let response = client
            .post(&self.config.api_url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| transport_failure(e, timeout_seconds))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| e.to_string());
            return Err(ReportError::remote_error(status.as_u16(), body));
        }

        response
            .text()
            .await
            .map_err(|e| transport_failure(e, timeout_seconds))
    }
}

#[async_trait]
impl ReportGenerator for CloudReportClient {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> ReportResult<String> {
        CloudReportClient::generate(self, system_prompt, user_prompt).await
    }
}

fn transport_failure(error: reqwest::Error, timeout_seconds: u64) -> ReportError {
    if error.is_builder() {
        ReportError::configuration_error(format!("Invalid report API request: {error}"))
    } else if error.is_timeout() {
        ReportError::transport_error(
            format!("request timed out after {timeout_seconds}s"),
            true,
            Some(Box::new(error)),
        )
    } else {
        ReportError::transport_error(error.to_string(), false, Some(Box::new(error)))
    }
}

/// Build request headers: JSON content type, optional auth header, then the
/// extra headers, which may override either.
///
/// # Errors
///
/// Returns [`ReportError::ConfigurationError`] for a header name or value that
/// is not valid HTTP.
pub fn build_headers(config: &ReportConfig) -> ReportResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
        let token = if config.auth_scheme.is_empty() {
            key.to_string()
        } else {
            format!("{} {}", config.auth_scheme, key).trim().to_string()
        };
        insert_header(&mut headers, &config.auth_header_name, &token)?;
    }

    for (name, value) in &config.extra_headers {
        insert_header(&mut headers, name, value)?;
    }

    Ok(headers)
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> ReportResult<()> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| ReportError::configuration_error(format!("Invalid header name {name:?}: {e}")))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| {
        ReportError::configuration_error(format!("Invalid value for header {name:?}: {e}"))
    })?;
    headers.insert(header_name, header_value);
    Ok(())
}

/// Configured paths (comma-split, trimmed) followed by
/// [`FALLBACK_RESPONSE_PATHS`], with duplicates removed in order.
pub fn candidate_paths(configured: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    let configured = configured.iter().flat_map(|entry| split_paths(entry));
    let fallbacks = FALLBACK_RESPONSE_PATHS.iter().map(|p| p.to_string());

    for path in configured.chain(fallbacks) {
        if seen.insert(path.clone()) {
            paths.push(path);
        }
    }
    paths
}

/// Return the first path in `paths` that resolves, with its value.
///
/// # Errors
///
/// Returns [`ReportError::ExtractionError`] listing every attempted path and
/// the last resolution error.
pub fn extract_first<'a, 'p>(
    data: &'a Value,
    paths: &'p [String],
) -> ReportResult<(&'p str, &'a Value)> {
    let mut last_error = None;

    for path in paths {
        match json_path::resolve(data, path) {
            Ok(value) => return Ok((path.as_str(), value)),
            Err(e) => {
                log_debug!(path = %path, error = %e, "Response path did not resolve");
                last_error = Some(format!("{path}: {e}"));
            }
        }
    }

    Err(ReportError::extraction_error(
        paths.to_vec(),
        last_error.unwrap_or_else(|| "no response paths configured".to_string()),
    ))
}
