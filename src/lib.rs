//! # cloud-report
//!
//! Provider-agnostic adapter for cloud text-generation APIs that turns rough
//! notes into a structured daily report.
//!
//! ## Key Features
//!
//! - **Any endpoint shape**: default chat-completion body or an operator-defined JSON template
//! - **Configurable extraction**: dotted response paths with built-in fallbacks
//! - **Normalization**: content blocks, nested answer objects and reasoning traces collapse to plain text
//! - **Think stripping**: `<think>` spans, reasoning fences and prefixed lines are removed
//!
//! ## Example
//!
//! ```rust,no_run
//! use cloud_report::{CloudReportClient, ReportConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut config = ReportConfig::new("https://api.example.com/v1/chat/completions");
//! config.api_key = Some("your-api-key".to_string());
//! config.api_model = Some("demo".to_string());
//!
//! let client = CloudReportClient::new(config)?;
//! let system_prompt = client.config().system_prompt().to_string();
//! let text = client.generate(&system_prompt, "Fixed the login bug").await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod json_path;
pub mod normalize;
pub mod payload;
pub mod report;
pub mod template;
pub mod think;

#[cfg(test)]
pub mod tests;

pub use client::{CloudReportClient, GenerationStage, ReportGenerator};
pub use config::ReportConfig;
pub use error::{ReportError, ReportResult};
pub use json_path::PathResolutionError;
pub use normalize::ResponseNormalizer;
pub use payload::PromptPair;
pub use report::{
    build_user_prompt, ensure_minimum_sections, SourceType, DEFAULT_SYSTEM_PROMPT,
    REQUIRED_SECTIONS,
};
pub use think::ThinkBlockStripper;
