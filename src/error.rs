//! Error types for report generation.
//!
//! This module provides structured error handling for cloud-report operations,
//! including categorization, severity levels, and retry guidance.
//!
//! # Error Types
//!
//! The main error type is [`ReportError`], which covers all failure modes of a
//! single [`generate`](crate::CloudReportClient::generate) call:
//! - Configuration errors (missing API URL, invalid template or headers)
//! - Transport failures (DNS, connection, timeout)
//! - Remote errors (non-2xx responses)
//! - Invalid (non-JSON) response bodies
//! - Extraction failures (no response path resolved)
//! - Empty responses after normalization and stripping
//!
//! # Error Handling Example
//!
//! ```rust,no_run
//! use cloud_report::{ReportError, error::ErrorCategory};
//!
//! fn handle_error(err: ReportError) {
//!     if err.is_retryable() {
//!         println!("Retryable error: {}", err);
//!     }
//!
//!     match err.category() {
//!         ErrorCategory::Transient => println!("Temporary issue, try again later"),
//!         ErrorCategory::Client => println!("Fix the configuration and try again"),
//!         ErrorCategory::External => println!("The report API misbehaved"),
//!     }
//! }
//! ```

use crate::logging::{log_error, log_warn};
use thiserror::Error;

// ============================================================================
// Error categorization types
// ============================================================================

/// High-level categorization of errors for routing and handling decisions.
///
/// Use [`ReportError::category()`] to get the category for any error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// External service failures (bad status, unexpected response shape).
    External,

    /// Client errors (missing or malformed configuration).
    ///
    /// The operator can fix these by changing the `REPORT_*` settings.
    Client,

    /// Temporary failures that may succeed when retried.
    Transient,
}

/// Severity level for logging and alerting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Action failed but system is stable.
    Error,

    /// Unexpected but recoverable situation.
    Warning,
}

// ============================================================================
// Report error types
// ============================================================================

/// Convenient result type for report operations.
pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while generating a report.
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `ConfigurationError` | Client | No |
/// | `TransportError` | Transient | Yes |
/// | `RemoteError` | External | Yes |
/// | `InvalidResponseError` | External | No |
/// | `ExtractionError` | Client | No |
/// | `EmptyResponseError` | External | No |
#[derive(Error, Debug)]
pub enum ReportError {
    /// Static configuration is missing or malformed.
    #[error("Report API configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// The HTTP exchange could not be completed (DNS, connection, timeout).
    #[error("Cloud API request failed: {message}")]
    TransportError {
        /// Description of the failure.
        message: String,
        /// Whether the configured timeout elapsed.
        timed_out: bool,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The API answered with a non-2xx status.
    #[error("Cloud API HTTP {status}: {body}")]
    RemoteError {
        /// HTTP status code.
        status: u16,
        /// Response body, or the read error's text when the body was unreadable.
        body: String,
    },

    /// The API answered with a body that is not JSON.
    #[error("Cloud API returned non-JSON response: {body_preview}")]
    InvalidResponseError {
        /// First 500 characters of the raw body.
        body_preview: String,
        /// Decoder message.
        message: String,
    },

    /// None of the candidate response paths resolved.
    #[error(
        "Unable to extract model output from response paths: [{}]. Last error: {last_error}",
        .attempted_paths.join(", ")
    )]
    ExtractionError {
        /// Every path that was tried, in order.
        attempted_paths: Vec<String>,
        /// The error from the final attempt.
        last_error: String,
    },

    /// The extracted text was empty after normalization and stripping.
    #[error("Cloud API returned empty content after filtering")]
    EmptyResponseError,
}

impl ReportError {
    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError { .. } => ErrorCategory::Client,
            Self::TransportError { .. } => ErrorCategory::Transient,
            Self::RemoteError { .. } => ErrorCategory::External,
            Self::InvalidResponseError { .. } => ErrorCategory::External,
            Self::ExtractionError { .. } => ErrorCategory::Client,
            Self::EmptyResponseError => ErrorCategory::External,
        }
    }

    /// Get the error severity for logging and alerting.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigurationError { .. } => ErrorSeverity::Error,
            Self::TransportError { .. } => ErrorSeverity::Warning,
            Self::RemoteError { .. } => ErrorSeverity::Error,
            Self::InvalidResponseError { .. } => ErrorSeverity::Warning,
            Self::ExtractionError { .. } => ErrorSeverity::Error,
            Self::EmptyResponseError => ErrorSeverity::Warning,
        }
    }

    /// Whether the caller may retry the same call.
    ///
    /// Returns `true` for transport failures and non-2xx responses. The client
    /// never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportError { .. } | Self::RemoteError { .. })
    }

    /// Convert to a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError { .. } => {
                "Report API configuration issue. Please check your REPORT_* settings".to_string()
            }
            Self::TransportError {
                timed_out: true, ..
            } => "The report service timed out. Please try again".to_string(),
            Self::TransportError { .. } => {
                "Unable to reach the report service. Please try again".to_string()
            }
            Self::RemoteError { status, .. } => {
                format!("The report service rejected the request (HTTP {status})")
            }
            Self::InvalidResponseError { .. } => {
                "Received an invalid response from the report service".to_string()
            }
            Self::ExtractionError { .. } => {
                "Could not find the report text in the service response".to_string()
            }
            Self::EmptyResponseError => "The report service returned an empty report".to_string(),
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "Report API configuration invalid"
        );
        Self::ConfigurationError { message }
    }

    pub fn transport_error(
        message: impl Into<String>,
        timed_out: bool,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "transport_error",
            message = %message,
            timed_out = timed_out,
            has_source = source.is_some(),
            "Report API request did not complete"
        );
        Self::TransportError {
            message,
            timed_out,
            source,
        }
    }

    pub fn remote_error(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        log_error!(
            error_type = "remote_error",
            status = status,
            body_length = body.len(),
            "Report API returned an error status"
        );
        Self::RemoteError { status, body }
    }

    /// Create an invalid response error, keeping the first 500 characters of `raw_body`.
    pub fn invalid_response(raw_body: &str, message: impl Into<String>) -> Self {
        let body_preview: String = raw_body.chars().take(500).collect();
        let message = message.into();
        log_warn!(
            error_type = "invalid_response",
            message = %message,
            body_length = raw_body.len(),
            "Report API response is not JSON"
        );
        Self::InvalidResponseError {
            body_preview,
            message,
        }
    }

    pub fn extraction_error(attempted_paths: Vec<String>, last_error: impl Into<String>) -> Self {
        let last_error = last_error.into();
        log_error!(
            error_type = "extraction_error",
            attempted = attempted_paths.len(),
            last_error = %last_error,
            "No response path resolved against the report API response"
        );
        Self::ExtractionError {
            attempted_paths,
            last_error,
        }
    }

    pub fn empty_response() -> Self {
        log_warn!(
            error_type = "empty_response",
            "Report API returned empty content after filtering"
        );
        Self::EmptyResponseError
    }
}
