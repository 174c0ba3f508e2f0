// Unit Tests for Report API Configuration
//
// UNIT UNDER TEST: ReportConfig
//
// BUSINESS RESPONSIBILITY:
//   - Loads the REPORT_* settings with their documented defaults
//   - Treats empty values as unset
//   - Rejects missing URLs, bad timeouts and malformed header JSON up front
//
// TEST COVERAGE:
//   - Defaults when only REPORT_API_URL is set
//   - Response path precedence (plural over legacy singular)
//   - Boolean-ish strip flag parsing
//   - Real environment loading (serialized)

use crate::config::{parse_flag, split_paths, ReportConfig};
use crate::error::ReportError;
use crate::report::DEFAULT_SYSTEM_PROMPT;
use crate::tests::helpers::env_lookup;

const URL: &str = "https://api.example.com/v1/chat/completions";

#[cfg(test)]
mod from_lookup_tests {
    use super::*;

    #[test]
    fn test_defaults_with_only_url() {
        let config = ReportConfig::from_lookup(env_lookup(&[("REPORT_API_URL", URL)])).unwrap();

        assert_eq!(config.api_url, URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_model, None);
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.response_paths, vec!["choices.0.message.content"]);
        assert_eq!(config.auth_header_name, "Authorization");
        assert_eq!(config.auth_scheme, "Bearer");
        assert!(config.extra_headers.is_empty());
        assert_eq!(config.request_template, None);
        assert!(config.strip_think_blocks);
        assert_eq!(config.system_prompt(), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_missing_url_is_configuration_error() {
        let err = ReportConfig::from_lookup(env_lookup(&[("REPORT_API_KEY", "k")])).unwrap_err();
        match err {
            ReportError::ConfigurationError { message } => {
                assert!(message.contains("REPORT_API_URL"));
            }
            other => panic!("Expected ConfigurationError, got: {:?}", other),
        }
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = ReportConfig::from_lookup(env_lookup(&[
            ("REPORT_API_URL", URL),
            ("REPORT_API_KEY", ""),
            ("REPORT_API_MODEL", "   "),
            ("REPORT_API_TIMEOUT", ""),
            ("REPORT_API_AUTH_SCHEME", ""),
            ("REPORT_STRIP_THINK", ""),
        ]))
        .unwrap();

        assert_eq!(config.api_key, None);
        assert_eq!(config.api_model, None);
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.auth_scheme, "Bearer");
        assert!(config.strip_think_blocks);
    }

    #[test]
    fn test_empty_url_is_configuration_error() {
        let err = ReportConfig::from_lookup(env_lookup(&[("REPORT_API_URL", "")])).unwrap_err();
        assert!(matches!(err, ReportError::ConfigurationError { .. }));
    }

    #[test]
    fn test_all_settings_loaded() {
        let config = ReportConfig::from_lookup(env_lookup(&[
            ("REPORT_API_URL", URL),
            ("REPORT_API_KEY", "secret"),
            ("REPORT_API_MODEL", "demo"),
            ("REPORT_API_TIMEOUT", "30"),
            ("REPORT_API_AUTH_HEADER", "x-api-key"),
            ("REPORT_API_AUTH_SCHEME", "Token"),
            ("REPORT_API_EXTRA_HEADERS_JSON", r#"{"X-Team": "notes"}"#),
            ("REPORT_API_REQUEST_TEMPLATE_JSON", r#"{"input": "{{user_prompt}}"}"#),
            ("REPORT_STRIP_THINK", "off"),
            ("REPORT_SYSTEM_PROMPT", "Be brief."),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api_model.as_deref(), Some("demo"));
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.auth_header_name, "x-api-key");
        assert_eq!(config.auth_scheme, "Token");
        assert_eq!(config.extra_headers.get("X-Team").map(String::as_str), Some("notes"));
        assert_eq!(
            config.request_template.as_deref(),
            Some(r#"{"input": "{{user_prompt}}"}"#)
        );
        assert!(!config.strip_think_blocks);
        assert_eq!(config.system_prompt(), "Be brief.");
    }

    #[test]
    fn test_plural_response_paths_take_precedence() {
        let config = ReportConfig::from_lookup(env_lookup(&[
            ("REPORT_API_URL", URL),
            ("REPORT_API_RESPONSE_PATHS", " output.0.text , ,data.text "),
            ("REPORT_API_RESPONSE_PATH", "legacy.path"),
        ]))
        .unwrap();

        assert_eq!(config.response_paths, vec!["output.0.text", "data.text"]);
    }

    #[test]
    fn test_legacy_response_path_used_when_plural_unset() {
        let config = ReportConfig::from_lookup(env_lookup(&[
            ("REPORT_API_URL", URL),
            ("REPORT_API_RESPONSE_PATH", "data.text"),
        ]))
        .unwrap();

        assert_eq!(config.response_paths, vec!["data.text"]);
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        for raw in ["abc", "0", "-5"] {
            let result = ReportConfig::from_lookup(env_lookup(&[
                ("REPORT_API_URL", URL),
                ("REPORT_API_TIMEOUT", raw),
            ]));
            assert!(
                matches!(result, Err(ReportError::ConfigurationError { .. })),
                "timeout {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_extra_headers_rejected() {
        for raw in ["{not json", r#"["a"]"#, r#"{"X-Count": 3}"#] {
            let result = ReportConfig::from_lookup(env_lookup(&[
                ("REPORT_API_URL", URL),
                ("REPORT_API_EXTRA_HEADERS_JSON", raw),
            ]));
            assert!(
                matches!(result, Err(ReportError::ConfigurationError { .. })),
                "extra headers {raw:?} should be rejected"
            );
        }
    }
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        for truthy in ["1", "true", "TRUE", "Yes", "on", " on "] {
            assert!(parse_flag(truthy), "{truthy:?} should be true");
        }
        for falsy in ["0", "false", "no", "off", "maybe"] {
            assert!(!parse_flag(falsy), "{falsy:?} should be false");
        }
    }

    #[test]
    fn test_split_paths() {
        assert_eq!(split_paths("a.b, c ,,d"), vec!["a.b", "c", "d"]);
        assert!(split_paths(" , ").is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(ReportConfig::new(URL).validate().is_ok());
        assert!(ReportConfig::default().validate().is_err());

        let mut config = ReportConfig::new(URL);
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_config_uses_defaults() {
        let config: ReportConfig =
            serde_json::from_str(r#"{"api_url": "https://x", "api_model": "m"}"#).unwrap();
        assert_eq!(config.api_url, "https://x");
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.auth_scheme, "Bearer");
        assert!(config.strip_think_blocks);
    }
}

#[cfg(test)]
mod from_env_tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 12] = [
        "REPORT_API_URL",
        "REPORT_API_KEY",
        "REPORT_API_MODEL",
        "REPORT_API_TIMEOUT",
        "REPORT_API_RESPONSE_PATHS",
        "REPORT_API_RESPONSE_PATH",
        "REPORT_API_AUTH_HEADER",
        "REPORT_API_AUTH_SCHEME",
        "REPORT_API_EXTRA_HEADERS_JSON",
        "REPORT_API_REQUEST_TEMPLATE_JSON",
        "REPORT_STRIP_THINK",
        "REPORT_SYSTEM_PROMPT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_reads_report_variables() {
        // Arrange
        clear_env();
        std::env::set_var("REPORT_API_URL", URL);
        std::env::set_var("REPORT_API_KEY", "k");
        std::env::set_var("REPORT_API_MODEL", "demo");

        // Act
        let config = ReportConfig::from_env().expect("Should load config from env");

        // Assert
        assert_eq!(config.api_url, URL);
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.api_model.as_deref(), Some("demo"));

        // Cleanup
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_requires_url() {
        clear_env();

        let result = ReportConfig::from_env();

        assert!(matches!(result, Err(ReportError::ConfigurationError { .. })));
    }
}
