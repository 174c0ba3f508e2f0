//! Test helper utilities shared across unit test modules.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

#![allow(dead_code)]

use crate::config::ReportConfig;
use std::collections::HashMap;

/// A complete configuration pointing at `api_url`.
pub fn create_test_config(api_url: &str) -> ReportConfig {
    let mut config = ReportConfig::new(api_url);
    config.api_key = Some("test-key".to_string());
    config.api_model = Some("demo".to_string());
    config
}

/// Lookup function backed by a fixed set of variables.
pub fn env_lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

/// A report body that contains every required section.
pub fn complete_report(date: &str) -> String {
    format!(
        "# Daily Report - {date}\n\n## What I Did Today\n- x\n## Problems / Blockers\n- x\n\
         ## Root Cause\n- x\n## Attempts & Fixes\n- x\n## Key Learnings\n- x\n\
         ## Metrics\n- x\n## Next Steps (Tomorrow)\n- [ ] x"
    )
}
