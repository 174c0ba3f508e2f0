//! Removal of reasoning ("thinking") annotations from model output.
//!
//! Rules are applied one after another in the order listed, so a match that
//! would only exist across two rules is not caught within a single pass. Whole
//! passes repeat until the text stops changing.

use crate::logging::{log_debug, log_warn};
use once_cell::sync::Lazy;
use regex::Regex;

struct StripRule {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

const RULE_SOURCES: [(&str, &str, &str); 5] = [
    ("think_tag", r"(?i)<think>[\s\S]*?</think>", ""),
    ("reasoning_tag", r"(?i)<reasoning>[\s\S]*?</reasoning>", ""),
    (
        "reasoning_fence",
        r"(?i)```(?:think|thinking|reasoning)[\s\S]*?```",
        "",
    ),
    (
        "reasoning_line",
        r"(?im)^\s*(?:reasoning|thought|thinking)\s*:\s*.*$",
        "",
    ),
    ("blank_runs", r"\n{3,}", "\n\n"),
];

static STRIP_RULES: Lazy<Vec<StripRule>> = Lazy::new(|| {
    RULE_SOURCES
        .iter()
        .filter_map(|&(name, source, replacement)| match Regex::new(source) {
            Ok(pattern) => Some(StripRule {
                name,
                pattern,
                replacement,
            }),
            Err(e) => {
                log_warn!(rule = name, error = %e, "Skipping invalid think-strip rule");
                None
            }
        })
        .collect()
});

/// Strips think/reasoning blocks from normalized text.
pub struct ThinkBlockStripper;

impl ThinkBlockStripper {
    /// Remove reasoning spans, fences and prefixed lines, collapse runs of
    /// blank lines and trim. `strip(strip(s)) == strip(s)`.
    pub fn strip(text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = Self::single_pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn single_pass(text: &str) -> String {
        let mut out = text.to_string();
        for rule in STRIP_RULES.iter() {
            let replaced = rule.pattern.replace_all(&out, rule.replacement);
            if replaced != out {
                log_debug!(
                    rule = rule.name,
                    before = out.len(),
                    after = replaced.len(),
                    "Applied think-strip rule"
                );
                out = replaced.into_owned();
            }
        }
        out.trim().to_string()
    }
}
