//! Daily report prompts and the section skeleton used to keep output well-formed.

use crate::logging::{log_debug, log_warn};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// System prompt sent when `REPORT_SYSTEM_PROMPT` is not set.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a rigorous technical writing assistant.
Turn rough notes into ONE structured daily report in Markdown.

Output requirements:
1) Use this exact section order:
   - ## What I Did Today
   - ## Problems / Blockers
   - ## Root Cause
   - ## Attempts & Fixes
   - ## Key Learnings
   - ## Metrics
   - ## Next Steps (Tomorrow)
2) Keep it concise and factual.
3) If information is missing, write "N/A" for that bullet.
4) Keep language in the same language as input notes when possible.
5) Return only final answer. Do not include reasoning or thinking process.
"#;

/// Section headers a report must contain verbatim, in order.
pub const REQUIRED_SECTIONS: [&str; 7] = [
    "## What I Did Today",
    "## Problems / Blockers",
    "## Root Cause",
    "## Attempts & Fixes",
    "## Key Learnings",
    "## Metrics",
    "## Next Steps (Tomorrow)",
];

/// Where the raw notes came from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Manual,
    Commit,
    Issue,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Manual => write!(f, "manual"),
            SourceType::Commit => write!(f, "commit"),
            SourceType::Issue => write!(f, "issue"),
        }
    }
}

/// Format the user prompt for one day's notes.
pub fn build_user_prompt(
    raw_notes: &str,
    source_type: SourceType,
    source_id: &str,
    date: &str,
) -> String {
    format!(
        "Date: {date}\n\
         Source: {source_type}:{source_id}\n\
         \n\
         Raw notes:\n\
         {raw_notes}\n\
         \n\
         Please generate a structured daily report in Markdown.\n\
         Add a title line at top: '# Daily Report - {date}'.\n\
         Use the required section order exactly.\n\
         Use bullet lists in each section.\n"
    )
}

/// Return `text` unchanged if it has every required section; otherwise wrap it,
/// verbatim, under a skeleton with every section filled with `N/A`.
pub fn ensure_minimum_sections(text: &str, date: &str) -> String {
    let missing: Vec<&str> = REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|section| !text.contains(section))
        .collect();

    if missing.is_empty() {
        return text.to_string();
    }

    log_warn!(
        missing_sections = missing.len(),
        "Model output lacks required sections, wrapping it in the standard skeleton"
    );

    format!(
        "# Daily Report - {date}\n\
         \n\
         ## What I Did Today\n\
         - N/A\n\
         \n\
         ## Problems / Blockers\n\
         - N/A\n\
         \n\
         ## Root Cause\n\
         - N/A\n\
         \n\
         ## Attempts & Fixes\n\
         - N/A\n\
         \n\
         ## Key Learnings\n\
         - N/A\n\
         \n\
         ## Metrics\n\
         - N/A\n\
         \n\
         ## Next Steps (Tomorrow)\n\
         - [ ] N/A\n\
         \n\
         ---\n\
         \n\
         ### Raw Model Output\n\
         {text}\n"
    )
}

/// Write `text` to `path`, creating parent directories and ending the file
/// with a newline.
pub fn write_report(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut contents = text.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }

    std::fs::write(path, &contents)
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    log_debug!(path = %path.display(), bytes = contents.len(), "Report written");
    Ok(())
}
