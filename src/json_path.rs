//! Dotted-path navigation into decoded JSON values.
//!
//! A path such as `choices.0.message.content` is split on `.`; a segment is
//! used as a sequence index when the current value is an array and as a key
//! when it is an object.

use serde_json::Value;
use thiserror::Error;

/// Failure to follow a dotted path, naming the segment that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathResolutionError {
    #[error("segment {segment:?} is not a valid sequence index")]
    InvalidIndex { segment: String },
    #[error("index {segment} out of range for sequence of length {len}")]
    IndexOutOfRange { segment: String, len: usize },
    #[error("key {segment:?} not found")]
    MissingKey { segment: String },
    #[error("cannot navigate segment {segment:?} on {kind} value")]
    NotNavigable { segment: String, kind: &'static str },
}

impl PathResolutionError {
    /// The path segment at which navigation failed.
    pub fn segment(&self) -> &str {
        match self {
            Self::InvalidIndex { segment }
            | Self::IndexOutOfRange { segment, .. }
            | Self::MissingKey { segment }
            | Self::NotNavigable { segment, .. } => segment,
        }
    }
}

/// Resolve `path` inside `data`. An empty path yields `data` itself.
pub fn resolve<'a>(data: &'a Value, path: &str) -> Result<&'a Value, PathResolutionError> {
    if path.is_empty() {
        return Ok(data);
    }

    path.split('.')
        .try_fold(data, |current, segment| step(current, segment))
}

fn step<'a>(current: &'a Value, segment: &str) -> Result<&'a Value, PathResolutionError> {
    match current {
        Value::Array(items) => {
            let index: usize = segment
                .parse()
                .map_err(|_| PathResolutionError::InvalidIndex {
                    segment: segment.to_string(),
                })?;
            items
                .get(index)
                .ok_or_else(|| PathResolutionError::IndexOutOfRange {
                    segment: segment.to_string(),
                    len: items.len(),
                })
        }
        Value::Object(map) => map
            .get(segment)
            .ok_or_else(|| PathResolutionError::MissingKey {
                segment: segment.to_string(),
            }),
        scalar => Err(PathResolutionError::NotNavigable {
            segment: segment.to_string(),
            kind: kind_name(scalar),
        }),
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
