//! Collapse an extracted response value into plain text.
//!
//! Providers surface the answer under different keys, and some put a raw
//! reasoning trace next to the final answer. The priority lists below make the
//! final answer win deterministically.

use serde_json::{Map, Value};

/// Object keys that carry the answer, highest priority first.
pub const ANSWER_FIELDS: [&str; 5] = ["final", "answer", "output_text", "text", "content"];

/// Content-block `type` values that mark reasoning rather than answer text.
pub const REASONING_BLOCK_TYPES: [&str; 3] = ["reasoning", "thought", "thinking"];

/// Turns arbitrary response values into a single string.
#[derive(Debug, Clone, Copy)]
pub struct ResponseNormalizer {
    skip_reasoning_blocks: bool,
}

impl ResponseNormalizer {
    /// `skip_reasoning_blocks` follows the `strip_think_blocks` setting.
    pub fn new(skip_reasoning_blocks: bool) -> Self {
        Self {
            skip_reasoning_blocks,
        }
    }

    /// Normalize `value` to text. Never fails; an object with no known field
    /// falls back to its compact JSON form.
    pub fn normalize(&self, value: &Value) -> String {
        match value {
            Value::Array(blocks) => self.join_blocks(blocks),
            Value::Object(map) => self.normalize_object(map),
            scalar => scalar_text(scalar).trim().to_string(),
        }
    }

    fn join_blocks(&self, blocks: &[Value]) -> String {
        let chunks: Vec<String> = blocks
            .iter()
            .filter_map(|block| self.block_text(block))
            .filter(|chunk| !chunk.is_empty())
            .collect();

        chunks.join("\n").trim().to_string()
    }

    fn block_text(&self, block: &Value) -> Option<String> {
        let Value::Object(fields) = block else {
            return Some(self.field_text(block));
        };

        if self.skip_reasoning_blocks && is_reasoning_block(fields) {
            return None;
        }

        fields
            .get("text")
            .or_else(|| fields.get("content"))
            .map(|value| self.field_text(value))
    }

    fn field_text(&self, value: &Value) -> String {
        match value {
            Value::Array(_) | Value::Object(_) => self.normalize(value),
            scalar => scalar_text(scalar),
        }
    }

    fn normalize_object(&self, map: &Map<String, Value>) -> String {
        let preferred = ANSWER_FIELDS
            .iter()
            .chain(std::iter::once(&"message"))
            .find_map(|key| map.get(*key).filter(|value| has_content(value)));

        match preferred {
            Some(value) => self.normalize(value),
            None => Value::Object(map.clone()).to_string(),
        }
    }
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new(true)
    }
}

fn is_reasoning_block(fields: &Map<String, Value>) -> bool {
    fields
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .is_some_and(|kind| REASONING_BLOCK_TYPES.contains(&kind.as_str()))
}

/// Present and neither null nor the empty string.
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
