//! Recovering an Adaptive Card object from free-form LLM replies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static OUTERMOST_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex"));

/// Parses the reply as a JSON object, falling back to the span from the
/// first `{` to the last `}`, then to each balanced `{...}` in turn.
pub fn extract_card_json(raw: &str) -> Option<Value> {
    if let Some(card) = parse_object(raw.trim()) {
        return Some(card);
    }

    if let Some(found) = OUTERMOST_OBJECT.find(raw) {
        if let Some(card) = parse_object(found.as_str()) {
            return Some(card);
        }
    }

    balanced_objects(raw).into_iter().find_map(parse_object)
}

fn parse_object(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Top-level `{...}` spans, skipping braces inside string literals.
fn balanced_objects(raw: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in raw.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        spans.push(&raw[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    spans
}
