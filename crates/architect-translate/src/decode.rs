//! Extraction and repair of a single JSON object from free-form response text.
//!
//! The decoder strips a code fence, slices the outermost object, neutralizes
//! forbidden fields and then walks a fixed repair ladder. Each rung only
//! removes or normalizes text; none of them invents content.

use serde_json::{Map, Value};
use thiserror::Error;

/// Raw shape references that must never come back from the service. They may
/// carry large unescaped payloads.
pub const FORBIDDEN_FIELDS: &[&str] = &["textureUrl"];

/// Field carrying generated markup. Requested as the last field of the response.
pub const INLINE_PAYLOAD_FIELD: &str = "customSVG";

/// Value written over forbidden fields before parsing.
const REMOVED_PLACEHOLDER: &str = "REMOVED";

/// Characters of the raw response kept for diagnostics.
const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("no object found in response")]
    NoObject,
    #[error("response could not be repaired ({reason}): {excerpt}")]
    Unrepairable { reason: String, excerpt: String },
}

/// A repair rung: rewrites the sanitized text, or returns `None` when it does
/// not apply.
type Repair = fn(&str) -> Option<String>;

/// Tried in order after the direct parse fails.
const REPAIR_LADDER: &[(&str, Repair)] = &[
    ("truncate inline payload", truncate_inline_payload),
    ("flatten line breaks", flatten_line_breaks),
];

/// Decode a response into a JSON object, repairing it when needed.
pub fn decode(raw: &str) -> Result<Map<String, Value>, DecodeError> {
    let candidate = strip_fence(raw).unwrap_or(raw);
    let span = object_span(candidate).ok_or(DecodeError::NoObject)?;
    let sanitized = sanitize_forbidden_fields(span);

    let mut reason = match parse_object(&sanitized) {
        Ok(object) => return Ok(strip_forbidden_keys(object)),
        Err(e) => e,
    };
    log::warn!("Initial response parse failed ({reason}), attempting repairs");

    for (name, repair) in REPAIR_LADDER {
        let Some(patched) = repair(&sanitized) else {
            log::debug!("Repair '{name}' not applicable");
            continue;
        };
        match parse_object(&patched) {
            Ok(object) => {
                log::info!("Response recovered by repair '{name}'");
                return Ok(strip_forbidden_keys(object));
            }
            Err(e) => {
                log::warn!("Repair '{name}' failed: {e}");
                reason = e;
            }
        }
    }

    let excerpt = excerpt(raw);
    log::error!("Response parse failed after all repairs. Snippet: {excerpt}");
    Err(DecodeError::Unrepairable { reason, excerpt })
}

/// Interior of the first fenced code block, if the text has one.
fn strip_fence(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let mut body = &text[open + 3..];
    if body.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
        body = &body[4..];
    }
    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// From the first `{` to the last `}` inclusive.
fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_object(text: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("top-level value is not an object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn strip_forbidden_keys(mut object: Map<String, Value>) -> Map<String, Value> {
    for field in FORBIDDEN_FIELDS {
        if object.remove(*field).is_some() {
            log::warn!("Dropped forbidden field '{field}' from response");
        }
    }
    object
}

fn sanitize_forbidden_fields(text: &str) -> String {
    FORBIDDEN_FIELDS
        .iter()
        .fold(text.to_string(), |acc, field| neutralize_field(&acc, field))
}

/// Replace every `"field": <value>` with a placeholder value, keeping the
/// delimiter that ended the original value.
fn neutralize_field(text: &str, field: &str) -> String {
    let key = format!("\"{field}\"");
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(&key) {
        let after_key = &rest[pos + key.len()..];
        let value = after_key.trim_start().strip_prefix(':');
        match value.and_then(|v| value_end(v).map(|end| &v[end..])) {
            Some(tail) => {
                out.push_str(&rest[..pos]);
                out.push_str(&format!("\"{field}\": \"{REMOVED_PLACEHOLDER}\""));
                rest = tail;
            }
            None => {
                out.push_str(&rest[..pos + key.len()]);
                rest = after_key;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Offset of the `,`, `}` or line break that ends a field value. A leading
/// string literal, object or array is skipped whole when it is terminated.
fn value_end(value: &str) -> Option<usize> {
    let from = string_literal_end(value)
        .or_else(|| container_end(value))
        .unwrap_or(0);
    value[from..].find([',', '}', '\n']).map(|i| from + i)
}

/// Offset just past the bracket closing an object or array at the start of
/// `value`. Brackets inside string literals do not count.
fn container_end(value: &str) -> Option<usize> {
    let lead = value.len() - value.trim_start().len();
    let body = &value[lead..];
    if !body.starts_with(['{', '[']) {
        return None;
    }
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(lead + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Offset just past the closing quote of a string literal at the start of `value`.
fn string_literal_end(value: &str) -> Option<usize> {
    let lead = value.len() - value.trim_start().len();
    let mut chars = value[lead..].char_indices();
    if chars.next()?.1 != '"' {
        return None;
    }
    let mut escaped = false;
    for (i, c) in chars {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(lead + i + 1),
            _ => {}
        }
    }
    None
}

/// Cut at the comma before the inline payload field and close the object.
///
/// Not applicable when the field is missing or is the first field: cutting
/// there would leave an empty object.
fn truncate_inline_payload(text: &str) -> Option<String> {
    let key = format!("\"{INLINE_PAYLOAD_FIELD}\"");
    let key_pos = text.find(&key)?;
    let before = text[..key_pos].trim_end().strip_suffix(',')?;
    Some(format!("{before}\n}}"))
}

/// Collapse each run of line breaks into a single space.
fn flatten_line_breaks(text: &str) -> Option<String> {
    if !text.contains(['\r', '\n']) {
        return None;
    }
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for c in text.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
            }
            in_break = true;
        } else {
            out.push(c);
            in_break = false;
        }
    }
    Some(out)
}

fn excerpt(raw: &str) -> String {
    let mut excerpt: String = raw.chars().take(EXCERPT_CHARS).collect();
    if raw.chars().nth(EXCERPT_CHARS).is_some() {
        excerpt.push_str("...");
    }
    excerpt
}
