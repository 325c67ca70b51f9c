//! Best-effort text extraction over heterogeneous response envelopes.
//!
//! Model responses arrive in a handful of shapes: a `content` field holding a
//! list of typed blocks, a map, or a bare string; the same nested under the
//! first entry of a `messages` array; or, abnormally, a bare list. The shape is
//! decoded once into a small union and text extraction is a pure match over it.
//! Extraction is total: no input shape produces an error, and anything
//! unrecognized degrades to stringifying the whole envelope.

use serde_json::{Map, Value};

/// The bounded set of `content` shapes seen in practice.
enum ContentShape<'a> {
    Blocks(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    Scalar(&'a Value),
}

fn classify(content: &Value) -> ContentShape<'_> {
    match content {
        Value::Array(blocks) => ContentShape::Blocks(blocks),
        Value::Object(map) => ContentShape::Mapping(map),
        other => ContentShape::Scalar(other),
    }
}

/// Stringify a JSON value the way a human would read it: bare strings lose
/// their quotes, everything else is compact JSON.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_of(shape: ContentShape<'_>, envelope: &Value) -> String {
    match shape {
        ContentShape::Blocks(blocks) => match blocks.first() {
            None => String::new(),
            Some(block) => match block.get("text") {
                Some(Value::String(text)) => text.clone(),
                // First block has no text field: nothing sensible to pick,
                // degrade to the whole envelope
                _ => value_to_string(envelope),
            },
        },
        ContentShape::Mapping(map) => match map.get("text") {
            Some(Value::String(text)) => text.clone(),
            _ => String::new(),
        },
        ContentShape::Scalar(value) => value_to_string(value),
    }
}

/// Extract the single best-effort text string from a response envelope.
///
/// Lookup order: `content` on the envelope, then `messages[0].content`, then a
/// bare-list envelope's first element (`text` or `content` field), then the
/// stringified envelope itself.
pub fn extract_text(envelope: &Value) -> String {
    if let Some(obj) = envelope.as_object() {
        if let Some(content) = obj.get("content") {
            return text_of(classify(content), envelope);
        }

        if let Some(Value::Array(messages)) = obj.get("messages")
            && let Some(first) = messages.first()
            && let Some(content) = first.get("content")
        {
            return text_of(classify(content), envelope);
        }
    }

    if let Some(items) = envelope.as_array()
        && let Some(first) = items.first()
    {
        if let Some(Value::String(text)) = first.get("text") {
            return text.clone();
        }
        if let Some(content) = first.get("content") {
            return value_to_string(content);
        }
    }

    value_to_string(envelope)
}
