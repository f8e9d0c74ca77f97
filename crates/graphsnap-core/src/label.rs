//! Node display labels.

use serde_json::{Map, Value};

/// Labels longer than this are wrapped onto several lines.
pub const WRAP_WIDTH: usize = 30;

/// Properties tried, in order, for a node's display text.
const LABEL_KEYS: &[&str] = &["title", "name", "id"];

/// Pick the display label for a node and wrap it if it is long.
pub fn node_label(properties: &Map<String, Value>, group: &str) -> String {
    let text = LABEL_KEYS
        .iter()
        .find_map(|key| properties.get(*key).and_then(display_text))
        .unwrap_or_else(|| group.to_string());

    if text.chars().count() > WRAP_WIDTH {
        wrap_label(&text, WRAP_WIDTH)
    } else {
        text
    }
}

/// Render a property value as label text; `None` for null, empty or
/// structured values.
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Greedily wrap `text` on single spaces.
///
/// A new line starts when appending the next word would push the current
/// line past `width`. Words are never split, so a single word longer than
/// `width` ends up on a line of its own.
pub fn wrap_label(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else if current.is_empty() {
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}
