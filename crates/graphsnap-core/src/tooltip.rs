//! Plain-text hover tooltips for visualization nodes.
//!
//! Content nodes (posts, episodes, talks) tend to carry a description, some
//! publishing metadata and engagement counters. The tooltip lists whichever of
//! these a node has, one item per line.

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use crate::label::display_text;

const DESCRIPTION_MAX_CHARS: usize = 280;

const DESCRIPTION_KEYS: &[&str] = &["description", "summary"];
const CATEGORY_KEYS: &[&str] = &["category", "track"];
const URL_KEYS: &[&str] = &["url", "link"];
const DATE_KEYS: &[&str] = &["published_at", "publishedAt", "publish_date", "publishDate", "date"];

/// Engagement counters, in display order.
const METRICS: &[(&str, &str)] = &[
    ("impressions", "Impressions"),
    ("reach", "Reach"),
    ("reactions", "Reactions"),
    ("comments", "Comments"),
];

/// Build the tooltip for a node from its rendered label, group and properties.
pub fn build_tooltip(label: &str, group: &str, properties: &Map<String, Value>) -> String {
    let mut lines = vec![label.replace('\n', " "), group.to_string()];

    if let Some(description) = first_text(properties, DESCRIPTION_KEYS) {
        lines.push(truncate(&description, DESCRIPTION_MAX_CHARS));
    }
    if let Some(category) = first_text(properties, CATEGORY_KEYS) {
        lines.push(format!("Category: {}", category));
    }

    let platform = first_text(properties, &["platform"]).map(|p| format!("Platform: {}", p));
    let series = first_text(properties, &["series"]).map(|s| format!("Series: {}", s));
    let source: Vec<String> = platform.into_iter().chain(series).collect();
    if !source.is_empty() {
        lines.push(source.join(" | "));
    }

    if let Some(date) = first_text(properties, DATE_KEYS) {
        lines.push(format!("Published: {}", format_date(&date)));
    }
    if let Some(url) = first_text(properties, URL_KEYS) {
        lines.push(format!("URL: {}", url));
    }

    let metrics: Vec<String> = METRICS
        .iter()
        .filter_map(|(key, name)| {
            preferred_metric(properties, key).map(|(value, window)| match window {
                Some(window) => format!("{} ({}): {}", name, window, format_count(value)),
                None => format!("{}: {}", name, format_count(value)),
            })
        })
        .collect();
    if !metrics.is_empty() {
        lines.push(metrics.join(" | "));
    }

    lines.join("\n")
}

fn first_text(properties: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| properties.get(*key).and_then(display_text))
}

/// Find a metric value, preferring the 7-day window over the 1-day window
/// over the unwindowed counter.
fn preferred_metric(properties: &Map<String, Value>, metric: &str) -> Option<(f64, Option<&'static str>)> {
    let candidates = [
        (format!("{}_7d", metric), Some("7d")),
        (format!("{}7d", metric), Some("7d")),
        (format!("{}_1d", metric), Some("1d")),
        (format!("{}1d", metric), Some("1d")),
        (metric.to_string(), None),
    ];

    candidates
        .into_iter()
        .find_map(|(key, window)| properties.get(&key).and_then(as_number).map(|v| (v, window)))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Format a count with thousands separators, e.g. `12345` -> `12,345`.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if negative {
        format!("-{}", out)
    } else {
        out
    }
}

/// Render a publish date as `Mar 5, 2024`; unparseable input is returned as is.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %-d, %Y").to_string();
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}
