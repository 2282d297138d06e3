//! Segment formatting: turning arbitrary loggable values into log segments.

use serde_json::Value;

use crate::card::{Card, CardField, ErrorDetails};
use crate::level::LogLevel;
use crate::text::bulletize;

/// Values shorter than this render their card field inline (side by side).
const INLINE_THRESHOLD: usize = 30;

/// One formatted unit of a log call: either plain text or a card.
#[derive(Clone, Debug, PartialEq)]
pub enum LogSegment {
    Text(String),
    Card(Card),
}

impl LogSegment {
    pub fn is_card(&self) -> bool {
        matches!(self, LogSegment::Card(_))
    }
}

/// Anything a caller can pass to a log call.
#[derive(Clone, Debug)]
pub enum LogValue {
    Text(String),
    Object(Value),
    Error(ErrorDetails),
    Card(Card),
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::Text(s.to_string())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::Text(s)
    }
}

impl From<i64> for LogValue {
    fn from(n: i64) -> Self {
        LogValue::Text(n.to_string())
    }
}

impl From<f64> for LogValue {
    fn from(n: f64) -> Self {
        LogValue::Text(n.to_string())
    }
}

impl From<Value> for LogValue {
    fn from(v: Value) -> Self {
        LogValue::Object(v)
    }
}

impl From<ErrorDetails> for LogValue {
    fn from(e: ErrorDetails) -> Self {
        LogValue::Error(e)
    }
}

impl From<Card> for LogValue {
    fn from(c: Card) -> Self {
        LogValue::Card(c)
    }
}

/// Formats a single loggable value into a segment.
///
/// Strings and numbers stay plain text unless the level promotes them to a
/// card; structured objects and errors always become cards. Pure function of
/// its inputs plus the fixed level table.
pub fn format_value(value: &LogValue, level: LogLevel) -> LogSegment {
    match value {
        LogValue::Text(s) => {
            if level.force_card() {
                LogSegment::Card(Card::from_text(s).with_color(level.color()))
            } else {
                LogSegment::Text(s.clone())
            }
        }
        LogValue::Object(v) => LogSegment::Card(object_card(v).with_color(level.color())),
        LogValue::Error(details) => {
            LogSegment::Card(Card::for_error(details, "An error has occurred").with_color(level.color()))
        }
        LogValue::Card(card) => LogSegment::Card(card.clone()),
    }
}

/// Formats a whole log call's values in order.
pub fn format_values(values: &[LogValue], level: LogLevel) -> Vec<LogSegment> {
    values.iter().map(|v| format_value(v, level)).collect()
}

/// Card for a plain structured object: one field per key, short values inline.
fn object_card(value: &Value) -> Card {
    let mut card = Card::new();
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let rendered = render_value(val);
                let inline = rendered.chars().count() < INLINE_THRESHOLD;
                card.add_field(&format!("`{key}`"), &rendered, inline);
            }
        }
        other => {
            card = card.with_description(&render_value(other));
        }
    }
    card
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Renders a segment as plain text for the local console.
pub fn render_plain(segment: &LogSegment) -> String {
    match segment {
        LogSegment::Text(s) => s.clone(),
        LogSegment::Card(card) => render_card_plain(card),
    }
}

fn render_card_plain(card: &Card) -> String {
    let mut lines: Vec<String> = Vec::new();
    if let Some(title) = &card.title {
        lines.push(title.clone());
    }
    if let Some(description) = &card.description {
        lines.push(description.clone());
    }
    for CardField { name, value, .. } in &card.fields {
        lines.push(bulletize(&format!("{name}: {value}")));
    }
    lines.join("\n")
}
