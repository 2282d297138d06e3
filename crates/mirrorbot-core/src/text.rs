//! Text truncation and normalization helpers.
//!
//! The chat platform enforces hard per-field length limits on cards, so long
//! strings have to be cut down before they go out. Cutting prefers natural
//! boundaries (paragraphs, then lines) over a mid-word chop, and always leaves
//! a marker so the reader knows content was dropped.

use regex::Regex;

/// Marker appended wherever content was cut.
pub const CUT_MARKER: &str = "[...]";

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Limits a string to a specific length. Adds an ellipsis if it exceeds.
pub fn limit_string(s: &str, limit: usize) -> String {
    if char_len(s) > limit {
        format!("{}...", take_chars(s, limit.saturating_sub(3)))
    } else {
        s.to_string()
    }
}

/// Cuts a long string down to roughly `max` characters, removing whole lines.
///
/// The cut point drops the trailing partial line so we don't end on half a
/// sentence.
pub fn limit_string_sentence(s: &str, max: usize) -> String {
    if char_len(s) < max {
        return s.to_string();
    }

    let limited = take_chars(s, max);
    let mut lines: Vec<&str> = limited.split('\n').collect();
    lines.pop();
    let kept = lines.join("\n").trim().to_string();

    if kept.is_empty() {
        // Single very long line: nothing to cut along, chop it.
        return format!("{} {CUT_MARKER}", limited.trim_end());
    }
    format!("{kept}\n{CUT_MARKER}")
}

/// Cuts a long string down to `max ± tolerance` characters, going by
/// paragraphs.
///
/// Paragraphs are removed from the end until the remainder lands inside the
/// tolerance band. Overshooting below the band re-adds the last paragraph and
/// hard-cuts instead, so the result never comes out much too short.
pub fn limit_string_paragraph(s: &str, max: usize, tolerance: usize) -> String {
    let low = max.saturating_sub(tolerance);
    let high = max + tolerance;

    // Already within tolerance: leave it.
    if char_len(s) < high {
        return s.to_string();
    }

    let mut bits: Vec<&str> = s.split("\n\n").collect();
    if bits.len() == 1 {
        return limit_string_sentence(s, max);
    }

    while let Some(item) = bits.pop() {
        let remainder = bits.join("\n\n");
        let len = char_len(&remainder);
        // The blank line before the marker counts against the upper bound too;
        // total output stays within max + tolerance + the marker itself.
        if len > low && len + 2 <= high {
            return format!("{remainder}\n\n{CUT_MARKER}");
        }
        if len <= low {
            // Dropped too much; put the paragraph back and cut mid-text.
            let rejoined = format!("{remainder}\n\n{item}");
            return format!("{} {CUT_MARKER}", take_chars(&rejoined, max));
        }
    }

    format!("{} {CUT_MARKER}", take_chars(s, max))
}

/// Removes the common leading indentation from a multiline string and trims it.
///
/// Used to make indented inline SQL readable in log output.
pub fn dedent(s: &str) -> String {
    if !s.contains('\n') {
        return s.trim().to_string();
    }

    let indent_re = Regex::new(r"^\s+").expect("valid regex");
    let detect = |line: &str| {
        indent_re
            .find(line)
            .map(|m| m.as_str().chars().count())
            .unwrap_or(0)
    };

    // Drop only the initial lines that are pure whitespace; interior blank
    // lines stay where they are.
    let mut seen_content = false;
    let lines: Vec<&str> = s
        .trim_end()
        .split('\n')
        .filter(|line| {
            if !seen_content && line.trim().is_empty() {
                return false;
            }
            seen_content = true;
            true
        })
        .collect();

    let indent = lines.iter().map(|l| detect(l)).min().unwrap_or(0);
    lines
        .iter()
        .map(|line| line.chars().skip(indent).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Prefixes a string with a bullet character.
pub fn bulletize(s: &str) -> String {
    format!("• {}", s.trim())
}

/// Prefixes every string in a list with a bullet character.
pub fn bulletize_list(items: &[String]) -> String {
    items.iter().map(|s| bulletize(s)).collect::<Vec<_>>().join("\n")
}
