//! Local console rendering for the log dispatcher.
//!
//! The terminal gets colors and timestamps; none of this styling ever reaches
//! the remote side, which works from the structured segments instead.

use chrono::Local;
use regex::Regex;

use crate::level::LogLevel;
use crate::segment::{format_value, render_plain, LogValue};

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";
const GRAY: &str = "\x1b[90m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Local (always-on) log target.
pub trait ConsoleSink: Send + Sync {
    fn write(&self, level: LogLevel, text: &str);
}

/// Writes to the process terminal; error-level output goes to stderr.
pub struct Terminal;

impl ConsoleSink for Terminal {
    fn write(&self, level: LogLevel, text: &str) {
        if level == LogLevel::Error {
            eprintln!("{text}");
        } else {
            println!("{text}");
        }
    }
}

/// Renders a log call's values to a single plain string.
///
/// Items are separated by a space, except after an item that already ends in
/// a linebreak. No level promotion happens here: the terminal shows text as
/// text, and cards in their plain multiline form.
pub fn render_values(values: &[LogValue]) -> String {
    let rendered: Vec<String> = values
        .iter()
        .map(|v| render_plain(&format_value(v, LogLevel::Regular)))
        .collect();

    let mut out = String::new();
    for (n, item) in rendered.iter().enumerate() {
        out.push_str(item);
        if n != rendered.len() - 1 && !item.ends_with('\n') {
            out.push(' ');
        }
    }
    out
}

/// Adds a timestamp prefix to each line of a log string.
pub fn add_timestamps(s: &str) -> String {
    let date = Local::now().format("%H:%M:%S");
    let prefix = format!("{DIM}[{RESET}{GRAY}{date}{RESET}{DIM}]{RESET}");
    s.split('\n')
        .map(|line| format!("{prefix} {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Adds a `>` quote marker to each line. Used for database query logs.
pub fn add_quotes(s: &str) -> String {
    s.split('\n')
        .map(|line| format!("{GRAY}>{RESET} {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single quoted blank line, used to pad the edges of a query run.
pub fn quoted_blank() -> String {
    format!("{GRAY}>{RESET}")
}

/// Wraps a whole log string in the level's terminal accent color.
pub fn colorize(level: LogLevel, s: &str) -> String {
    match level {
        LogLevel::Error => format!("{RED}{s}{RESET}"),
        LogLevel::Warn => format!("{YELLOW}{s}{RESET}"),
        LogLevel::Info => format!("{CYAN}{s}{RESET}"),
        LogLevel::Regular => s.to_string(),
    }
}

/// Removes ANSI escape sequences.
pub fn strip_ansi(s: &str) -> String {
    let re = Regex::new("\x1b\\[[0-9;]*m").expect("valid regex");
    re.replace_all(s, "").to_string()
}
