//! JSON display utilities
//!
//! Pretty-prints response data and colors it line by line for the content pane.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use serde_json::Value;

use crate::theme;

/// Pretty-printed `value`, one colored line per output line
pub fn pretty_lines(value: &Value) -> Vec<Line<'static>> {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    text.lines().map(highlight_line).collect()
}

/// Color one line of pretty-printed JSON
pub fn highlight_line(line: &str) -> Line<'static> {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];
    let mut spans = vec![Span::raw(indent.to_string())];

    let rest = match split_key(trimmed) {
        Some((key, rest)) => {
            spans.push(Span::styled(
                key.to_string(),
                Style::new().fg(theme::json::KEY),
            ));
            spans.push(Span::styled(
                ": ",
                Style::new().fg(theme::json::PUNCTUATION),
            ));
            rest
        }
        None => trimmed,
    };

    let (value, has_comma) = match rest.strip_suffix(',') {
        Some(value) => (value, true),
        None => (rest, false),
    };
    if !value.is_empty() {
        spans.push(Span::styled(
            value.to_string(),
            Style::new().fg(value_color(value)),
        ));
    }
    if has_comma {
        spans.push(Span::styled(",", Style::new().fg(theme::json::PUNCTUATION)));
    }
    Line::from(spans)
}

/// Split `"key": rest` at the end of the quoted key
fn split_key(line: &str) -> Option<(&str, &str)> {
    if !line.starts_with('"') {
        return None;
    }
    let mut escaped = false;
    for (i, c) in line.char_indices().skip(1) {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => {
                let key = &line[..=i];
                return line[i + 1..].strip_prefix(": ").map(|rest| (key, rest));
            }
            _ => escaped = false,
        }
    }
    None
}

fn value_color(value: &str) -> ratatui::style::Color {
    match value.as_bytes().first() {
        Some(b'"') => theme::json::STRING,
        Some(b'-' | b'0'..=b'9') => theme::json::NUMBER,
        Some(b't' | b'f' | b'n') => theme::json::LITERAL,
        _ => theme::json::PUNCTUATION,
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod json_tests;
