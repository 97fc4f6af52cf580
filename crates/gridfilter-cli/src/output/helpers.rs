//! Common helper functions for output formatting.

use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a table header line, dimmed when colors are on.
pub fn header(line: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", line.dimmed())
    } else {
        format!("{line}\n")
    }
}

/// Formats a section title, bold when colors are on.
pub fn title(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Formats a blank marker such as `(blank)`, dimmed when colors are on.
pub fn blank_marker(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.dimmed().italic().to_string()
    } else {
        text.to_string()
    }
}

/// Formats a tri-state selection as a checkbox.
pub fn checkbox(state: Option<bool>) -> &'static str {
    match state {
        Some(true) => "[x]",
        Some(false) => "[ ]",
        None => "[-]",
    }
}
