//! Shared layout helpers for human-readable output.
//!
//! Centralizes indentation and styling so every command has a consistent
//! appearance.

use colored::Colorize;

/// Left margin for all body lines.
pub const INDENT: &str = "  ";

/// Label column width.
pub const LABEL_WIDTH: usize = 14;

/// Value column width for L/R tables.
pub const VALUE_WIDTH: usize = 24;

/// Styles a numeric value.
pub fn num(value: impl std::fmt::Display) -> String {
    value.to_string().yellow().to_string()
}

/// Direction indicator for an increase.
pub fn up() -> String {
    "↑".green().to_string()
}

/// Direction indicator for a decrease.
pub fn down() -> String {
    "↓".red().to_string()
}

/// Direction indicator for no change.
pub fn same() -> String {
    "=".dimmed().to_string()
}

/// Prints a `─── TITLE ────────` section header.
pub fn section(title: &str) {
    let dashes = "─".repeat(50usize.saturating_sub(title.len()));
    println!("{INDENT}─── {title} {dashes}");
}

/// Prints a key-value row.
pub fn row(label: &str, value: &str) {
    println!("{INDENT}{label:<LABEL_WIDTH$} {value}");
}

/// Prints a three-column row for L/R data.
///
/// Column widths count visible characters, not the ANSI escapes `colored`
/// inserts, so styled values are padded manually.
pub fn row3(label: &str, left: &str, right: &str) {
    let pad = VALUE_WIDTH.saturating_sub(visible_len(left));
    println!(
        "{INDENT}{label:<LABEL_WIDTH$} {left}{} {right}",
        " ".repeat(pad)
    );
}

/// Length of a string with ANSI escape sequences removed.
pub fn visible_len(s: &str) -> usize {
    let mut len = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\u{1b}' {
            in_escape = true;
        } else {
            len += 1;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_len_ignores_ansi_escapes() {
        colored::control::set_override(true);
        let styled = num("440");
        assert_eq!(visible_len(&styled), 3);
        colored::control::unset_override();
    }

    #[test]
    fn visible_len_of_plain_text_is_char_count() {
        assert_eq!(visible_len("1847 Hz (neutral)"), 17);
    }
}
