// Output formatting — terminal display and shareable text.

pub mod terminal;

use chrono::NaiveDateTime;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Render a server timestamp for display.
///
/// The API emits ISO 8601 without a timezone suffix. Unparseable values
/// pass through unchanged rather than erroring a whole table row.
pub fn format_timestamp(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Just the date part of a server timestamp.
pub fn format_date(raw: &str) -> String {
    raw.split('T').next().unwrap_or(raw).to_string()
}
