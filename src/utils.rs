//! Small string helpers shared by the pipeline steps.
//!
//! - Log-friendly truncation of provider responses
//! - Post excerpts and dated fallback titles
//! - Minimal HTML escaping for text placed inside the post body

use chrono::NaiveDate;

/// Maximum number of body characters kept in a post excerpt.
pub const EXCERPT_CHARS: usize = 100;

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended. Cuts always land on a character boundary.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Excerpt for a post: the first [`EXCERPT_CHARS`] characters plus `…`.
///
/// The ellipsis is appended even when the body is shorter than the limit.
pub fn excerpt(body: &str) -> String {
    let head: String = body.chars().take(EXCERPT_CHARS).collect();
    format!("{head}…")
}

/// Title used when the model did not supply one.
pub fn dated_title(date: NaiveDate) -> String {
    format!("Daily Industry Insight - {}", date.format("%Y-%m-%d"))
}

/// Escape the characters that would otherwise be read as markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
