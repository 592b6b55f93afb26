//! Utility functions for string handling, JSON diagnostics, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation and slugification for logging and anchors
//! - JSON error detection for diagnosing truncated model responses
//! - File system validation for output directories

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument, warn};

static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

/// Regex matching a blank line between paragraphs.
pub fn blank_line_regex() -> &'static Regex {
    &BLANK_LINE
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (never splitting a
/// character) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// When the model response is cut off (e.g., due to token limits), the
/// resulting JSON fails to parse with an EOF error. Used to tell a cut-off
/// response apart from a non-conforming one in the logs.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Make model-supplied text safe for a single line of Markdown.
///
/// Runs of whitespace (newlines included) collapse to one space, and the
/// characters that open links, headings, emphasis or code are escaped.
///
/// ```ignore
/// assert_eq!(inline_markdown("AI [beta]\n# 2"), "AI \\[beta\\] \\# 2");
/// ```
pub fn inline_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, word) in text.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        for c in word.chars() {
            if matches!(c, '\\' | '[' | ']' | '#' | '*' | '_' | '`' | '<' | '>' | '!') {
                out.push('\\');
            }
            out.push(c);
        }
    }
    out
}

/// Convert a title to a URL-friendly slug.
///
/// Used to generate anchor links for Markdown output. Lowercases the text,
/// removes special characters, and replaces spaces with hyphens.
///
/// ```ignore
/// assert_eq!(slugify_title("Hello World"), "hello-world");
/// ```
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a scratch file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let scratch_path = format!("{}/..__write_test__", path.trim_end_matches('/'));
    drop(fs::File::create(&scratch_path).await?);
    if let Err(e) = fs::remove_file(&scratch_path).await {
        warn!(scratch = %scratch_path, error = %e, "Failed to remove write-test file");
    }
    info!("Output directory is writable");
    Ok(())
}
