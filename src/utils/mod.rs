//! Utility functions and helpers.

pub mod http;

use scraper::ElementRef;

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an element, whitespace-normalized.
pub fn element_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Text following `marker` up to the end of `text`, if the marker occurs.
pub fn after_marker<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.find(marker).map(|idx| &text[idx + marker.len()..])
}
