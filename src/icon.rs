// Icon extraction
// Best-effort scrape of <link rel="icon" href="..."> from raw markup. No
// document parsing: the first match wins, anything odd falls back to a glyph.

use std::sync::OnceLock;

use base64::{engine::general_purpose, Engine as _};
use regex::Regex;

fn icon_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r#"(?i)<link\s+[^>]*rel=["']icon["'][^>]*href="([^"]+)""#)
                .expect("double-quoted icon pattern is valid"),
            Regex::new(r#"(?i)<link\s+[^>]*rel=["']icon["'][^>]*href='([^']+)'"#)
                .expect("single-quoted icon pattern is valid"),
        ]
    })
}

/// Raw href of the first icon link, if any.
pub fn find_icon_href(markup: &str) -> Option<&str> {
    icon_patterns()
        .iter()
        .find_map(|re| re.captures(markup).and_then(|c| c.get(1)))
        .map(|m| m.as_str().trim())
        .filter(|href| !href.is_empty())
}

/// Accept image data URLs, absolute http(s) URLs and relative paths.
/// Any other scheme (javascript:, data:text/..., file:) is rejected.
pub fn accept_icon_href(href: &str) -> Option<&str> {
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("data:image/") || lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(href);
    }

    // Relative: no scheme before the first path separator
    let scheme_end = href.find(':');
    let path_start = href.find(|c: char| c == '/' || c == '?' || c == '#');
    match (scheme_end, path_start) {
        (None, _) => Some(href),
        (Some(colon), Some(slash)) if slash < colon => Some(href),
        _ => None,
    }
}

pub fn extract_icon(markup: &str) -> Option<String> {
    find_icon_href(markup)
        .and_then(accept_icon_href)
        .map(str::to_string)
}

/// Deterministic SVG data URL showing a single glyph.
pub fn fallback_icon(glyph: &str) -> String {
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"><text y="54" x="10" font-size="44">{}</text></svg>"#,
        glyph
    );
    format!("data:image/svg+xml;base64,{}", general_purpose::STANDARD.encode(svg))
}
