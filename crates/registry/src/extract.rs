//! Payload extraction from free-form or curl-style text

use once_cell::sync::Lazy;
use regex::Regex;

/// Tried in order; first match wins
static PAYLOAD_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"--data(?:-urlencode)?\s+'([^']+)'").unwrap(),
        Regex::new(r#"--data(?:-urlencode)?\s+"([^"]+)""#).unwrap(),
        Regex::new(r"data=([A-Za-z0-9%+/=]+)").unwrap(),
    ]
});

/// Best-effort payload from text
///
/// Recognizes `--data '...'`, `--data "..."` (and `--data-urlencode`), then a
/// bare `data=<value>`. A leading `data=` inside a quoted value is stripped.
/// Falls back to the trimmed input.
pub fn extract_payload(text: &str) -> String {
    for pattern in PAYLOAD_PATTERNS.iter() {
        if let Some(value) = pattern.captures(text).and_then(|c| c.get(1)) {
            let value = value.as_str();
            let value = value
                .split_once("data=")
                .filter(|(before, _)| before.is_empty())
                .map_or(value, |(_, rest)| rest);
            return value.trim().to_string();
        }
    }
    text.trim().to_string()
}
