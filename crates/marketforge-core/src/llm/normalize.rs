//! Response normalizer: strips fenced-code wrapping from provider text
//! and parses the remainder as strict JSON.
//!
//! Providers regularly wrap JSON answers in ``` fences (with or without a
//! language tag) despite being told not to. The normalizer removes
//! exactly those delimiters without touching interior content, then hands
//! the rest to serde_json. A parse failure is surfaced as
//! `LlmError::MalformedOutput` so the retry policy treats it as a
//! retryable provider fault.

use serde::de::DeserializeOwned;

use marketforge_types::llm::LlmError;

/// Strip surrounding whitespace and, if present, the fenced-code opener
/// and closer. Idempotent: text already free of fences comes back
/// unchanged (modulo the trim).
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop an optional language tag ("json", "JSON", ...) up to the
        // first newline; a fence with no newline after it is all tag.
        text = match rest.split_once('\n') {
            Some((_tag, body)) => body,
            None => "",
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Normalize raw provider text and parse it into `T`.
///
/// Strict parsing, no partial recovery: if serde rejects the document the
/// whole response is malformed. The error message carries a bounded
/// snippet of the offending payload for the logs.
pub fn parse_response<T: DeserializeOwned>(raw: &str) -> Result<T, LlmError> {
    let stripped = strip_code_fences(raw);
    serde_json::from_str(stripped).map_err(|e| {
        LlmError::MalformedOutput(format!("{e}; payload starts: {}", snippet(stripped)))
    })
}

fn snippet(text: &str) -> String {
    const MAX: usize = 120;
    if text.len() <= MAX {
        text.to_string()
    } else {
        let mut end = MAX;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        items: Vec<String>,
    }

    const BARE: &str = r#"{"items": ["a", "b"]}"#;

    #[test]
    fn test_parses_bare_json() {
        let parsed: Payload = parse_response(BARE).unwrap();
        assert_eq!(parsed.items, vec!["a", "b"]);
    }

    #[test]
    fn test_strips_fences_with_language_tag() {
        let fenced = format!("```json\n{BARE}\n```");
        let parsed: Payload = parse_response(&fenced).unwrap();
        assert_eq!(parsed.items, vec!["a", "b"]);
    }

    #[test]
    fn test_strips_fences_without_language_tag() {
        let fenced = format!("```\n{BARE}\n```");
        let parsed: Payload = parse_response(&fenced).unwrap();
        assert_eq!(parsed.items, vec!["a", "b"]);
    }

    #[test]
    fn test_strips_opener_only() {
        let fenced = format!("```json\n{BARE}");
        let parsed: Payload = parse_response(&fenced).unwrap();
        assert_eq!(parsed.items, vec!["a", "b"]);
    }

    #[test]
    fn test_fenced_and_unfenced_parse_identically() {
        let fenced = format!("  ```json\n{BARE}\n```  ");
        let from_fenced: Payload = parse_response(&fenced).unwrap();
        let from_bare: Payload = parse_response(BARE).unwrap();
        assert_eq!(from_fenced, from_bare);
    }

    #[test]
    fn test_interior_backticks_untouched() {
        let json = r#"{"items": ["use ``` in markdown"]}"#;
        let fenced = format!("```json\n{json}\n```");
        let parsed: Payload = parse_response(&fenced).unwrap();
        assert_eq!(parsed.items, vec!["use ``` in markdown"]);
    }

    #[test]
    fn test_malformed_output_is_distinct_error() {
        let err = parse_response::<Payload>("I couldn't produce JSON, sorry!").unwrap_err();
        match err {
            LlmError::MalformedOutput(msg) => assert!(msg.contains("payload starts")),
            other => panic!("expected MalformedOutput, got: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let err = parse_response::<Payload>(r#"{"items": "not a list"}"#).unwrap_err();
        assert!(matches!(err, LlmError::MalformedOutput(_)));
    }

    #[test]
    fn test_strip_is_idempotent() {
        let fenced = format!("```json\n{BARE}\n```");
        let once = strip_code_fences(&fenced);
        let twice = strip_code_fences(once);
        assert_eq!(once, twice);
        assert_eq!(once, BARE);
    }
}
