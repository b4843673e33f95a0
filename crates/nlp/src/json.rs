//! JSON-body isolation for model output
//!
//! The completion model is asked for strict JSON but routinely wraps it
//! in Markdown fences or prose. This helper strips a fence wrapper if
//! present, then bounds the body by the first `{` and the last `}`.

/// Isolate the JSON object inside a model response.
///
/// Returns `None` when no braced body can be found at all; the result is
/// still only a candidate and must survive `serde_json` parsing.
pub fn extract_json_block(content: &str) -> Option<String> {
    let mut body = content.trim();

    if let Some(stripped) = body.strip_prefix("```json") {
        body = stripped.strip_suffix("```").unwrap_or(stripped);
    } else if let Some(stripped) = body.strip_prefix("```") {
        body = stripped.strip_suffix("```").unwrap_or(stripped);
    }

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    Some(body[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let out = extract_json_block(r#"{"a": 1}"#).unwrap();
        assert_eq!(out, r#"{"a": 1}"#);
    }

    #[test]
    fn test_fenced_json() {
        let out = extract_json_block("```json\n{\"a\": 1}\n```").unwrap();
        assert_eq!(out, "{\"a\": 1}");

        let out = extract_json_block("```\n{\"a\": 1}\n```").unwrap();
        assert_eq!(out, "{\"a\": 1}");
    }

    #[test]
    fn test_prose_wrapped_json() {
        let out =
            extract_json_block("Sure! Here is the analysis: {\"a\": {\"b\": 2}} Hope that helps.")
                .unwrap();
        assert_eq!(out, "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn test_no_json_at_all() {
        assert!(extract_json_block("I could not produce an answer.").is_none());
        assert!(extract_json_block("").is_none());
    }

    #[test]
    fn test_reversed_braces() {
        assert!(extract_json_block("} nothing {").is_none());
    }
}
