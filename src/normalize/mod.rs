//! Turns raw model replies into structured documents.
//!
//! The normalizer does not know which model produced the text. It strips a
//! surrounding code fence, parses strictly, and then checks the shape the
//! orchestrator relies on.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::errors::{DeckError, Result};
use crate::wire::PresentationDocument;

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+\-]*[ \t]*\r?\n?").expect("valid fence regex"));

/// Remove a leading ```` ```lang ```` line and a trailing ```` ``` ````, if present.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(m) = OPENING_FENCE.find(trimmed) else {
        return trimmed;
    };
    let body = &trimmed[m.end()..];
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Strict JSON parse of the de-fenced reply.
pub fn normalize(raw: &str) -> Result<Value> {
    serde_json::from_str(strip_fences(raw)).map_err(|source| DeckError::Parse {
        model: None,
        raw: raw.to_string(),
        source,
    })
}

/// Validate a parsed reply as a presentation. `raw` is kept for diagnostics.
pub fn into_document(value: Value, raw: &str) -> Result<PresentationDocument> {
    let schema = |reason: String| DeckError::Schema { model: None, reason, raw: raw.to_string() };

    let obj = value
        .as_object()
        .ok_or_else(|| schema("top-level value is not an object".into()))?;
    match obj.get("slides") {
        None => return Err(schema("missing `slides` field".into())),
        Some(Value::Array(slides)) if slides.is_empty() => {
            return Err(schema("`slides` is empty".into()))
        }
        Some(Value::Array(_)) => {}
        Some(_) => return Err(schema("`slides` is not an array".into())),
    }

    serde_json::from_value(value).map_err(|e| schema(e.to_string()))
}

pub fn parse_document(raw: &str) -> Result<PresentationDocument> {
    let value = normalize(raw)?;
    into_document(value, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOC: &str = r##"{"title":"X","slides":[{"type":"cover","title":"X","content":"intro"}]}"##;

    #[test]
    fn fenced_and_bare_json_parse_identically() {
        let bare = normalize(DOC).unwrap();
        for fenced in [
            format!("```json\n{DOC}\n```"),
            format!("```\n{DOC}\n```"),
            format!("  ```JSON\r\n{DOC}\r\n```  \n"),
            format!("```json{DOC}```"),
        ] {
            assert_eq!(normalize(&fenced).unwrap(), bare, "fence: {fenced:?}");
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(normalize(&format!("\n\n  {DOC}\t\n")).unwrap(), normalize(DOC).unwrap());
    }

    #[test]
    fn unterminated_fence_still_parses() {
        assert!(normalize(&format!("```json\n{DOC}")).is_ok());
    }

    #[test]
    fn truncated_json_is_a_parse_error_with_raw_text() {
        let raw = r#"```json
{"title":"X","slides":[{"type":"cover","#;
        let err = normalize(raw).unwrap_err();
        match err {
            DeckError::Parse { raw: kept, .. } => assert_eq!(kept, raw),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn prose_around_json_is_rejected() {
        let raw = format!("Here is your deck:\n{DOC}");
        assert!(matches!(normalize(&raw), Err(DeckError::Parse { .. })));
    }

    #[test]
    fn empty_slides_fail_schema_validation() {
        let raw = "```json\n{\"title\":\"X\",\"slides\":[]}\n```";
        let value = normalize(raw).unwrap();
        assert_eq!(value["title"], json!("X"));
        let err = into_document(value, raw).unwrap_err();
        assert!(err.is_shape_error());
        assert!(err.to_string().contains("`slides` is empty"));
    }

    #[test]
    fn missing_or_non_array_slides_fail_schema_validation() {
        for raw in [r#"{"title":"X"}"#, r#"{"title":"X","slides":{"a":1}}"#, "[1,2]"] {
            let err = parse_document(raw).unwrap_err();
            assert!(err.is_shape_error(), "{raw}: {err}");
        }
    }

    #[test]
    fn slide_missing_title_is_a_schema_error() {
        let err = parse_document(r#"{"title":"X","slides":[{"type":"cover","content":"c"}]}"#)
            .unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn valid_document_parses() {
        let doc = parse_document(&format!("```json\n{DOC}\n```")).unwrap();
        assert_eq!(doc.title, "X");
        assert_eq!(doc.slides.len(), 1);
    }
}
