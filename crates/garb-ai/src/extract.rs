//! Extraction of the first JSON object from free-form model text.
//!
//! Models are asked to return "ONLY valid JSON" and routinely wrap it in
//! prose or markdown fences anyway. This scans for the first balanced
//! `{...}` span (string- and escape-aware) and parses it.

use crate::{Error, Result};

/// Find and parse the first balanced `{...}` span in `text`.
pub fn first_json_object(text: &str) -> Result<serde_json::Value> {
  let span = first_object_span(text).ok_or(Error::MissingJson)?;
  serde_json::from_str(span).map_err(Error::MalformedJson)
}

fn first_object_span(text: &str) -> Option<&str> {
  let start = text.find('{')?;
  let bytes = text.as_bytes();
  let mut depth = 0usize;
  let mut in_string = false;
  let mut escaped = false;

  for (offset, &b) in bytes[start..].iter().enumerate() {
    if in_string {
      if escaped {
        escaped = false;
      } else if b == b'\\' {
        escaped = true;
      } else if b == b'"' {
        in_string = false;
      }
      continue;
    }
    match b {
      b'"' => in_string = true,
      b'{' => depth += 1,
      b'}' => {
        depth -= 1;
        if depth == 0 {
          return Some(&text[start..=start + offset]);
        }
      }
      _ => {}
    }
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bare_object() {
    let v = first_json_object(r#"{"ready": true, "confidence": 90}"#).unwrap();
    assert_eq!(v["confidence"], 90);
  }

  #[test]
  fn fenced_and_prefixed_output() {
    let text = "Sure! Here is the result:\n```json\n{\"category\": \
                \"tops\"}\n```\nLet me know if you need anything else.";
    let v = first_json_object(text).unwrap();
    assert_eq!(v["category"], "tops");
  }

  #[test]
  fn nested_braces_and_brace_in_string() {
    let text = r#"note {"feedback": "hold { steady", "inner": {"a": 1}} tail"#;
    let v = first_json_object(text).unwrap();
    assert_eq!(v["feedback"], "hold { steady");
    assert_eq!(v["inner"]["a"], 1);
  }

  #[test]
  fn missing_json_is_a_named_error() {
    assert!(matches!(
      first_json_object("no structured output here"),
      Err(Error::MissingJson)
    ));
  }

  #[test]
  fn unbalanced_object_is_missing() {
    assert!(matches!(
      first_json_object(r#"{"ready": true"#),
      Err(Error::MissingJson)
    ));
  }

  #[test]
  fn malformed_json_is_a_named_error() {
    assert!(matches!(
      first_json_object(r#"{"ready": tru}"#),
      Err(Error::MalformedJson(_))
    ));
  }
}
