//! Correct-answer resolution.
//!
//! AI output encodes the right MCQ answer as an index, a letter, the option text
//! or something close to it. True/false correctness shows up as booleans,
//! numbers or strings under one of three field names.

use serde_json::Value;

/// Field names checked for true/false correctness, in priority order.
const TRUE_FALSE_FIELDS: [&str; 3] = ["is_correct", "correct_answer", "answer"];

fn as_index(n: &serde_json::Number) -> Option<usize> {
  n.as_u64()
    .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
    .and_then(|i| usize::try_from(i).ok())
}

fn letter_index(code: &str) -> Option<usize> {
  match code {
    "a" | "A" => Some(0),
    "b" | "B" => Some(1),
    "c" | "C" => Some(2),
    "d" | "D" => Some(3),
    _ => None,
  }
}

/// Resolve the content of the intended correct option.
///
/// Precedence:
/// 1. number that is a valid index
/// 2. trimmed letter code a-d mapping to a valid index
/// 3. exact case-insensitive match against a trimmed option
/// 4. two-way case-insensitive substring match, first option wins
///
/// Returns `None` when nothing matches.
pub fn resolve_correct_content<'a>(raw: Option<&Value>, options: &'a [String]) -> Option<&'a str> {
  match raw? {
    Value::Number(n) => as_index(n).and_then(|i| options.get(i)).map(String::as_str),
    Value::String(s) => {
      let code = s.trim();
      if code.is_empty() {
        return None;
      }
      if let Some(opt) = letter_index(code).and_then(|i| options.get(i)) {
        return Some(opt.as_str());
      }

      let wanted = code.to_lowercase();
      if let Some(opt) = options
        .iter()
        .find(|o| !o.is_empty() && o.trim().to_lowercase() == wanted)
      {
        return Some(opt.as_str());
      }

      // Overlapping options ("Paris" / "Paris, France") resolve to whichever comes first.
      options
        .iter()
        .find(|o| {
          if o.is_empty() {
            return false;
          }
          let lower = o.to_lowercase();
          lower.contains(&wanted) || wanted.contains(&lower)
        })
        .map(String::as_str)
    }
    _ => None,
  }
}

/// Boolean-like normalization for true/false items.
pub fn normalize_bool(v: &Value) -> bool {
  match v {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
    Value::Number(n) => n.as_f64() == Some(1.0),
    // Remaining shapes are containers; a present container reads as truthy.
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// Correctness of a true/false record: the first *present* field wins, even if null.
pub fn true_false_correct(record: &Value) -> bool {
  TRUE_FALSE_FIELDS
    .iter()
    .find_map(|k| record.get(*k))
    .map(normalize_bool)
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn capitals() -> Vec<String> {
    vec!["Paris".into(), "London".into(), "Berlin".into()]
  }

  #[test]
  fn numeric_index_resolves() {
    let opts = capitals();
    assert_eq!(resolve_correct_content(Some(&json!(0)), &opts), Some("Paris"));
    assert_eq!(resolve_correct_content(Some(&json!(2.0)), &opts), Some("Berlin"));
  }

  #[test]
  fn out_of_range_or_negative_numbers_do_not_resolve() {
    let opts = capitals();
    assert_eq!(resolve_correct_content(Some(&json!(3)), &opts), None);
    assert_eq!(resolve_correct_content(Some(&json!(-1)), &opts), None);
    assert_eq!(resolve_correct_content(Some(&json!(1.5)), &opts), None);
  }

  #[test]
  fn letter_codes_resolve_case_insensitively() {
    let opts = capitals();
    assert_eq!(resolve_correct_content(Some(&json!("b")), &opts), Some("London"));
    assert_eq!(resolve_correct_content(Some(&json!(" C ")), &opts), Some("Berlin"));
  }

  #[test]
  fn letter_beyond_options_falls_through_to_text_matching() {
    let opts = vec!["d".to_string(), "e".to_string()];
    assert_eq!(resolve_correct_content(Some(&json!("D")), &opts), Some("d"));
  }

  #[test]
  fn exact_text_match_ignores_case_and_padding() {
    let opts = vec!["Paris".to_string(), "London".to_string(), " Berlin ".to_string()];
    assert_eq!(resolve_correct_content(Some(&json!("berlin")), &opts), Some(" Berlin "));
  }

  #[test]
  fn exact_match_beats_earlier_substring_match() {
    let opts = vec!["Paris, France".to_string(), "Paris".to_string()];
    assert_eq!(resolve_correct_content(Some(&json!("paris")), &opts), Some("Paris"));
  }

  #[test]
  fn substring_matches_both_directions() {
    let opts = capitals();
    assert_eq!(resolve_correct_content(Some(&json!("London, UK")), &opts), Some("London"));
    let opts = vec!["The city of Berlin".to_string(), "Rome".to_string()];
    assert_eq!(resolve_correct_content(Some(&json!("berlin")), &opts), Some("The city of Berlin"));
  }

  #[test]
  fn unmatched_or_unusable_values_resolve_to_none() {
    let opts = capitals();
    assert_eq!(resolve_correct_content(Some(&json!("xyz")), &opts), None);
    assert_eq!(resolve_correct_content(Some(&json!("   ")), &opts), None);
    assert_eq!(resolve_correct_content(Some(&json!(true)), &opts), None);
    assert_eq!(resolve_correct_content(None, &opts), None);
  }

  #[test]
  fn empty_options_never_match() {
    let opts = vec![String::new(), "Rome".to_string()];
    assert_eq!(resolve_correct_content(Some(&json!("Milan")), &opts), None);
  }

  #[test]
  fn bool_normalization() {
    assert!(normalize_bool(&json!("YES")));
    assert!(normalize_bool(&json!(" true ")));
    assert!(normalize_bool(&json!("1")));
    assert!(normalize_bool(&json!(1)));
    assert!(normalize_bool(&json!(true)));
    assert!(!normalize_bool(&json!(0)));
    assert!(!normalize_bool(&json!(2)));
    assert!(!normalize_bool(&json!(null)));
    assert!(!normalize_bool(&json!("no")));
    assert!(!normalize_bool(&json!("false")));
  }

  #[test]
  fn true_false_fields_checked_in_priority_order() {
    assert!(true_false_correct(&json!({ "is_correct": true, "answer": false })));
    assert!(!true_false_correct(&json!({ "correct_answer": "no", "answer": "yes" })));
    assert!(true_false_correct(&json!({ "answer": "Yes" })));
    // Present-but-null shadows later fields.
    assert!(!true_false_correct(&json!({ "is_correct": null, "answer": true })));
    assert!(!true_false_correct(&json!({ "statement": "x" })));
  }
}
