//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Keep at most `max` chars (not bytes) of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
  match s.char_indices().nth(max) {
    Some((idx, _)) => &s[..idx],
    None => s,
  }
}

/// Models like to wrap JSON in markdown fences even when told not to.
/// Drops every ```json / ``` marker and trims the rest.
pub fn strip_code_fences(s: &str) -> String {
  s.replace("```json", "").replace("```", "").trim().to_string()
}

/// Log-safe truncation for large strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  let head = truncate_chars(s, max);
  if head.len() == s.len() { s.to_string() } else { format!("{}… ({} bytes total)", head, s.len()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncation_counts_chars_not_bytes() {
    assert_eq!(truncate_chars("Việt Nam", 4), "Việt");
    assert_eq!(truncate_chars("abc", 10), "abc");
  }

  #[test]
  fn fences_are_removed() {
    assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
    assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
  }

  #[test]
  fn template_fills_every_key() {
    let out = fill_template("{mode} x{count} {mode}", &[("mode", "qa"), ("count", "5")]);
    assert_eq!(out, "qa x5 qa");
  }

  #[test]
  fn log_truncation_marks_cut_payloads() {
    assert_eq!(trunc_for_log("short", 10), "short");
    assert!(trunc_for_log("0123456789abc", 4).starts_with("0123… (13 bytes"));
  }
}
