use crate::api::Victim;

/// Truncate a string to at most `max_chars` characters, adding "..." if truncated
pub fn truncate(s: &str, max_chars: usize) -> String {
  if s.chars().count() <= max_chars {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Compact marker column: P(ress), I(nfostealer), U(pdates) or a dot.
pub fn victim_flags(victim: &Victim) -> String {
  [("press", 'P'), ("infostealer", 'I'), ("updates", 'U')]
    .iter()
    .map(|(field, mark)| if victim.has(field) { *mark } else { '·' })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_counts_chars() {
    assert_eq!(truncate("żółw żółw", 7), "żółw...");
  }

  #[test]
  fn test_victim_flags() {
    let victim: Victim =
      serde_json::from_value(json!({"press": [1], "updates": "x", "infostealer": null})).unwrap();
    assert_eq!(victim_flags(&victim), "P·U");
  }
}
