use std::fmt::Write;

/// Writes a string literal delimited by double quotes, escaping characters that
/// would otherwise terminate or change the meaning of the literal. Non-ASCII
/// characters are preserved except for the line separators U+2028/U+2029.
pub fn emit_string_literal_double_quoted(out: &mut String, value: &str) {
  out.push('"');

  let mut chars = value.chars().peekable();
  while let Some(ch) = chars.next() {
    match ch {
      '\\' => out.push_str("\\\\"),
      '"' => out.push_str("\\\""),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\0' => {
        // `\0` followed by a digit would be a legacy octal escape.
        let next_is_digit = chars.peek().is_some_and(|c| c.is_ascii_digit());
        if next_is_digit {
          out.push_str("\\x00");
        } else {
          out.push_str("\\0");
        }
      }
      '\u{2028}' => out.push_str("\\u2028"),
      '\u{2029}' => out.push_str("\\u2029"),
      ch if ch < '\u{20}' || ch == '\u{7f}' => {
        // Writing to a String cannot fail.
        let _ = write!(out, "\\x{:02X}", ch as u32);
      }
      ch => out.push(ch),
    }
  }

  out.push('"');
}

pub fn string_literal_double_quoted(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  emit_string_literal_double_quoted(&mut out, value);
  out
}

#[cfg(test)]
mod tests {
  use super::string_literal_double_quoted as emit_string;

  #[test]
  fn escapes_quotes_and_backslashes() {
    assert_eq!(emit_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
    assert_eq!(emit_string("it's"), "\"it's\"");
  }

  #[test]
  fn escapes_control_characters() {
    assert_eq!(emit_string("a\nb\tc"), "\"a\\nb\\tc\"");
    assert_eq!(emit_string("a\u{0007}b"), "\"a\\x07b\"");
    assert_eq!(emit_string("\u{7f}"), "\"\\x7F\"");
  }

  #[test]
  fn escapes_zero_followed_by_digit() {
    assert_eq!(emit_string("\u{0000}9"), "\"\\x009\"");
    assert_eq!(emit_string("\u{0000}a"), "\"\\0a\"");
  }

  #[test]
  fn escapes_line_separators() {
    assert_eq!(emit_string("a\u{2028}b"), "\"a\\u2028b\"");
    assert_eq!(emit_string("a\u{2029}b"), "\"a\\u2029b\"");
  }

  #[test]
  fn keeps_non_ascii() {
    assert_eq!(emit_string("héllo ✓"), "\"héllo ✓\"");
  }
}
