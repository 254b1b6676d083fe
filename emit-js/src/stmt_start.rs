//! Checks on already printed text that decide whether an expression statement (or a similar
//! position) would be misread by the parser and has to be wrapped in parentheses.

fn skip_trivia(mut text: &str) -> &str {
  loop {
    let trimmed = text.trim_start();
    match trimmed.strip_prefix("/*") {
      Some(rest) => match rest.find("*/") {
        Some(end) => text = &rest[end + 2..],
        None => return "",
      },
      None => return trimmed,
    }
  }
}

fn strip_keyword<'t>(text: &'t str, keyword: &str) -> Option<&'t str> {
  let rest = text.strip_prefix(keyword)?;
  match rest.chars().next() {
    Some(c) if c == '$' || c == '_' || c == '\\' || c.is_alphanumeric() => None,
    _ => Some(rest),
  }
}

pub(crate) fn starts_with_brace(text: &str) -> bool {
  skip_trivia(text).starts_with('{')
}

pub(crate) fn starts_with_let(text: &str) -> bool {
  strip_keyword(skip_trivia(text), "let").is_some()
}

/// Whether printed text in statement position would be parsed as a block, a declaration, or a
/// `let` declaration instead of an expression.
pub(crate) fn needs_expr_stmt_parens(text: &str) -> bool {
  let text = skip_trivia(text);
  if text.starts_with('{') {
    return true;
  };
  if strip_keyword(text, "function").is_some() || strip_keyword(text, "class").is_some() {
    return true;
  };
  if let Some(rest) = strip_keyword(text, "async") {
    if strip_keyword(skip_trivia(rest), "function").is_some() {
      return true;
    };
  };
  if let Some(rest) = strip_keyword(text, "let") {
    if skip_trivia(rest).starts_with('[') {
      return true;
    };
  };
  false
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detects_declaration_like_starts() {
    assert!(needs_expr_stmt_parens("{}.x"));
    assert!(needs_expr_stmt_parens("function () {}()"));
    assert!(needs_expr_stmt_parens("class {}.name"));
    assert!(needs_expr_stmt_parens("async function () {}()"));
    assert!(needs_expr_stmt_parens("let [0]"));
    assert!(needs_expr_stmt_parens("/* note */ {}.x"));
  }

  #[test]
  fn allows_plain_expressions() {
    assert!(!needs_expr_stmt_parens("functional()"));
    assert!(!needs_expr_stmt_parens("classes.x"));
    assert!(!needs_expr_stmt_parens("async()"));
    assert!(!needs_expr_stmt_parens("let.x"));
    assert!(!needs_expr_stmt_parens("letter[0]"));
    assert!(!needs_expr_stmt_parens("(function () {})()"));
  }

  #[test]
  fn detects_let_and_brace_prefixes() {
    assert!(starts_with_let("let.x"));
    assert!(!starts_with_let("letter"));
    assert!(starts_with_brace("  {a: 1}"));
    assert!(!starts_with_brace("[{}]"));
  }
}
