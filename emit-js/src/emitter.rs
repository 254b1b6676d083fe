//! Boundary-aware text buffer used by the printer.
//!
//! When callers write token-like fragments (keywords, identifiers, numbers,
//! punctuation), the [`Emitter`] inserts the whitespace required to prevent the
//! concatenation from being lexed as a different token (e.g. `returnx`, `a++b`,
//! `a--b`). It also owns line layout: [`Emitter::write_newline`] ends a line and
//! the next write on the following line is prefixed with the current
//! indentation.

use parse_js::loc::Loc;
use std::fmt;

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitErrorKind {
  // A tree shape with no source spelling, e.g. an object literal property without a value.
  Unsupported(&'static str),
}

#[derive(Debug)]
pub struct EmitError {
  pub kind: EmitErrorKind,
  pub loc: Option<Loc>,
}

impl EmitError {
  pub(crate) fn unsupported(message: &'static str) -> Self {
    Self {
      kind: EmitErrorKind::Unsupported(message),
      loc: None,
    }
  }

  pub(crate) fn with_loc(mut self, loc: Loc) -> Self {
    if self.loc.is_none() {
      self.loc = Some(loc);
    }
    self
  }
}

impl fmt::Display for EmitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      EmitErrorKind::Unsupported(message) => write!(f, "cannot print {}", message)?,
    };
    if let Some(loc) = self.loc {
      write!(f, " at [{}:{}]", loc.0, loc.1)?;
    };
    Ok(())
  }
}

impl std::error::Error for EmitError {}

pub type EmitResult = Result<(), EmitError>;

pub(crate) fn with_node_context<T>(
  loc: Loc,
  f: impl FnOnce() -> Result<T, EmitError>,
) -> Result<T, EmitError> {
  f().map_err(|err| err.with_loc(loc))
}

#[derive(Debug, Clone)]
pub struct Emitter {
  out: String,
  trailing: Boundary,
  indent: usize,
  // Indentation is written lazily, so that blank lines never carry trailing spaces.
  line_start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Boundary {
  #[default]
  None,
  Word,
  Number,
  Plus,
  PlusPlus,
  Minus,
  MinusMinus,
  Slash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leading {
  None,
  Word,
  Number,
  Plus,
  Minus,
  Slash,
  Star,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
  Word,
  Number,
  Plus,
  PlusPlus,
  Minus,
  MinusMinus,
  Other,
}

#[derive(Debug, Clone, Copy)]
struct FragmentBoundary {
  leading: Leading,
  trailing: Boundary,
}

impl Default for Emitter {
  fn default() -> Self {
    Emitter {
      out: String::new(),
      trailing: Boundary::None,
      indent: 0,
      line_start: true,
    }
  }
}

impl Emitter {
  pub fn new() -> Self {
    Emitter::default()
  }

  pub fn as_str(&self) -> &str {
    &self.out
  }

  pub fn into_string(self) -> String {
    self.out
  }

  pub fn indent(&mut self) {
    self.indent += 1;
  }

  pub fn dedent(&mut self) {
    self.indent = self.indent.saturating_sub(1);
  }

  /// Writes a fragment, inserting a space if it would otherwise merge with the
  /// previous token. Only use this for a single lexical token, or text whose
  /// first and last characters classify the same way as a token would (e.g. a
  /// string or regex literal).
  pub fn write_str(&mut self, text: &str) {
    if text.is_empty() {
      return;
    }
    let boundaries = classify_fragment(text.as_bytes());
    self.push_fragment(text, boundaries);
  }

  pub fn write_keyword(&mut self, keyword: &str) {
    self.write_with_kind(keyword, TokenKind::Word);
  }

  pub fn write_identifier(&mut self, identifier: &str) {
    self.write_with_kind(identifier, TokenKind::Word);
  }

  pub fn write_number(&mut self, number: &str) {
    self.write_with_kind(number, TokenKind::Number);
  }

  /// Emits punctuation or operators.
  pub fn write_punct(&mut self, punct: &str) {
    let kind = match punct {
      "+" => TokenKind::Plus,
      "++" => TokenKind::PlusPlus,
      "-" => TokenKind::Minus,
      "--" => TokenKind::MinusMinus,
      _ => TokenKind::Other,
    };
    self.write_with_kind(punct, kind);
  }

  pub fn write_space(&mut self) {
    self.flush_indent();
    self.out.push(' ');
    self.trailing = Boundary::None;
  }

  /// Ends the current line. Consecutive calls do not produce blank lines.
  pub fn write_newline(&mut self) {
    if self.line_start {
      return;
    }
    self.out.push('\n');
    self.trailing = Boundary::None;
    self.line_start = true;
  }

  /// Writes text as-is without enforcing token boundaries, e.g. the inside of a
  /// template literal.
  pub fn write_raw_str(&mut self, text: &str) {
    self.flush_indent();
    self.out.push_str(text);
    self.trailing = Boundary::None;
  }

  /// Writes `/* text */` followed by a space.
  pub fn write_block_comment(&mut self, text: &str) {
    self.write_with_kind("/*", TokenKind::Other);
    self.write_space();
    // The comment must not end early.
    self.write_raw_str(&text.replace("*/", "* /"));
    self.write_space();
    self.write_raw_str("*/");
    self.write_space();
  }

  /// Returns the current write position, after any pending indentation. Use
  /// with [`Emitter::text_since`] and [`Emitter::wrap_parens_since`] to inspect
  /// and fix up a fragment after it has been written.
  pub(crate) fn mark(&mut self) -> usize {
    self.flush_indent();
    self.out.len()
  }

  pub(crate) fn text_since(&self, mark: usize) -> &str {
    &self.out[mark..]
  }

  /// Wraps everything written since `mark` in parentheses.
  pub(crate) fn wrap_parens_since(&mut self, mark: usize) {
    self.out.insert(mark, '(');
    self.write_punct(")");
  }

  fn write_with_kind(&mut self, text: &str, kind: TokenKind) {
    if text.is_empty() {
      return;
    }
    let boundaries = classify_fragment_with_kind(text.as_bytes(), kind);
    self.push_fragment(text, boundaries);
  }

  fn push_fragment(&mut self, text: &str, boundaries: FragmentBoundary) {
    self.flush_indent();
    if needs_space(self.trailing, boundaries.leading) {
      self.out.push(' ');
    }
    self.out.push_str(text);
    self.trailing = boundaries.trailing;
  }

  fn flush_indent(&mut self) {
    if self.line_start {
      for _ in 0..self.indent {
        self.out.push_str(INDENT);
      }
      self.line_start = false;
    }
  }
}

fn needs_space(prev: Boundary, next: Leading) -> bool {
  matches!(
    (prev, next),
    (Boundary::Word, Leading::Word)
      | (Boundary::Word, Leading::Number)
      | (Boundary::Number, Leading::Word)
      | (Boundary::Number, Leading::Number)
      | (Boundary::Plus, Leading::Plus)
      | (Boundary::PlusPlus, Leading::Plus)
      | (Boundary::Minus, Leading::Minus)
      | (Boundary::MinusMinus, Leading::Minus)
      | (Boundary::Slash, Leading::Slash)
      | (Boundary::Slash, Leading::Star)
  )
}

fn classify_fragment(bytes: &[u8]) -> FragmentBoundary {
  let leading = match bytes.first() {
    Some(&c) if !c.is_ascii_whitespace() => classify_leading_char(c),
    _ => Leading::None,
  };
  let trailing = match bytes.last() {
    Some(&c) if !c.is_ascii_whitespace() => classify_trailing_char(bytes, bytes.len() - 1),
    _ => Boundary::None,
  };
  FragmentBoundary { leading, trailing }
}

fn classify_fragment_with_kind(bytes: &[u8], kind: TokenKind) -> FragmentBoundary {
  let leading = match kind {
    TokenKind::Other => match bytes[0] {
      b'/' => Leading::Slash,
      b'*' => Leading::Star,
      _ => Leading::Other,
    },
    _ => kind.leading(),
  };
  FragmentBoundary {
    leading,
    trailing: kind.trailing(bytes, bytes.len() - 1),
  }
}

fn classify_leading_char(ch: u8) -> Leading {
  match ch {
    b'0'..=b'9' => Leading::Number,
    b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | b'\\' | 0x80..=0xff => Leading::Word,
    b'+' => Leading::Plus,
    b'-' => Leading::Minus,
    b'/' => Leading::Slash,
    b'*' => Leading::Star,
    _ => Leading::Other,
  }
}

fn classify_trailing_char(bytes: &[u8], idx: usize) -> Boundary {
  match bytes[idx] {
    b'0'..=b'9' => Boundary::Number,
    b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | 0x80..=0xff => Boundary::Word,
    b'+' if idx >= 1 && bytes[idx - 1] == b'+' => Boundary::PlusPlus,
    b'+' => Boundary::Plus,
    b'-' if idx >= 1 && bytes[idx - 1] == b'-' => Boundary::MinusMinus,
    b'-' => Boundary::Minus,
    b'/' => Boundary::Slash,
    _ => Boundary::None,
  }
}

impl TokenKind {
  fn leading(self) -> Leading {
    match self {
      TokenKind::Word => Leading::Word,
      TokenKind::Number => Leading::Number,
      TokenKind::Plus | TokenKind::PlusPlus => Leading::Plus,
      TokenKind::Minus | TokenKind::MinusMinus => Leading::Minus,
      TokenKind::Other => Leading::Other,
    }
  }

  fn trailing(self, bytes: &[u8], trailing_idx: usize) -> Boundary {
    match self {
      TokenKind::PlusPlus => Boundary::PlusPlus,
      TokenKind::MinusMinus => Boundary::MinusMinus,
      TokenKind::Plus => Boundary::Plus,
      TokenKind::Minus => Boundary::Minus,
      TokenKind::Word => Boundary::Word,
      TokenKind::Number => Boundary::Number,
      TokenKind::Other => classify_trailing_char(bytes, trailing_idx),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::Emitter;

  #[test]
  fn separates_words_and_numbers() {
    let mut em = Emitter::new();
    em.write_keyword("return");
    em.write_identifier("x");
    em.write_punct(";");
    em.write_keyword("typeof");
    em.write_number("1");
    assert_eq!(em.as_str(), "return x;typeof 1");
  }

  #[test]
  fn separates_repeated_signs() {
    let mut em = Emitter::new();
    em.write_identifier("a");
    em.write_punct("-");
    em.write_punct("-");
    em.write_identifier("b");
    em.write_punct("+");
    em.write_punct("++");
    em.write_identifier("c");
    assert_eq!(em.as_str(), "a- -b+ ++c");
  }

  #[test]
  fn separates_division_from_regex_and_comments() {
    let mut em = Emitter::new();
    em.write_identifier("a");
    em.write_punct("/");
    em.write_str("/re/g");
    em.write_punct("/");
    em.write_block_comment("note");
    assert_eq!(em.as_str(), "a/ /re/g/ /* note */ ");
  }

  #[test]
  fn indents_lazily() {
    let mut em = Emitter::new();
    em.write_punct("{");
    em.indent();
    em.write_newline();
    em.write_newline();
    em.write_identifier("a");
    em.write_punct(";");
    em.dedent();
    em.write_newline();
    em.write_punct("}");
    assert_eq!(em.as_str(), "{\n  a;\n}");
  }

  #[test]
  fn wraps_fragment_in_parens() {
    let mut em = Emitter::new();
    em.indent();
    em.write_newline();
    em.write_identifier("x");
    em.write_newline();
    let mark = em.mark();
    em.write_punct("{");
    em.write_punct("}");
    assert_eq!(em.text_since(mark), "{}");
    em.wrap_parens_since(mark);
    assert_eq!(em.as_str(), "  x\n  ({})");
  }
}
