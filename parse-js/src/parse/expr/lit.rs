use super::pat::is_valid_pattern_identifier;
use super::Asi;
use super::ParseCtx;
use super::Parser;
use crate::ast::class_or_object::ObjMember;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitArrExpr;
use crate::ast::expr::lit::LitBigIntExpr;
use crate::ast::expr::lit::LitBoolExpr;
use crate::ast::expr::lit::LitNullExpr;
use crate::ast::expr::lit::LitNumExpr;
use crate::ast::expr::lit::LitObjExpr;
use crate::ast::expr::lit::LitRegexExpr;
use crate::ast::expr::lit::LitStrExpr;
use crate::ast::expr::lit::LitTemplateExpr;
use crate::ast::expr::lit::LitTemplatePart;
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::ast::node::NumberLiteralRaw;
use crate::char::is_line_terminator;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::num::is_non_decimal_literal;
use crate::num::JsNumber;
use crate::token::TT;
use std::iter::Peekable;
use std::str::Chars;

pub fn normalise_literal_number(raw: &str) -> Option<JsNumber> {
  JsNumber::from_literal(raw)
}

fn take_hex_digits(chars: &mut Peekable<Chars>, n: usize) -> Option<u32> {
  let mut value = 0u32;
  for _ in 0..n {
    value = value * 16 + chars.next()?.to_digit(16)?;
  }
  Some(value)
}

fn push_code_point(out: &mut Vec<u16>, cp: u32) {
  match char::from_u32(cp) {
    Some(c) => {
      let mut buf = [0u16; 2];
      out.extend_from_slice(c.encode_utf16(&mut buf));
    }
    // Lone surrogates from `\uD800` style escapes.
    None => out.push(cp as u16),
  }
}

// Decodes one escape sequence; the backslash has already been consumed.
fn decode_escape_sequence(chars: &mut Peekable<Chars>, out: &mut Vec<u16>) -> Option<()> {
  let c = chars.next()?;
  match c {
    'b' => out.push(0x08),
    'f' => out.push(0x0c),
    'n' => out.push(0x0a),
    'r' => out.push(0x0d),
    't' => out.push(0x09),
    'v' => out.push(0x0b),
    // Line continuation.
    '\r' => {
      if chars.peek() == Some(&'\n') {
        chars.next();
      };
    }
    c if is_line_terminator(c) => {}
    '0'..='7' => {
      // Legacy octal escape, at most 0o377.
      let mut value = c.to_digit(8)?;
      let max_len = if c <= '3' { 3 } else { 2 };
      for _ in 1..max_len {
        match chars.peek().and_then(|c| c.to_digit(8)) {
          Some(d) => {
            value = value * 8 + d;
            chars.next();
          }
          None => break,
        };
      }
      out.push(value as u16);
    }
    'x' => out.push(take_hex_digits(chars, 2)? as u16),
    'u' => {
      if chars.peek() == Some(&'{') {
        chars.next();
        let mut value = 0u32;
        let mut len = 0;
        loop {
          let c = chars.next()?;
          if c == '}' {
            break;
          };
          value = value.checked_mul(16)?.checked_add(c.to_digit(16)?)?;
          len += 1;
        }
        if len == 0 || value > 0x10ffff {
          return None;
        };
        push_code_point(out, value);
      } else {
        push_code_point(out, take_hex_digits(chars, 4)?);
      }
    }
    c => push_code_point(out, c as u32),
  };
  Some(())
}

/// Decodes the contents of a string literal (without quotes) into its value.
pub fn normalise_literal_string(body: &str) -> Option<String> {
  let mut units = Vec::<u16>::with_capacity(body.len());
  let mut chars = body.chars().peekable();
  while let Some(c) = chars.next() {
    if c == '\\' {
      decode_escape_sequence(&mut chars, &mut units)?;
    } else {
      push_code_point(&mut units, c as u32);
    };
  }
  Some(String::from_utf16_lossy(&units))
}

impl<'a> Parser<'a> {
  pub fn lit_arr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitArrExpr>> {
    self.with_loc(|p| {
      p.require(TT::BracketOpen)?;
      let mut elements = Vec::<LitArrElem>::new();
      loop {
        if p.consume_if(TT::Comma).is_match() {
          elements.push(LitArrElem::Empty);
          continue;
        };
        if p.peek().typ == TT::BracketClose {
          break;
        };
        let rest = p.consume_if(TT::DotDotDot).is_match();
        let value = p.expr(ctx, [TT::Comma, TT::BracketClose])?;
        elements.push(if rest {
          LitArrElem::Rest(value)
        } else {
          LitArrElem::Single(value)
        });
        if p.peek().typ == TT::BracketClose {
          break;
        };
        p.require(TT::Comma)?;
      }
      p.require(TT::BracketClose)?;
      Ok(LitArrExpr { elements })
    })
  }

  pub fn lit_bigint(&mut self) -> SyntaxResult<Node<LitBigIntExpr>> {
    self.with_loc(|p| {
      let value = p.lit_bigint_val()?;
      Ok(LitBigIntExpr { value })
    })
  }

  /// The literal's digits, in their source radix, without the `n` suffix.
  pub fn lit_bigint_val(&mut self) -> SyntaxResult<String> {
    let t = self.require(TT::LiteralBigInt)?;
    self
      .str(t.loc)
      .strip_suffix('n')
      .map(|v| v.to_string())
      .ok_or_else(|| t.error(SyntaxErrorType::MalformedLiteralBigInt))
  }

  pub fn lit_bool(&mut self) -> SyntaxResult<Node<LitBoolExpr>> {
    self.with_loc(|p| {
      if p.consume_if(TT::LiteralTrue).is_match() {
        Ok(LitBoolExpr { value: true })
      } else {
        p.require(TT::LiteralFalse)?;
        Ok(LitBoolExpr { value: false })
      }
    })
  }

  pub fn lit_null(&mut self) -> SyntaxResult<Node<LitNullExpr>> {
    self.with_loc(|p| {
      p.require(TT::LiteralNull)?;
      Ok(LitNullExpr {})
    })
  }

  pub fn lit_num(&mut self) -> SyntaxResult<Node<LitNumExpr>> {
    let t = self.require(TT::LiteralNumber)?;
    let raw = self.str(t.loc);
    let value = normalise_literal_number(raw)
      .ok_or_else(|| t.error(SyntaxErrorType::MalformedLiteralNumber))?;
    let mut node = Node::new(t.loc, LitNumExpr { value });
    if is_non_decimal_literal(raw) {
      node.assoc.set(NumberLiteralRaw(raw.to_string()));
    };
    Ok(node)
  }

  pub fn lit_num_val(&mut self) -> SyntaxResult<JsNumber> {
    let t = self.require(TT::LiteralNumber)?;
    normalise_literal_number(self.str(t.loc))
      .ok_or_else(|| t.error(SyntaxErrorType::MalformedLiteralNumber))
  }

  pub fn lit_obj(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitObjExpr>> {
    self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let mut members = Vec::new();
      while p.peek().typ != TT::BraceClose {
        let member = p.with_loc(|p| {
          if p.consume_if(TT::DotDotDot).is_match() {
            let val = p.expr(ctx, [TT::Comma, TT::BraceClose])?;
            return Ok(ObjMember {
              typ: ObjMemberType::Rest { val },
            });
          };
          let [a, b] = p.peek_n::<2>();
          if is_valid_pattern_identifier(a.typ, ctx.rules)
            && matches!(b.typ, TT::Comma | TT::BraceClose)
          {
            let id = p.id_expr(ctx)?;
            return Ok(ObjMember {
              typ: ObjMemberType::Shorthand { id },
            });
          };
          let (key, val) = p.class_or_obj_member(ctx, TT::Colon, TT::Comma, &mut Asi::no())?;
          Ok(ObjMember {
            typ: ObjMemberType::Valued { key, val },
          })
        })?;
        members.push(member);
        if !p.consume_if(TT::Comma).is_match() {
          break;
        };
      }
      p.require(TT::BraceClose)?;
      Ok(LitObjExpr { members })
    })
  }

  pub fn lit_regex(&mut self) -> SyntaxResult<Node<LitRegexExpr>> {
    self.with_loc(|p| {
      let t = p.consume_with_mode(LexMode::SlashIsRegex);
      match t.typ {
        TT::LiteralRegex => {}
        TT::Invalid => return Err(t.error(SyntaxErrorType::LineTerminatorInRegex)),
        _ => return Err(t.error(SyntaxErrorType::RequiredTokenNotFound(TT::LiteralRegex))),
      };
      Ok(LitRegexExpr {
        value: p.string(t.loc),
      })
    })
  }

  pub fn lit_str(&mut self) -> SyntaxResult<Node<LitStrExpr>> {
    self.with_loc(|p| {
      let value = p.lit_str_val()?;
      Ok(LitStrExpr { value })
    })
  }

  /// Parses a literal string and returns its value with escapes decoded.
  /// Does *not* return a node; use `lit_str` for that.
  pub fn lit_str_val(&mut self) -> SyntaxResult<String> {
    let t = self.consume();
    match t.typ {
      TT::LiteralString => {}
      TT::Invalid if self.str(t.loc).starts_with(['"', '\'']) => {
        return Err(t.error(SyntaxErrorType::LineTerminatorInString))
      }
      _ => return Err(t.error(SyntaxErrorType::RequiredTokenNotFound(TT::LiteralString))),
    };
    let raw = self.str(t.loc);
    // The lexer guarantees both quotes are present.
    let body = &raw[1..raw.len() - 1];
    normalise_literal_string(body).ok_or_else(|| t.error(SyntaxErrorType::InvalidCharacterEscape))
  }

  pub fn lit_template(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitTemplateExpr>> {
    self.with_loc(|p| {
      let parts = p.lit_template_parts(ctx)?;
      Ok(LitTemplateExpr { parts })
    })
  }

  // NOTE: The next token must definitely be LiteralTemplatePartString{,End}.
  // String parts are kept raw, so escapes survive a round trip unchanged.
  pub fn lit_template_parts(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<LitTemplatePart>> {
    let t = self.consume();
    let is_end = match t.typ {
      TT::LiteralTemplatePartString => false,
      TT::LiteralTemplatePartStringEnd => true,
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("template string part"))),
    };
    let raw = self.str(t.loc);
    // Drop the opening backtick and the closing backtick or `${`.
    let content = &raw[1..raw.len() - if is_end { 1 } else { 2 }];
    let mut parts = vec![LitTemplatePart::String(content.to_string())];
    if !is_end {
      loop {
        let substitution = self.expr(ctx, [TT::BraceClose])?;
        self.require(TT::BraceClose)?;
        parts.push(LitTemplatePart::Substitution(substitution));
        let string = self.consume_with_mode(LexMode::TemplateStrContinue);
        let string_is_end = match string.typ {
          TT::LiteralTemplatePartString => false,
          TT::LiteralTemplatePartStringEnd => true,
          _ => return Err(string.error(SyntaxErrorType::UnexpectedEnd)),
        };
        let raw = self.str(string.loc);
        let content = &raw[..raw.len() - if string_is_end { 1 } else { 2 }];
        parts.push(LitTemplatePart::String(content.to_string()));
        if string_is_end {
          break;
        };
      }
    };
    Ok(parts)
  }
}

#[cfg(test)]
mod tests {
  use super::normalise_literal_string;

  #[test]
  fn test_normalise_literal_string() {
    assert_eq!(normalise_literal_string(r"a\nb").as_deref(), Some("a\nb"));
    assert_eq!(normalise_literal_string(r"\x41B\u{43}").as_deref(), Some("ABC"));
    assert_eq!(normalise_literal_string(r"😀").as_deref(), Some("\u{1F600}"));
    assert_eq!(normalise_literal_string(r"\101\0").as_deref(), Some("A\0"));
    assert_eq!(normalise_literal_string("a\\\nb").as_deref(), Some("ab"));
    assert_eq!(normalise_literal_string(r"\'\q").as_deref(), Some("'q"));
    assert_eq!(normalise_literal_string(r"\x4"), None);
    assert_eq!(normalise_literal_string(r"\u{}"), None);
  }
}
