use crate::lex::lex_next;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::token::TT;
use crate::token::TT::*;

fn check<const N: usize>(code: &str, expecteds: [TT; N]) {
  let mut lexer = Lexer::new(code);
  for expected in expecteds {
    let t = lex_next(&mut lexer, LexMode::Standard);
    assert_eq!(t.typ, expected, "lexing {:?}", code);
  }
  let t = lex_next(&mut lexer, LexMode::Standard);
  assert_eq!(EOF, t.typ);
}

#[test]
fn test_lex_keywords() {
  check("class", [KeywordClass]);
  check("instanceof", [KeywordInstanceof]);
  check("iff", [Identifier]);
  check("return_", [Identifier]);
}

#[test]
fn test_lex_identifiers() {
  check("h929", [Identifier]);
  check("_0x3f2a $n", [Identifier, Identifier]);
  check("\\u0061bc", [Identifier]);
}

#[test]
fn test_lex_literal_numbers() {
  check("1", [LiteralNumber]);
  check("929", [LiteralNumber]);
  check(".929", [LiteralNumber]);
  check(". 929", [Dot, LiteralNumber]);
  check(". 929.2.", [Dot, LiteralNumber, Dot]);
  check("?.929", [Question, LiteralNumber]);
  check("?..929", [QuestionDot, LiteralNumber]);
  check("0x1F 0o17 0b101 017 1e3 2.5e-3", [
    LiteralNumber,
    LiteralNumber,
    LiteralNumber,
    LiteralNumber,
    LiteralNumber,
    LiteralNumber,
  ]);
  check("0x", [Invalid]);
}

#[test]
fn test_lex_literal_bigints() {
  check("1n", [LiteralBigInt]);
  check("0x800faceb00cn", [LiteralBigInt]);
  check("0b110101010n", [LiteralBigInt]);
  check("0o12077n", [LiteralBigInt]);
}

#[test]
fn test_lex_literal_strings() {
  check("'hello world'", [LiteralString]);
  check("\"a\\\"b\"", [LiteralString]);
  check("'a\\\nb'", [LiteralString]);
  check("'hello world\n'", [Invalid]);
}

#[test]
fn test_lex_comments_and_line_terminators() {
  let mut lexer = Lexer::new("a /* x */ b // y\nc /* \n */ d");
  let expected = [(Identifier, false), (Identifier, false), (Identifier, true), (Identifier, true)];
  for (typ, nl) in expected {
    let t = lex_next(&mut lexer, LexMode::Standard);
    assert_eq!(t.typ, typ);
    assert_eq!(t.preceded_by_line_terminator, nl);
  }
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, EOF);
}

#[test]
fn test_lex_regex_depends_on_mode() {
  let mut lexer = Lexer::new("/a[/]b/gi");
  assert_eq!(lex_next(&mut lexer, LexMode::SlashIsRegex).typ, LiteralRegex);
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, EOF);

  let mut lexer = Lexer::new("/a/");
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, Slash);
}

#[test]
fn test_lex_template() {
  let mut lexer = Lexer::new("`a${b}c`");
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, LiteralTemplatePartString);
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, Identifier);
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, BraceClose);
  assert_eq!(
    lex_next(&mut lexer, LexMode::TemplateStrContinue).typ,
    LiteralTemplatePartStringEnd
  );
}

#[test]
fn test_lex_operators() {
  check("a?.b ?? c", [Identifier, QuestionDot, Identifier, QuestionQuestion, Identifier]);
  check("x >>>= 1", [Identifier, ChevronRightChevronRightChevronRightEquals, LiteralNumber]);
  check("2 ** 10", [LiteralNumber, AsteriskAsterisk, LiteralNumber]);
}
