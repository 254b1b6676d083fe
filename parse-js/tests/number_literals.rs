use parse_js::ast::expr::Expr;
use parse_js::ast::node::NumberLiteralRaw;
use parse_js::ast::stmt::Stmt;
use parse_js::num::JsNumber;
use parse_js::parse;
use parse_js::parse::expr::lit::normalise_literal_number;

fn parse_number(src: &str) -> (JsNumber, Option<String>) {
  let parsed = parse(src).unwrap();
  let stmt = parsed.stx.body.first().expect("expected a statement");
  match stmt.stx.as_ref() {
    Stmt::Expr(expr_stmt) => match expr_stmt.stx.expr.stx.as_ref() {
      Expr::LitNum(num) => (
        num.stx.value,
        num.assoc.get::<NumberLiteralRaw>().map(|raw| raw.0.clone()),
      ),
      other => panic!("expected numeric literal, got {:?}", other),
    },
    other => panic!("expected expression statement, got {:?}", other),
  }
}

#[test]
fn parses_max_finite_literal() {
  let (value, _) = parse_number("1.7976931348623157e308");
  assert_eq!(value.0, f64::MAX);
}

#[test]
fn overflows_to_infinity() {
  let (value, _) = parse_number("1e400");
  assert!(value.0.is_infinite() && value.0.is_sign_positive());
}

#[test]
fn parses_min_subnormal() {
  let (value, _) = parse_number("5e-324");
  assert_eq!(value.0.to_bits(), f64::from_bits(1).to_bits());
}

#[test]
fn parses_legacy_octal_literal() {
  let (value, raw) = parse_number("0777");
  assert_eq!(value.0, 0o777 as f64);
  assert_eq!(raw.as_deref(), Some("0777"));
}

#[test]
fn leading_zero_decimal_is_not_octal() {
  let (value, raw) = parse_number("089");
  assert_eq!(value.0, 89.0);
  assert_eq!(raw, None);
}

#[test]
fn keeps_raw_text_of_prefixed_radixes() {
  for (src, expected) in [("0xff", 255.0), ("0O17", 15.0), ("0b101", 5.0)] {
    let (value, raw) = parse_number(src);
    assert_eq!(value.0, expected, "{}", src);
    assert_eq!(raw.as_deref(), Some(src));
  }
}

#[test]
fn decimal_forms_have_no_raw_text() {
  for src in ["1", ".5", "1.5e3", "10"] {
    assert_eq!(parse_number(src).1, None, "{}", src);
  }
}

#[test]
fn rejects_hex_floats() {
  assert!(normalise_literal_number("0x1.fp3").is_none());
}
