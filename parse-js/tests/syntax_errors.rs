use parse_js::error::SyntaxErrorType;
use parse_js::parse;
use parse_js::token::TT;

fn error_of(source: &str) -> SyntaxErrorType {
  match parse(source) {
    Ok(ast) => panic!("expected a syntax error, got {:?}", ast),
    Err(err) => err.typ,
  }
}

#[test]
fn unterminated_string() {
  assert_eq!(error_of("x = 'abc\n'"), SyntaxErrorType::LineTerminatorInString);
}

#[test]
fn arrow_parameters_on_previous_line() {
  assert_eq!(
    error_of("f = (a, b)\n=> a"),
    SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters
  );
}

#[test]
fn unclosed_block() {
  assert_eq!(error_of("function f() {"), SyntaxErrorType::UnexpectedEnd);
}

#[test]
fn missing_function_name() {
  assert_eq!(
    error_of("function () {}"),
    SyntaxErrorType::ExpectedSyntax("identifier")
  );
}

#[test]
fn getter_with_parameter() {
  assert_eq!(
    error_of("o = { get a(b) {} }"),
    SyntaxErrorType::ExpectedSyntax("getter without parameters")
  );
}

#[test]
fn rest_parameter_not_last() {
  assert_eq!(
    error_of("function f(...a, b) {}"),
    SyntaxErrorType::ExpectedSyntax("rest parameter last")
  );
}

#[test]
fn errors_render_with_line_and_column() {
  let source = "a = 1;\nb = ;";
  let err = parse(source).unwrap_err();
  let rendered = err.render("input.js", source);
  assert!(rendered.starts_with("input.js:2:"), "{}", rendered);
  assert_eq!(err.actual_token, Some(TT::Semicolon));
}
