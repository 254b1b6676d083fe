use super::Parser;
use crate::ast::expr::Expr;
use crate::ast::node::NumberLiteralRaw;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::parse;
use crate::token::TT;
use crate::util::test::assert_json_eq;
use serde_json::json;

fn parse_stmts(code: &str) -> Vec<Stmt> {
  parse(code)
    .unwrap()
    .stx
    .body
    .into_iter()
    .map(|stmt| *stmt.stx)
    .collect()
}

fn parse_expr(code: &str) -> Expr {
  match parse_stmts(code).pop() {
    Some(Stmt::Expr(stmt)) => *stmt.stx.expr.stx,
    other => panic!("expected expression statement, got {:?}", other),
  }
}

fn parse_err(code: &str) -> SyntaxErrorType {
  parse(code).unwrap_err().typ
}

#[test]
fn test_parser() {
  let lexer = Lexer::new("let x = /a/ / 1;");
  let mut p = Parser::new(lexer);
  let cp = p.checkpoint();
  assert_eq!(p.next_tok_i, 0);

  let t = p.peek();
  assert_eq!(p.next_tok_i, 0);
  assert_eq!(p.buf.len(), 1);
  assert_eq!(t.typ, TT::KeywordLet);

  let t = p.consume();
  assert_eq!(p.next_tok_i, 1);
  assert_eq!(p.buf.len(), 1);
  assert_eq!(t.typ, TT::KeywordLet);

  let t = p.consume();
  assert_eq!(p.next_tok_i, 2);
  assert_eq!(p.buf.len(), 2);
  assert_eq!(t.typ, TT::Identifier);

  p.restore_checkpoint(cp);
  assert_eq!(p.next_tok_i, 0);
  assert_eq!(p.buf.len(), 2);

  // Peeking in a different mode relexes, dropping everything buffered after it.
  let t = p.peek_with_mode(LexMode::SlashIsRegex);
  assert_eq!(p.next_tok_i, 0);
  assert_eq!(p.buf.len(), 1);
  assert_eq!(t.typ, TT::KeywordLet);
}

#[test]
fn test_assignment_shape() {
  let top = parse("a = 1;").unwrap();
  assert_json_eq(
    &top,
    json!({
      "body": [{
        "$t": "Expr",
        "expr": {
          "$t": "Binary",
          "operator": "Assignment",
          "left": { "$t": "IdPat", "name": "a" },
          "right": { "$t": "LitNum", "value": 1.0 },
        },
      }],
    }),
  );
}

#[test]
fn test_destructuring_assignment_shape() {
  let top = parse("[a, , b = 2] = c;").unwrap();
  assert_json_eq(
    &top,
    json!({
      "body": [{
        "$t": "Expr",
        "expr": {
          "$t": "Binary",
          "operator": "Assignment",
          "left": {
            "$t": "ArrPat",
            "elements": [
              { "target": { "$t": "Id", "name": "a" }, "default_value": null },
              null,
              {
                "target": { "$t": "Id", "name": "b" },
                "default_value": { "$t": "LitNum", "value": 2.0 },
              },
            ],
            "rest": null,
          },
          "right": { "$t": "Id", "name": "c" },
        },
      }],
    }),
  );
}

#[test]
fn test_unary_binds_tighter_than_exponent() {
  let Expr::Binary(bin) = parse_expr("-x ** 2") else {
    panic!("expected binary expression");
  };
  assert!(matches!(bin.stx.left.stx.as_ref(), Expr::Unary(_)));
}

#[test]
fn test_regex_and_division() {
  let Expr::Binary(bin) = parse_expr("x = /a/g / 2") else {
    panic!("expected assignment");
  };
  let Expr::Binary(div) = bin.stx.right.stx.as_ref() else {
    panic!("expected division");
  };
  match div.stx.left.stx.as_ref() {
    Expr::LitRegex(re) => assert_eq!(re.stx.value, "/a/g"),
    other => panic!("expected regex, got {:?}", other),
  };
}

#[test]
fn test_asi() {
  let stmts = parse_stmts("let a = 1\nlet b = 2\na\n++b\nreturn_()\n");
  assert_eq!(stmts.len(), 5);
  // `++` after a line break is a prefix of the next statement.
  match &stmts[3] {
    Stmt::Expr(e) => assert!(matches!(e.stx.expr.stx.as_ref(), Expr::Unary(_))),
    other => panic!("expected prefix increment, got {:?}", other),
  };
}

#[test]
fn test_return_asi() {
  let stmts = parse_stmts("function f() {\n  return\n  1\n}");
  let Stmt::FunctionDecl(decl) = &stmts[0] else {
    panic!("expected function declaration");
  };
  let crate::ast::func::FuncBody::Block(body) = &decl.stx.function.stx.body else {
    panic!("expected block body");
  };
  assert_eq!(body.len(), 2);
  assert!(matches!(body[0].stx.as_ref(), Stmt::Return(r) if r.stx.value.is_none()));
}

#[test]
fn test_for_statements() {
  let stmts = parse_stmts(
    "for (var i = 0, n = a.length; i < n; i++) {}\nfor (const k in o) f(k);\nfor (x of xs) {}\nfor (;;) break;",
  );
  assert!(matches!(&stmts[0], Stmt::ForTriple(_)));
  match &stmts[1] {
    Stmt::ForIn(f) => assert!(matches!(f.stx.lhs, ForInOfLhs::Decl { .. })),
    other => panic!("expected for-in, got {:?}", other),
  };
  match &stmts[2] {
    Stmt::ForOf(f) => assert!(matches!(f.stx.lhs, ForInOfLhs::Assign(_))),
    other => panic!("expected for-of, got {:?}", other),
  };
  assert!(matches!(&stmts[3], Stmt::ForTriple(_)));
}

#[test]
fn test_arrow_or_grouping() {
  assert!(matches!(parse_expr("(a, b) => a + b"), Expr::ArrowFunc(_)));
  assert!(matches!(parse_expr("(a, b)"), Expr::Binary(_)));
  assert!(matches!(parse_expr("async x => x"), Expr::ArrowFunc(_)));
  assert!(matches!(parse_expr("async (x)"), Expr::Call(_)));
  assert!(matches!(parse_expr("x => ({ x })"), Expr::ArrowFunc(_)));
}

#[test]
fn test_let_as_identifier() {
  let stmts = parse_stmts("let = 1; let.x = 2; let x;");
  assert!(matches!(&stmts[0], Stmt::Expr(_)));
  assert!(matches!(&stmts[1], Stmt::Expr(_)));
  assert!(matches!(&stmts[2], Stmt::VarDecl(_)));
}

#[test]
fn test_class_members() {
  let stmts = parse_stmts(
    "class A extends B { static x = 1; y; get z() { return 1 } set z(v) {} static async *gen() {} static() {} }",
  );
  let Stmt::ClassDecl(class) = &stmts[0] else {
    panic!("expected class");
  };
  assert!(class.stx.extends.is_some());
  assert_eq!(class.stx.members.len(), 6);
  assert!(class.stx.members[0].stx.static_);
  assert!(!class.stx.members[5].stx.static_);
}

#[test]
fn test_object_literal_members() {
  let Expr::Binary(bin) = parse_expr("o = { a, b: 1, [c]: 2, get d() { return 1 }, e() {}, ...f, 'g': 3 }")
  else {
    panic!("expected assignment");
  };
  let Expr::LitObj(obj) = bin.stx.right.stx.as_ref() else {
    panic!("expected object literal");
  };
  assert_eq!(obj.stx.members.len(), 7);
}

#[test]
fn test_non_decimal_number_keeps_raw() {
  let Expr::LitNum(num) = parse_expr("0x1F") else {
    panic!("expected number");
  };
  assert_eq!(num.stx.value.0, 31.0);
  assert_eq!(
    num.assoc.get::<NumberLiteralRaw>(),
    Some(&NumberLiteralRaw("0x1F".to_string()))
  );
  let Expr::LitNum(num) = parse_expr("31") else {
    panic!("expected number");
  };
  assert!(num.assoc.get::<NumberLiteralRaw>().is_none());
}

#[test]
fn test_new_and_member_chains() {
  let Expr::New(new) = parse_expr("new a.b.C") else {
    panic!("expected new");
  };
  assert!(new.stx.arguments.is_empty());
  assert!(matches!(new.stx.callee.stx.as_ref(), Expr::Member(_)));
  // The call belongs to the `new`, then the member access applies to the result.
  assert!(matches!(parse_expr("new A(1).b"), Expr::Member(_)));
  assert!(matches!(parse_expr("a?.[0]?.(1)"), Expr::Call(_)));
}

#[test]
fn test_generators_and_async() {
  let stmts = parse_stmts("function* g() { yield; yield* h(); }\nasync function f() { await x; }\nvar yield_ = yield;");
  assert_eq!(stmts.len(), 3);
}

#[test]
fn test_try_switch_labels() {
  let stmts = parse_stmts(
    "outer: for (;;) { try { f() } catch { continue outer } finally { g() } }\nswitch (x) { case 1: a(); break; default: b() }",
  );
  assert!(matches!(&stmts[0], Stmt::Label(_)));
  match &stmts[1] {
    Stmt::Switch(s) => {
      assert_eq!(s.stx.branches.len(), 2);
      assert!(s.stx.branches[1].stx.case.is_none());
    }
    other => panic!("expected switch, got {:?}", other),
  };
}

#[test]
fn test_template() {
  let Expr::LitTemplate(tpl) = parse_expr("`a${b}c${d}`") else {
    panic!("expected template");
  };
  assert_eq!(tpl.stx.parts.len(), 5);
  assert!(matches!(parse_expr("tag`x`"), Expr::TaggedTemplate(_)));
}

#[test]
fn test_errors() {
  assert_eq!(
    parse_err("try {}"),
    SyntaxErrorType::TryStatementHasNoCatchOrFinally
  );
  assert_eq!(
    parse_err("throw\nx"),
    SyntaxErrorType::LineTerminatorAfterThrow
  );
  assert_eq!(parse_err("1 = 2"), SyntaxErrorType::InvalidAssigmentTarget);
  assert_eq!(parse_err("a?.b = 2"), SyntaxErrorType::InvalidAssigmentTarget);
  assert_eq!(parse_err("(a"), SyntaxErrorType::RequiredTokenNotFound(TT::ParenthesisClose));
  assert_eq!(
    parse_err("f(a b)"),
    SyntaxErrorType::ExpectedSyntax("expression operator")
  );
  assert_eq!(parse_err("a +"), SyntaxErrorType::UnexpectedEnd);
}
