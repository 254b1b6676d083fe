use emit_js::emit_expr;
use parse_js::ast::expr::lit::LitNullExpr;
use parse_js::ast::expr::lit::LitNumExpr;
use parse_js::ast::expr::lit::LitStrExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::loc::Loc;
use parse_js::num::JsNumber;

mod concat;
mod inline;
mod member;
mod numeric;
mod rename;
mod strings;

pub use concat::ConcatFoldPass;
pub use inline::FunctionInlinerPass;
pub use member::BracketToDotPass;
pub use numeric::NumericSimplifierPass;
pub use rename::RenamePass;
pub use strings::StringDeobfuscatorPass;

fn str_lit(loc: Loc, value: String) -> Expr {
  Expr::LitStr(Node::new(loc, LitStrExpr { value }))
}

fn num_lit(loc: Loc, value: f64) -> Expr {
  Expr::LitNum(Node::new(loc, LitNumExpr {
    value: JsNumber(value),
  }))
}

// Placeholder left in a slot while its previous contents are moved out.
fn dummy_expr(loc: Loc) -> Expr {
  Expr::LitNull(Node::new(loc, LitNullExpr {}))
}

/// Source text of an expression for log messages.
fn describe(expr: &Node<Expr>) -> String {
  emit_expr(expr).unwrap_or_else(|_| "<unprintable>".to_string())
}

#[cfg(test)]
mod test_util {
  use crate::pipeline::Pass;
  use emit_js::emit_js;
  use parse_js::parse;

  /// Runs one pass over `source` and prints the result.
  pub fn run_pass(pass: &mut dyn Pass, source: &str) -> (String, usize) {
    let mut top = parse(source).unwrap();
    let stats = pass.run(&mut top);
    (emit_js(&top).unwrap(), stats.rewrites)
  }

  /// Prints `source` without any pass applied, for comparing against untouched programs.
  pub fn reprint(source: &str) -> String {
    emit_js(&parse(source).unwrap()).unwrap()
  }
}
