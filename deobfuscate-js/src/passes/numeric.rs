use super::describe;
use super::num_lit;
use crate::pipeline::Pass;
use crate::pipeline::PassStats;
use derive_visitor::DriveMut;
use derive_visitor::VisitorMut;
use parse_js::ast::expr::lit::LitNumExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::ast::node::NumberLiteralRaw;
use parse_js::ast::stx::TopLevel;
use parse_js::operator::OperatorName;
use tracing::debug;

/// Rewrites non-decimal number literals in decimal and evaluates constant arithmetic.
pub struct NumericSimplifierPass;

impl Pass for NumericSimplifierPass {
  fn name(&self) -> &'static str {
    "numeric-simplifier"
  }

  fn run(&mut self, top: &mut Node<TopLevel>) -> PassStats {
    let mut visitor = NumericVisitor {
      stats: PassStats::default(),
    };
    top.drive_mut(&mut visitor);
    visitor.stats
  }
}

type ExprNode = Node<Expr>;
type LitNumExprNode = Node<LitNumExpr>;

// Exit order means operands are folded before the expression that contains them.
#[derive(VisitorMut)]
#[visitor(ExprNode(exit), LitNumExprNode(enter))]
struct NumericVisitor {
  stats: PassStats,
}

impl NumericVisitor {
  fn enter_lit_num_expr_node(&mut self, node: &mut LitNumExprNode) {
    if let Some(NumberLiteralRaw(raw)) = node.assoc.remove::<NumberLiteralRaw>() {
      debug!("Converted {} to {}", raw, node.stx.value);
      self.stats.record();
    };
  }

  fn exit_expr_node(&mut self, node: &mut ExprNode) {
    match node.stx.as_mut() {
      Expr::Binary(bin) if bin.stx.operator.is_assignment() => {
        let right = &mut bin.stx.right;
        if is_plain_literal(right) {
          return;
        };
        let Some(value) = evaluate(right) else {
          return;
        };
        debug!("Evaluated assignment value {} -> {}", describe(right), value);
        *right.stx = num_lit(right.loc, value);
        self.stats.record();
      }
      Expr::Binary(_) | Expr::Unary(_) => {
        let Some(value) = evaluate(node) else {
          return;
        };
        debug!("Evaluated {} -> {}", describe(node), value);
        // Only the syntax is swapped so a leading comment on the slot survives.
        *node.stx = num_lit(node.loc, value);
        self.stats.record();
      }
      _ => {}
    }
  }
}

fn is_plain_literal(expr: &Node<Expr>) -> bool {
  matches!(expr.stx.as_ref(), Expr::LitNum(_))
}

/// The value of `expr` if it is built only from number literals, negation and the supported
/// arithmetic operators.
fn evaluate(expr: &Node<Expr>) -> Option<f64> {
  match expr.stx.as_ref() {
    Expr::LitNum(num) => Some(num.stx.value.0),
    Expr::Unary(unary) if unary.stx.operator == OperatorName::UnaryNegation => {
      evaluate(&unary.stx.argument).map(|v| -v)
    }
    Expr::Binary(bin) => {
      let op = bin.stx.operator;
      if !is_arithmetic(op) {
        return None;
      };
      let left = evaluate(&bin.stx.left)?;
      let right = evaluate(&bin.stx.right)?;
      Some(apply(op, left, right))
    }
    _ => None,
  }
}

fn is_arithmetic(op: OperatorName) -> bool {
  matches!(
    op,
    OperatorName::Addition
      | OperatorName::Subtraction
      | OperatorName::Multiplication
      | OperatorName::Division
      | OperatorName::Exponentiation
      | OperatorName::Remainder
  )
}

// IEEE-754 double arithmetic as the language defines it. `%` on f64 already truncates like JS.
fn apply(op: OperatorName, l: f64, r: f64) -> f64 {
  match op {
    OperatorName::Addition => l + r,
    OperatorName::Subtraction => l - r,
    OperatorName::Multiplication => l * r,
    OperatorName::Division => l / r,
    OperatorName::Remainder => l % r,
    OperatorName::Exponentiation => pow(l, r),
    _ => f64::NAN,
  }
}

// `powf` differs from `**` where the exponent is NaN or the base is ±1 with an infinite exponent.
fn pow(base: f64, exponent: f64) -> f64 {
  if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
    return f64::NAN;
  };
  base.powf(exponent)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::passes::test_util::reprint;
  use crate::passes::test_util::run_pass;

  fn simplify(source: &str) -> String {
    run_pass(&mut NumericSimplifierPass, source).0
  }

  #[test]
  fn folds_arithmetic() {
    assert_eq!(simplify("x = 2 ** 10;"), "x = 1024;\n");
    assert_eq!(simplify("f(7 % 3);"), "f(1);\n");
    assert_eq!(simplify("f(-(-5));"), "f(5);\n");
    assert_eq!(simplify("f((1 + 2) * 3 - 4 / 8);"), "f(8.5);\n");
    assert_eq!(simplify("f(-7 % 3);"), "f(-1);\n");
    assert_eq!(simplify("f(2 - 5);"), "f(-3);\n");
  }

  #[test]
  fn normalizes_radix() {
    let (out, rewrites) = run_pass(&mut NumericSimplifierPass, "f(0x1F, 0o17, 0b11, 017, 10);");
    assert_eq!(out, "f(31, 15, 3, 15, 10);\n");
    assert_eq!(rewrites, 4);
    assert_eq!(simplify("f(0xff + 1);"), "f(256);\n");
  }

  #[test]
  fn non_finite_results_use_division() {
    assert_eq!(simplify("f(1 / 0);"), "f(1/0);\n");
    assert_eq!(simplify("f(-1 / 0);"), "f(-1/0);\n");
    assert_eq!(simplify("f(0 / 0);"), "f(0/0);\n");
    assert_eq!(simplify("f(1 ** (0 / 0));"), "f(0/0);\n");
  }

  #[test]
  fn folds_every_assignment_operator() {
    assert_eq!(simplify("a += 2 * 3;"), "a += 6;\n");
    assert_eq!(simplify("a.b = 1 + 1;"), "a.b = 2;\n");
    assert_eq!(simplify("a = b = 3 - 1;"), "a = b = 2;\n");
  }

  #[test]
  fn leaves_other_operands_alone() {
    for source in [
      "f(a + 1);",
      "f(\"1\" + 2);",
      "f(1 << 2);",
      "f(-a);",
      "f(+1);",
      "f(1 < 2);",
      "a = b;",
    ] {
      let (out, rewrites) = run_pass(&mut NumericSimplifierPass, source);
      assert_eq!(out, reprint(source), "{}", source);
      assert_eq!(rewrites, 0, "{}", source);
    }
  }

  #[test]
  fn partial_folding_inside_larger_expressions() {
    assert_eq!(simplify("f(a + (2 * 3));"), "f(a + 6);\n");
    assert_eq!(simplify("f(a * (1 + 1), 4 - 1);"), "f(a * 2, 3);\n");
  }

  #[test]
  fn output_is_stable() {
    for source in ["f(1 / 0, -1 / 0, 0 / 0, 2 - 5, 0x10, 2 ** -1);"] {
      let once = simplify(source);
      assert_eq!(simplify(&once), once);
    }
  }
}
