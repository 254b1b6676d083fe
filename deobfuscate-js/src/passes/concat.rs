use super::str_lit;
use crate::pipeline::Pass;
use crate::pipeline::PassStats;
use derive_visitor::DriveMut;
use derive_visitor::VisitorMut;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::ast::stx::TopLevel;
use parse_js::operator::OperatorName;
use tracing::debug;

/// Folds `+` chains whose every leaf is a string literal into one literal.
pub struct ConcatFoldPass;

impl Pass for ConcatFoldPass {
  fn name(&self) -> &'static str {
    "string-concat"
  }

  fn run(&mut self, top: &mut Node<TopLevel>) -> PassStats {
    let mut visitor = ConcatVisitor {
      stats: PassStats::default(),
    };
    top.drive_mut(&mut visitor);
    visitor.stats
  }
}

type ExprNode = Node<Expr>;

#[derive(VisitorMut)]
#[visitor(ExprNode(exit))]
struct ConcatVisitor {
  stats: PassStats,
}

impl ConcatVisitor {
  fn exit_expr_node(&mut self, node: &mut ExprNode) {
    if !matches!(node.stx.as_ref(), Expr::Binary(bin) if bin.stx.operator == OperatorName::Addition)
    {
      return;
    };
    let mut leaves = Vec::new();
    if collect_leaves(node, &mut leaves).is_none() {
      return;
    };
    let value = leaves.concat();
    debug!(
      "Concatenated strings: {} -> {:?}",
      leaves
        .iter()
        .map(|s| format!("{:?}", s))
        .collect::<Vec<_>>()
        .join(" + "),
      value
    );
    *node.stx = str_lit(node.loc, value);
    self.stats.record();
  }
}

/// Pushes the string leaves of a `+` tree in source order, or gives up on the first leaf that
/// isn't a string literal.
fn collect_leaves<'a>(expr: &'a Node<Expr>, out: &mut Vec<&'a str>) -> Option<()> {
  match expr.stx.as_ref() {
    Expr::LitStr(lit) => {
      out.push(&lit.stx.value);
      Some(())
    }
    Expr::Binary(bin) if bin.stx.operator == OperatorName::Addition => {
      collect_leaves(&bin.stx.left, out)?;
      collect_leaves(&bin.stx.right, out)
    }
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::passes::test_util::reprint;
  use crate::passes::test_util::run_pass;

  #[test]
  fn folds_nested_chains() {
    let (out, _) = run_pass(&mut ConcatFoldPass, r#"x = "a" + ("b" + "c");"#);
    assert_eq!(out, "x = \"abc\";\n");
    let (out, _) = run_pass(&mut ConcatFoldPass, r#"x = (("a" + "b") + "c") + 'd';"#);
    assert_eq!(out, "x = \"abcd\";\n");
  }

  #[test]
  fn folds_string_subtrees_only() {
    let (out, rewrites) = run_pass(&mut ConcatFoldPass, r#"x = y + ("a" + "b");"#);
    assert_eq!(out, "x = y + \"ab\";\n");
    assert_eq!(rewrites, 1);
  }

  #[test]
  fn leaves_mixed_chains() {
    for source in [r#"x = "a" + 1;"#, r#"x = 1 + 2 + "a";"#, r#"x = "a" - "b";"#] {
      let (out, rewrites) = run_pass(&mut ConcatFoldPass, source);
      assert_eq!(out, reprint(source));
      assert_eq!(rewrites, 0);
    }
  }

  #[test]
  fn keeps_escapes() {
    let (out, _) = run_pass(&mut ConcatFoldPass, r#"x = "a\n" + "\"b\"";"#);
    assert_eq!(out, "x = \"a\\n\\\"b\\\"\";\n");
  }
}
