use super::dummy_expr;
use crate::pipeline::Pass;
use crate::pipeline::PassStats;
use derive_visitor::DriveMut;
use derive_visitor::VisitorMut;
use parse_js::ast::expr::ComputedMemberExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::MemberExpr;
use parse_js::ast::node::Node;
use parse_js::ast::stx::TopLevel;
use tracing::debug;

/// Rewrites `a["name"]` as `a.name` when the key is a plain identifier.
pub struct BracketToDotPass;

impl Pass for BracketToDotPass {
  fn name(&self) -> &'static str {
    "bracket-to-dot"
  }

  fn run(&mut self, top: &mut Node<TopLevel>) -> PassStats {
    let mut visitor = BracketToDotVisitor {
      stats: PassStats::default(),
    };
    top.drive_mut(&mut visitor);
    visitor.stats
  }
}

type ExprNode = Node<Expr>;

#[derive(VisitorMut)]
#[visitor(ExprNode(exit))]
struct BracketToDotVisitor {
  stats: PassStats,
}

impl BracketToDotVisitor {
  fn exit_expr_node(&mut self, node: &mut ExprNode) {
    let Expr::ComputedMember(member) = node.stx.as_ref() else {
      return;
    };
    let Some(right) = member
      .stx
      .member
      .stx
      .as_str_lit()
      .filter(|key| is_plain_identifier(key))
      .map(str::to_string)
    else {
      return;
    };

    let expr = std::mem::replace(&mut *node.stx, dummy_expr(node.loc));
    let Expr::ComputedMember(member) = expr else {
      *node.stx = expr;
      return;
    };
    let ComputedMemberExpr {
      optional_chaining,
      object,
      ..
    } = *member.stx;
    debug!("Converted bracket access to dot access: {}", right);
    *node.stx = Expr::Member(Node::new(node.loc, MemberExpr {
      optional_chaining,
      left: object,
      right,
    }));
    self.stats.record();
  }
}

/// `^[A-Za-z_$][A-Za-z0-9_$]*$`. Reserved words qualify, since any identifier name is allowed
/// after a dot.
fn is_plain_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  let Some(first) = chars.next() else {
    return false;
  };
  (first.is_ascii_alphabetic() || first == '_' || first == '$')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
