use crate::pipeline::Pass;
use crate::pipeline::PassStats;
use ahash::HashMap;
use derive_visitor::DriveMut;
use derive_visitor::VisitorMut;
use parse_js::ast::class_or_object::ClassOrObjKey;
use parse_js::ast::class_or_object::ClassOrObjMemberDirectKey;
use parse_js::ast::class_or_object::ClassOrObjVal;
use parse_js::ast::class_or_object::ObjMember;
use parse_js::ast::class_or_object::ObjMemberType;
use parse_js::ast::expr::lit::LitNullExpr;
use parse_js::ast::expr::pat::ClassOrFuncName;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::node::Node;
use parse_js::ast::stx::TopLevel;
use parse_js::token::TT;
use tracing::debug;

/// Renames identifiers by name, for both bindings and references. Property names are left alone.
pub struct RenamePass {
  renames: HashMap<String, String>,
}

impl RenamePass {
  pub fn new(renames: HashMap<String, String>) -> Self {
    Self { renames }
  }
}

impl Pass for RenamePass {
  fn name(&self) -> &'static str {
    "identifier-renamer"
  }

  fn run(&mut self, top: &mut Node<TopLevel>) -> PassStats {
    let mut visitor = RenameVisitor {
      renames: &self.renames,
      stats: PassStats::default(),
    };
    top.drive_mut(&mut visitor);
    visitor.stats
  }
}

type ClassOrFuncNameNode = Node<ClassOrFuncName>;
type IdExprNode = Node<IdExpr>;
type IdPatNode = Node<IdPat>;
type ObjMemberNode = Node<ObjMember>;

#[derive(VisitorMut)]
#[visitor(
  ClassOrFuncNameNode(enter),
  IdExprNode(enter),
  IdPatNode(enter),
  ObjMemberNode(enter)
)]
struct RenameVisitor<'a> {
  renames: &'a HashMap<String, String>,
  stats: PassStats,
}

impl RenameVisitor<'_> {
  fn rename(&mut self, name: &mut String) {
    if let Some(new_name) = self.renames.get(name.as_str()) {
      debug!("Renamed {} to {}", name, new_name);
      *name = new_name.clone();
      self.stats.record();
    };
  }

  fn enter_class_or_func_name_node(&mut self, node: &mut ClassOrFuncNameNode) {
    self.rename(&mut node.stx.name);
  }

  fn enter_id_expr_node(&mut self, node: &mut IdExprNode) {
    self.rename(&mut node.stx.name);
  }

  fn enter_id_pat_node(&mut self, node: &mut IdPatNode) {
    self.rename(&mut node.stx.name);
  }

  // `{old}` must keep its key, so it is expanded to `{old: old}` before the value is visited
  // and renamed.
  fn enter_obj_member_node(&mut self, node: &mut ObjMemberNode) {
    let ObjMemberType::Shorthand { id } = &node.stx.typ else {
      return;
    };
    if !self.renames.contains_key(&id.stx.name) {
      return;
    };
    let placeholder = ObjMemberType::Rest {
      val: Node::new(node.loc, Expr::LitNull(Node::new(node.loc, LitNullExpr {}))),
    };
    let ObjMemberType::Shorthand { id } = std::mem::replace(&mut node.stx.typ, placeholder) else {
      return;
    };
    let key = ClassOrObjKey::Direct(Node::new(id.loc, ClassOrObjMemberDirectKey {
      key: id.stx.name.clone(),
      tt: TT::Identifier,
    }));
    let val = ClassOrObjVal::Prop(Some(Node::new(id.loc, Expr::Id(id))));
    node.stx.typ = ObjMemberType::Valued { key, val };
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::passes::test_util::run_pass;

  fn rename(source: &str, renames: &[(&str, &str)]) -> String {
    let renames = renames
      .iter()
      .map(|(from, to)| (from.to_string(), to.to_string()))
      .collect();
    run_pass(&mut RenamePass::new(renames), source).0
  }

  #[test]
  fn renames_bindings_and_references() {
    assert_eq!(
      rename("var W = 0; function on(nn) { return W + nn; }", &[
        ("W", "ZERO"),
        ("on", "isDefined"),
        ("nn", "value"),
      ]),
      "var ZERO = 0;\nfunction isDefined(value) {\n  return ZERO + value;\n}\n"
    );
  }

  #[test]
  fn keeps_property_names() {
    assert_eq!(
      rename("x.W = { W: W, [W]: 1 };", &[("W", "ZERO")]),
      "x.W = {\n  W: ZERO,\n  [ZERO]: 1\n};\n"
    );
  }

  #[test]
  fn expands_shorthand_properties() {
    assert_eq!(
      rename("x = { W, y };", &[("W", "ZERO")]),
      "x = {\n  W: ZERO,\n  y\n};\n"
    );
    assert_eq!(
      rename("var { W } = x;", &[("W", "ZERO")]),
      "var {W: ZERO} = x;\n"
    );
  }

  #[test]
  fn does_not_chain_renames() {
    assert_eq!(rename("f(a, b, { a });", &[("a", "b"), ("b", "c")]), "f(b, c, {\n  a: b\n});\n");
  }
}
