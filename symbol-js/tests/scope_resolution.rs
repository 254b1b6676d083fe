use derive_visitor::Drive;
use derive_visitor::Visitor;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::CallExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::node::Node;
use parse_js::parse;
use symbol_js::compute_symbols;
use symbol_js::symbol::Scope;
use symbol_js::symbol::ScopeType;
use symbol_js::TopLevelMode;

type IdPatNode = Node<IdPat>;
type IdExprNode = Node<IdExpr>;
type CallExprNode = Node<CallExpr>;

#[derive(Default, Visitor)]
#[visitor(IdPatNode(enter), IdExprNode(enter), CallExprNode(enter))]
struct ScopeCollector {
  name: &'static str,
  decl_scope: Option<Scope>,
  use_scope: Option<Scope>,
  call_scopes: Vec<(String, Scope)>,
}

impl ScopeCollector {
  fn new(name: &'static str) -> Self {
    ScopeCollector {
      name,
      ..Default::default()
    }
  }

  pub fn enter_id_pat_node(&mut self, node: &IdPatNode) {
    if node.stx.name == self.name && self.decl_scope.is_none() {
      self.decl_scope = Some(node.assoc.get::<Scope>().unwrap().clone());
    }
  }

  pub fn enter_id_expr_node(&mut self, node: &IdExprNode) {
    if node.stx.name == self.name {
      self.use_scope = Some(node.assoc.get::<Scope>().unwrap().clone());
    }
  }

  pub fn enter_call_expr_node(&mut self, node: &CallExprNode) {
    if let Expr::Id(callee) = node.stx.callee.stx.as_ref() {
      self.call_scopes.push((
        callee.stx.name.clone(),
        node.assoc.get::<Scope>().unwrap().clone(),
      ));
    }
  }
}

#[test]
fn resolves_outer_let_with_declaration_scope() {
  let mut top_level = parse(
    r#"
      function outer() {
        let value = 1;
        return function inner() {
          return value;
        };
      }
    "#,
  )
  .unwrap();

  compute_symbols(&mut top_level, TopLevelMode::Global);

  let mut collector = ScopeCollector::new("value");
  top_level.drive(&mut collector);

  let decl_scope = collector.decl_scope.expect("declaration scope captured");
  let use_scope = collector.use_scope.expect("usage scope captured");

  assert_ne!(decl_scope, use_scope, "declaration should be in an outer closure");

  let (resolved_scope, symbol) = use_scope
    .find_symbol_with_scope("value")
    .expect("symbol should resolve across nested closures");

  assert_eq!(resolved_scope, decl_scope, "should return the declaration scope");
  assert_eq!(resolved_scope.data().typ(), ScopeType::NonArrowFunction);

  let decl_symbol = decl_scope
    .find_symbol("value")
    .expect("declaration scope should contain symbol");
  assert_eq!(symbol, decl_symbol);
}

#[test]
fn hoists_var_and_function_declarations_out_of_blocks() {
  let mut top_level = parse(
    r#"
      function outer() {
        {
          var hoisted = 1;
          let scoped = 2;
          function nested() {}
        }
        hoisted;
      }
    "#,
  )
  .unwrap();
  let global = compute_symbols(&mut top_level, TopLevelMode::Global);

  let mut collector = ScopeCollector::new("hoisted");
  top_level.drive(&mut collector);
  let use_scope = collector.use_scope.expect("usage scope captured");
  assert_eq!(use_scope.data().typ(), ScopeType::NonArrowFunction);
  assert_eq!(
    use_scope.data().symbol_names(),
    &vec!["hoisted".to_string(), "nested".to_string()]
  );
  assert!(use_scope.find_symbol("scoped").is_none());
  assert!(global.data().get_symbol("outer").is_some());
}

#[test]
fn attaches_call_scopes() {
  let mut top_level = parse("var d = 1; function f() { g(); { h(); } }").unwrap();
  let global = compute_symbols(&mut top_level, TopLevelMode::Global);

  let mut collector = ScopeCollector::new("");
  top_level.drive(&mut collector);
  let [(g_name, g_scope), (h_name, h_scope)] = &collector.call_scopes[..] else {
    panic!("expected two calls");
  };
  assert_eq!(g_name, "g");
  assert_eq!(h_name, "h");
  assert_eq!(g_scope.data().typ(), ScopeType::NonArrowFunction);
  assert_eq!(h_scope.data().typ(), ScopeType::Block);
  assert_eq!(h_scope.parent().as_ref(), Some(g_scope));
  assert_eq!(
    h_scope.self_and_ancestors().last().as_ref(),
    Some(&global)
  );
  let (decl_scope, _) = h_scope.find_symbol_with_scope("d").unwrap();
  assert_eq!(decl_scope, global);
}

#[test]
fn named_function_expression_binds_own_name() {
  let mut top_level = parse("var f = function fact(n) { return fact(n - 1); };").unwrap();
  let global = compute_symbols(&mut top_level, TopLevelMode::Global);
  assert!(global.data().get_symbol("fact").is_none());

  let mut collector = ScopeCollector::new("");
  top_level.drive(&mut collector);
  let (_, call_scope) = &collector.call_scopes[0];
  let (decl_scope, _) = call_scope.find_symbol_with_scope("fact").unwrap();
  assert_eq!(&decl_scope, call_scope);
  assert!(decl_scope.data().get_symbol("n").is_some());
}
