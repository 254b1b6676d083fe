use parse_js::parse;
use symbol_js::compute_symbols;
use symbol_js::symbol::Scope;
use symbol_js::symbol::ScopeType;
use symbol_js::symbol::SymbolGenerator;
use symbol_js::TopLevelMode;

#[test]
fn find_symbol_returns_decl_scope() {
  let generator = SymbolGenerator::new();
  let global = Scope::new(generator.clone(), None, ScopeType::Global);
  global.data_mut().add_symbol("global".into());

  let func = global.create_child_scope(ScopeType::NonArrowFunction);
  func.data_mut().add_symbol("func".into());

  let block = func.create_child_scope(ScopeType::Block);
  block.data_mut().add_symbol("block".into());

  let inner = block.create_child_scope(ScopeType::Block);

  let (scope, _) = inner
    .find_symbol_with_scope("block")
    .expect("symbol in block scope");
  assert_eq!(scope, block);

  let (scope, _) = inner
    .find_symbol_with_scope("func")
    .expect("symbol in function scope");
  assert_eq!(scope, func);

  let (scope, _) = inner
    .find_symbol_with_scope("global")
    .expect("symbol in global scope");
  assert_eq!(scope, global);
}

#[test]
fn find_symbol_stops_at_matching_scope_predicate() {
  let generator = SymbolGenerator::new();
  let global = Scope::new(generator.clone(), None, ScopeType::Global);
  global.data_mut().add_symbol("name".into());

  let block = global.create_child_scope(ScopeType::Block);
  let inner = block.create_child_scope(ScopeType::ArrowFunction);

  assert!(inner
    .find_symbol_up_to_with_scope("name", |t| t == ScopeType::Block)
    .is_none());

  block.data_mut().add_symbol("name".into());

  let (scope, _) = inner
    .find_symbol_up_to_with_scope("name", |t| t == ScopeType::Block)
    .expect("symbol in stopping scope");
  assert_eq!(scope, block);
}

#[test]
fn symbol_declaration_order_is_deterministic() {
  let scope = Scope::new(SymbolGenerator::new(), None, ScopeType::Global);

  {
    let mut data = scope.data_mut();
    data.add_symbol("first".into());
    data.add_symbol("second".into());
    data.add_symbol("first".into());
    data.add_symbol("third".into());
  }

  assert_eq!(
    scope.data().symbol_names(),
    &vec!["first".to_string(), "second".to_string(), "third".to_string()]
  );
}

fn usage_is_constant(source: &str, name: &str) -> bool {
  let mut top_level = parse(source).unwrap();
  let global = compute_symbols(&mut top_level, TopLevelMode::Global);
  let usage = global.resolve_usage(name).expect("binding declared");
  usage.is_constant()
}

#[test]
fn tracks_constant_bindings() {
  assert!(usage_is_constant("function Qc(a) { return a; } Qc(1);", "Qc"));
  assert!(usage_is_constant("const Pc = function (a) { return a; };", "Pc"));
  assert!(usage_is_constant("var pc = 1; pc + 1;", "pc"));
}

#[test]
fn tracks_reassigned_bindings() {
  assert!(!usage_is_constant("function Qc() {} Qc = null;", "Qc"));
  // Assignments before the declaration count too.
  assert!(!usage_is_constant("Qc = null; function Qc() {}", "Qc"));
  assert!(!usage_is_constant("var a = 1; function f() { a += 1; }", "a"));
  assert!(!usage_is_constant("let a = 1; a++;", "a"));
  assert!(!usage_is_constant("let a = 1; --a;", "a"));
  assert!(!usage_is_constant("var a; [a] = [1];", "a"));
  assert!(!usage_is_constant("var a; for (a of []) {}", "a"));
  assert!(!usage_is_constant("function Qc() {} function Qc() {}", "Qc"));
  assert!(!usage_is_constant("var a = 1; var a = 2;", "a"));
}

#[test]
fn shadowed_assignment_does_not_affect_outer_binding() {
  assert!(usage_is_constant(
    "function Qc() {} function f() { let Qc; Qc = 1; }",
    "Qc"
  ));
}
