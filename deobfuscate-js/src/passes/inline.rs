//! Replaces calls to small helper functions with the expression the helper returns.
//!
//! Only helpers of the form `function f(a, b) { return <expr>; }` are considered, and only when
//! the binding is never reassigned. A call is rewritten when doing so cannot change what the
//! program computes: every argument is accounted for, free names in the body still mean the same
//! thing at the call site, and arguments with side effects (or that read a variable something
//! could reassign) are still evaluated once, in order, before the body does anything else.
//!
//! The pass repeats until a round inlines nothing, so helpers that call other helpers are fully
//! expanded. Helpers that call themselves, directly or through others, are never inlined.

use crate::options::FunctionInlinerOptions;
use crate::pipeline::Pass;
use crate::pipeline::PassStats;
use ahash::HashMap;
use ahash::HashMapExt;
use ahash::HashSet;
use ahash::HashSetExt;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use derive_visitor::Visitor;
use derive_visitor::VisitorMut;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::pat::Pat;
use parse_js::ast::expr::BinaryExpr;
use parse_js::ast::expr::CallArg;
use parse_js::ast::expr::CallExpr;
use parse_js::ast::expr::ComputedMemberExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::expr::MemberExpr;
use parse_js::ast::expr::ThisExpr;
use parse_js::ast::func::Func;
use parse_js::ast::func::FuncBody;
use parse_js::ast::node::LeadingComment;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::decl::FuncDecl;
use parse_js::ast::stmt::decl::VarDecl;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stx::TopLevel;
use parse_js::operator::OperatorName;
use symbol_js::compute_symbols;
use symbol_js::symbol::Scope;
use symbol_js::symbol::Symbol;
use symbol_js::TopLevelMode;
use tracing::debug;

pub struct FunctionInlinerPass {
  options: FunctionInlinerOptions,
}

impl FunctionInlinerPass {
  pub fn new(options: FunctionInlinerOptions) -> Self {
    Self { options }
  }
}

impl Pass for FunctionInlinerPass {
  fn name(&self) -> &'static str {
    "function-inliner"
  }

  fn run(&mut self, top: &mut Node<TopLevel>) -> PassStats {
    let mut stats = PassStats::default();
    // An inlined body can bring calls to other helpers with it; those are picked up on the next
    // round, once symbols have been recomputed for the new nodes.
    for round in 0..MAX_ROUNDS {
      let rewrites = self.run_round(top);
      debug!(round, rewrites, "inlining round finished");
      if rewrites == 0 {
        break;
      };
      stats.rewrites += rewrites;
    }
    stats
  }
}

// Bounds how deep a chain of helpers calling helpers is expanded.
const MAX_ROUNDS: usize = 32;

impl FunctionInlinerPass {
  fn run_round(&self, top: &mut Node<TopLevel>) -> usize {
    compute_symbols(top, TopLevelMode::Global);
    let mut collector = TemplateCollector {
      options: &self.options,
      templates: HashMap::new(),
    };
    top.drive(&mut collector);
    let mut templates = collector.templates;
    drop_recursive(&mut templates);
    if templates.is_empty() {
      return 0;
    };
    let mut inliner = Inliner {
      options: &self.options,
      templates: &templates,
      stats: PassStats::default(),
    };
    top.drive_mut(&mut inliner);
    inliner.stats.rewrites
  }
}

/// A helper whose body is a single returned expression.
struct Template {
  params: Vec<String>,
  body: Node<Expr>,
  // The function's own scope, used to check what the body's free names refer to.
  scope: Scope,
}

fn template_of(func: &Node<Func>) -> Option<Template> {
  if func.stx.async_ || func.stx.generator || func.stx.arrow {
    return None;
  };
  let mut params = Vec::new();
  for param in func.stx.parameters.iter() {
    if param.stx.rest || param.stx.default_value.is_some() {
      return None;
    };
    let Pat::Id(id) = param.stx.pattern.stx.pat.stx.as_ref() else {
      return None;
    };
    if params.contains(&id.stx.name) {
      return None;
    };
    params.push(id.stx.name.clone());
  }
  let FuncBody::Block(stmts) = &func.stx.body else {
    return None;
  };
  let [stmt] = stmts.as_slice() else {
    return None;
  };
  let Stmt::Return(ret) = stmt.stx.as_ref() else {
    return None;
  };
  let body = ret.stx.value.as_ref()?;
  if uses_receiver(body) {
    return None;
  };
  Some(Template {
    params,
    body: body.clone(),
    scope: func.assoc.get::<Scope>()?.clone(),
  })
}

/// Removes helpers that reach themselves through their own body or other helpers' bodies;
/// expanding them would never finish.
fn drop_recursive(templates: &mut HashMap<Symbol, Template>) {
  let calls: HashMap<Symbol, Vec<Symbol>> = templates
    .iter()
    .map(|(&symbol, template)| {
      let callees = names_in(&template.body)
        .names
        .iter()
        .filter_map(|name| template.scope.find_symbol(name))
        .filter(|callee| templates.contains_key(callee))
        .collect();
      (symbol, callees)
    })
    .collect();
  for &symbol in calls.keys() {
    if reaches(&calls, symbol, symbol) {
      debug!(symbol = symbol.id(), "Skipping recursive function");
      templates.remove(&symbol);
    };
  }
}

fn reaches(calls: &HashMap<Symbol, Vec<Symbol>>, from: Symbol, target: Symbol) -> bool {
  let mut seen = HashSet::new();
  let mut stack: Vec<Symbol> = calls.get(&from).cloned().unwrap_or_default();
  while let Some(symbol) = stack.pop() {
    if symbol == target {
      return true;
    };
    if seen.insert(symbol) {
      if let Some(next) = calls.get(&symbol) {
        stack.extend(next.iter().copied());
      };
    };
  }
  false
}

type FuncDeclNode = Node<FuncDecl>;
type VarDeclNode = Node<VarDecl>;

#[derive(Visitor)]
#[visitor(FuncDeclNode(enter), VarDeclNode(enter))]
struct TemplateCollector<'a> {
  options: &'a FunctionInlinerOptions,
  templates: HashMap<Symbol, Template>,
}

impl TemplateCollector<'_> {
  fn record(&mut self, scope: &Scope, name: &str, func: &Node<Func>) {
    if !self.options.is_tracked(name) {
      return;
    };
    let Some(symbol) = scope.find_symbol(name) else {
      return;
    };
    let Some(template) = template_of(func) else {
      return;
    };
    debug!("Found inlinable function {}", name);
    self.templates.insert(symbol, template);
  }

  fn enter_func_decl_node(&mut self, node: &FuncDeclNode) {
    let name = &node.stx.name;
    let Some(scope) = name.assoc.get::<Scope>() else {
      return;
    };
    self.record(scope, &name.stx.name, &node.stx.function);
  }

  fn enter_var_decl_node(&mut self, node: &VarDeclNode) {
    for declarator in node.stx.declarators.iter() {
      let Pat::Id(target) = declarator.pattern.stx.pat.stx.as_ref() else {
        continue;
      };
      let Some(Expr::Func(func)) = declarator.initializer.as_ref().map(|i| i.stx.as_ref()) else {
        continue;
      };
      let Some(scope) = target.assoc.get::<Scope>() else {
        continue;
      };
      self.record(scope, &target.stx.name, &func.stx.func);
    }
  }
}

type ExprNode = Node<Expr>;

// Exit order means arguments are inlined before the call that receives them.
#[derive(VisitorMut)]
#[visitor(ExprNode(exit))]
struct Inliner<'a> {
  options: &'a FunctionInlinerOptions,
  templates: &'a HashMap<Symbol, Template>,
  stats: PassStats,
}

impl Inliner<'_> {
  fn exit_expr_node(&mut self, node: &mut ExprNode) {
    let Expr::Call(call) = node.stx.as_ref() else {
      return;
    };
    let Some((name, mut replacement)) = self.inline(call) else {
      return;
    };
    debug!("Inlined {} call", name);
    if self.options.annotate {
      // A call exposed by an earlier round keeps the note naming the outermost helper.
      let note = node
        .assoc
        .remove::<LeadingComment>()
        .unwrap_or_else(|| LeadingComment(format!("{} function call", name)));
      replacement.assoc.set(note);
    };
    *node = replacement;
    self.stats.record();
  }

  fn inline(&self, call: &Node<CallExpr>) -> Option<(String, Node<Expr>)> {
    if call.stx.optional_chaining {
      return None;
    };
    let name = call.stx.callee.stx.as_id()?;
    if !self.options.is_tracked(name) {
      return None;
    };
    let scope = call.assoc.get::<Scope>()?;
    let (home, symbol) = scope.find_symbol_with_scope(name)?;
    if !home.data().symbol_usage(symbol).is_constant() {
      return None;
    };
    let template = self.templates.get(&symbol)?;

    if call.stx.arguments.len() != template.params.len()
      || call.stx.arguments.iter().any(|arg| arg.stx.spread)
    {
      return None;
    };
    let args: Vec<&Node<Expr>> = call.stx.arguments.iter().map(|a| &a.stx.value).collect();

    if !free_names_agree(template, scope) {
      return None;
    };
    if !preserves_evaluation_order(template, &args, scope) {
      return None;
    };

    let bindings: HashMap<&str, &Node<Expr>> = template
      .params
      .iter()
      .map(String::as_str)
      .zip(args.iter().copied())
      .collect();
    let replacement = substitute(&template.body, &bindings)?;
    Some((name.to_string(), replacement))
  }
}

/// Every name the body reads that isn't a parameter must resolve to the same binding from the
/// call site as from inside the function, or be undeclared in both places.
fn free_names_agree(template: &Template, call_scope: &Scope) -> bool {
  names_in(&template.body)
    .names
    .iter()
    .filter(|name| !template.params.contains(*name))
    .all(|name| {
      let inside = template.scope.find_symbol(name);
      let outside = call_scope.find_symbol(name);
      inside == outside
    })
}

type IdExprNode = Node<IdExpr>;
type IdPatNode = Node<IdPat>;
type ThisExprNode = Node<ThisExpr>;

#[derive(Visitor)]
#[visitor(IdExprNode(enter), IdPatNode(enter), ThisExprNode(enter))]
struct NameCollector {
  names: HashSet<String>,
  this: bool,
}

impl NameCollector {
  fn enter_id_expr_node(&mut self, node: &IdExprNode) {
    self.names.insert(node.stx.name.clone());
  }

  fn enter_id_pat_node(&mut self, node: &IdPatNode) {
    self.names.insert(node.stx.name.clone());
  }

  fn enter_this_expr_node(&mut self, _node: &ThisExprNode) {
    self.this = true;
  }
}

fn names_in(expr: &Node<Expr>) -> NameCollector {
  let mut names = NameCollector {
    names: HashSet::new(),
    this: false,
  };
  expr.drive(&mut names);
  names
}

// `this` and `arguments` mean something else once the body is outside its function.
fn uses_receiver(body: &Node<Expr>) -> bool {
  let names = names_in(body);
  names.this || names.names.contains("arguments")
}

fn mentions_any(expr: &Node<Expr>, bindings: &HashMap<&str, &Node<Expr>>) -> bool {
  names_in(expr)
    .names
    .iter()
    .any(|name| bindings.contains_key(name.as_str()))
}

/// Copies `expr` with parameters replaced by their arguments. Identifiers, non-assignment binary
/// operators, calls and member accesses are rebuilt; anything else is copied as is, which is
/// only allowed when no parameter appears inside it.
fn substitute(
  expr: &Node<Expr>,
  bindings: &HashMap<&str, &Node<Expr>>,
) -> Option<Node<Expr>> {
  let stx = match expr.stx.as_ref() {
    Expr::Id(id) => match bindings.get(id.stx.name.as_str()) {
      Some(arg) => return Some((*arg).clone()),
      None => Expr::Id(id.clone()),
    },
    Expr::Binary(bin) if !bin.stx.operator.is_assignment() => {
      Expr::Binary(Node::new(bin.loc, BinaryExpr {
        operator: bin.stx.operator,
        left: substitute(&bin.stx.left, bindings)?,
        right: substitute(&bin.stx.right, bindings)?,
      }))
    }
    Expr::Call(call) => {
      let callee = match call.stx.callee.stx.as_ref() {
        // A parameter in callee position would be left dangling.
        Expr::Id(id) if bindings.contains_key(id.stx.name.as_str()) => return None,
        Expr::Id(_) => call.stx.callee.clone(),
        _ => substitute(&call.stx.callee, bindings)?,
      };
      let mut arguments = Vec::with_capacity(call.stx.arguments.len());
      for arg in call.stx.arguments.iter() {
        arguments.push(Node::new(arg.loc, CallArg {
          spread: arg.stx.spread,
          value: substitute(&arg.stx.value, bindings)?,
        }));
      }
      Expr::Call(Node::new(call.loc, CallExpr {
        optional_chaining: call.stx.optional_chaining,
        callee,
        arguments,
      }))
    }
    Expr::Member(member) => Expr::Member(Node::new(member.loc, MemberExpr {
      optional_chaining: member.stx.optional_chaining,
      left: substitute(&member.stx.left, bindings)?,
      right: member.stx.right.clone(),
    })),
    Expr::ComputedMember(member) => {
      Expr::ComputedMember(Node::new(member.loc, ComputedMemberExpr {
        optional_chaining: member.stx.optional_chaining,
        object: substitute(&member.stx.object, bindings)?,
        member: substitute(&member.stx.member, bindings)?,
      }))
    }
    _ => {
      if mentions_any(expr, bindings) {
        return None;
      };
      return Some(expr.clone());
    }
  };
  Some(Node::new(expr.loc, stx))
}

/// Something the inlined body would do, in the order it would do it.
#[derive(Clone, Copy, PartialEq, Debug)]
enum Step {
  Read { param: usize, conditional: bool },
  Effect,
}

fn record_steps(expr: &Node<Expr>, params: &[String], conditional: bool, out: &mut Vec<Step>) {
  match expr.stx.as_ref() {
    Expr::Id(id) => {
      if let Some(param) = params.iter().position(|p| p == &id.stx.name) {
        out.push(Step::Read { param, conditional });
      };
    }
    Expr::Binary(bin) if bin.stx.operator.is_assignment() => out.push(Step::Effect),
    Expr::Binary(bin) => {
      record_steps(&bin.stx.left, params, conditional, out);
      let short_circuits = bin.stx.operator.is_logical()
        || bin.stx.operator == OperatorName::NullishCoalescing;
      record_steps(&bin.stx.right, params, conditional || short_circuits, out);
    }
    Expr::Call(call) => {
      record_steps(&call.stx.callee, params, conditional, out);
      let conditional = conditional || call.stx.optional_chaining;
      for arg in call.stx.arguments.iter() {
        record_steps(&arg.stx.value, params, conditional, out);
      }
      out.push(Step::Effect);
    }
    Expr::Member(member) => {
      record_steps(&member.stx.left, params, conditional, out);
      out.push(Step::Effect);
    }
    Expr::ComputedMember(member) => {
      record_steps(&member.stx.object, params, conditional, out);
      let conditional = conditional || member.stx.optional_chaining;
      record_steps(&member.stx.member, params, conditional, out);
      out.push(Step::Effect);
    }
    Expr::LitNum(_)
    | Expr::LitStr(_)
    | Expr::LitBool(_)
    | Expr::LitNull(_)
    | Expr::LitBigInt(_)
    | Expr::This(_) => {}
    _ => out.push(Step::Effect),
  }
}

/// An argument that can be evaluated any number of times, at any point, or not at all, without
/// anyone noticing. A variable only qualifies if nothing can assign to it in between.
fn is_pure(expr: &Node<Expr>, scope: &Scope) -> bool {
  match expr.stx.as_ref() {
    Expr::LitNum(_)
    | Expr::LitStr(_)
    | Expr::LitBool(_)
    | Expr::LitNull(_)
    | Expr::LitBigInt(_)
    | Expr::This(_) => true,
    Expr::Id(id) => scope
      .resolve_usage(&id.stx.name)
      .is_some_and(|usage| usage.is_constant()),
    Expr::Unary(unary) => {
      matches!(
        unary.stx.operator,
        OperatorName::UnaryNegation | OperatorName::LogicalNot
      ) && matches!(
        unary.stx.argument.stx.as_ref(),
        Expr::LitNum(_) | Expr::LitBool(_)
      )
    }
    _ => false,
  }
}

/// A call evaluates every argument once, left to right, before the body runs. The inlined
/// expression must do the same for any argument with side effects: read it exactly once,
/// unconditionally, in parameter order, and before the body does anything observable.
fn preserves_evaluation_order(template: &Template, args: &[&Node<Expr>], scope: &Scope) -> bool {
  let impure: Vec<usize> = (0..args.len())
    .filter(|&i| !is_pure(args[i], scope))
    .collect();
  if impure.is_empty() {
    return true;
  };
  let mut steps = Vec::new();
  record_steps(&template.body, &template.params, false, &mut steps);

  let mut next = 0;
  for step in steps {
    match step {
      Step::Read { param, conditional } if impure.contains(&param) => {
        if conditional || impure.get(next) != Some(&param) {
          return false;
        };
        next += 1;
      }
      Step::Read { .. } => {}
      Step::Effect if next < impure.len() => return false,
      Step::Effect => {}
    }
  }
  next == impure.len()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::passes::test_util::reprint;
  use crate::passes::test_util::run_pass;

  fn inline_with(options: FunctionInlinerOptions, source: &str) -> (String, usize) {
    run_pass(&mut FunctionInlinerPass::new(options), source)
  }

  fn inline(source: &str) -> String {
    inline_with(FunctionInlinerOptions::default().with_annotate(false), source).0
  }

  fn assert_untouched(source: &str) {
    let (out, rewrites) = inline_with(FunctionInlinerOptions::default(), source);
    assert_eq!(out, reprint(source), "{}", source);
    assert_eq!(rewrites, 0, "{}", source);
  }

  #[test]
  fn inlines_tracked_helpers() {
    assert_eq!(
      inline("function Qc(a, b) { return a + b; } x = Qc(1, y);"),
      "function Qc(a, b) {\n  return a + b;\n}\nx = 1 + y;\n"
    );
    assert_eq!(
      inline("var Pc = function (o, k) { return o[k]; }; f(Pc(window, \"name\"));"),
      "var Pc = function (o, k) {\n  return o[k];\n};\nf(window[\"name\"]);\n"
    );
  }

  #[test]
  fn annotates_inlined_calls() {
    let (out, rewrites) = inline_with(
      FunctionInlinerOptions::default().with_annotate(true),
      "function Qc(a, b) { return a * b; } x = Qc(y + 1, 2);",
    );
    assert_eq!(
      out,
      "function Qc(a, b) {\n  return a * b;\n}\nx = /* Qc function call */ (y + 1) * 2;\n"
    );
    assert_eq!(rewrites, 1);
  }

  #[test]
  fn only_tracked_names_by_default() {
    assert_untouched("function add(a, b) { return a + b; } x = add(1, 2);");
    let (out, rewrites) = inline_with(
      FunctionInlinerOptions::default()
        .tracking_all()
        .with_annotate(false),
      "function add(a, b) { return a + b; } x = add(1, 2);",
    );
    assert_eq!(out, "function add(a, b) {\n  return a + b;\n}\nx = 1 + 2;\n");
    assert_eq!(rewrites, 1);
  }

  #[test]
  fn skips_reassigned_bindings() {
    assert_untouched("function Qc(a) { return a; } Qc = g; x = Qc(1);");
    assert_untouched("var Qc = function (a) { return a; }; Qc = g; x = Qc(1);");
  }

  #[test]
  fn skips_unsupported_shapes() {
    for source in [
      // Argument count.
      "function Qc(a, b) { return a + b; } x = Qc(1);",
      "function Qc(a) { return a; } x = Qc(1, 2);",
      "function Qc(a) { return a; } x = Qc(...y);",
      // Body.
      "function Qc(a) { f(); return a; } x = Qc(1);",
      "function Qc(a) { return; } x = Qc(1);",
      "function Qc(a) { return this.a; } x = Qc(1);",
      "function Qc() { return arguments[0]; } x = Qc();",
      "async function Qc(a) { return a; } x = Qc(1);",
      // Parameters.
      "function Qc({ a }) { return a; } x = Qc(y);",
      "function Qc(a = 1) { return a; } x = Qc(y);",
      "function Qc(...a) { return a; } x = Qc(y);",
      // Call.
      "function Qc(a) { return a; } x = Qc?.(1);",
    ] {
      assert_untouched(source);
    }
  }

  #[test]
  fn skips_parameters_that_would_dangle() {
    for source in [
      "function Qc(a) { return a ? 1 : 2; } x = Qc(y);",
      "function Qc(a) { return !a; } x = Qc(y);",
      "function Qc(a) { return a(1); } x = Qc(y);",
      "function Qc(a) { return function () { return a; }; } x = Qc(y);",
    ] {
      assert_untouched(source);
    }
  }

  #[test]
  fn respects_shadowing() {
    // The inner `Qc` is a different binding with no inlinable definition.
    assert_untouched("function Qc(a) { return a; } function g(Qc) { return Qc(1); }");
    assert_eq!(
      inline("function Qc(a) { return a; } function g() { return Qc(1); }"),
      "function Qc(a) {\n  return a;\n}\nfunction g() {\n  return 1;\n}\n"
    );
  }

  #[test]
  fn free_names_must_keep_their_meaning() {
    assert_untouched(
      "var k = 1; function Qc(a) { return a + k; } function g(k) { return Qc(2); }",
    );
    assert_eq!(
      inline("var k = 1; function Qc(a) { return a + k; } function g(j) { return Qc(2); }"),
      "var k = 1;\nfunction Qc(a) {\n  return a + k;\n}\nfunction g(j) {\n  return 2 + k;\n}\n"
    );
  }

  #[test]
  fn impure_arguments_keep_their_order() {
    // Dropped, duplicated, reordered or conditionally evaluated.
    for source in [
      "function Qc(a) { return 1; } x = Qc(f());",
      "function Qc(a) { return a + a; } x = Qc(f());",
      "function Qc(a, b) { return b + a; } x = Qc(f(), g());",
      "function Qc(a, b) { return a && b; } x = Qc(y, g());",
      "function Qc(a) { return h() + a; } x = Qc(f());",
    ] {
      assert_untouched(source);
    }
    assert_eq!(
      inline("function Qc(a, b) { return a + b; } x = Qc(f(), g());"),
      "function Qc(a, b) {\n  return a + b;\n}\nx = f() + g();\n"
    );
    // Constant bindings and literals may move freely.
    assert_eq!(
      inline("var y = 1; function Qc(a, b) { return b + a + a; } x = Qc(y, 2);"),
      "var y = 1;\nfunction Qc(a, b) {\n  return b + a + a;\n}\nx = 2 + y + y;\n"
    );
  }

  #[test]
  fn mutable_variables_are_read_before_the_body_runs() {
    // `h` may assign `y`, so reading it after the call would observe the new value.
    for source in [
      "function Qc(a) { return h() + a; } x = Qc(y);",
      "var y = 1; y = 2; function Qc(a) { return h() + a; } x = Qc(y);",
      "function Qc(a) { return a + a; } x = Qc(y);",
    ] {
      assert_untouched(source);
    }
    assert_eq!(
      inline("var y = 1; function Qc(a) { return h() + a; } x = Qc(y);"),
      "var y = 1;\nfunction Qc(a) {\n  return h() + a;\n}\nx = h() + y;\n"
    );
  }

  #[test]
  fn nested_calls_inline_inside_out() {
    let (out, rewrites) = inline_with(
      FunctionInlinerOptions::default().with_annotate(false),
      "function Qc(a, b) { return a + b; } x = Qc(Qc(1, 2), 3);",
    );
    assert_eq!(out, "function Qc(a, b) {\n  return a + b;\n}\nx = 1 + 2 + 3;\n");
    assert_eq!(rewrites, 2);
  }

  #[test]
  fn helpers_calling_helpers_are_fully_inlined() {
    let (out, rewrites) = inline_with(
      FunctionInlinerOptions::default().with_annotate(false),
      "function Pc(a) { return a + 1; } function Qc(a) { return Pc(a); } x = Qc(1);",
    );
    assert_eq!(
      out,
      "function Pc(a) {\n  return a + 1;\n}\nfunction Qc(a) {\n  return a + 1;\n}\nx = 1 + 1;\n"
    );
    // `Pc(a)` inside `Qc`, `Qc(1)`, then the `Pc(1)` it exposed.
    assert_eq!(rewrites, 3);
  }

  #[test]
  fn annotation_names_the_outermost_helper() {
    let (out, _) = inline_with(
      FunctionInlinerOptions::default().with_annotate(true),
      "function Pc(a) { return a + 1; } function Qc(a) { return Pc(a); } x = Qc(1);",
    );
    assert!(out.ends_with("x = /* Qc function call */ 1 + 1;\n"), "{}", out);
  }

  #[test]
  fn recursive_helpers_are_left_alone() {
    for source in [
      "function Qc(a) { return Qc(a); } x = Qc(1);",
      "function Qc(a) { return Pc(a); } function Pc(a) { return Qc(a); } x = Qc(1);",
      "var Qc = function (a) { return a && Qc(a - 1); }; x = Qc(3);",
    ] {
      assert_untouched(source);
    }
  }
}
