//! Replaces calls to string-table decoder functions with the strings they return.
//!
//! Obfuscators hoist every string literal into an array and read them back through a small
//! function that subtracts a fixed offset from its argument:
//!
//! ```js
//! var arr = ["x", "y", "z"];
//! function d(i) { return arr[i - 5]; }
//! var g = d;
//! g(6); // "y"
//! ```
//!
//! The first traversal records, per scope, which names hold string arrays, which hold functions
//! and which are plain aliases of another name. The second resolves each call's callee through
//! those tables, starting from the scope the call appears in.

use super::describe;
use super::str_lit;
use crate::options::ElementDecoding;
use crate::options::StringDeobfuscatorOptions;
use crate::pipeline::Pass;
use crate::pipeline::PassStats;
use ahash::HashMap;
use ahash::HashSet;
use ahash::HashSetExt;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use derive_visitor::Visitor;
use derive_visitor::VisitorMut;
use parse_js::ast::expr::lit::LitArrElem;
use parse_js::ast::expr::pat::Pat;
use parse_js::ast::expr::BinaryExpr;
use parse_js::ast::expr::CallExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::func::Func;
use parse_js::ast::func::FuncBody;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::decl::FuncDecl;
use parse_js::ast::stmt::decl::VarDecl;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stx::TopLevel;
use parse_js::operator::OperatorName;
use symbol_js::compute_symbols;
use symbol_js::symbol::Scope;
use symbol_js::TopLevelMode;
use tracing::debug;

pub struct StringDeobfuscatorPass {
  options: StringDeobfuscatorOptions,
}

impl StringDeobfuscatorPass {
  pub fn new(options: StringDeobfuscatorOptions) -> Self {
    Self { options }
  }
}

impl Pass for StringDeobfuscatorPass {
  fn name(&self) -> &'static str {
    "string-deobfuscator"
  }

  fn run(&mut self, top: &mut Node<TopLevel>) -> PassStats {
    // Fresh scopes each run, so the tables below never outlive this call.
    compute_symbols(top, TopLevelMode::Global);
    let mut collector = Collector {
      options: &self.options,
    };
    top.drive(&mut collector);
    let mut resolver = Resolver {
      stats: PassStats::default(),
    };
    top.drive_mut(&mut resolver);
    resolver.stats
  }
}

/// What one decoder function looks like, as far as the rewrite cares.
#[derive(Clone, Debug)]
struct DecoderShape {
  // Subtracted from the call argument to get the array index.
  offset: f64,
  backing_array: Option<String>,
  // The function's own scope; the backing array is resolved from here, not from the call.
  scope: Scope,
}

/// Per-scope tables, hung off the scope that declares each name.
#[derive(Default)]
struct ScopedAnalysisState {
  string_arrays: HashMap<String, Vec<String>>,
  decoder_functions: HashMap<String, DecoderShape>,
  function_aliases: HashMap<String, String>,
}

/// The scope a name used in `from` binds to. Undeclared names are implicit globals and live in
/// the root scope.
fn binding_scope(from: &Scope, name: &str) -> Scope {
  match from.find_symbol_with_scope(name) {
    Some((scope, _)) => scope,
    None => from
      .self_and_ancestors()
      .last()
      .unwrap_or_else(|| from.clone()),
  }
}

fn with_state<R>(scope: &Scope, f: impl FnOnce(&ScopedAnalysisState) -> Option<R>) -> Option<R> {
  let data = scope.data();
  f(data.get_assoc::<ScopedAnalysisState>()?)
}

// Pass A.

type BinaryExprNode = Node<BinaryExpr>;
type FuncDeclNode = Node<FuncDecl>;
type VarDeclNode = Node<VarDecl>;

#[derive(Visitor)]
#[visitor(BinaryExprNode(enter), FuncDeclNode(enter), VarDeclNode(enter))]
struct Collector<'a> {
  options: &'a StringDeobfuscatorOptions,
}

impl Collector<'_> {
  fn enter_binary_expr_node(&mut self, node: &BinaryExprNode) {
    if node.stx.operator != OperatorName::Assignment {
      return;
    };
    let Expr::IdPat(target) = node.stx.left.stx.as_ref() else {
      return;
    };
    let Some(scope) = target.assoc.get::<Scope>() else {
      return;
    };
    self.record_binding(scope, &target.stx.name, &node.stx.right);
  }

  fn enter_func_decl_node(&mut self, node: &FuncDeclNode) {
    let name = &node.stx.name;
    let Some(scope) = name.assoc.get::<Scope>() else {
      return;
    };
    let Some(shape) = analyze_decoder(&node.stx.function) else {
      return;
    };
    let home = binding_scope(scope, &name.stx.name);
    home
      .data_mut()
      .get_or_insert_assoc::<ScopedAnalysisState>()
      .decoder_functions
      .insert(name.stx.name.clone(), shape);
  }

  fn enter_var_decl_node(&mut self, node: &VarDeclNode) {
    for declarator in node.stx.declarators.iter() {
      let Pat::Id(target) = declarator.pattern.stx.pat.stx.as_ref() else {
        continue;
      };
      let Some(init) = &declarator.initializer else {
        continue;
      };
      let Some(scope) = target.assoc.get::<Scope>() else {
        continue;
      };
      self.record_binding(scope, &target.stx.name, init);
    }
  }

  fn record_binding(&self, scope: &Scope, name: &str, value: &Node<Expr>) {
    enum Binding {
      Array(Vec<String>),
      Decoder(DecoderShape),
      Alias(String),
    }

    let binding = match value.stx.as_ref() {
      Expr::LitArr(_) => match self.string_array(name, value) {
        Some(values) => Binding::Array(values),
        None => return,
      },
      Expr::Func(func) => match analyze_decoder(&func.stx.func) {
        Some(shape) => Binding::Decoder(shape),
        None => return,
      },
      Expr::ArrowFunc(func) => match analyze_decoder(&func.stx.func) {
        Some(shape) => Binding::Decoder(shape),
        None => return,
      },
      // `a = a` says nothing about where `a` came from.
      Expr::Id(source) if source.stx.name != name => Binding::Alias(source.stx.name.clone()),
      _ => return,
    };

    let home = binding_scope(scope, name);
    let mut data = home.data_mut();
    let state = data.get_or_insert_assoc::<ScopedAnalysisState>();
    match binding {
      Binding::Array(values) => {
        debug!("Found string array {} with {} elements", name, values.len());
        state.string_arrays.insert(name.to_string(), values);
      }
      Binding::Decoder(shape) => {
        state.decoder_functions.insert(name.to_string(), shape);
      }
      Binding::Alias(source) => {
        state.function_aliases.insert(name.to_string(), source);
      }
    };
  }

  /// The decoded elements of an array literal made only of string literals.
  fn string_array(&self, name: &str, value: &Node<Expr>) -> Option<Vec<String>> {
    let Expr::LitArr(arr) = value.stx.as_ref() else {
      return None;
    };
    let mut values = arr
      .stx
      .elements
      .iter()
      .map(|elem| match elem {
        LitArrElem::Single(expr) => expr.stx.as_str_lit().map(|s| self.decode(s)),
        LitArrElem::Rest(_) | LitArrElem::Empty => None,
      })
      .collect::<Option<Vec<_>>>()?;
    // The one table obfuscated bundles ship pre-rotated; no other name is touched.
    if name == self.options.rotated_array && !values.is_empty() {
      let len = values.len();
      values.rotate_left(self.options.rotation % len);
    };
    Some(values)
  }

  fn decode(&self, raw: &str) -> String {
    match self.options.element_decoding {
      ElementDecoding::Verbatim => raw.to_string(),
      ElementDecoding::Rot13 => rot13(raw),
    }
  }
}

fn rot13(raw: &str) -> String {
  raw
    .chars()
    .map(|c| match c {
      'a'..='z' => (((c as u8 - b'a') + 13) % 26 + b'a') as char,
      'A'..='Z' => (((c as u8 - b'A') + 13) % 26 + b'A') as char,
      _ => c,
    })
    .collect()
}

/// Reads the offset and backing array off a function's top-level statements. Returns `None` for
/// functions without a body or scope, which can never be decoders.
fn analyze_decoder(func: &Node<Func>) -> Option<DecoderShape> {
  let scope = func.assoc.get::<Scope>()?.clone();
  let params = func
    .stx
    .parameters
    .iter()
    .filter_map(|p| match p.stx.pattern.stx.pat.stx.as_ref() {
      Pat::Id(id) => Some(id.stx.name.as_str()),
      _ => None,
    })
    .collect::<Vec<_>>();

  let mut offset = None;
  let mut backing_array = None;
  let on_return = |value: &Node<Expr>, offset: &mut Option<f64>, backing: &mut Option<String>| {
    let (object, index) = match value.stx.as_ref() {
      Expr::ComputedMember(member) => (&member.stx.object, Some(&member.stx.member)),
      Expr::Member(member) => (&member.stx.left, None),
      _ => return,
    };
    if backing.is_none() {
      *backing = object.stx.as_id().map(str::to_string);
    };
    if offset.is_none() {
      *offset = index.and_then(|index| param_offset(index, &params));
    };
  };

  match &func.stx.body {
    FuncBody::Block(stmts) => {
      for stmt in stmts {
        match stmt.stx.as_ref() {
          Stmt::Expr(expr) if offset.is_none() => {
            offset = assignment_offset(&expr.stx.expr);
          }
          Stmt::VarDecl(decl) if backing_array.is_none() => {
            backing_array = decl
              .stx
              .declarators
              .iter()
              .filter_map(|d| d.initializer.as_ref())
              .find_map(member_object_name);
          }
          Stmt::Return(ret) => {
            if let Some(value) = &ret.stx.value {
              on_return(value, &mut offset, &mut backing_array);
            };
          }
          _ => {}
        };
      }
    }
    FuncBody::Expression(value) => on_return(value, &mut offset, &mut backing_array),
  };

  Some(DecoderShape {
    offset: offset.unwrap_or(0.0),
    backing_array,
    scope,
  })
}

/// `x = <anything> - N` (or `+ N`), and the compound forms `x -= N` and `x += N`.
fn assignment_offset(expr: &Node<Expr>) -> Option<f64> {
  let Expr::Binary(assign) = expr.stx.as_ref() else {
    return None;
  };
  match assign.stx.operator {
    OperatorName::Assignment => {
      let Expr::Binary(rhs) = assign.stx.right.stx.as_ref() else {
        return None;
      };
      signed_offset(rhs.stx.operator, &rhs.stx.right)
    }
    OperatorName::AssignmentSubtraction => signed_offset(OperatorName::Subtraction, &assign.stx.right),
    OperatorName::AssignmentAddition => signed_offset(OperatorName::Addition, &assign.stx.right),
    _ => None,
  }
}

/// `param - N` or `param + N` used directly as an index.
fn param_offset(index: &Node<Expr>, params: &[&str]) -> Option<f64> {
  let Expr::Binary(bin) = index.stx.as_ref() else {
    return None;
  };
  let param = bin.stx.left.stx.as_id()?;
  if !params.contains(&param) {
    return None;
  };
  signed_offset(bin.stx.operator, &bin.stx.right)
}

fn signed_offset(operator: OperatorName, literal: &Node<Expr>) -> Option<f64> {
  let n = literal.stx.as_num_lit()?;
  match operator {
    OperatorName::Subtraction => Some(n),
    OperatorName::Addition => Some(-n),
    _ => None,
  }
}

fn member_object_name(expr: &Node<Expr>) -> Option<String> {
  let object = match expr.stx.as_ref() {
    Expr::ComputedMember(member) => &member.stx.object,
    Expr::Member(member) => &member.stx.left,
    _ => return None,
  };
  object.stx.as_id().map(str::to_string)
}

// Pass B.

type ExprNode = Node<Expr>;

#[derive(VisitorMut)]
#[visitor(ExprNode(exit))]
struct Resolver {
  stats: PassStats,
}

impl Resolver {
  fn exit_expr_node(&mut self, node: &mut ExprNode) {
    let Expr::Call(call) = node.stx.as_ref() else {
      return;
    };
    let Some(value) = resolve_call(call) else {
      return;
    };
    debug!("Resolved {} to {:?}", describe(node), value);
    *node.stx = str_lit(node.loc, value);
    self.stats.record();
  }
}

fn resolve_call(call: &Node<CallExpr>) -> Option<String> {
  if call.stx.optional_chaining {
    return None;
  };
  let callee = call.stx.callee.stx.as_id()?;
  let [arg] = call.stx.arguments.as_slice() else {
    return None;
  };
  if arg.stx.spread {
    return None;
  };
  let argument = arg.stx.value.stx.as_num_lit()?;
  let call_scope = call.assoc.get::<Scope>()?;

  let (scope, name) = resolve_aliases(call_scope, callee);
  let home = binding_scope(&scope, &name);
  let decoder = with_state(&home, |state| state.decoder_functions.get(&name).cloned())?;
  let array_name = decoder.backing_array.as_deref()?;
  let array_home = binding_scope(&decoder.scope, array_name);

  let index = argument - decoder.offset;
  if !index.is_finite() || index < 0.0 || index.fract() != 0.0 {
    return None;
  };
  with_state(&array_home, |state| {
    let values = state.string_arrays.get(array_name)?;
    values.get(index as usize).cloned()
  })
}

/// Follows `a = b` bindings from `name` until a name that isn't an alias. Each step resolves the
/// next name from the scope holding the alias. A cycle stops at the last name before it repeats.
fn resolve_aliases(scope: &Scope, name: &str) -> (Scope, String) {
  let mut current = (scope.clone(), name.to_string());
  let mut seen = HashSet::new();
  seen.insert(name.to_string());
  loop {
    let home = binding_scope(&current.0, &current.1);
    let Some(next) = with_state(&home, |state| state.function_aliases.get(&current.1).cloned())
    else {
      return current;
    };
    if !seen.insert(next.clone()) {
      return current;
    };
    current = (home, next);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::passes::test_util::reprint;
  use crate::passes::test_util::run_pass;

  fn deobfuscate(source: &str) -> String {
    deobfuscate_with(StringDeobfuscatorOptions::default(), source)
  }

  fn deobfuscate_with(options: StringDeobfuscatorOptions, source: &str) -> String {
    run_pass(&mut StringDeobfuscatorPass::new(options), source).0
  }

  fn assert_unchanged(source: &str) {
    let (out, rewrites) = run_pass(
      &mut StringDeobfuscatorPass::new(StringDeobfuscatorOptions::default()),
      source,
    );
    assert_eq!(out, reprint(source));
    assert_eq!(rewrites, 0);
  }

  const TABLE: &str = r#"
    var arr = ["x", "y", "z"];
    function d(i) { return arr[i - 5]; }
  "#;

  fn last_line(out: &str) -> &str {
    out.trim_end().lines().last().unwrap_or_default()
  }

  #[test]
  fn resolves_direct_calls() {
    let out = deobfuscate(&format!("{TABLE} f(d(6), d(5), d(7));"));
    assert_eq!(last_line(&out), r#"f("y", "x", "z");"#);
  }

  #[test]
  fn leaves_out_of_range_calls() {
    let out = deobfuscate(&format!("{TABLE} f(d(2), d(8), d(5.5), d(x), d(6, 1));"));
    assert_eq!(last_line(&out), "f(d(2), d(8), d(5.5), d(x), d(6, 1));");
  }

  #[test]
  fn follows_alias_chains() {
    let out = deobfuscate(&format!("{TABLE} var g = d; h = g; f(h(6), g(7));"));
    assert_eq!(last_line(&out), r#"f("y", "z");"#);
  }

  #[test]
  fn alias_cycles_do_not_hang() {
    assert_unchanged("a = b; b = a; a(1);");
    let out = deobfuscate(&format!("{TABLE} g = d; g = g; f(g(6));"));
    assert_eq!(last_line(&out), r#"f("y");"#);
  }

  #[test]
  fn resolves_from_nested_scopes() {
    let out = deobfuscate(
      r#"
        function outer() {
          var tbl = ["a", "b"];
          var dec = function (n) {
            n = n - 100;
            var s = tbl[n];
            return s;
          };
          return function inner() {
            var alias = dec;
            return alias(101);
          };
        }
      "#,
    );
    assert!(out.contains("return \"b\";"), "{}", out);
  }

  #[test]
  fn respects_shadowing() {
    let out = deobfuscate(&format!(
      "{TABLE} function f(d) {{ return d(6); }} function g() {{ let arr = []; return d(6); }}"
    ));
    assert!(out.contains("return d(6);"), "{}", out);
    // The decoder reads the outer `arr`, whichever `arr` the call site sees.
    assert!(out.contains("return \"y\";"), "{}", out);
  }

  #[test]
  fn arrow_decoders_and_compound_offsets() {
    let out = deobfuscate(r#"var t = ["p", "q"]; var d = (i) => t[i - 1]; f(d(2), d(-2), d(x));"#);
    assert_eq!(last_line(&out), r#"f("q", d(-2), d(x));"#);
    let out = deobfuscate(r#"var t = ["p", "q"]; var d = (i) => t[i + 3]; f(d(1 - 5));"#);
    assert_eq!(last_line(&out), "f(d(1 - 5));");
    let out = deobfuscate(r#"var t = ["p", "q"]; function d(i) { i -= 10; return t[i]; } f(d(11));"#);
    assert_eq!(last_line(&out), r#"f("q");"#);
  }

  #[test]
  fn offset_sign_follows_operator() {
    assert_eq!(signed_offset(OperatorName::Subtraction, &num(5.0)), Some(5.0));
    assert_eq!(signed_offset(OperatorName::Addition, &num(5.0)), Some(-5.0));
    assert_eq!(signed_offset(OperatorName::Multiplication, &num(5.0)), None);
  }

  fn num(value: f64) -> Node<Expr> {
    Node::new(parse_js::loc::Loc(0, 0), crate::passes::num_lit(parse_js::loc::Loc(0, 0), value))
  }

  #[test]
  fn rotates_reserved_array() {
    let names = (0..300).map(|i| format!("\"s{}\"", i)).collect::<Vec<_>>().join(", ");
    let source = format!("var _0xdd = [{names}]; function d(i) {{ return _0xdd[i]; }} f(d(0), d(78), d(79));");
    let out = deobfuscate(&source);
    assert_eq!(last_line(&out), r#"f("s221", "s299", "s0");"#);

    let other = source.replace("_0xdd", "_0xee");
    let out = deobfuscate(&other);
    assert_eq!(last_line(&out), r#"f("s0", "s78", "s79");"#);
  }

  #[test]
  fn rotation_wraps_short_arrays() {
    let options = StringDeobfuscatorOptions::default().with_rotated_array("tbl", 5);
    let out = deobfuscate_with(
      options,
      r#"var tbl = ["a", "b", "c"]; function d(i) { return tbl[i]; } f(d(0));"#,
    );
    assert_eq!(last_line(&out), r#"f("c");"#);
  }

  #[test]
  fn decodes_rot13_tables() {
    let options = StringDeobfuscatorOptions::default().with_element_decoding(ElementDecoding::Rot13);
    let out = deobfuscate_with(
      options,
      r#"var r = ["nqqRiragYvfgrare", "12-34"]; function n(i) { return r[i]; } f(n(0), n(1));"#,
    );
    assert_eq!(last_line(&out), r#"f("addEventListener", "12-34");"#);
    assert_eq!(rot13(&rot13("Hello, World!")), "Hello, World!");
  }

  #[test]
  fn ignores_unrecognized_shapes() {
    assert_unchanged(r#"var arr = ["x", 1]; function d(i) { return arr[i]; } d(0);"#);
    assert_unchanged(r#"var arr = ["x"]; function d(i) { return i; } d(0);"#);
    assert_unchanged(r#"var arr = ["x"]; function d(i) { return other[i]; } d(0);"#);
    assert_unchanged(r#"var arr = ["x"]; function d(i) { return arr[i]; } d(...a); d?.(0); x.d(0);"#);
    assert_unchanged("function d(i) {} d(0);");
  }
}
