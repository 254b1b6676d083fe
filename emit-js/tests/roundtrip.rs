use emit_js::emit_js;
use parse_js::ast::node::Node;
use parse_js::ast::stx::TopLevel;
use serde_json::Value;
use similar::TextDiff;

fn parse(source: &str) -> Node<TopLevel> {
  parse_js::parse(source).unwrap_or_else(|err| panic!("failed to parse {source:?}: {err:?}"))
}

fn syntax_value(node: &Node<TopLevel>) -> Value {
  serde_json::to_value(&node.stx).expect("serialize syntax")
}

fn check_roundtrip(source: &str) {
  let parsed = parse(source);
  let emitted = emit_js(&parsed).expect("emit");
  let reparsed = parse_js::parse(&emitted)
    .unwrap_or_else(|err| panic!("emitted code does not parse: {err:?}\n{emitted}"));
  assert_eq!(
    syntax_value(&parsed),
    syntax_value(&reparsed),
    "roundtrip mismatch\nsource:\n{source}\nemitted:\n{emitted}"
  );

  // Printing is stable once the code has been through the printer.
  let emitted_again = emit_js(&reparsed).expect("emit");
  if emitted != emitted_again {
    let diff = TextDiff::from_lines(&emitted, &emitted_again);
    panic!(
      "printing is not stable for {source:?}:\n{}",
      diff.unified_diff().header("first", "second")
    );
  };
}

#[test]
fn roundtrips_operator_precedence() {
  for source in [
    "a + b * c / d % e - f ** g;",
    "(a + b) * c;",
    "a - (b - c);",
    "(a ** b) ** c;",
    "a ** b ** c;",
    "(-a) ** 2;",
    "x = (a, b);",
    "a ? b ? c : d : e ? f : g;",
    "(a ? b : c) ? d : e;",
    "a = b ? (c, d) : e;",
    "(a ?? b) || c;",
    "a ?? (b && c);",
    "a = b = c += d;",
    "void 0, typeof x, !y, -(-z), +(+w), - --v, delete a[b];",
    "(a || b) && (c | d) ^ e & f;",
    "a << b >>> c >= d instanceof e == f;",
  ] {
    check_roundtrip(source);
  }
}

#[test]
fn roundtrips_statement_start_ambiguities() {
  for source in [
    "(function () {})();",
    "(function f() {}).call(this);",
    "(class {}).name;",
    "({}).x;",
    "({a} = b);",
    "[a, b] = [b, a];",
    "(async function () {})();",
    "x = function () {};",
  ] {
    check_roundtrip(source);
  }
}

#[test]
fn roundtrips_numbers_and_receivers() {
  for source in [
    "1..toString();",
    "1.5.toFixed(2);",
    "(0x1F).toString(16);",
    "x = 1e21 + 5e-7 + .5 + 0b101 + 0o17;",
    "y = 10n + 0x1fn;",
    "/re/g.test(s);",
  ] {
    check_roundtrip(source);
  }
}

#[test]
fn roundtrips_new_and_calls() {
  for source in [
    "new (f())();",
    "new a.b.C(1);",
    "new (a().b)();",
    "new X;",
    "new A(1).b;",
    "a?.b?.[c]?.(d);",
    "f(...args, x = 1);",
  ] {
    check_roundtrip(source);
  }
}

#[test]
fn roundtrips_templates() {
  for source in [
    "`a${b}c${`d${e}`}`;",
    "tag`x${y}\\n`;",
    "`line\nbreak`;",
  ] {
    check_roundtrip(source);
  }
}

#[test]
fn roundtrips_classes_and_objects() {
  for source in [
    "class A extends B { static x = 1; y; get z() { return 1; } set z(v) {} static async *gen() { yield* h(); } static() {} constructor() { super(); } }",
    "class C extends (a, b) {}",
    "o = { a, b: 1, [c]: 2, get d() { return 1; }, e() {}, ...f, 'g-h': 3, 4: 5, async *i() {} };",
    "x = async (a) => ({a});",
    "y = () => {};",
    "z = (a, b = 1, ...c) => a + b;",
  ] {
    check_roundtrip(source);
  }
}

#[test]
fn roundtrips_patterns() {
  for source in [
    "function f({a, b: c = 1, ...r}, [d, , e = 2, ...g], ...h) { return a; }",
    "const {x, y: [z]} = o, [p, , r] = q;",
    "({a, b: {c}} = d);",
    "try { a(); } catch ({message}) { b(message); }",
  ] {
    check_roundtrip(source);
  }
}

#[test]
fn roundtrips_statements() {
  for source in [
    "if (a) b(); else if (c) d(); else { e(); }",
    "if (a) { if (b) c(); } else d();",
    "for (var i = 0, n = (a in b); i < n; i++) { continue; }",
    "for ((a in b); ;) break;",
    "for (const k in o) f(k);",
    "for (x of y) {}",
    "switch (x) { case 1: a(); break; default: b(); }",
    "try { a(); } catch { b(); } finally { c(); }",
    "outer: while (x) { break outer; }",
    "do x++; while (x < 5);",
    "do { x--; } while (x)",
    "with (o) f();",
    "function* g() { yield; yield* h(); }",
    "async function f() { await x; return; }",
    "debugger; ; throw new Error('x');",
    "let = 1; let.x = 2; let x;",
  ] {
    check_roundtrip(source);
  }
}
