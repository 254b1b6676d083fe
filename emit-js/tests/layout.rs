use emit_js::emit_js;

fn print(source: &str) -> String {
  let top = parse_js::parse(source).expect("parse");
  emit_js(&top).expect("emit")
}

#[test]
fn prints_one_statement_per_line() {
  assert_eq!(
    print("var a=1,b;function f(x,y){return x+y}"),
    "var a = 1, b;\nfunction f(x, y) {\n  return x + y;\n}\n"
  );
  assert_eq!(print(""), "");
}

#[test]
fn indents_nested_non_block_bodies() {
  assert_eq!(
    print("if(a)b();else{c()}"),
    "if (a)\n  b();\nelse {\n  c();\n}\n"
  );
  assert_eq!(
    print("while(x)if(y)z()"),
    "while (x)\n  if (y)\n    z();\n"
  );
}

#[test]
fn keeps_block_around_inner_if() {
  let top = parse_js::parse("if (a) { if (b) c(); } else d();").expect("parse");
  assert_eq!(
    emit_js(&top).expect("emit"),
    "if (a) {\n  if (b)\n    c();\n} else\n  d();\n"
  );
}

#[test]
fn prints_objects_multiline_and_arrays_inline() {
  assert_eq!(
    print("x={a:1,'b-c':[1,,2],d(){}}"),
    "x = {\n  a: 1,\n  \"b-c\": [1, , 2],\n  d() {}\n};\n"
  );
  assert_eq!(print("x={}"), "x = {};\n");
}

#[test]
fn wraps_statement_starts() {
  assert_eq!(print("(function(){})()"), "(function () {})();\n");
  assert_eq!(print("({}).x"), "({}.x);\n");
  assert_eq!(print("({a}=b)"), "({a} = b);\n");
}

#[test]
fn keeps_required_parentheses_only() {
  assert_eq!(print("new (f())()"), "new (f())();\n");
  assert_eq!(print("(a ?? (b || c))"), "a ?? (b || c);\n");
  assert_eq!(print("((a + b)) * (c)"), "(a + b) * c;\n");
  assert_eq!(print("x = (1, 2)"), "x = (1, 2);\n");
}

#[test]
fn prints_switch_and_loops() {
  assert_eq!(
    print("switch(x){case 1:a();break;default:b()}"),
    "switch (x) {\n  case 1:\n    a();\n    break;\n  default:\n    b();\n}\n"
  );
  assert_eq!(print("for(;;){}"), "for (;;) {}\n");
  assert_eq!(print("for (x in y) z();"), "for (x in y) {\n  z();\n}\n");
}

#[test]
fn uses_double_quotes() {
  assert_eq!(print("x = 'it\\'s'"), "x = \"it's\";\n");
}
