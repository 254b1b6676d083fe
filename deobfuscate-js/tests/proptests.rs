use deobfuscate_js::deobfuscate;
use parse_js::parse;
use proptest::prelude::*;

fn ident() -> impl Strategy<Value = String> {
  const CHARS: &[u8] = b"abcefhjklmnopqrsuvwxyz";
  prop::collection::vec(prop::sample::select(CHARS.to_vec()), 1..6)
    .prop_map(|bytes| format!("v_{}", String::from_utf8(bytes).unwrap()))
}

fn number() -> impl Strategy<Value = String> {
  prop_oneof![
    (0u32..1000).prop_map(|n| n.to_string()),
    (0u32..1000).prop_map(|n| format!("0x{n:x}")),
    (0u32..64).prop_map(|n| format!("0b{n:b}")),
    (0u32..64).prop_map(|n| format!("0o{n:o}")),
  ]
}

fn arithmetic() -> impl Strategy<Value = String> {
  let leaf = number();
  leaf.prop_recursive(3, 12, 2, |inner| {
    (
      inner.clone(),
      prop::sample::select(vec!["+", "-", "*", "/", "%", "**"]),
      inner,
    )
      .prop_map(|(l, op, r)| format!("({l} {op} {r})"))
  })
}

fn concat() -> impl Strategy<Value = String> {
  prop::collection::vec("[a-z]{0,3}", 1..5).prop_map(|parts| {
    parts
      .iter()
      .map(|p| format!("\"{p}\""))
      .collect::<Vec<_>>()
      .join(" + ")
  })
}

// A string table, its decoder, an alias and some lookups, in or out of range.
fn table_program() -> impl Strategy<Value = String> {
  (
    prop::collection::vec("[a-z]{1,4}", 1..6),
    0u32..20,
    prop::collection::vec(0u32..30, 1..4),
    ident(),
  )
    .prop_map(|(strings, offset, lookups, alias)| {
      let elements = strings
        .iter()
        .map(|s| format!("\"{s}\""))
        .collect::<Vec<_>>()
        .join(", ");
      let calls = lookups
        .iter()
        .map(|i| format!("{alias}({i})"))
        .collect::<Vec<_>>()
        .join(", ");
      format!(
        "var tbl = [{elements}]; function dec(i) {{ return tbl[i - {offset}]; }} var {alias} = dec; use({calls});"
      )
    })
}

fn statement() -> impl Strategy<Value = String> {
  prop_oneof![
    (ident(), arithmetic()).prop_map(|(name, expr)| format!("var {name} = {expr};")),
    (ident(), concat()).prop_map(|(name, expr)| format!("{name} = {expr};")),
    (ident(), "[a-z]{1,5}").prop_map(|(obj, key)| format!("{obj}[\"{key}\"]();")),
    (arithmetic(), ident()).prop_map(|(expr, name)| format!(
      "function Qc(a, b) {{ return a * b + {name}; }} out(Qc({expr}, {name}));"
    )),
    (arithmetic(), ident()).prop_map(|(expr, name)| format!(
      "function Pc(a) {{ return a + {name}; }} function Qc(a, b) {{ return Pc(a) * b; }} out(Qc({expr}, {name}));"
    )),
    table_program(),
  ]
}

fn program() -> impl Strategy<Value = String> {
  prop::collection::vec(statement(), 1..6).prop_map(|stmts| stmts.join("\n"))
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn outputs_parse_and_are_fixed_points(source in program()) {
    let first = deobfuscate(&source);
    prop_assert!(first.is_ok(), "deobfuscate failed: {:?}", first.err());
    let first = first.unwrap();

    let parsed = parse(&first);
    prop_assert!(parsed.is_ok(), "output failed to parse: {:?}\n{}", parsed.err(), first);

    let second = deobfuscate(&first);
    prop_assert!(second.is_ok(), "second run failed: {:?}", second.err());
    let second = second.unwrap();
    prop_assert_eq!(first.as_str(), second.as_str());
  }
}
