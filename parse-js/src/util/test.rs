use serde::Serialize;
use serde_json::to_string_pretty;
use serde_json::Value;
use similar::ChangeTag;
use similar::TextDiff;

/// Compares the serialized form of `actual` against `expected`, panicking with a line diff of the
/// pretty-printed JSON on mismatch.
pub fn assert_json_eq<T: Serialize>(actual: &T, expected: Value) {
  let actual = serde_json::to_value(actual).unwrap();
  if actual == expected {
    return;
  };
  let expected_fmt = to_string_pretty(&expected).unwrap();
  let actual_fmt = to_string_pretty(&actual).unwrap();
  let mut msg = String::from("AST mismatch:\n");
  let diff = TextDiff::from_lines(&expected_fmt, &actual_fmt);
  for change in diff.iter_all_changes() {
    let sign = match change.tag() {
      ChangeTag::Delete => "-",
      ChangeTag::Insert => "+",
      ChangeTag::Equal => " ",
    };
    msg.push_str(sign);
    msg.push_str(change.as_str().unwrap());
    if change.missing_newline() {
      msg.push('\n');
    };
  }
  panic!("{}", msg);
}
