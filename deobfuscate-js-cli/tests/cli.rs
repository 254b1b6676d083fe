use assert_cmd::Command;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

const OBFUSCATED: &str = r#"var a = ["x", "y", "z"]; function d(i) { return a[i - 5]; } var g = d; f(g(6), 0x10);"#;

fn deobfuscate_js_cli() -> Command {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_deobfuscate-js-cli"));
  cmd
    .timeout(Duration::from_secs(5))
    .env_remove("RUST_LOG")
    .env_remove("DEOBFUSCATE_LOG");
  cmd
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
  String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn reads_stdin_and_writes_stdout() {
  let assert = deobfuscate_js_cli()
    .write_stdin(OBFUSCATED)
    .assert()
    .success()
    .code(0);

  assert!(stdout_of(&assert).ends_with("f(\"y\", 16);\n"));
  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );
}

#[test]
fn reads_and_writes_files() {
  let dir = tempdir().unwrap();
  let input = dir.path().join("in.js");
  let output = dir.path().join("out.js");
  fs::write(&input, "x = 2 ** 10;").unwrap();

  let assert = deobfuscate_js_cli()
    .arg("--input")
    .arg(&input)
    .arg("--output")
    .arg(&output)
    .assert()
    .success();

  assert!(assert.get_output().stdout.is_empty());
  assert_eq!(fs::read_to_string(&output).unwrap(), "x = 1024;\n");
}

#[test]
fn syntax_errors_exit_with_failure() {
  let dir = tempdir().unwrap();
  let output = dir.path().join("out.js");

  let assert = deobfuscate_js_cli()
    .arg("-o")
    .arg(&output)
    .write_stdin("function {")
    .assert()
    .failure()
    .code(1);

  assert!(assert.get_output().stdout.is_empty());
  assert!(
    String::from_utf8_lossy(&assert.get_output().stderr).contains("failed to parse input"),
    "expected a parse error on stderr"
  );
  assert!(!output.exists());
}

#[test]
fn applies_rename_map() {
  let dir = tempdir().unwrap();
  let renames = dir.path().join("renames.json");
  fs::write(&renames, r#"{"W": "ZERO", "on": "isDefined"}"#).unwrap();

  let assert = deobfuscate_js_cli()
    .arg("--rename-map")
    .arg(&renames)
    .write_stdin("var W = 0; on(W);")
    .assert()
    .success();

  assert_eq!(stdout_of(&assert), "var ZERO = 0;\nisDefined(ZERO);\n");
}

#[test]
fn rejects_malformed_rename_map() {
  let dir = tempdir().unwrap();
  let renames = dir.path().join("renames.json");
  fs::write(&renames, r#"["W", "ZERO"]"#).unwrap();

  deobfuscate_js_cli()
    .arg("--rename-map")
    .arg(&renames)
    .write_stdin("var W = 0;")
    .assert()
    .failure()
    .code(1);
}

#[test]
fn inliner_flags() {
  let source = "function add(a, b) { return a + b; } x = add(1, y);";

  let assert = deobfuscate_js_cli()
    .arg("--track")
    .arg("add")
    .write_stdin(source)
    .assert()
    .success();
  assert!(stdout_of(&assert).ends_with("x = 1 + y;\n"));

  let assert = deobfuscate_js_cli()
    .arg("--track-all")
    .arg("--annotate")
    .write_stdin(source)
    .assert()
    .success();
  assert!(stdout_of(&assert).ends_with("x = /* add function call */ 1 + y;\n"));

  let assert = deobfuscate_js_cli().write_stdin(source).assert().success();
  assert!(stdout_of(&assert).ends_with("x = add(1, y);\n"));
}

#[test]
fn output_is_stable_when_fed_back() {
  let source = "function Qc(a, b) { return a + b; } x = Qc(y, 2);";
  let first = deobfuscate_js_cli().write_stdin(source).assert().success();
  let first = stdout_of(&first);
  assert!(first.ends_with("x = y + 2;\n"), "{first}");

  let second = deobfuscate_js_cli()
    .write_stdin(first.clone())
    .assert()
    .success();
  assert_eq!(stdout_of(&second), first);
}

#[test]
fn rot13_flag_decodes_table_elements() {
  let assert = deobfuscate_js_cli()
    .arg("--rot13")
    .write_stdin(r#"var t = ["nqqRiragYvfgrare"]; function d(i) { return t[i - 1]; } w[d(1)](x);"#)
    .assert()
    .success();
  assert!(stdout_of(&assert).ends_with("w.addEventListener(x);\n"));
}

#[test]
fn verbose_logs_to_stderr() {
  let assert = deobfuscate_js_cli()
    .arg("--verbose")
    .write_stdin("x = 1 + 1;")
    .assert()
    .success();
  assert_eq!(stdout_of(&assert), "x = 2;\n");
  assert!(!assert.get_output().stderr.is_empty());
}
