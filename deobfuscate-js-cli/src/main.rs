use clap::ArgAction;
use clap::Parser;
use deobfuscate_js::deobfuscate_with_options;
use deobfuscate_js::DeobfuscateOptions;
use deobfuscate_js::ElementDecoding;
use deobfuscate_js::FunctionInlinerOptions;
use deobfuscate_js::StringDeobfuscatorOptions;
use deobfuscate_js::DEFAULT_ROTATED_ARRAY;
use deobfuscate_js::DEFAULT_ROTATION;
use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
  name = "deobfuscate-js",
  about = "Recover readable source from obfuscated JavaScript"
)]
struct Cli {
  /// File to deobfuscate; omit for stdin.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Output destination; omit for stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Decode string table elements with ROT13.
  #[arg(long)]
  rot13: bool,

  /// Name of the string table stored pre-rotated.
  #[arg(long, default_value = DEFAULT_ROTATED_ARRAY)]
  rotated_array: String,

  /// How far the rotated string table is shifted left.
  #[arg(long, default_value_t = DEFAULT_ROTATION)]
  rotation: usize,

  /// Helper function eligible for inlining. Repeat to track several; replaces the built-in list.
  #[arg(long = "track", value_name = "NAME", action = ArgAction::Append)]
  track: Vec<String>,

  /// Inline every qualifying helper function, whatever its name.
  #[arg(long, conflicts_with = "track")]
  track_all: bool,

  /// Prefix inlined expressions with a `/* <name> function call */` comment. Annotated output is
  /// not stable when fed back in, since comments are not parsed.
  #[arg(long)]
  annotate: bool,

  /// JSON file mapping old identifier names to new ones, applied after every other pass.
  #[arg(long, value_name = "FILE")]
  rename_map: Option<PathBuf>,

  /// Log every rewrite to stderr.
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn options(&self) -> Result<DeobfuscateOptions, String> {
    let decoding = if self.rot13 {
      ElementDecoding::Rot13
    } else {
      ElementDecoding::Verbatim
    };
    let strings = StringDeobfuscatorOptions::default()
      .with_rotated_array(self.rotated_array.clone(), self.rotation)
      .with_element_decoding(decoding);

    let mut inliner = FunctionInlinerOptions::default().with_annotate(self.annotate);
    if self.track_all {
      inliner = inliner.tracking_all();
    } else if !self.track.is_empty() {
      inliner = inliner.with_tracked(self.track.iter().cloned());
    };

    let mut opts = DeobfuscateOptions::new()
      .with_strings(strings)
      .with_inliner(inliner);
    if let Some(path) = &self.rename_map {
      opts = opts.with_rename_map(read_rename_map(path)?);
    };
    Ok(opts)
  }
}

fn read_rename_map(path: &Path) -> Result<BTreeMap<String, String>, String> {
  let raw = fs::read_to_string(path)
    .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
  serde_json::from_str(&raw).map_err(|err| {
    format!(
      "{} is not a JSON object of string renames: {err}",
      path.display()
    )
  })
}

/// `DEOBFUSCATE_LOG` takes precedence over `RUST_LOG`. Without either, nothing is logged unless
/// `--verbose` is passed.
fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else if let Ok(val) = std::env::var("DEOBFUSCATE_LOG") {
    EnvFilter::builder().parse_lossy(val)
  } else if std::env::var("RUST_LOG").is_ok() {
    EnvFilter::from_default_env()
  } else {
    return;
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

fn exit_with_error(message: impl AsRef<str>) -> ! {
  eprintln!("error: {}", message.as_ref());
  process::exit(1);
}

fn main() {
  let args = Cli::parse();
  init_tracing(args.verbose);

  let options = match args.options() {
    Ok(options) => options,
    Err(err) => exit_with_error(err),
  };

  let mut input = Vec::new();
  let mut input_file: Box<dyn Read> = match args.input.as_ref() {
    Some(p) => match File::open(p) {
      Ok(f) => Box::new(f),
      Err(err) => exit_with_error(format!("failed to open {}: {err}", p.display())),
    },
    None => Box::new(stdin()),
  };
  if let Err(err) = input_file.read_to_end(&mut input) {
    exit_with_error(format!("failed to read input: {err}"));
  };
  let source = match std::str::from_utf8(&input) {
    Ok(source) => source,
    Err(err) => exit_with_error(format!("input is not valid UTF-8: {err}")),
  };
  debug!(bytes = source.len(), "read input");

  let output = match deobfuscate_with_options(&options, source) {
    Ok(output) => output,
    Err(err) => exit_with_error(err.to_string()),
  };

  let write_result = match args.output.as_ref() {
    Some(p) => File::create(p)
      .and_then(|mut file| file.write_all(output.as_bytes()))
      .map_err(|err| (p.display().to_string(), err)),
    None => stdout()
      .write_all(output.as_bytes())
      .map_err(|err| ("<stdout>".to_string(), err)),
  };
  if let Err((dest, err)) = write_result {
    exit_with_error(format!("failed to write {dest}: {err}"));
  };
}
