pub use err::DeobfuscateError;
pub use options::DeobfuscateOptions;
pub use options::ElementDecoding;
pub use options::FunctionInlinerOptions;
pub use options::StringDeobfuscatorOptions;
pub use options::DEFAULT_ROTATED_ARRAY;
pub use options::DEFAULT_ROTATION;
pub use options::DEFAULT_TRACKED_FUNCTIONS;
pub use pipeline::Pass;
pub use pipeline::PassStats;
pub use pipeline::Pipeline;

mod err;
mod options;
pub mod passes;
pub mod pipeline;

/// Deobfuscates JavaScript source with the default pass list and options.
///
/// # Arguments
///
/// * `source` - The obfuscated JavaScript source code.
///
/// # Examples
///
/// ```
/// use deobfuscate_js::deobfuscate;
///
/// let code = r#"var a = ["x", "y"]; function d(i) { return a[i - 5]; } f(d(6), 2 ** 10);"#;
/// let out = deobfuscate(code).unwrap();
/// assert!(out.ends_with("f(\"y\", 1024);\n"));
/// ```
pub fn deobfuscate(source: &str) -> Result<String, DeobfuscateError> {
  deobfuscate_with_options(&DeobfuscateOptions::default(), source)
}

/// Deobfuscates JavaScript source with the default pass list, configured by `opts`.
///
/// # Examples
///
/// ```
/// use deobfuscate_js::{deobfuscate_with_options, DeobfuscateOptions};
///
/// let opts = DeobfuscateOptions::new().with_rename_map([("W", "ZERO")]);
/// let out = deobfuscate_with_options(&opts, "var W = 0x0;").unwrap();
/// assert_eq!(out, "var ZERO = 0;\n");
/// ```
pub fn deobfuscate_with_options(
  opts: &DeobfuscateOptions,
  source: &str,
) -> Result<String, DeobfuscateError> {
  Pipeline::with_options(opts).run(source)
}
