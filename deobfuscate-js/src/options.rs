use ahash::HashMap;

/// Name of the string table that obfuscated bundles store pre-rotated.
pub const DEFAULT_ROTATED_ARRAY: &str = "_0xdd";
/// How far the rotated string table is shifted left before use (0xdd).
pub const DEFAULT_ROTATION: usize = 221;
/// Helper functions the inliner tracks unless told otherwise.
pub const DEFAULT_TRACKED_FUNCTIONS: &[&str] = &[
  "Qc", "Pc", "pc", "$n", "wc", "Ac", "Zn", "Gn", "Nc", "Fc", "Vc",
];

/// How string table elements are turned into the literals that replace decoder calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ElementDecoding {
  #[default]
  Verbatim,
  Rot13,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringDeobfuscatorOptions {
  /// The one array name that gets rotated before lookup. Only this exact name is special.
  pub rotated_array: String,
  pub rotation: usize,
  pub element_decoding: ElementDecoding,
}

impl Default for StringDeobfuscatorOptions {
  fn default() -> Self {
    Self {
      rotated_array: DEFAULT_ROTATED_ARRAY.to_string(),
      rotation: DEFAULT_ROTATION,
      element_decoding: ElementDecoding::Verbatim,
    }
  }
}

impl StringDeobfuscatorOptions {
  pub fn with_rotated_array(mut self, name: impl Into<String>, rotation: usize) -> Self {
    self.rotated_array = name.into();
    self.rotation = rotation;
    self
  }

  pub fn with_element_decoding(mut self, decoding: ElementDecoding) -> Self {
    self.element_decoding = decoding;
    self
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionInlinerOptions {
  /// Callee names eligible for inlining. Empty means every constant single-return function.
  pub tracked: Vec<String>,
  /// Prefix each inlined expression with a `/* <name> function call */` comment. Off by default:
  /// the parser drops comments, so annotated output does not survive being run again.
  pub annotate: bool,
}

impl Default for FunctionInlinerOptions {
  fn default() -> Self {
    Self {
      tracked: DEFAULT_TRACKED_FUNCTIONS
        .iter()
        .map(|name| name.to_string())
        .collect(),
      annotate: false,
    }
  }
}

impl FunctionInlinerOptions {
  pub fn with_tracked<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.tracked = names.into_iter().map(Into::into).collect();
    self
  }

  /// Track every function that qualifies instead of a fixed list.
  pub fn tracking_all(mut self) -> Self {
    self.tracked.clear();
    self
  }

  pub fn with_annotate(mut self, annotate: bool) -> Self {
    self.annotate = annotate;
    self
  }

  pub fn is_tracked(&self, name: &str) -> bool {
    self.tracked.is_empty() || self.tracked.iter().any(|t| t == name)
  }
}

/// Configuration for [`crate::deobfuscate_with_options`] and [`crate::Pipeline::with_options`].
#[derive(Clone, Debug, Default)]
pub struct DeobfuscateOptions {
  pub strings: StringDeobfuscatorOptions,
  pub inliner: FunctionInlinerOptions,
  /// Identifier renames applied last; the renamer only runs when this is set.
  pub rename_map: Option<HashMap<String, String>>,
}

impl DeobfuscateOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_strings(mut self, strings: StringDeobfuscatorOptions) -> Self {
    self.strings = strings;
    self
  }

  pub fn with_inliner(mut self, inliner: FunctionInlinerOptions) -> Self {
    self.inliner = inliner;
    self
  }

  pub fn with_rename_map<I, K, V>(mut self, renames: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self.rename_map = Some(
      renames
        .into_iter()
        .map(|(from, to)| (from.into(), to.into()))
        .collect(),
    );
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_track_known_helpers() {
    let opts = FunctionInlinerOptions::default();
    assert!(opts.is_tracked("Qc"));
    assert!(opts.is_tracked("$n"));
    assert!(!opts.is_tracked("foo"));
    assert!(!opts.annotate);
    assert!(opts.tracking_all().is_tracked("foo"));
  }

  #[test]
  fn builders_replace_fields() {
    let opts = DeobfuscateOptions::new()
      .with_strings(
        StringDeobfuscatorOptions::default()
          .with_rotated_array("tbl", 3)
          .with_element_decoding(ElementDecoding::Rot13),
      )
      .with_inliner(FunctionInlinerOptions::default().with_tracked(["f"]).with_annotate(true))
      .with_rename_map([("a", "alpha")]);
    assert_eq!(opts.strings.rotated_array, "tbl");
    assert_eq!(opts.strings.rotation, 3);
    assert_eq!(opts.strings.element_decoding, ElementDecoding::Rot13);
    assert_eq!(opts.inliner.tracked, vec!["f".to_string()]);
    assert!(opts.inliner.annotate);
    assert_eq!(
      opts.rename_map.as_ref().and_then(|m| m.get("a")).map(String::as_str),
      Some("alpha")
    );
  }
}
