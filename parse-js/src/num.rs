use core::hash::Hash;
use core::hash::Hasher;
use serde::Serialize;
use serde::Serializer;
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

// This provides Eq for f64.
#[derive(Copy, Clone, Debug)]
pub struct JsNumber(pub f64);

impl JsNumber {
  /// Parses the source text of a number literal, in any radix the lexer accepts.
  pub fn from_literal(raw: &str) -> Option<JsNumber> {
    let radix_body = |prefix_lower: &str, prefix_upper: &str| {
      raw
        .strip_prefix(prefix_lower)
        .or_else(|| raw.strip_prefix(prefix_upper))
    };
    let (radix, digits) = if let Some(d) = radix_body("0x", "0X") {
      (16, d)
    } else if let Some(d) = radix_body("0o", "0O") {
      (8, d)
    } else if let Some(d) = radix_body("0b", "0B") {
      (2, d)
    } else if is_legacy_octal_literal(raw) {
      (8, &raw[1..])
    } else {
      return raw.parse::<f64>().ok().map(JsNumber);
    };
    if digits.is_empty() {
      return None;
    };
    // Accumulate in f64 so that literals beyond u64 still get the nearest double.
    let mut value = 0f64;
    for c in digits.chars() {
      value = value * radix as f64 + c.to_digit(radix)? as f64;
    }
    Some(JsNumber(value))
  }

  pub fn is_finite(self) -> bool {
    self.0.is_finite()
  }
}

/// `017` style literals, which are octal in sloppy mode.
pub fn is_legacy_octal_literal(raw: &str) -> bool {
  raw.len() > 1 && raw.starts_with('0') && raw.bytes().all(|c| matches!(c, b'0'..=b'7'))
}

/// Whether the literal is written in anything other than plain decimal.
pub fn is_non_decimal_literal(raw: &str) -> bool {
  let lower = raw.get(..2).map(|p| p.to_ascii_lowercase());
  matches!(lower.as_deref(), Some("0x" | "0o" | "0b")) || is_legacy_octal_literal(raw)
}

// Formats like JavaScript's Number::toString for finite values. Non-finite values have no literal
// form and are written as `Infinity`/`NaN`; emitters must not print them as literals.
impl Display for JsNumber {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let v = self.0;
    if v.is_nan() {
      return write!(f, "NaN");
    };
    if v.is_infinite() {
      return write!(f, "{}Infinity", if v < 0.0 { "-" } else { "" });
    };
    if v == 0.0 {
      // Also covers negative zero.
      return write!(f, "0");
    };
    let abs = v.abs();
    if abs >= 1e21 || abs < 1e-6 {
      let s = format!("{:e}", v);
      // JavaScript always signs positive exponents.
      match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{}e+{}", mantissa, exp),
        _ => write!(f, "{}", s),
      }
    } else {
      write!(f, "{}", v)
    }
  }
}

impl PartialEq for JsNumber {
  fn eq(&self, other: &Self) -> bool {
    if self.0.is_nan() {
      return other.0.is_nan();
    };
    self.0.eq(&other.0)
  }
}

impl Eq for JsNumber {}

impl Ord for JsNumber {
  fn cmp(&self, other: &Self) -> Ordering {
    // Only NaNs cannot be compared, and we treat them as equal.
    self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
  }
}

impl PartialOrd for JsNumber {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Hash for JsNumber {
  fn hash<H: Hasher>(&self, state: &mut H) {
    if !self.0.is_nan() {
      self.0.to_bits().hash(state);
    };
  }
}

impl Serialize for JsNumber {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(self.0)
  }
}
