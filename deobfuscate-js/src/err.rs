use emit_js::EmitError;
use parse_js::error::SyntaxError;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// A run either fails before any pass executes (unparseable input) or after all of them (the
/// rewritten tree cannot be printed). Passes themselves never fail; they skip what they don't
/// recognise.
#[derive(Debug)]
pub enum DeobfuscateError {
  Syntax(SyntaxError),
  Emit(EmitError),
}

impl Display for DeobfuscateError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      DeobfuscateError::Syntax(err) => write!(f, "failed to parse input: {}", err),
      DeobfuscateError::Emit(err) => write!(f, "failed to print output: {}", err),
    }
  }
}

impl Error for DeobfuscateError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      DeobfuscateError::Syntax(err) => Some(err),
      DeobfuscateError::Emit(err) => Some(err),
    }
  }
}

impl From<SyntaxError> for DeobfuscateError {
  fn from(err: SyntaxError) -> Self {
    DeobfuscateError::Syntax(err)
  }
}

impl From<EmitError> for DeobfuscateError {
  fn from(err: EmitError) -> Self {
    DeobfuscateError::Emit(err)
  }
}
