//! Pretty printer for parse-js syntax trees.
//!
//! Output uses two-space indentation with one statement per line, and only adds the parentheses
//! needed for the printed text to parse back into the same tree.

mod emitter;
mod escape;
mod expr;
mod pat;
mod precedence;
mod stmt;
mod stmt_start;

pub use emitter::EmitError;
pub use emitter::EmitErrorKind;
pub use emitter::EmitResult;
pub use emitter::Emitter;
pub use escape::emit_string_literal_double_quoted;
pub use escape::string_literal_double_quoted;
pub use expr::ExprEmitter;
pub use stmt::emit_stmt;
pub use stmt::emit_top_level;

use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::ast::stx::TopLevel;

/// Prints a whole script. Non-empty output ends with a line break.
pub fn emit_js(top: &Node<TopLevel>) -> Result<String, EmitError> {
  let mut out = Emitter::new();
  emit_top_level(&mut out, top)?;
  let mut text = out.into_string();
  if !text.is_empty() {
    text.push('\n');
  };
  Ok(text)
}

/// Prints a single expression on its own, e.g. for log messages.
pub fn emit_expr(expr: &Node<Expr>) -> Result<String, EmitError> {
  let mut out = Emitter::new();
  ExprEmitter::new(&mut out).emit_expr(expr)?;
  Ok(out.into_string())
}
