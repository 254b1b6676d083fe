use crate::err::DeobfuscateError;
use crate::options::DeobfuscateOptions;
use crate::passes::BracketToDotPass;
use crate::passes::ConcatFoldPass;
use crate::passes::FunctionInlinerPass;
use crate::passes::NumericSimplifierPass;
use crate::passes::RenamePass;
use crate::passes::StringDeobfuscatorPass;
use emit_js::emit_js;
use parse_js::ast::node::Node;
use parse_js::ast::stx::TopLevel;
use parse_js::parse;
use std::fmt;
use tracing::debug;
use tracing::info;

/// What a pass did to the tree. Only logged; nothing downstream depends on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
  pub rewrites: usize,
}

impl PassStats {
  pub fn record(&mut self) {
    self.rewrites += 1;
  }
}

/// One rewrite over the whole program. A pass owns whatever tables it builds while running and
/// must leave nodes it does not fully understand untouched.
pub trait Pass {
  fn name(&self) -> &'static str;
  fn run(&mut self, top: &mut Node<TopLevel>) -> PassStats;
}

/// Ordered passes over one shared tree: parse once, run each pass once in registration order,
/// print once.
#[derive(Default)]
pub struct Pipeline {
  passes: Vec<Box<dyn Pass>>,
}

impl Pipeline {
  pub fn new() -> Self {
    Self::default()
  }

  /// The standard pass list, configured by `opts`. Inlining goes first so that decoder calls
  /// hidden in helper bodies are resolved in the same run.
  pub fn with_options(opts: &DeobfuscateOptions) -> Self {
    let mut pipeline = Self::new();
    pipeline
      .add_pass(FunctionInlinerPass::new(opts.inliner.clone()))
      .add_pass(StringDeobfuscatorPass::new(opts.strings.clone()))
      .add_pass(ConcatFoldPass)
      .add_pass(BracketToDotPass)
      .add_pass(NumericSimplifierPass);
    if let Some(renames) = &opts.rename_map {
      pipeline.add_pass(RenamePass::new(renames.clone()));
    };
    pipeline
  }

  pub fn add_pass(&mut self, pass: impl Pass + 'static) -> &mut Self {
    self.passes.push(Box::new(pass));
    self
  }

  pub fn pass_names(&self) -> Vec<&'static str> {
    self.passes.iter().map(|p| p.name()).collect()
  }

  /// Applies every pass to an already parsed program.
  pub fn apply(&mut self, top: &mut Node<TopLevel>) {
    for pass in self.passes.iter_mut() {
      debug!(pass = pass.name(), "running pass");
      let stats = pass.run(top);
      info!(pass = pass.name(), rewrites = stats.rewrites, "pass finished");
    }
  }

  pub fn run(&mut self, source: &str) -> Result<String, DeobfuscateError> {
    let mut top = parse(source)?;
    self.apply(&mut top);
    let output = emit_js(&top)?;
    Ok(output)
  }
}

impl fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("passes", &self.pass_names())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use parse_js::ast::expr::lit::LitStrExpr;
  use parse_js::ast::expr::Expr;
  use parse_js::ast::stmt::Stmt;
  use std::sync::Arc;
  use std::sync::Mutex;

  // Records the first top-level expression statement it sees, then replaces it with its own name.
  struct Marker {
    name: &'static str,
    seen: Arc<Mutex<Vec<String>>>,
  }

  impl Pass for Marker {
    fn name(&self) -> &'static str {
      self.name
    }

    fn run(&mut self, top: &mut Node<TopLevel>) -> PassStats {
      let mut stats = PassStats::default();
      if let Some(Stmt::Expr(stmt)) = top.stx.body.first_mut().map(|s| s.stx.as_mut()) {
        let before = match stmt.stx.expr.stx.as_str_lit() {
          Some(value) => value.to_string(),
          None => "?".to_string(),
        };
        self.seen.lock().unwrap().push(format!("{}:{}", self.name, before));
        let loc = stmt.stx.expr.loc;
        *stmt.stx.expr.stx = Expr::LitStr(Node::new(loc, LitStrExpr {
          value: self.name.to_string(),
        }));
        stats.record();
      };
      stats
    }
  }

  #[test]
  fn runs_passes_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut pipeline = Pipeline::new();
    pipeline
      .add_pass(Marker {
        name: "first",
        seen: log.clone(),
      })
      .add_pass(Marker {
        name: "second",
        seen: log.clone(),
      });
    assert_eq!(pipeline.pass_names(), vec!["first", "second"]);
    let out = pipeline.run("'start';").unwrap();
    assert_eq!(out, "\"second\";\n");
    assert_eq!(*log.lock().unwrap(), vec![
      "first:start".to_string(),
      "second:first".to_string()
    ]);
  }

  #[test]
  fn default_pass_order() {
    let pipeline = Pipeline::with_options(&DeobfuscateOptions::default());
    assert_eq!(pipeline.pass_names(), vec![
      "function-inliner",
      "string-deobfuscator",
      "string-concat",
      "bracket-to-dot",
      "numeric-simplifier",
    ]);
    let pipeline =
      Pipeline::with_options(&DeobfuscateOptions::default().with_rename_map([("a", "b")]));
    assert_eq!(pipeline.pass_names().last(), Some(&"identifier-renamer"));
  }

  #[test]
  fn syntax_errors_abort_the_run() {
    let mut pipeline = Pipeline::with_options(&DeobfuscateOptions::default());
    assert!(matches!(
      pipeline.run("function {"),
      Err(DeobfuscateError::Syntax(_))
    ));
  }
}
