use super::ParseCtx;
use super::Parser;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Parses a parenthesised parameter list like `(a, [b, c] = d, ...rest)`.
  pub fn func_params(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<ParamDecl>>> {
    self.require(TT::ParenthesisOpen)?;
    let parameters = self.list_with_loc(TT::Comma, TT::ParenthesisClose, |p| {
      let rest = p.consume_if(TT::DotDotDot).is_match();
      let pattern = p.pat_decl(ctx)?;
      let default_value = p
        .consume_if(TT::Equals)
        .and_then(|| p.expr(ctx, [TT::Comma, TT::ParenthesisClose]))?;
      if rest && default_value.is_some() {
        return Err(pattern.error(SyntaxErrorType::ExpectedSyntax(
          "rest parameter without default value",
        )));
      };
      Ok(ParamDecl {
        rest,
        pattern,
        default_value,
      })
    })?;
    // A rest parameter must be last.
    if let Some(misplaced) = parameters
      .iter()
      .rev()
      .skip(1)
      .find(|param| param.stx.rest)
    {
      return Err(misplaced.error(SyntaxErrorType::ExpectedSyntax("rest parameter last")));
    };
    Ok(parameters)
  }

  pub fn parse_func_block_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<Stmt>>> {
    self.require(TT::BraceOpen)?;
    let body = self.stmts(ctx, TT::BraceClose)?;
    self.require(TT::BraceClose)?;
    Ok(body)
  }
}
