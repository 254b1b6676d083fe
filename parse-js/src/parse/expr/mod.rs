pub mod lit;
pub mod pat;
pub mod util;

use pat::is_valid_pattern_identifier;
use pat::ParsePatternRules;
use util::lhs_expr_to_assign_target;

use super::ParseCtx;
use super::Parser;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::ArrowFuncExpr;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::CallArg;
use crate::ast::expr::CallExpr;
use crate::ast::expr::ClassExpr;
use crate::ast::expr::ComputedMemberExpr;
use crate::ast::expr::CondExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::FuncExpr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::NewExpr;
use crate::ast::expr::SuperExpr;
use crate::ast::expr::TaggedTemplateExpr;
use crate::ast::expr::ThisExpr;
use crate::ast::expr::UnaryExpr;
use crate::ast::expr::UnaryPostfixExpr;
use crate::ast::expr::YieldExpr;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::decl::PatDecl;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::lex::KEYWORDS_MAPPING;
use crate::loc::Loc;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::parse::operator::MULTARY_OPERATOR_MAPPING;
use crate::parse::operator::UNARY_OPERATOR_MAPPING;
use crate::token::TT;

pub struct Asi {
  pub can_end_with_asi: bool,
  pub did_end_with_asi: bool,
}

impl Asi {
  pub fn can() -> Asi {
    Asi {
      can_end_with_asi: true,
      did_end_with_asi: false,
    }
  }

  pub fn no() -> Asi {
    Asi {
      can_end_with_asi: false,
      did_end_with_asi: false,
    }
  }
}

impl<'a> Parser<'a> {
  /// Parses call arguments after `(`, up to but excluding `)`.
  pub fn call_args(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<CallArg>>> {
    let mut args = Vec::new();
    while self.peek().typ != TT::ParenthesisClose {
      let arg = self.with_loc(|p| {
        let spread = p.consume_if(TT::DotDotDot).is_match();
        let value = p.expr(ctx, [TT::Comma, TT::ParenthesisClose])?;
        Ok(CallArg { spread, value })
      })?;
      args.push(arg);
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    Ok(args)
  }

  pub fn expr<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
  ) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(ctx, 1, terminators, &mut Asi::no())
  }

  pub fn expr_with_asi<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
    asi: &mut Asi,
  ) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(ctx, 1, terminators, asi)
  }

  /// Parses a parenthesised expression like `(a + b)`.
  pub fn grouping(&mut self, ctx: ParseCtx, asi: &mut Asi) -> SyntaxResult<Node<Expr>> {
    self.require(TT::ParenthesisOpen)?;
    let expr = self.expr_with_min_prec(ctx, 1, [TT::ParenthesisClose], asi)?;
    self.require(TT::ParenthesisClose)?;
    Ok(expr)
  }

  pub fn arrow_func_expr<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
  ) -> SyntaxResult<Node<ArrowFuncExpr>> {
    let func = self.with_loc(|p| {
      let [a, b] = p.peek_n::<2>();
      // In `async => x`, `async` is the parameter.
      let is_async = a.typ == TT::KeywordAsync
        && b.typ != TT::EqualsChevronRight
        && !b.preceded_by_line_terminator;
      if is_async {
        p.consume();
      };
      let param_rules = ParsePatternRules {
        await_allowed: !is_async && ctx.rules.await_allowed,
        ..ctx.rules
      };

      let [a, b] = p.peek_n::<2>();
      let parameters = if is_valid_pattern_identifier(a.typ, param_rules)
        && b.typ == TT::EqualsChevronRight
      {
        // Single-unparenthesised-parameter arrow function.
        let param_name = p.consume().loc;
        let pattern = Node::new(param_name, PatDecl {
          pat: Node::new(param_name, IdPat {
            name: p.string(param_name),
          })
          .into_wrapped(),
        });
        vec![Node::new(param_name, ParamDecl {
          rest: false,
          pattern,
          default_value: None,
        })]
      } else {
        p.func_params(ctx.with_rules(param_rules))?
      };

      let arrow = p.require(TT::EqualsChevronRight)?;
      if arrow.preceded_by_line_terminator {
        // Illegal under Automatic Semicolon Insertion rules.
        return Err(arrow.error(SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters));
      };
      let fn_body_ctx = ctx.with_rules(param_rules);
      let body = match p.peek().typ {
        TT::BraceOpen => p.parse_func_block_body(fn_body_ctx)?.into(),
        _ => p
          .expr_with_min_prec(
            fn_body_ctx,
            OPERATORS[&OperatorName::Assignment].precedence,
            terminators,
            &mut Asi::can(),
          )?
          .into(),
      };
      Ok(Func {
        arrow: true,
        async_: is_async,
        generator: false,
        parameters,
        body,
      })
    })?;
    Ok(Node::new(func.loc, ArrowFuncExpr { func }))
  }

  // Returns None without consuming anything if it isn't an arrow function. After `=>`, it's
  // definitely an arrow function and errors are real.
  fn maybe_arrow_func_expr<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
  ) -> SyntaxResult<Option<Node<Expr>>> {
    self.rewindable::<Node<Expr>, _>(|p| match p.arrow_func_expr(ctx, terminators) {
      Ok(expr) => Ok(Some(expr.into_wrapped())),
      Err(err) if err.typ == SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters => {
        Err(err)
      }
      Err(_) => Ok(None),
    })
  }

  pub fn arrow_function_or_grouping_expr<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
    asi: &mut Asi,
  ) -> SyntaxResult<Node<Expr>> {
    // Try and parse as an arrow function signature first. If that fails, backtrack and parse as a
    // grouping instead.
    match self.maybe_arrow_func_expr(ctx, terminators)? {
      Some(arrow) => Ok(arrow),
      None => self.grouping(ctx, asi),
    }
  }

  pub fn func_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<FuncExpr>> {
    self.with_loc(|p| {
      let is_async = p.consume_if(TT::KeywordAsync).is_match();
      p.require(TT::KeywordFunction)?;
      let generator = p.consume_if(TT::Asterisk).is_match();
      let fn_ctx = ctx.with_rules(ParsePatternRules {
        await_allowed: !is_async && ctx.rules.await_allowed,
        yield_allowed: !generator && ctx.rules.yield_allowed,
      });
      // The name of a function expression is bound inside the function, so follows its rules.
      let name = p.maybe_class_or_func_name(fn_ctx);
      let func = p.with_loc(|p| {
        let parameters = p.func_params(fn_ctx)?;
        let body = p.parse_func_block_body(fn_ctx)?.into();
        Ok(Func {
          arrow: false,
          async_: is_async,
          generator,
          parameters,
          body,
        })
      })?;
      Ok(FuncExpr { name, func })
    })
  }

  pub fn class_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ClassExpr>> {
    self.with_loc(|p| {
      p.require(TT::KeywordClass)?;
      let name = p.maybe_class_or_func_name(ctx);
      let extends = p
        .consume_if(TT::KeywordExtends)
        .and_then(|| p.class_heritage(ctx))?;
      let members = p.class_body(ctx)?;
      Ok(ClassExpr {
        name,
        extends,
        members,
      })
    })
  }

  /// The expression after `extends`, which ends at the class body's `{`.
  pub fn class_heritage(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(
      ctx,
      OPERATORS[&OperatorName::Call].precedence,
      [TT::BraceOpen],
      &mut Asi::no(),
    )
  }

  pub fn id_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<IdExpr>> {
    self.with_loc(|p| {
      let name = p.id_name(ctx)?;
      Ok(IdExpr { name })
    })
  }

  /// Parses a raw valid identifier name as a string. To parse an IdExpr, use `id_expr`.
  pub fn id_name(&mut self, ctx: ParseCtx) -> SyntaxResult<String> {
    let t = self.consume();
    if !is_valid_pattern_identifier(t.typ, ctx.rules) {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("identifier")));
    };
    Ok(self.string(t.loc))
  }

  // The property name after `.` or `?.`, which can be any identifier name, including keywords.
  fn member_access_property(&mut self) -> SyntaxResult<(Loc, String)> {
    let t = self.consume();
    match t.typ {
      TT::Identifier | TT::PrivateMember => {}
      t if KEYWORDS_MAPPING.contains_key(&t) => {}
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("member access property"))),
    };
    Ok((t.loc, self.string(t.loc)))
  }

  /// Parses `new X`, `new X(args)`, `new a.b[c](args)` and `new new X()()`.
  pub fn new_expr<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
    asi: &mut Asi,
  ) -> SyntaxResult<Node<NewExpr>> {
    self.with_loc(|p| {
      p.require(TT::KeywordNew)?;
      // A nested `new` is handled by the operand, taking its own arguments first.
      let mut callee = p.expr_operand(ctx, terminators, asi)?;
      // The callee extends through member accesses but stops at the first call, which belongs to `new`.
      loop {
        let t = p.peek();
        callee = match t.typ {
          TT::Dot => {
            p.consume();
            let (loc, right) = p.member_access_property()?;
            Node::new(callee.loc + loc, MemberExpr {
              optional_chaining: false,
              left: callee,
              right,
            })
            .into_wrapped()
          }
          TT::BracketOpen => {
            p.consume();
            let member = p.expr(ctx, [TT::BracketClose])?;
            let end = p.require(TT::BracketClose)?;
            Node::new(callee.loc + end.loc, ComputedMemberExpr {
              optional_chaining: false,
              object: callee,
              member,
            })
            .into_wrapped()
          }
          TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd
            if !t.preceded_by_line_terminator =>
          {
            let start = p.checkpoint();
            let parts = p.lit_template_parts(ctx)?;
            let loc = callee.loc + p.since_checkpoint(&start);
            Node::new(loc, TaggedTemplateExpr {
              function: callee,
              parts,
            })
            .into_wrapped()
          }
          _ => break,
        };
      }
      let arguments = if p.consume_if(TT::ParenthesisOpen).is_match() {
        let args = p.call_args(ctx)?;
        p.require(TT::ParenthesisClose)?;
        args
      } else {
        Vec::new()
      };
      Ok(NewExpr { callee, arguments })
    })
  }

  pub fn yield_expr<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
    asi: &mut Asi,
  ) -> SyntaxResult<Node<YieldExpr>> {
    self.with_loc(|p| {
      p.require(TT::KeywordYield)?;
      let delegate = p.consume_if(TT::Asterisk).is_match();
      let next = p.peek();
      // The operand is optional, and can't be on the next line.
      let has_argument = delegate
        || !(next.preceded_by_line_terminator
          || terminators.contains(&next.typ)
          || matches!(
            next.typ,
            TT::EOF
              | TT::Semicolon
              | TT::Comma
              | TT::Colon
              | TT::ParenthesisClose
              | TT::BracketClose
              | TT::BraceClose
          ));
      let argument = if has_argument {
        Some(p.expr_with_min_prec(
          ctx,
          OPERATORS[&OperatorName::Yield].precedence,
          terminators,
          asi,
        )?)
      } else {
        None
      };
      Ok(YieldExpr { delegate, argument })
    })
  }

  fn expr_operand<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
    asi: &mut Asi,
  ) -> SyntaxResult<Node<Expr>> {
    let [t0, t1, t2] =
      self.peek_n_with_mode([LexMode::SlashIsRegex, LexMode::Standard, LexMode::Standard]);
    // Handle unary operators before operand. `await` is only an operator where it isn't an identifier.
    if let Some(operator) = UNARY_OPERATOR_MAPPING
      .get(&t0.typ)
      .filter(|operator| operator.name != OperatorName::Await || !ctx.rules.await_allowed)
    {
      return Ok(
        self
          .with_loc(|p| {
            p.consume_with_mode(LexMode::SlashIsRegex);
            let next_min_prec =
              operator.precedence + (operator.associativity == Associativity::Left) as u8;
            let operand = p.expr_with_min_prec(ctx, next_min_prec, terminators, asi)?;
            Ok(UnaryExpr {
              operator: operator.name,
              argument: operand,
            })
          })?
          .into_wrapped(),
      );
    };

    if t0.typ == TT::KeywordYield && !ctx.rules.yield_allowed {
      return Ok(self.yield_expr(ctx, terminators, asi)?.into_wrapped());
    };

    // `async` only starts a function if followed by one on the same line. Otherwise it's an identifier.
    if t0.typ == TT::KeywordAsync && !t1.preceded_by_line_terminator {
      match t1.typ {
        TT::KeywordFunction => return Ok(self.func_expr(ctx)?.into_wrapped()),
        // Otherwise it's a call to a function named `async`.
        TT::ParenthesisOpen => {
          if let Some(arrow) = self.maybe_arrow_func_expr(ctx, terminators)? {
            return Ok(arrow);
          };
        }
        t if is_valid_pattern_identifier(t, ctx.rules) && t2.typ == TT::EqualsChevronRight => {
          return Ok(self.arrow_func_expr(ctx, terminators)?.into_wrapped());
        }
        _ => {}
      };
    };

    if is_valid_pattern_identifier(t0.typ, ctx.rules) {
      return Ok(if t1.typ == TT::EqualsChevronRight {
        // Single-unparenthesised-parameter arrow function.
        self.arrow_func_expr(ctx, terminators)?.into_wrapped()
      } else {
        self.id_expr(ctx)?.into_wrapped()
      });
    };

    #[rustfmt::skip]
    let expr: Node<Expr> = match t0.typ {
      TT::BracketOpen => self.lit_arr(ctx)?.into_wrapped(),
      TT::BraceOpen => self.lit_obj(ctx)?.into_wrapped(),
      TT::KeywordClass => self.class_expr(ctx)?.into_wrapped(),
      TT::KeywordFunction => self.func_expr(ctx)?.into_wrapped(),
      TT::KeywordNew => self.new_expr(ctx, terminators, asi)?.into_wrapped(),
      TT::KeywordSuper => self.super_expr()?.into_wrapped(),
      TT::KeywordThis => self.this_expr()?.into_wrapped(),
      TT::LiteralBigInt => self.lit_bigint()?.into_wrapped(),
      TT::LiteralTrue | TT::LiteralFalse => self.lit_bool()?.into_wrapped(),
      TT::LiteralNull => self.lit_null()?.into_wrapped(),
      TT::LiteralNumber => self.lit_num()?.into_wrapped(),
      TT::LiteralRegex => self.lit_regex()?.into_wrapped(),
      TT::LiteralString => self.lit_str()?.into_wrapped(),
      TT::Invalid if self.str(t0.loc).starts_with(['"', '\'']) => return Err(t0.error(SyntaxErrorType::LineTerminatorInString)),
      TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd => self.lit_template(ctx)?.into_wrapped(),
      TT::ParenthesisOpen => self.arrow_function_or_grouping_expr(ctx, terminators, asi)?,
      // Private name in `#field in obj`.
      TT::PrivateMember => self.with_loc(|p| {
        let name = p.consume_as_string();
        Ok(IdExpr { name })
      })?.into_wrapped(),
      TT::EOF => return Err(t0.error(SyntaxErrorType::UnexpectedEnd)),
      _ => return Err(t0.error(SyntaxErrorType::ExpectedSyntax("expression operand"))),
    };
    Ok(expr)
  }

  pub fn expr_with_min_prec<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    min_prec: u8,
    terminators: [TT; N],
    asi: &mut Asi,
  ) -> SyntaxResult<Node<Expr>> {
    let mut left = self.expr_operand(ctx, terminators, asi)?;

    loop {
      let cp = self.checkpoint();
      let t = self.consume();

      if terminators.contains(&t.typ) {
        self.restore_checkpoint(cp);
        break;
      };

      match t.typ {
        // Automatic Semicolon Insertion rules: no newline between operand and postfix operator.
        TT::PlusPlus | TT::HyphenHyphen if !t.preceded_by_line_terminator => {
          let operator_name = match t.typ {
            TT::PlusPlus => OperatorName::PostfixIncrement,
            _ => OperatorName::PostfixDecrement,
          };
          let operator = &OPERATORS[&operator_name];
          if operator.precedence < min_prec {
            self.restore_checkpoint(cp);
            break;
          };
          left = Node::new(left.loc + t.loc, UnaryPostfixExpr {
            operator: operator_name,
            argument: left,
          })
          .into_wrapped();
          continue;
        }
        // Automatic Semicolon Insertion rules: no newline between operand and template literal.
        TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd
          if !t.preceded_by_line_terminator =>
        {
          if OPERATORS[&OperatorName::Call].precedence < min_prec {
            self.restore_checkpoint(cp);
            break;
          };
          self.restore_checkpoint(cp);
          let start = self.checkpoint();
          let parts = self.lit_template_parts(ctx)?;
          let loc = left.loc + self.since_checkpoint(&start);
          left = Node::new(loc, TaggedTemplateExpr {
            function: left,
            parts,
          })
          .into_wrapped();
          continue;
        }
        _ => {}
      };

      match MULTARY_OPERATOR_MAPPING.get(&t.typ) {
        None => {
          if asi.can_end_with_asi
            && (t.preceded_by_line_terminator || t.typ == TT::BraceClose || t.typ == TT::EOF)
          {
            // Automatic Semicolon Insertion.
            self.restore_checkpoint(cp);
            asi.did_end_with_asi = true;
            break;
          };
          return Err(t.error(SyntaxErrorType::ExpectedSyntax("expression operator")));
        }
        Some(operator) => {
          if operator.precedence < min_prec {
            self.restore_checkpoint(cp);
            break;
          };

          let next_min_prec =
            operator.precedence + (operator.associativity == Associativity::Left) as u8;

          left = match operator.name {
            OperatorName::Call | OperatorName::OptionalChainingCall => {
              let arguments = self.call_args(ctx)?;
              let end = self.require(TT::ParenthesisClose)?;
              Node::new(left.loc + end.loc, CallExpr {
                optional_chaining: operator.name == OperatorName::OptionalChainingCall,
                callee: left,
                arguments,
              })
              .into_wrapped()
            }
            OperatorName::ComputedMemberAccess
            | OperatorName::OptionalChainingComputedMemberAccess => {
              let member = self.expr(ctx, [TT::BracketClose])?;
              let end = self.require(TT::BracketClose)?;
              Node::new(left.loc + end.loc, ComputedMemberExpr {
                optional_chaining: operator.name
                  == OperatorName::OptionalChainingComputedMemberAccess,
                object: left,
                member,
              })
              .into_wrapped()
            }
            OperatorName::Conditional => {
              let consequent = self.expr(ctx, [TT::Colon])?;
              self.require(TT::Colon)?;
              let alternate = self.expr_with_min_prec(
                ctx,
                OPERATORS[&OperatorName::ConditionalAlternate].precedence,
                terminators,
                asi,
              )?;
              Node::new(left.loc + alternate.loc, CondExpr {
                test: left,
                consequent,
                alternate,
              })
              .into_wrapped()
            }
            OperatorName::MemberAccess | OperatorName::OptionalChainingMemberAccess => {
              let (loc, right) = self.member_access_property()?;
              Node::new(left.loc + loc, MemberExpr {
                optional_chaining: operator.name == OperatorName::OptionalChainingMemberAccess,
                left,
                right,
              })
              .into_wrapped()
            }
            _ => {
              if operator.name.is_assignment() {
                left = lhs_expr_to_assign_target(left, operator.name)?;
              };
              let right = self.expr_with_min_prec(ctx, next_min_prec, terminators, asi)?;
              Node::new(left.loc + right.loc, BinaryExpr {
                operator: operator.name,
                left,
                right,
              })
              .into_wrapped()
            }
          };
        }
      };
    }

    Ok(left)
  }

  pub fn super_expr(&mut self) -> SyntaxResult<Node<SuperExpr>> {
    self.with_loc(|p| {
      p.require(TT::KeywordSuper)?;
      Ok(SuperExpr {})
    })
  }

  pub fn this_expr(&mut self) -> SyntaxResult<Node<ThisExpr>> {
    self.with_loc(|p| {
      p.require(TT::KeywordThis)?;
      Ok(ThisExpr {})
    })
  }
}
