use super::expr::pat::ParsePatternRules;
use super::expr::Asi;
use super::ParseCtx;
use super::Parser;
use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::ClassOrObjGetter;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::class_or_object::ClassOrObjMethod;
use crate::ast::class_or_object::ClassOrObjSetter;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::expr::Expr;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::KEYWORDS_MAPPING;
use crate::token::Token;
use crate::token::TT;

// Whether a modifier-like keyword (`async`, `get`, `set`, `static`, `*`) is actually the member's
// key, as in `{ get: 1 }`, `{ async() {} }` or `class A { static }`.
fn is_key_itself(next: &Token) -> bool {
  matches!(
    next.typ,
    TT::ParenthesisOpen | TT::Colon | TT::Comma | TT::BraceClose | TT::Equals | TT::Semicolon
  )
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Accessor {
  None,
  Get,
  Set,
}

impl<'a> Parser<'a> {
  pub fn class_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<ClassMember>>> {
    self.require(TT::BraceOpen)?;
    let mut members = Vec::new();
    loop {
      // Stray semicolons between members are allowed.
      while self.consume_if(TT::Semicolon).is_match() {}
      if self.consume_if(TT::BraceClose).is_match() {
        break;
      };
      let member = self.with_loc(|p| {
        // `static` must always come first if present.
        let [a, b] = p.peek_n::<2>();
        let static_ = a.typ == TT::KeywordStatic && !is_key_itself(&b);
        if static_ {
          p.consume();
        };
        let (key, val) = p.class_or_obj_member(ctx, TT::Equals, TT::Semicolon, &mut Asi::can())?;
        Ok(ClassMember { key, static_, val })
      })?;
      members.push(member);
    }
    Ok(members)
  }

  /// Parses a class or object key like `a`, `'a'`, `#a`, `1`, `[1]`.
  pub fn class_or_obj_key(&mut self, ctx: ParseCtx) -> SyntaxResult<ClassOrObjKey> {
    Ok(if self.consume_if(TT::BracketOpen).is_match() {
      let key = self.expr(ctx, [TT::BracketClose])?;
      self.require(TT::BracketClose)?;
      ClassOrObjKey::Computed(key)
    } else {
      ClassOrObjKey::Direct(self.with_loc(|p| {
        let t = p.peek();
        let key = match t.typ {
          TT::LiteralString => p.lit_str_val()?,
          TT::LiteralNumber => p.lit_num_val()?.to_string(),
          // There's no trailing `n`.
          TT::LiteralBigInt => p.lit_bigint_val()?,
          TT::PrivateMember => p.consume_as_string(),
          TT::Identifier => p.consume_as_string(),
          // Any keyword is allowed as a key.
          t if KEYWORDS_MAPPING.contains_key(&t) => p.consume_as_string(),
          _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("keyword or identifier"))),
        };
        Ok(ClassOrObjMemberDirectKey { key, tt: t.typ })
      })?)
    })
  }

  fn class_or_obj_func(
    &mut self,
    ctx: ParseCtx,
    is_async: bool,
    is_generator: bool,
  ) -> SyntaxResult<Node<Func>> {
    self.with_loc(|p| {
      let fn_ctx = ctx.with_rules(ParsePatternRules {
        await_allowed: !is_async && ctx.rules.await_allowed,
        yield_allowed: !is_generator && ctx.rules.yield_allowed,
      });
      let parameters = p.func_params(fn_ctx)?;
      let body = p.parse_func_block_body(fn_ctx)?.into();
      Ok(Func {
        arrow: false,
        async_: is_async,
        generator: is_generator,
        parameters,
        body,
      })
    })
  }

  /// Parses the rest of a method like `a() {}`, `async a() {}`, `*a() {}`, `async *a() {}` after its key.
  pub fn class_or_obj_method(
    &mut self,
    ctx: ParseCtx,
    is_async: bool,
    is_generator: bool,
  ) -> SyntaxResult<Node<ClassOrObjMethod>> {
    let func = self.class_or_obj_func(ctx, is_async, is_generator)?;
    Ok(func.wrap(|func| ClassOrObjMethod { func }))
  }

  pub fn class_or_obj_getter(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ClassOrObjGetter>> {
    let func = self.class_or_obj_func(ctx, false, false)?;
    if !func.stx.parameters.is_empty() {
      return Err(func.error(SyntaxErrorType::ExpectedSyntax("getter without parameters")));
    };
    Ok(func.wrap(|func| ClassOrObjGetter { func }))
  }

  pub fn class_or_obj_setter(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ClassOrObjSetter>> {
    let func = self.class_or_obj_func(ctx, false, false)?;
    if func.stx.parameters.len() != 1 {
      return Err(func.error(SyntaxErrorType::ExpectedSyntax("setter with one parameter")));
    };
    Ok(func.wrap(|func| ClassOrObjSetter { func }))
  }

  /// Parses the value of a class field like `a`, `a = 1`, `a = 1;`, `a = 1\n`, or an object
  /// property like `a: 1`.
  pub fn class_or_obj_prop(
    &mut self,
    ctx: ParseCtx,
    // The delimiter between the key and value. For objects, this is `:`; for classes, this is `=`.
    value_delimiter: TT,
    statement_delimiter: TT,
    property_initialiser_asi: &mut Asi,
  ) -> SyntaxResult<Option<Node<Expr>>> {
    if value_delimiter == TT::Colon {
      self.require(TT::Colon)?;
      return Ok(Some(self.expr(ctx, [TT::Comma, TT::BraceClose])?));
    };
    let initializer = self.consume_if(value_delimiter).and_then(|| {
      self.expr_with_asi(
        ctx,
        [statement_delimiter, TT::BraceClose],
        property_initialiser_asi,
      )
    })?;
    // A field without an initializer ends at a semicolon, `}` or a line terminator.
    let t = self.peek();
    if !(t.typ == statement_delimiter || t.typ == TT::BraceClose || t.preceded_by_line_terminator)
      && !property_initialiser_asi.did_end_with_asi
    {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("end of class field")));
    };
    Ok(initializer)
  }

  // It's strictly one of these:
  // - <key> [ '=' <expr> ]? [ <asi> | ';' ]
  // - async? '*'? <key> '(' ...
  // - [ get | set ] <key> '(' ...
  // where <key> = <ident> | <keyword> | <str> | <num> | '[' <expr> ']'
  pub fn class_or_obj_member(
    &mut self,
    ctx: ParseCtx,
    value_delimiter: TT,
    statement_delimiter: TT,
    property_initialiser_asi: &mut Asi,
  ) -> SyntaxResult<(ClassOrObjKey, ClassOrObjVal)> {
    let [a, b] = self.peek_n::<2>();
    let is_async =
      a.typ == TT::KeywordAsync && !is_key_itself(&b) && !b.preceded_by_line_terminator;
    if is_async {
      self.consume();
    };
    let is_generator = self.consume_if(TT::Asterisk).is_match();
    let accessor = if is_async || is_generator {
      Accessor::None
    } else {
      let [a, b] = self.peek_n::<2>();
      match a.typ {
        TT::KeywordGet if !is_key_itself(&b) => Accessor::Get,
        TT::KeywordSet if !is_key_itself(&b) => Accessor::Set,
        _ => Accessor::None,
      }
    };
    if accessor != Accessor::None {
      self.consume();
    };
    let key = self.class_or_obj_key(ctx)?;
    if self.peek().typ == TT::ParenthesisOpen {
      let val: ClassOrObjVal = match accessor {
        Accessor::Get => self.class_or_obj_getter(ctx)?.into(),
        Accessor::Set => self.class_or_obj_setter(ctx)?.into(),
        Accessor::None => self
          .class_or_obj_method(ctx, is_async, is_generator)?
          .into(),
      };
      return Ok((key, val));
    };
    if is_async || is_generator || accessor != Accessor::None {
      return Err(
        self
          .peek()
          .error(SyntaxErrorType::RequiredTokenNotFound(TT::ParenthesisOpen)),
      );
    };
    let init = self.class_or_obj_prop(
      ctx,
      value_delimiter,
      statement_delimiter,
      property_initialiser_asi,
    )?;
    Ok((key, ClassOrObjVal::Prop(init)))
  }
}
