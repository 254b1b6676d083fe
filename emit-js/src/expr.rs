use crate::emitter::with_node_context;
use crate::emitter::EmitError;
use crate::emitter::EmitResult;
use crate::escape::string_literal_double_quoted;
use crate::precedence::child_min_prec_for_binary;
use crate::precedence::expr_prec;
use crate::precedence::is_unary_like;
use crate::precedence::member_chain_has_call;
use crate::precedence::needs_parens;
use crate::precedence::starts_with_optional_chaining;
use crate::precedence::Prec;
use crate::precedence::Side;
use crate::precedence::ASSIGNMENT_PRECEDENCE;
use crate::precedence::CALL_MEMBER_PRECEDENCE;
use crate::stmt::emit_block_body;
use crate::stmt_start::starts_with_brace;
use crate::Emitter;
use parse_js::ast::class_or_object::ClassMember;
use parse_js::ast::class_or_object::ClassOrObjKey;
use parse_js::ast::class_or_object::ClassOrObjVal;
use parse_js::ast::class_or_object::ObjMember;
use parse_js::ast::class_or_object::ObjMemberType;
use parse_js::ast::expr::lit::LitArrElem;
use parse_js::ast::expr::lit::LitNumExpr;
use parse_js::ast::expr::lit::LitObjExpr;
use parse_js::ast::expr::lit::LitTemplatePart;
use parse_js::ast::expr::pat::ClassOrFuncName;
use parse_js::ast::expr::ArrowFuncExpr;
use parse_js::ast::expr::BinaryExpr;
use parse_js::ast::expr::CallArg;
use parse_js::ast::expr::CallExpr;
use parse_js::ast::expr::ComputedMemberExpr;
use parse_js::ast::expr::CondExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::MemberExpr;
use parse_js::ast::expr::NewExpr;
use parse_js::ast::expr::UnaryExpr;
use parse_js::ast::expr::UnaryPostfixExpr;
use parse_js::ast::expr::YieldExpr;
use parse_js::ast::func::Func;
use parse_js::ast::func::FuncBody;
use parse_js::ast::node::LeadingComment;
use parse_js::ast::node::Node;
use parse_js::ast::node::NumberLiteralRaw;
use parse_js::char::is_identifier_name;
use parse_js::num::JsNumber;
use parse_js::operator::OperatorName;
use parse_js::token::TT;

pub struct ExprEmitter<'a> {
  pub(crate) out: &'a mut Emitter,
  // Set inside a `for (...;` initializer, where a bare `in` would be taken as a for-in loop.
  pub(crate) no_in: bool,
}

impl<'a> ExprEmitter<'a> {
  pub fn new(out: &'a mut Emitter) -> Self {
    Self { out, no_in: false }
  }

  pub fn emit_expr(&mut self, expr: &Node<Expr>) -> EmitResult {
    self.emit_expr_with_min_prec(expr, Prec::new(1))
  }

  pub(crate) fn emit_expr_with_min_prec(
    &mut self,
    expr: &Node<Expr>,
    min_prec: Prec,
  ) -> EmitResult {
    with_node_context(expr.loc, || {
      if let Some(LeadingComment(text)) = expr.assoc.get::<LeadingComment>() {
        self.out.write_block_comment(text);
      };
      let wrap = needs_parens(expr_prec(expr), min_prec) || (self.no_in && is_in_expr(expr));
      if wrap {
        self.emit_wrapped(expr)
      } else {
        self.emit_expr_no_parens(expr)
      }
    })
  }

  fn emit_wrapped(&mut self, expr: &Node<Expr>) -> EmitResult {
    let no_in = std::mem::replace(&mut self.no_in, false);
    self.out.write_punct("(");
    self.emit_expr_no_parens(expr)?;
    self.out.write_punct(")");
    self.no_in = no_in;
    Ok(())
  }

  fn emit_expr_no_parens(&mut self, expr: &Node<Expr>) -> EmitResult {
    match expr.stx.as_ref() {
      Expr::Id(id) => {
        self.out.write_identifier(&id.stx.name);
        Ok(())
      }
      Expr::This(_) => {
        self.out.write_keyword("this");
        Ok(())
      }
      Expr::Super(_) => {
        self.out.write_keyword("super");
        Ok(())
      }
      Expr::LitNum(num) => self.emit_lit_num(num),
      Expr::LitBool(lit) => {
        self
          .out
          .write_keyword(if lit.stx.value { "true" } else { "false" });
        Ok(())
      }
      Expr::LitNull(_) => {
        self.out.write_keyword("null");
        Ok(())
      }
      Expr::LitBigInt(lit) => {
        self.out.write_number(&format!("{}n", lit.stx.value));
        Ok(())
      }
      Expr::LitStr(lit) => {
        self
          .out
          .write_str(&string_literal_double_quoted(&lit.stx.value));
        Ok(())
      }
      Expr::LitRegex(lit) => {
        self.out.write_str(&lit.stx.value);
        Ok(())
      }
      Expr::LitTemplate(lit) => self.emit_template(&lit.stx.parts),
      Expr::LitArr(arr) => self.emit_lit_arr(&arr.stx.elements),
      Expr::LitObj(obj) => self.emit_lit_obj(obj),
      Expr::Func(func) => self.emit_function(func.stx.name.as_ref(), &func.stx.func),
      Expr::Class(class) => self.emit_class(
        class.stx.name.as_ref(),
        class.stx.extends.as_ref(),
        &class.stx.members,
      ),
      Expr::ArrowFunc(arrow) => self.emit_arrow_func(arrow),
      Expr::ArrPat(arr) => self.emit_arr_pat(arr),
      Expr::IdPat(id) => {
        self.out.write_identifier(&id.stx.name);
        Ok(())
      }
      Expr::ObjPat(obj) => self.emit_obj_pat(obj),
      Expr::Unary(unary) => self.emit_unary(unary),
      Expr::UnaryPostfix(unary) => self.emit_unary_postfix(unary),
      Expr::Binary(binary) => self.emit_binary(binary),
      Expr::Cond(cond) => self.emit_cond(cond),
      Expr::Call(call) => self.emit_call(call),
      Expr::New(new) => self.emit_new(new),
      Expr::Member(member) => self.emit_member(member),
      Expr::ComputedMember(member) => self.emit_computed_member(member),
      Expr::TaggedTemplate(tagged) => with_node_context(tagged.loc, || {
        self.emit_memberish_receiver(&tagged.stx.function)?;
        self.emit_template(&tagged.stx.parts)
      }),
      Expr::Yield(yield_) => self.emit_yield(yield_),
    }
  }

  // Function and class expressions are wrapped when used as a receiver, so that an IIFE reads
  // `(function () {})()` and never starts a statement with `function`.
  fn emit_memberish_receiver(&mut self, expr: &Node<Expr>) -> EmitResult {
    match expr.stx.as_ref() {
      Expr::Func(_) | Expr::Class(_) => with_node_context(expr.loc, || {
        if let Some(LeadingComment(text)) = expr.assoc.get::<LeadingComment>() {
          self.out.write_block_comment(text);
        };
        self.emit_wrapped(expr)
      }),
      _ => self.emit_expr_with_min_prec(expr, CALL_MEMBER_PRECEDENCE),
    }
  }

  fn emit_lit_num(&mut self, lit: &Node<LitNumExpr>) -> EmitResult {
    if let Some(NumberLiteralRaw(raw)) = lit.assoc.get::<NumberLiteralRaw>() {
      self.out.write_number(raw);
      return Ok(());
    };
    let value = lit.stx.value.0;
    if value.is_nan() {
      self.out.write_number("0");
      self.out.write_punct("/");
      self.out.write_number("0");
    } else if value.is_infinite() {
      if value < 0.0 {
        self.out.write_punct("-");
      };
      self.out.write_number("1");
      self.out.write_punct("/");
      self.out.write_number("0");
    } else {
      if value.is_sign_negative() {
        self.out.write_punct("-");
      };
      self.out.write_number(&JsNumber(value.abs()).to_string());
    };
    Ok(())
  }

  fn emit_template(&mut self, parts: &[LitTemplatePart]) -> EmitResult {
    let no_in = std::mem::replace(&mut self.no_in, false);
    self.out.write_punct("`");
    for part in parts {
      match part {
        LitTemplatePart::String(raw) => self.out.write_raw_str(raw),
        LitTemplatePart::Substitution(expr) => {
          self.out.write_raw_str("${");
          self.emit_expr(expr)?;
          self.out.write_raw_str("}");
        }
      }
    }
    self.out.write_raw_str("`");
    self.no_in = no_in;
    Ok(())
  }

  fn emit_lit_arr(&mut self, elements: &[LitArrElem]) -> EmitResult {
    self.out.write_punct("[");
    for (idx, elem) in elements.iter().enumerate() {
      if idx > 0 {
        self.out.write_punct(",");
        self.out.write_space();
      }
      match elem {
        LitArrElem::Single(expr) => self.emit_expr_with_min_prec(expr, ASSIGNMENT_PRECEDENCE)?,
        LitArrElem::Rest(expr) => {
          self.out.write_punct("...");
          self.emit_expr_with_min_prec(expr, ASSIGNMENT_PRECEDENCE)?;
        }
        LitArrElem::Empty => {}
      }
    }
    // A trailing hole needs its own comma, as a single trailing comma is ignored.
    if matches!(elements.last(), Some(LitArrElem::Empty)) {
      self.out.write_punct(",");
    };
    self.out.write_punct("]");
    Ok(())
  }

  fn emit_lit_obj(&mut self, obj: &Node<LitObjExpr>) -> EmitResult {
    with_node_context(obj.loc, || {
      self.out.write_punct("{");
      if obj.stx.members.is_empty() {
        self.out.write_punct("}");
        return Ok(());
      };
      let no_in = std::mem::replace(&mut self.no_in, false);
      self.out.indent();
      for (idx, member) in obj.stx.members.iter().enumerate() {
        if idx > 0 {
          self.out.write_punct(",");
        }
        self.out.write_newline();
        self.emit_obj_member(member)?;
      }
      self.out.dedent();
      self.out.write_newline();
      self.out.write_punct("}");
      self.no_in = no_in;
      Ok(())
    })
  }

  fn emit_obj_member(&mut self, member: &Node<ObjMember>) -> EmitResult {
    with_node_context(member.loc, || match &member.stx.typ {
      ObjMemberType::Valued {
        key,
        val: ClassOrObjVal::Prop(Some(value)),
      } => {
        self.emit_class_or_obj_key(key)?;
        self.out.write_punct(":");
        self.out.write_space();
        self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)
      }
      ObjMemberType::Valued {
        val: ClassOrObjVal::Prop(None),
        ..
      } => Err(EmitError::unsupported("object property without a value")),
      ObjMemberType::Valued { key, val } => self.emit_method_like(key, val),
      ObjMemberType::Shorthand { id } => {
        self.out.write_identifier(&id.stx.name);
        Ok(())
      }
      ObjMemberType::Rest { val } => {
        self.out.write_punct("...");
        self.emit_expr_with_min_prec(val, ASSIGNMENT_PRECEDENCE)
      }
    })
  }

  pub(crate) fn emit_class_or_obj_key(&mut self, key: &ClassOrObjKey) -> EmitResult {
    match key {
      ClassOrObjKey::Direct(direct) => {
        let name = &direct.stx.key;
        match direct.stx.tt {
          TT::LiteralNumber | TT::LiteralBigInt => self.out.write_number(name),
          TT::PrivateMember => self.out.write_identifier(name),
          TT::LiteralString => self.out.write_str(&string_literal_double_quoted(name)),
          // Keys created by rewrites may not be valid identifiers.
          _ if !is_identifier_name(name) => {
            self.out.write_str(&string_literal_double_quoted(name))
          }
          _ => self.out.write_identifier(name),
        };
        Ok(())
      }
      ClassOrObjKey::Computed(expr) => {
        let no_in = std::mem::replace(&mut self.no_in, false);
        self.out.write_punct("[");
        self.emit_expr_with_min_prec(expr, ASSIGNMENT_PRECEDENCE)?;
        self.out.write_punct("]");
        self.no_in = no_in;
        Ok(())
      }
    }
  }

  // Methods, getters and setters share one spelling across classes and object literals.
  fn emit_method_like(&mut self, key: &ClassOrObjKey, val: &ClassOrObjVal) -> EmitResult {
    let func = match val {
      ClassOrObjVal::Getter(getter) => {
        self.out.write_keyword("get");
        self.out.write_space();
        &getter.stx.func
      }
      ClassOrObjVal::Setter(setter) => {
        self.out.write_keyword("set");
        self.out.write_space();
        &setter.stx.func
      }
      ClassOrObjVal::Method(method) => {
        let func = &method.stx.func;
        if func.stx.async_ {
          self.out.write_keyword("async");
          self.out.write_space();
        };
        if func.stx.generator {
          self.out.write_punct("*");
        };
        func
      }
      ClassOrObjVal::Prop(_) => return Err(EmitError::unsupported("property as a method")),
    };
    self.emit_class_or_obj_key(key)?;
    self.emit_params_and_body(func)
  }

  pub(crate) fn emit_function(
    &mut self,
    name: Option<&Node<ClassOrFuncName>>,
    func: &Node<Func>,
  ) -> EmitResult {
    with_node_context(func.loc, || {
      if func.stx.async_ {
        self.out.write_keyword("async");
      };
      self.out.write_keyword("function");
      if func.stx.generator {
        self.out.write_punct("*");
      };
      self.out.write_space();
      if let Some(name) = name {
        self.out.write_identifier(&name.stx.name);
      };
      self.emit_params_and_body(func)
    })
  }

  fn emit_params_and_body(&mut self, func: &Node<Func>) -> EmitResult {
    let no_in = std::mem::replace(&mut self.no_in, false);
    self.out.write_punct("(");
    for (idx, param) in func.stx.parameters.iter().enumerate() {
      if idx > 0 {
        self.out.write_punct(",");
        self.out.write_space();
      }
      self.emit_param_decl(param)?;
    }
    self.out.write_punct(")");
    self.out.write_space();
    match &func.stx.body {
      FuncBody::Block(body) => emit_block_body(self.out, body)?,
      FuncBody::Expression(_) => {
        return Err(EmitError::unsupported("expression body outside an arrow function"))
      }
    };
    self.no_in = no_in;
    Ok(())
  }

  fn emit_arrow_func(&mut self, arrow: &Node<ArrowFuncExpr>) -> EmitResult {
    with_node_context(arrow.loc, || {
      let func = &arrow.stx.func;
      if func.stx.async_ {
        self.out.write_keyword("async");
        self.out.write_space();
      };
      let no_in = std::mem::replace(&mut self.no_in, false);
      self.out.write_punct("(");
      for (idx, param) in func.stx.parameters.iter().enumerate() {
        if idx > 0 {
          self.out.write_punct(",");
          self.out.write_space();
        }
        self.emit_param_decl(param)?;
      }
      self.out.write_punct(")");
      self.out.write_space();
      self.out.write_punct("=>");
      self.out.write_space();
      match &func.stx.body {
        FuncBody::Block(body) => emit_block_body(self.out, body)?,
        FuncBody::Expression(expr) => {
          let mark = self.out.mark();
          self.emit_expr_with_min_prec(expr, ASSIGNMENT_PRECEDENCE)?;
          // An object literal body would be taken as a block.
          if starts_with_brace(self.out.text_since(mark)) {
            self.out.wrap_parens_since(mark);
          };
        }
      };
      self.no_in = no_in;
      Ok(())
    })
  }

  pub(crate) fn emit_class(
    &mut self,
    name: Option<&Node<ClassOrFuncName>>,
    extends: Option<&Node<Expr>>,
    members: &[Node<ClassMember>],
  ) -> EmitResult {
    self.out.write_keyword("class");
    if let Some(name) = name {
      self.out.write_identifier(&name.stx.name);
    };
    if let Some(extends) = extends {
      self.out.write_keyword("extends");
      self.out.write_space();
      self.emit_memberish_receiver(extends)?;
    };
    self.out.write_space();
    self.out.write_punct("{");
    if members.is_empty() {
      self.out.write_punct("}");
      return Ok(());
    };
    let no_in = std::mem::replace(&mut self.no_in, false);
    self.out.indent();
    for member in members {
      self.out.write_newline();
      self.emit_class_member(member)?;
    }
    self.out.dedent();
    self.out.write_newline();
    self.out.write_punct("}");
    self.no_in = no_in;
    Ok(())
  }

  fn emit_class_member(&mut self, member: &Node<ClassMember>) -> EmitResult {
    with_node_context(member.loc, || {
      let member = member.stx.as_ref();
      if member.static_ {
        self.out.write_keyword("static");
        self.out.write_space();
      };
      match &member.val {
        ClassOrObjVal::Prop(value) => {
          self.emit_class_or_obj_key(&member.key)?;
          if let Some(value) = value {
            self.out.write_space();
            self.out.write_punct("=");
            self.out.write_space();
            self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)?;
          };
          self.out.write_punct(";");
          Ok(())
        }
        val => self.emit_method_like(&member.key, val),
      }
    })
  }

  fn emit_unary(&mut self, unary: &Node<UnaryExpr>) -> EmitResult {
    with_node_context(unary.loc, || {
      let op = unary.stx.operator;
      match op {
        OperatorName::Await
        | OperatorName::Delete
        | OperatorName::Typeof
        | OperatorName::Void => {
          self.out.write_keyword(op.syntax());
          self.out.write_space();
        }
        OperatorName::BitwiseNot
        | OperatorName::LogicalNot
        | OperatorName::PrefixDecrement
        | OperatorName::PrefixIncrement
        | OperatorName::UnaryNegation
        | OperatorName::UnaryPlus => self.out.write_punct(op.syntax()),
        _ => return Err(EmitError::unsupported("operator in unary position")),
      };
      self.emit_expr_with_min_prec(&unary.stx.argument, Prec::of(op))
    })
  }

  fn emit_unary_postfix(&mut self, unary: &Node<UnaryPostfixExpr>) -> EmitResult {
    with_node_context(unary.loc, || {
      let op = unary.stx.operator;
      if !matches!(
        op,
        OperatorName::PostfixDecrement | OperatorName::PostfixIncrement
      ) {
        return Err(EmitError::unsupported("operator in postfix position"));
      };
      self.emit_expr_with_min_prec(&unary.stx.argument, Prec::of(op))?;
      self.out.write_punct(op.syntax());
      Ok(())
    })
  }

  fn emit_binary(&mut self, binary: &Node<BinaryExpr>) -> EmitResult {
    with_node_context(binary.loc, || {
      let op = binary.stx.operator;
      let op_txt = op.syntax();
      if op_txt.is_empty() || !is_binary_operator(op) {
        return Err(EmitError::unsupported("operator in binary position"));
      };
      let left = &binary.stx.left;
      let right = &binary.stx.right;

      // `-a ** b` is a syntax error, and `??` cannot be mixed with `&&`/`||` without parentheses.
      let force_left_parens = (op == OperatorName::Exponentiation && is_unary_like(left))
        || (op == OperatorName::NullishCoalescing && is_logical_and_or(left))
        || (is_and_or(op) && is_nullish(left));
      let force_right_parens = (op == OperatorName::NullishCoalescing && is_logical_and_or(right))
        || (is_and_or(op) && is_nullish(right));

      if force_left_parens {
        self.emit_expr_with_min_prec(left, crate::precedence::PRIMARY_PRECEDENCE)?;
      } else {
        self.emit_expr_with_min_prec(left, child_min_prec_for_binary(op, Side::Left))?;
      };
      if op == OperatorName::Comma {
        self.out.write_punct(",");
      } else {
        self.out.write_space();
        if matches!(op, OperatorName::In | OperatorName::Instanceof) {
          self.out.write_keyword(op_txt);
        } else {
          self.out.write_punct(op_txt);
        };
      };
      self.out.write_space();
      if force_right_parens {
        self.emit_expr_with_min_prec(right, crate::precedence::PRIMARY_PRECEDENCE)
      } else {
        self.emit_expr_with_min_prec(right, child_min_prec_for_binary(op, Side::Right))
      }
    })
  }

  fn emit_cond(&mut self, cond: &Node<CondExpr>) -> EmitResult {
    with_node_context(cond.loc, || {
      let prec = Prec::of(OperatorName::Conditional);
      self.emit_expr_with_min_prec(&cond.stx.test, prec.tighter())?;
      self.out.write_space();
      self.out.write_punct("?");
      self.out.write_space();
      self.emit_expr_with_min_prec(&cond.stx.consequent, ASSIGNMENT_PRECEDENCE)?;
      self.out.write_space();
      self.out.write_punct(":");
      self.out.write_space();
      self.emit_expr_with_min_prec(&cond.stx.alternate, ASSIGNMENT_PRECEDENCE)
    })
  }

  fn emit_args(&mut self, args: &[Node<CallArg>]) -> EmitResult {
    let no_in = std::mem::replace(&mut self.no_in, false);
    self.out.write_punct("(");
    for (idx, arg) in args.iter().enumerate() {
      if idx > 0 {
        self.out.write_punct(",");
        self.out.write_space();
      }
      let CallArg { spread, value } = arg.stx.as_ref();
      if *spread {
        self.out.write_punct("...");
      };
      self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)?;
    }
    self.out.write_punct(")");
    self.no_in = no_in;
    Ok(())
  }

  fn emit_call(&mut self, call: &Node<CallExpr>) -> EmitResult {
    with_node_context(call.loc, || {
      self.emit_memberish_receiver(&call.stx.callee)?;
      if call.stx.optional_chaining {
        self.out.write_punct("?.");
      };
      self.emit_args(&call.stx.arguments)
    })
  }

  fn emit_new(&mut self, new: &Node<NewExpr>) -> EmitResult {
    with_node_context(new.loc, || {
      let callee = &new.stx.callee;
      self.out.write_keyword("new");
      self.out.write_space();
      // A call in the callee would otherwise be taken as the arguments of the `new`.
      if member_chain_has_call(callee) || starts_with_optional_chaining(callee) {
        self.emit_wrapped(callee)?;
      } else {
        self.emit_memberish_receiver(callee)?;
      };
      self.emit_args(&new.stx.arguments)
    })
  }

  fn emit_member(&mut self, member: &Node<MemberExpr>) -> EmitResult {
    with_node_context(member.loc, || {
      let left = &member.stx.left;
      match left.stx.as_ref() {
        Expr::LitNum(num) if !member.stx.optional_chaining && !is_unary_like(left) => {
          self.emit_number_receiver(left, num)?
        }
        _ => self.emit_memberish_receiver(left)?,
      };
      self.out.write_punct(if member.stx.optional_chaining {
        "?."
      } else {
        "."
      });
      self.out.write_identifier(&member.stx.right);
      Ok(())
    })
  }

  // `1.toString` lexes as the number `1.` followed by an identifier.
  fn emit_number_receiver(&mut self, expr: &Node<Expr>, num: &Node<LitNumExpr>) -> EmitResult {
    if !num.stx.value.is_finite() {
      return self.emit_memberish_receiver(expr);
    };
    if let Some(LeadingComment(text)) = expr.assoc.get::<LeadingComment>() {
      self.out.write_block_comment(text);
    };
    let text = match num.assoc.get::<NumberLiteralRaw>() {
      Some(NumberLiteralRaw(raw)) => raw.clone(),
      None => num.stx.value.to_string(),
    };
    if text.bytes().all(|c| c.is_ascii_digit()) && !num.assoc.has::<NumberLiteralRaw>() {
      self.out.write_number(&format!("{}.", text));
    } else if text.contains('.') && !text.contains(['e', 'E']) {
      self.out.write_number(&text);
    } else {
      self.out.write_punct("(");
      self.out.write_number(&text);
      self.out.write_punct(")");
    };
    Ok(())
  }

  fn emit_computed_member(&mut self, member: &Node<ComputedMemberExpr>) -> EmitResult {
    with_node_context(member.loc, || {
      self.emit_memberish_receiver(&member.stx.object)?;
      if member.stx.optional_chaining {
        self.out.write_punct("?.");
      };
      let no_in = std::mem::replace(&mut self.no_in, false);
      self.out.write_punct("[");
      self.emit_expr(&member.stx.member)?;
      self.out.write_punct("]");
      self.no_in = no_in;
      Ok(())
    })
  }

  fn emit_yield(&mut self, yield_: &Node<YieldExpr>) -> EmitResult {
    with_node_context(yield_.loc, || {
      self.out.write_keyword("yield");
      if yield_.stx.delegate {
        self.out.write_punct("*");
      };
      if let Some(argument) = &yield_.stx.argument {
        self.out.write_space();
        self.emit_expr_with_min_prec(argument, ASSIGNMENT_PRECEDENCE)?;
      };
      Ok(())
    })
  }
}

fn is_binary_operator(op: OperatorName) -> bool {
  !matches!(
    op,
    OperatorName::Await
      | OperatorName::BitwiseNot
      | OperatorName::Delete
      | OperatorName::LogicalNot
      | OperatorName::New
      | OperatorName::PostfixDecrement
      | OperatorName::PostfixIncrement
      | OperatorName::PrefixDecrement
      | OperatorName::PrefixIncrement
      | OperatorName::Typeof
      | OperatorName::UnaryNegation
      | OperatorName::UnaryPlus
      | OperatorName::Void
      | OperatorName::Yield
      | OperatorName::YieldDelegated
  )
}

fn is_and_or(op: OperatorName) -> bool {
  matches!(op, OperatorName::LogicalAnd | OperatorName::LogicalOr)
}

fn is_nullish(expr: &Node<Expr>) -> bool {
  matches!(
    expr.stx.as_ref(),
    Expr::Binary(binary) if binary.stx.operator == OperatorName::NullishCoalescing
  )
}

fn is_logical_and_or(expr: &Node<Expr>) -> bool {
  matches!(
    expr.stx.as_ref(),
    Expr::Binary(binary) if is_and_or(binary.stx.operator)
  )
}

fn is_in_expr(expr: &Node<Expr>) -> bool {
  matches!(
    expr.stx.as_ref(),
    Expr::Binary(binary) if binary.stx.operator == OperatorName::In
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use parse_js::ast::expr::IdExpr;
  use parse_js::ast::expr::lit::LitStrExpr;
  use parse_js::loc::Loc;

  fn node<T: derive_visitor::Drive + derive_visitor::DriveMut>(stx: T) -> Node<T> {
    Node::new(Loc(0, 0), stx)
  }

  fn id(name: &str) -> Node<Expr> {
    node(Expr::Id(node(IdExpr {
      name: name.to_string(),
    })))
  }

  fn num(value: f64) -> Node<Expr> {
    node(Expr::LitNum(node(LitNumExpr {
      value: JsNumber(value),
    })))
  }

  fn member(left: Node<Expr>, right: &str, optional_chaining: bool) -> Node<Expr> {
    node(Expr::Member(node(MemberExpr {
      optional_chaining,
      left,
      right: right.to_string(),
    })))
  }

  fn binary(operator: OperatorName, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
    node(Expr::Binary(node(BinaryExpr {
      operator,
      left,
      right,
    })))
  }

  fn emit(expr: &Node<Expr>) -> String {
    let mut out = Emitter::new();
    ExprEmitter::new(&mut out).emit_expr(expr).unwrap();
    out.into_string()
  }

  #[test]
  fn emits_member_after_integer_literal_with_extra_dot() {
    assert_eq!(emit(&member(num(1.0), "toString", false)), "1..toString");
  }

  #[test]
  fn emits_member_after_decimal_literal_without_extra_dot() {
    assert_eq!(emit(&member(num(1.2), "toString", false)), "1.2.toString");
  }

  #[test]
  fn emits_optional_chaining_member_after_integer_literal_without_extra_dot() {
    assert_eq!(emit(&member(num(1.0), "toString", true)), "1?.toString");
  }

  #[test]
  fn wraps_negative_and_non_finite_receivers() {
    assert_eq!(emit(&member(num(-2.0), "x", false)), "(-2).x");
    assert_eq!(emit(&member(num(f64::INFINITY), "x", false)), "(1/0).x");
  }

  #[test]
  fn emits_non_finite_numbers_as_division() {
    assert_eq!(emit(&num(f64::INFINITY)), "1/0");
    assert_eq!(emit(&num(f64::NEG_INFINITY)), "-1/0");
    assert_eq!(emit(&num(f64::NAN)), "0/0");
    assert_eq!(
      emit(&binary(OperatorName::Multiplication, num(f64::NAN), id("a"))),
      "(0/0) * a"
    );
  }

  #[test]
  fn emits_negative_numbers_as_negation() {
    assert_eq!(emit(&num(-5.0)), "-5");
    assert_eq!(emit(&num(-0.0)), "-0");
    assert_eq!(
      emit(&binary(OperatorName::Subtraction, id("a"), num(-5.0))),
      "a - -5"
    );
    assert_eq!(
      emit(&binary(OperatorName::Exponentiation, num(-2.0), num(2.0))),
      "(-2) ** 2"
    );
  }

  #[test]
  fn prints_raw_number_text() {
    let mut lit = node(LitNumExpr {
      value: JsNumber(31.0),
    });
    lit.assoc.set(NumberLiteralRaw("0x1F".to_string()));
    let expr = node(Expr::LitNum(lit));
    assert_eq!(emit(&expr), "0x1F");
    assert_eq!(emit(&member(expr, "toString", false)), "(0x1F).toString");
  }

  #[test]
  fn prints_leading_comment() {
    let mut expr = binary(OperatorName::Addition, id("a"), id("b"));
    expr.assoc.set(LeadingComment("Qc function call".to_string()));
    let outer = binary(OperatorName::Multiplication, expr, id("c"));
    assert_eq!(emit(&outer), "/* Qc function call */ (a + b) * c");
  }

  #[test]
  fn quotes_strings_with_double_quotes() {
    let expr = node(Expr::LitStr(node(LitStrExpr {
      value: "it's \"x\"".to_string(),
    })));
    assert_eq!(emit(&expr), "\"it's \\\"x\\\"\"");
  }

  #[test]
  fn wraps_in_inside_for_initializer() {
    let expr = binary(
      OperatorName::Assignment,
      id("x"),
      binary(OperatorName::In, id("a"), id("b")),
    );
    let mut out = Emitter::new();
    let mut emitter = ExprEmitter::new(&mut out);
    emitter.no_in = true;
    emitter.emit_expr(&expr).unwrap();
    assert_eq!(out.as_str(), "x = (a in b)");
  }
}
