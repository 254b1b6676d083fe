use crate::emitter::with_node_context;
use crate::emitter::EmitError;
use crate::emitter::EmitResult;
use crate::expr::ExprEmitter;
use crate::precedence::ASSIGNMENT_PRECEDENCE;
use crate::stmt_start::needs_expr_stmt_parens;
use crate::stmt_start::starts_with_let;
use crate::Emitter;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::decl::VarDecl;
use parse_js::ast::stmt::decl::VarDeclMode;
use parse_js::ast::stmt::ForInOfLhs;
use parse_js::ast::stmt::ForTripleStmtInit;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stmt::SwitchStmt;
use parse_js::ast::stmt::TryStmt;
use parse_js::ast::stx::TopLevel;

pub fn emit_top_level(out: &mut Emitter, top: &Node<TopLevel>) -> EmitResult {
  for stmt in top.stx.body.iter() {
    out.write_newline();
    emit_stmt(out, stmt)?;
  }
  Ok(())
}

/// Writes `{`, the statements on their own indented lines, then `}`.
pub fn emit_block_body(out: &mut Emitter, body: &[Node<Stmt>]) -> EmitResult {
  out.write_punct("{");
  if body.is_empty() {
    out.write_punct("}");
    return Ok(());
  };
  out.indent();
  for stmt in body {
    out.write_newline();
    emit_stmt(out, stmt)?;
  }
  out.dedent();
  out.write_newline();
  out.write_punct("}");
  Ok(())
}

fn var_decl_mode_keyword(mode: VarDeclMode) -> &'static str {
  match mode {
    VarDeclMode::Const => "const",
    VarDeclMode::Let => "let",
    VarDeclMode::Var => "var",
  }
}

/// Writes the declaration without the trailing semicolon, so that it can also be used as a
/// `for` initializer.
pub fn emit_var_decl(out: &mut Emitter, decl: &Node<VarDecl>, no_in: bool) -> EmitResult {
  with_node_context(decl.loc, || {
    out.write_keyword(var_decl_mode_keyword(decl.stx.mode));
    out.write_space();
    let mut emitter = ExprEmitter {
      out: &mut *out,
      no_in,
    };
    for (idx, declarator) in decl.stx.declarators.iter().enumerate() {
      if idx > 0 {
        emitter.out.write_punct(",");
        emitter.out.write_space();
      }
      emitter.emit_pat_decl(&declarator.pattern)?;
      if let Some(init) = &declarator.initializer {
        emitter.out.write_space();
        emitter.out.write_punct("=");
        emitter.out.write_space();
        emitter.emit_expr_with_min_prec(init, ASSIGNMENT_PRECEDENCE)?;
      };
    }
    Ok(())
  })
}

fn emit_expr(out: &mut Emitter, expr: &Node<Expr>) -> EmitResult {
  ExprEmitter::new(out).emit_expr(expr)
}

fn emit_paren_expr(out: &mut Emitter, expr: &Node<Expr>) -> EmitResult {
  out.write_punct("(");
  emit_expr(out, expr)?;
  out.write_punct(")");
  Ok(())
}

// An `if` without `else` at the end of a non-block consequent would capture our `else`.
fn has_dangling_if(stmt: &Node<Stmt>) -> bool {
  match stmt.stx.as_ref() {
    Stmt::If(if_stmt) => match &if_stmt.stx.alternate {
      None => true,
      Some(alternate) => has_dangling_if(alternate),
    },
    Stmt::While(s) => has_dangling_if(&s.stx.body),
    Stmt::With(s) => has_dangling_if(&s.stx.body),
    Stmt::Label(s) => has_dangling_if(&s.stx.statement),
    _ => false,
  }
}

/// Writes the body of a compound statement. Returns whether it was a block, so callers know if a
/// following keyword can stay on the same line.
fn emit_sub_stmt(out: &mut Emitter, stmt: &Node<Stmt>) -> Result<bool, EmitError> {
  if let Stmt::Block(block) = stmt.stx.as_ref() {
    out.write_space();
    with_node_context(block.loc, || emit_block_body(out, &block.stx.body))?;
    return Ok(true);
  };
  out.indent();
  out.write_newline();
  emit_stmt(out, stmt)?;
  out.dedent();
  Ok(false)
}

fn emit_expr_stmt(out: &mut Emitter, expr: &Node<Expr>) -> EmitResult {
  let mark = out.mark();
  emit_expr(out, expr)?;
  if needs_expr_stmt_parens(out.text_since(mark)) {
    out.wrap_parens_since(mark);
  };
  out.write_punct(";");
  Ok(())
}

fn emit_for_in_of_lhs(out: &mut Emitter, lhs: &ForInOfLhs) -> EmitResult {
  match lhs {
    ForInOfLhs::Assign(pat) => {
      let mark = out.mark();
      ExprEmitter::new(out).emit_pat(pat)?;
      if starts_with_let(out.text_since(mark)) {
        out.wrap_parens_since(mark);
      };
    }
    ForInOfLhs::Decl { mode, pat } => {
      out.write_keyword(var_decl_mode_keyword(*mode));
      out.write_space();
      ExprEmitter::new(out).emit_pat_decl(pat)?;
    }
  };
  Ok(())
}

fn emit_switch(out: &mut Emitter, switch: &Node<SwitchStmt>) -> EmitResult {
  out.write_keyword("switch");
  out.write_space();
  emit_paren_expr(out, &switch.stx.test)?;
  out.write_space();
  out.write_punct("{");
  if switch.stx.branches.is_empty() {
    out.write_punct("}");
    return Ok(());
  };
  out.indent();
  for branch in switch.stx.branches.iter() {
    out.write_newline();
    match &branch.stx.case {
      Some(case) => {
        out.write_keyword("case");
        out.write_space();
        emit_expr(out, case)?;
      }
      None => out.write_keyword("default"),
    };
    out.write_punct(":");
    out.indent();
    for stmt in branch.stx.body.iter() {
      out.write_newline();
      emit_stmt(out, stmt)?;
    }
    out.dedent();
  }
  out.dedent();
  out.write_newline();
  out.write_punct("}");
  Ok(())
}

fn emit_try(out: &mut Emitter, try_stmt: &Node<TryStmt>) -> EmitResult {
  out.write_keyword("try");
  out.write_space();
  emit_block_body(out, &try_stmt.stx.wrapped.stx.body)?;
  if let Some(catch) = &try_stmt.stx.catch {
    out.write_space();
    out.write_keyword("catch");
    out.write_space();
    if let Some(param) = &catch.stx.parameter {
      out.write_punct("(");
      ExprEmitter::new(out).emit_pat_decl(param)?;
      out.write_punct(")");
      out.write_space();
    };
    emit_block_body(out, &catch.stx.body)?;
  };
  if let Some(finally) = &try_stmt.stx.finally {
    out.write_space();
    out.write_keyword("finally");
    out.write_space();
    emit_block_body(out, &finally.stx.body)?;
  };
  Ok(())
}

pub fn emit_stmt(out: &mut Emitter, stmt: &Node<Stmt>) -> EmitResult {
  with_node_context(stmt.loc, || match stmt.stx.as_ref() {
    Stmt::Block(block) => emit_block_body(out, &block.stx.body),
    Stmt::Break(s) => {
      out.write_keyword("break");
      if let Some(label) = &s.stx.label {
        out.write_identifier(label);
      };
      out.write_punct(";");
      Ok(())
    }
    Stmt::Continue(s) => {
      out.write_keyword("continue");
      if let Some(label) = &s.stx.label {
        out.write_identifier(label);
      };
      out.write_punct(";");
      Ok(())
    }
    Stmt::Debugger(_) => {
      out.write_keyword("debugger");
      out.write_punct(";");
      Ok(())
    }
    Stmt::DoWhile(s) => {
      out.write_keyword("do");
      if emit_sub_stmt(out, &s.stx.body)? {
        out.write_space();
      } else {
        out.write_newline();
      };
      out.write_keyword("while");
      out.write_space();
      emit_paren_expr(out, &s.stx.condition)?;
      out.write_punct(";");
      Ok(())
    }
    Stmt::Empty(_) => {
      out.write_punct(";");
      Ok(())
    }
    Stmt::Expr(s) => emit_expr_stmt(out, &s.stx.expr),
    Stmt::ForIn(s) => {
      out.write_keyword("for");
      out.write_space();
      out.write_punct("(");
      emit_for_in_of_lhs(out, &s.stx.lhs)?;
      out.write_space();
      out.write_keyword("in");
      out.write_space();
      emit_expr(out, &s.stx.rhs)?;
      out.write_punct(")");
      out.write_space();
      emit_block_body(out, &s.stx.body.stx.body)
    }
    Stmt::ForOf(s) => {
      out.write_keyword("for");
      out.write_space();
      out.write_punct("(");
      emit_for_in_of_lhs(out, &s.stx.lhs)?;
      out.write_space();
      out.write_keyword("of");
      out.write_space();
      ExprEmitter::new(out).emit_expr_with_min_prec(&s.stx.rhs, ASSIGNMENT_PRECEDENCE)?;
      out.write_punct(")");
      out.write_space();
      emit_block_body(out, &s.stx.body.stx.body)
    }
    Stmt::ForTriple(s) => {
      out.write_keyword("for");
      out.write_space();
      out.write_punct("(");
      match &s.stx.init {
        ForTripleStmtInit::None => {}
        ForTripleStmtInit::Expr(expr) => {
          let mark = out.mark();
          ExprEmitter {
            out: &mut *out,
            no_in: true,
          }
          .emit_expr(expr)?;
          if starts_with_let(out.text_since(mark)) {
            out.wrap_parens_since(mark);
          };
        }
        ForTripleStmtInit::Decl(decl) => emit_var_decl(out, decl, true)?,
      };
      out.write_punct(";");
      if let Some(cond) = &s.stx.cond {
        out.write_space();
        emit_expr(out, cond)?;
      };
      out.write_punct(";");
      if let Some(post) = &s.stx.post {
        out.write_space();
        emit_expr(out, post)?;
      };
      out.write_punct(")");
      out.write_space();
      emit_block_body(out, &s.stx.body.stx.body)
    }
    Stmt::If(s) => {
      out.write_keyword("if");
      out.write_space();
      emit_paren_expr(out, &s.stx.test)?;
      let consequent_is_block = match &s.stx.alternate {
        Some(_) if has_dangling_if(&s.stx.consequent) => {
          out.write_space();
          emit_block_body(out, std::slice::from_ref(&s.stx.consequent))?;
          true
        }
        _ => emit_sub_stmt(out, &s.stx.consequent)?,
      };
      if let Some(alternate) = &s.stx.alternate {
        if consequent_is_block {
          out.write_space();
        } else {
          out.write_newline();
        };
        out.write_keyword("else");
        match alternate.stx.as_ref() {
          // Keep `else if` chains flat.
          Stmt::If(_) => {
            out.write_space();
            emit_stmt(out, alternate)?;
          }
          _ => {
            emit_sub_stmt(out, alternate)?;
          }
        };
      };
      Ok(())
    }
    Stmt::Label(s) => {
      out.write_identifier(&s.stx.name);
      out.write_punct(":");
      out.write_space();
      emit_stmt(out, &s.stx.statement)
    }
    Stmt::Return(s) => {
      out.write_keyword("return");
      if let Some(value) = &s.stx.value {
        out.write_space();
        emit_expr(out, value)?;
      };
      out.write_punct(";");
      Ok(())
    }
    Stmt::Switch(s) => emit_switch(out, s),
    Stmt::Throw(s) => {
      out.write_keyword("throw");
      out.write_space();
      emit_expr(out, &s.stx.value)?;
      out.write_punct(";");
      Ok(())
    }
    Stmt::Try(s) => emit_try(out, s),
    Stmt::While(s) => {
      out.write_keyword("while");
      out.write_space();
      emit_paren_expr(out, &s.stx.condition)?;
      emit_sub_stmt(out, &s.stx.body)?;
      Ok(())
    }
    Stmt::With(s) => {
      out.write_keyword("with");
      out.write_space();
      emit_paren_expr(out, &s.stx.object)?;
      emit_sub_stmt(out, &s.stx.body)?;
      Ok(())
    }
    Stmt::ClassDecl(decl) => ExprEmitter::new(out).emit_class(
      Some(&decl.stx.name),
      decl.stx.extends.as_ref(),
      &decl.stx.members,
    ),
    Stmt::FunctionDecl(decl) => {
      ExprEmitter::new(out).emit_function(Some(&decl.stx.name), &decl.stx.function)
    }
    Stmt::VarDecl(decl) => {
      emit_var_decl(out, decl, false)?;
      out.write_punct(";");
      Ok(())
    }
  })
}
