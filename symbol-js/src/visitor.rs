use crate::symbol::Scope;
use crate::symbol::ScopeType;
use derive_visitor::VisitorMut;
use parse_js::ast::expr::pat::ClassOrFuncName;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::ArrowFuncExpr;
use parse_js::ast::expr::BinaryExpr;
use parse_js::ast::expr::CallExpr;
use parse_js::ast::expr::ClassExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::FuncExpr;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::expr::UnaryExpr;
use parse_js::ast::expr::UnaryPostfixExpr;
use parse_js::ast::func::Func;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::decl::ClassDecl;
use parse_js::ast::stmt::decl::FuncDecl;
use parse_js::ast::stmt::decl::ParamDecl;
use parse_js::ast::stmt::decl::PatDecl;
use parse_js::ast::stmt::decl::VarDecl;
use parse_js::ast::stmt::decl::VarDeclMode;
use parse_js::ast::stmt::BlockStmt;
use parse_js::ast::stmt::CatchBlock;
use parse_js::ast::stmt::ForInOfLhs;
use parse_js::ast::stmt::ForInStmt;
use parse_js::ast::stmt::ForOfStmt;
use parse_js::ast::stmt::ForTripleStmt;
use parse_js::ast::stmt::SwitchStmt;
use parse_js::operator::OperatorName;

type ArrowFuncExprNode = Node<ArrowFuncExpr>;
type BinaryExprNode = Node<BinaryExpr>;
type BlockStmtNode = Node<BlockStmt>;
type CallExprNode = Node<CallExpr>;
type CatchBlockNode = Node<CatchBlock>;
type ClassDeclNode = Node<ClassDecl>;
type ClassExprNode = Node<ClassExpr>;
type ClassOrFuncNameNode = Node<ClassOrFuncName>;
type ForInStmtNode = Node<ForInStmt>;
type ForOfStmtNode = Node<ForOfStmt>;
type ForTripleStmtNode = Node<ForTripleStmt>;
type FuncDeclNode = Node<FuncDecl>;
type FuncExprNode = Node<FuncExpr>;
type FuncNode = Node<Func>;
type IdExprNode = Node<IdExpr>;
type IdPatNode = Node<IdPat>;
type ParamDeclNode = Node<ParamDecl>;
type PatDeclNode = Node<PatDecl>;
type SwitchStmtNode = Node<SwitchStmt>;
type UnaryExprNode = Node<UnaryExpr>;
type UnaryPostfixExprNode = Node<UnaryPostfixExpr>;
type VarDeclNode = Node<VarDecl>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum DeclKind {
  Var,
  Lexical,
  Param,
}

impl From<VarDeclMode> for DeclKind {
  fn from(mode: VarDeclMode) -> Self {
    match mode {
      VarDeclMode::Var => DeclKind::Var,
      VarDeclMode::Let | VarDeclMode::Const => DeclKind::Lexical,
    }
  }
}

/// Builds the scope tree, declares every binding, and attaches the enclosing [`Scope`] to
/// identifier, call, declaration and function nodes. Assignments are only collected here, and
/// resolved once every (possibly hoisted) declaration is known.
#[derive(VisitorMut)]
#[visitor(
  ArrowFuncExprNode(enter),
  BinaryExprNode,
  BlockStmtNode,
  CallExprNode(enter),
  CatchBlockNode,
  ClassDeclNode,
  ClassExprNode,
  ClassOrFuncNameNode(enter),
  ForInStmtNode,
  ForOfStmtNode,
  ForTripleStmtNode,
  FuncDeclNode(enter),
  FuncExprNode(enter),
  FuncNode,
  IdExprNode(enter),
  IdPatNode(enter),
  ParamDeclNode,
  PatDeclNode,
  SwitchStmtNode,
  UnaryExprNode(enter),
  UnaryPostfixExprNode(enter),
  VarDeclNode
)]
pub struct DeclVisitor {
  scope_stack: Vec<Scope>,
  decl_kind_stack: Vec<DeclKind>,
  // Whether the nearest enclosing pattern is a declaration rather than an assignment target.
  in_pat_decl_stack: Vec<bool>,
  // Scope created for a named function expression, holding its own name; its Func reuses it.
  pending_function_scope: Option<Scope>,
  assignments: Vec<(Scope, String)>,
}

impl DeclVisitor {
  pub fn new(top_level_scope: Scope) -> DeclVisitor {
    DeclVisitor {
      scope_stack: vec![top_level_scope],
      decl_kind_stack: Vec::new(),
      in_pat_decl_stack: Vec::new(),
      pending_function_scope: None,
      assignments: Vec::new(),
    }
  }

  fn cur(&self) -> &Scope {
    // The top-level scope is never popped.
    &self.scope_stack[self.scope_stack.len() - 1]
  }

  fn push_child_scope(&mut self, typ: ScopeType) {
    let scope = self.cur().create_child_scope(typ);
    self.scope_stack.push(scope);
  }

  fn pop_scope(&mut self) {
    if self.scope_stack.len() > 1 {
      self.scope_stack.pop();
    };
  }

  fn record_assignment(&mut self, name: &str) {
    self.assignments.push((self.cur().clone(), name.to_string()));
  }

  /// Counts every collected assignment against the binding it resolves to.
  pub fn resolve_assignments(self) {
    for (scope, name) in self.assignments {
      if let Some((decl_scope, symbol)) = scope.find_symbol_with_scope(&name) {
        decl_scope.data_mut().record_assignment(symbol);
      };
    }
  }

  pub fn enter_arrow_func_expr_node(&mut self, node: &mut ArrowFuncExprNode) {
    node.assoc.set(self.cur().clone());
  }

  pub fn enter_binary_expr_node(&mut self, node: &mut BinaryExprNode) {
    if node.stx.operator.is_assignment() {
      self.in_pat_decl_stack.push(false);
    };
  }

  pub fn exit_binary_expr_node(&mut self, node: &mut BinaryExprNode) {
    if node.stx.operator.is_assignment() {
      self.in_pat_decl_stack.pop();
    };
  }

  pub fn enter_block_stmt_node(&mut self, _node: &mut BlockStmtNode) {
    self.push_child_scope(ScopeType::Block);
  }

  pub fn exit_block_stmt_node(&mut self, _node: &mut BlockStmtNode) {
    self.pop_scope();
  }

  pub fn enter_call_expr_node(&mut self, node: &mut CallExprNode) {
    node.assoc.set(self.cur().clone());
  }

  pub fn enter_catch_block_node(&mut self, _node: &mut CatchBlockNode) {
    self.push_child_scope(ScopeType::Block);
    self.decl_kind_stack.push(DeclKind::Lexical);
  }

  pub fn exit_catch_block_node(&mut self, _node: &mut CatchBlockNode) {
    self.decl_kind_stack.pop();
    self.pop_scope();
  }

  pub fn enter_class_decl_node(&mut self, node: &mut ClassDeclNode) {
    node.assoc.set(self.cur().clone());
    self.cur().data_mut().add_symbol(node.stx.name.stx.name.clone());
    self.push_child_scope(ScopeType::Class);
  }

  pub fn exit_class_decl_node(&mut self, _node: &mut ClassDeclNode) {
    self.pop_scope();
  }

  pub fn enter_class_expr_node(&mut self, node: &mut ClassExprNode) {
    node.assoc.set(self.cur().clone());
    self.push_child_scope(ScopeType::Class);
    if let Some(name) = &node.stx.name {
      self.cur().data_mut().add_symbol(name.stx.name.clone());
    };
  }

  pub fn exit_class_expr_node(&mut self, _node: &mut ClassExprNode) {
    self.pop_scope();
  }

  pub fn enter_class_or_func_name_node(&mut self, node: &mut ClassOrFuncNameNode) {
    let scope = match &self.pending_function_scope {
      Some(scope) => scope.clone(),
      None => self.cur().clone(),
    };
    node.assoc.set(scope);
  }

  pub fn enter_for_in_stmt_node(&mut self, node: &mut ForInStmtNode) {
    self.push_child_scope(ScopeType::Block);
    self.decl_kind_stack.push(lhs_decl_kind(&node.stx.lhs));
  }

  pub fn exit_for_in_stmt_node(&mut self, _node: &mut ForInStmtNode) {
    self.decl_kind_stack.pop();
    self.pop_scope();
  }

  pub fn enter_for_of_stmt_node(&mut self, node: &mut ForOfStmtNode) {
    self.push_child_scope(ScopeType::Block);
    self.decl_kind_stack.push(lhs_decl_kind(&node.stx.lhs));
  }

  pub fn exit_for_of_stmt_node(&mut self, _node: &mut ForOfStmtNode) {
    self.decl_kind_stack.pop();
    self.pop_scope();
  }

  pub fn enter_for_triple_stmt_node(&mut self, _node: &mut ForTripleStmtNode) {
    self.push_child_scope(ScopeType::Block);
  }

  pub fn exit_for_triple_stmt_node(&mut self, _node: &mut ForTripleStmtNode) {
    self.pop_scope();
  }

  pub fn enter_func_decl_node(&mut self, node: &mut FuncDeclNode) {
    node.assoc.set(self.cur().clone());
    // Function declarations are hoisted like `var`.
    let closure = self.cur().find_closure();
    closure.data_mut().add_symbol(node.stx.name.stx.name.clone());
  }

  pub fn enter_func_expr_node(&mut self, node: &mut FuncExprNode) {
    node.assoc.set(self.cur().clone());
    if let Some(name) = &node.stx.name {
      // The name is only visible inside the function.
      let scope = self.cur().create_child_scope(ScopeType::NonArrowFunction);
      scope.data_mut().add_symbol(name.stx.name.clone());
      self.pending_function_scope = Some(scope);
    };
  }

  pub fn enter_func_node(&mut self, node: &mut FuncNode) {
    let scope = match self.pending_function_scope.take() {
      Some(scope) => scope,
      None => self.cur().create_child_scope(if node.stx.arrow {
        ScopeType::ArrowFunction
      } else {
        ScopeType::NonArrowFunction
      }),
    };
    node.assoc.set(scope.clone());
    self.scope_stack.push(scope);
    self.in_pat_decl_stack.push(false);
  }

  pub fn exit_func_node(&mut self, _node: &mut FuncNode) {
    self.in_pat_decl_stack.pop();
    self.pop_scope();
  }

  pub fn enter_id_expr_node(&mut self, node: &mut IdExprNode) {
    node.assoc.set(self.cur().clone());
  }

  pub fn enter_id_pat_node(&mut self, node: &mut IdPatNode) {
    node.assoc.set(self.cur().clone());
    let name = node.stx.name.clone();
    if !self.in_pat_decl_stack.last().copied().unwrap_or(false) {
      // An identifier pattern outside a declaration is an assignment target.
      self.record_assignment(&name);
      return;
    };
    match self.decl_kind_stack.last() {
      Some(DeclKind::Var) => {
        self.cur().find_closure().data_mut().add_symbol(name);
      }
      Some(DeclKind::Lexical) | Some(DeclKind::Param) | None => {
        self.cur().data_mut().add_symbol(name);
      }
    };
  }

  pub fn enter_param_decl_node(&mut self, _node: &mut ParamDeclNode) {
    self.decl_kind_stack.push(DeclKind::Param);
  }

  pub fn exit_param_decl_node(&mut self, _node: &mut ParamDeclNode) {
    self.decl_kind_stack.pop();
  }

  pub fn enter_pat_decl_node(&mut self, node: &mut PatDeclNode) {
    node.assoc.set(self.cur().clone());
    self.in_pat_decl_stack.push(true);
  }

  pub fn exit_pat_decl_node(&mut self, _node: &mut PatDeclNode) {
    self.in_pat_decl_stack.pop();
  }

  pub fn enter_switch_stmt_node(&mut self, _node: &mut SwitchStmtNode) {
    self.push_child_scope(ScopeType::Block);
  }

  pub fn exit_switch_stmt_node(&mut self, _node: &mut SwitchStmtNode) {
    self.pop_scope();
  }

  pub fn enter_unary_expr_node(&mut self, node: &mut UnaryExprNode) {
    if matches!(
      node.stx.operator,
      OperatorName::PrefixIncrement | OperatorName::PrefixDecrement
    ) {
      if let Expr::Id(id) = node.stx.argument.stx.as_ref() {
        let name = id.stx.name.clone();
        self.record_assignment(&name);
      };
    };
  }

  pub fn enter_unary_postfix_expr_node(&mut self, node: &mut UnaryPostfixExprNode) {
    if let Expr::Id(id) = node.stx.argument.stx.as_ref() {
      let name = id.stx.name.clone();
      self.record_assignment(&name);
    };
  }

  pub fn enter_var_decl_node(&mut self, node: &mut VarDeclNode) {
    node.assoc.set(self.cur().clone());
    self.decl_kind_stack.push(node.stx.mode.into());
  }

  pub fn exit_var_decl_node(&mut self, _node: &mut VarDeclNode) {
    self.decl_kind_stack.pop();
  }
}

fn lhs_decl_kind(lhs: &ForInOfLhs) -> DeclKind {
  match lhs {
    ForInOfLhs::Decl { mode, .. } => (*mode).into(),
    // No declaration follows, so the kind is never read.
    ForInOfLhs::Assign(_) => DeclKind::Lexical,
  }
}
