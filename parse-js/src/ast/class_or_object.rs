use super::expr::Expr;
use super::expr::IdExpr;
use super::func::Func;
use super::node::Node;
use crate::token::TT;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// This is a node as the key may not be the same as source[node.loc], due to decoding/normalization.
#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjMemberDirectKey {
  #[drive(skip)]
  pub key: String,
  // The original token type, to know whether the key was an identifier, keyword, string or number.
  #[drive(skip)]
  pub tt: TT,
}

// The two variants cannot be merged by representing Direct with an IdExpr, as a direct key is not a
// usage of a variable.
#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum ClassOrObjKey {
  // Identifier, keyword, string, or number.
  Direct(Node<ClassOrObjMemberDirectKey>),
  Computed(Node<Expr>),
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjGetter {
  pub func: Node<Func>, // `parameters` is empty.
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjMethod {
  pub func: Node<Func>,
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjSetter {
  pub func: Node<Func>, // `parameters` contains exactly one ParamDecl.
}

#[derive(Clone, Debug, Drive, DriveMut, From, Serialize)]
pub enum ClassOrObjVal {
  Getter(Node<ClassOrObjGetter>),
  Setter(Node<ClassOrObjSetter>),
  Method(Node<ClassOrObjMethod>),
  // Always Some for objects, as shorthands are covered by ObjMemberType::Shorthand.
  // None is a class field without an initializer.
  Prop(Option<Node<Expr>>),
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub enum ObjMemberType {
  Valued { key: ClassOrObjKey, val: ClassOrObjVal },
  Shorthand { id: Node<IdExpr> },
  Rest { val: Node<Expr> },
}

#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ClassMember {
  pub key: ClassOrObjKey,
  #[drive(skip)]
  pub static_: bool,
  pub val: ClassOrObjVal,
}

// A node rather than a bare enum so that it can be replaced, e.g. expanding a shorthand to `key: value`.
#[derive(Clone, Debug, Drive, DriveMut, Serialize)]
pub struct ObjMember {
  pub typ: ObjMemberType,
}
