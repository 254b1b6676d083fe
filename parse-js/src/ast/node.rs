use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use ahash::HashMap;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;
use serde::Serializer;
use std::any::Any;
use std::any::TypeId;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;

#[derive(Default)]
pub struct NodeAssocData {
  // Values are Send + Sync so that a Node can be moved across threads.
  map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl NodeAssocData {
  pub fn get<T: Any>(&self) -> Option<&T> {
    let t = TypeId::of::<T>();
    self.map.get(&t).and_then(|v| v.downcast_ref())
  }

  pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
    let t = TypeId::of::<T>();
    self.map.get_mut(&t).and_then(|v| v.downcast_mut())
  }

  pub fn set<T: Any + Send + Sync>(&mut self, v: T) {
    let t = TypeId::of::<T>();
    self.map.insert(t, Box::from(v));
  }

  pub fn remove<T: Any>(&mut self) -> Option<T> {
    let t = TypeId::of::<T>();
    self
      .map
      .remove(&t)
      .and_then(|v| v.downcast::<T>().ok())
      .map(|v| *v)
  }

  pub fn has<T: Any>(&self) -> bool {
    self.map.contains_key(&TypeId::of::<T>())
  }
}

/// The original source text of a number literal written in a non-decimal form (e.g. `0x1f`,
/// `0o17`, `0b11`, `017`). Emitters print this instead of the normalized value when present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberLiteralRaw(pub String);

/// A block comment to print immediately before the node, without the `/*` and `*/` delimiters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeadingComment(pub String);

#[derive(Drive, DriveMut)]
pub struct Node<S: Drive + DriveMut> {
  // A location is not a source range: after transformations, nodes may be created that don't
  // exist in the source at all, so this is only best-effort.
  #[drive(skip)]
  pub loc: Loc,
  pub stx: Box<S>,
  #[drive(skip)]
  pub assoc: NodeAssocData,
}

impl<S: Drive + DriveMut> Node<S> {
  pub fn new(loc: Loc, stx: S) -> Node<S> {
    Node {
      loc,
      stx: Box::new(stx),
      assoc: NodeAssocData::default(),
    }
  }

  pub fn into_stx<T: From<S> + Drive + DriveMut>(self) -> Node<T> {
    Node {
      loc: self.loc,
      stx: Box::new(T::from(*self.stx)),
      assoc: self.assoc,
    }
  }

  /// Maps the syntax, keeping the location and associated data.
  pub fn map_stx<T: Drive + DriveMut, F: FnOnce(S) -> T>(self, f: F) -> Node<T> {
    Node {
      loc: self.loc,
      stx: Box::new(f(*self.stx)),
      assoc: self.assoc,
    }
  }

  /// Maps the syntax, copying the location but not the associated data.
  pub fn derive_stx<T: Drive + DriveMut, F: FnOnce(&S) -> T>(&self, f: F) -> Node<T> {
    Node::new(self.loc, f(&self.stx))
  }

  /// Wraps the node inside another node with the same loc, with syntax derived from the provided callback.
  pub fn wrap<T: Drive + DriveMut, F: FnOnce(Node<S>) -> T>(self, f: F) -> Node<T> {
    let loc = self.loc;
    let stx = f(self);
    Node::new(loc, stx)
  }

  /// Wraps the node inside a variant of another type (e.g. Node<IdExpr> into Node<Expr>) with the same loc.
  pub fn into_wrapped<T: From<Node<S>> + Drive + DriveMut>(self) -> Node<T> {
    let loc = self.loc;
    Node::new(loc, T::from(self))
  }

  /// Create an error at this node's location.
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, None)
  }
}

// Associated data is analysis output (scopes etc.) that belongs to the original node only, so a
// clone starts without it.
impl<S: Clone + Drive + DriveMut> Clone for Node<S> {
  fn clone(&self) -> Self {
    Node {
      loc: self.loc,
      stx: self.stx.clone(),
      assoc: NodeAssocData::default(),
    }
  }
}

impl<S: Debug + Drive + DriveMut> Debug for Node<S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    self.stx.fmt(f)
  }
}

impl<S: Serialize + Drive + DriveMut> Serialize for Node<S> {
  fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
    self.stx.serialize(serializer)
  }
}

#[cfg(test)]
mod tests {
  use super::Node;
  use super::NodeAssocData;
  use crate::ast::expr::IdExpr;
  use crate::loc::Loc;

  #[test]
  fn test_node_assoc_data() {
    struct MyType(u32);
    let mut assoc = NodeAssocData::default();
    assoc.set(MyType(32));
    let v = assoc.get::<MyType>().unwrap();
    assert_eq!(v.0, 32);
    assoc.get_mut::<MyType>().unwrap().0 = 7;
    assert_eq!(assoc.remove::<MyType>().map(|v| v.0), Some(7));
    assert!(!assoc.has::<MyType>());
  }

  #[test]
  fn test_clone_drops_assoc() {
    let mut node = Node::new(Loc(1, 2), IdExpr {
      name: "a".to_string(),
    });
    node.assoc.set(5u8);
    let copy = node.clone();
    assert_eq!(copy.loc, Loc(1, 2));
    assert_eq!(copy.stx.name, "a");
    assert!(copy.assoc.get::<u8>().is_none());
  }
}
