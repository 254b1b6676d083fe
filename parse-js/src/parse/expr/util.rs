use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::pat::ArrPat;
use crate::ast::expr::pat::ArrPatElem;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::pat::ObjPat;
use crate::ast::expr::pat::ObjPatProp;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::operator::OperatorName;
use crate::token::TT;

// Splits `target = default` as found inside array and object literals that turn out to be patterns.
fn split_default(node: Node<Expr>) -> SyntaxResult<(Node<Pat>, Option<Node<Expr>>)> {
  match *node.stx {
    Expr::Binary(n) if n.stx.operator == OperatorName::Assignment => {
      let BinaryExpr { left, right, .. } = *n.stx;
      Ok((lit_to_pat(left)?, Some(right)))
    }
    stx => Ok((lit_to_pat(Node::new(node.loc, stx))?, None)),
  }
}

/// Converts a literal expression subtree into a pattern (assignment target).
/// `{ a: [b] }` could be an object literal or object pattern; this handles the case where a pattern
/// was parsed as a literal, without needing to rewind and reparse.
pub fn lit_to_pat(node: Node<Expr>) -> SyntaxResult<Node<Pat>> {
  let loc = node.loc;
  match *node.stx {
    Expr::LitArr(n) => {
      let mut elements = Vec::<Option<ArrPatElem>>::new();
      let mut rest = None;
      for element in n.stx.elements {
        if rest.is_some() {
          return Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
        };
        match element {
          LitArrElem::Single(elem) => {
            let (target, default_value) = split_default(elem)?;
            elements.push(Some(ArrPatElem {
              target,
              default_value,
            }));
          }
          LitArrElem::Rest(expr) => rest = Some(lit_to_pat(expr)?),
          LitArrElem::Empty => elements.push(None),
        };
      }
      Ok(Node::new(loc, ArrPat { elements, rest }).into_wrapped())
    }
    Expr::LitObj(n) => {
      let mut properties = Vec::new();
      let mut rest: Option<Node<IdPat>> = None;
      for member in n.stx.members {
        let loc = member.loc;
        if rest.is_some() {
          return Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
        };
        match member.stx.typ {
          ObjMemberType::Valued {
            key,
            val: ClassOrObjVal::Prop(Some(initializer)),
          } => {
            let (target, default_value) = split_default(initializer)?;
            properties.push(Node::new(loc, ObjPatProp {
              key,
              target,
              shorthand: false,
              default_value,
            }));
          }
          ObjMemberType::Valued { .. } => {
            return Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
          }
          ObjMemberType::Shorthand { id } => {
            properties.push(Node::new(loc, ObjPatProp {
              key: ClassOrObjKey::Direct(id.derive_stx(|id| ClassOrObjMemberDirectKey {
                key: id.name.clone(),
                tt: TT::Identifier,
              })),
              target: id
                .derive_stx(|id| IdPat {
                  name: id.name.clone(),
                })
                .into_wrapped(),
              shorthand: true,
              default_value: None,
            }));
          }
          ObjMemberType::Rest { val } => {
            // The rest element must be an identifier.
            let rest_pat = lit_to_pat(val)?;
            let rest_loc = rest_pat.loc;
            let Pat::Id(id) = *rest_pat.stx else {
              return Err(rest_loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
            };
            rest = Some(id);
          }
        };
      }
      Ok(Node::new(loc, ObjPat { properties, rest }).into_wrapped())
    }
    Expr::Id(n) => Ok(
      Node::new(loc, IdPat {
        name: n.stx.name.clone(),
      })
      .into_wrapped(),
    ),
    // Already converted, e.g. the `b` in `[b = 1] = x` was parsed as an assignment.
    Expr::IdPat(n) => Ok(n.into_wrapped()),
    Expr::ArrPat(n) => Ok(n.into_wrapped()),
    Expr::ObjPat(n) => Ok(n.into_wrapped()),
    _ => Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None)),
  }
}

// Checking whether every object, array or identifier operand is an assignment target up front is
// wasteful, so the LHS of an assignment is transformed retroactively instead, raising an error if it
// can't be. A valid target is a pattern, or a non-optional member or computed member access.
pub fn lhs_expr_to_assign_target(
  lhs: Node<Expr>,
  operator_name: OperatorName,
) -> SyntaxResult<Node<Expr>> {
  match lhs.stx.as_ref() {
    Expr::Id(_) => Ok(lit_to_pat(lhs)?.into_stx()),
    // Destructuring only works with plain `=`.
    Expr::LitArr(_) | Expr::LitObj(_) if operator_name == OperatorName::Assignment => {
      Ok(lit_to_pat(lhs)?.into_stx())
    }
    Expr::ComputedMember(m) if !m.stx.optional_chaining => Ok(lhs),
    Expr::Member(m) if !m.stx.optional_chaining => Ok(lhs),
    _ => Err(lhs.error(SyntaxErrorType::InvalidAssigmentTarget)),
  }
}
