use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::operator::Associativity;
use parse_js::operator::OperatorName;
use parse_js::operator::OPERATORS;

/// Wrapper around a precedence value with total ordering.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Prec(u8);

impl Prec {
  pub const LOWEST: Prec = Prec(0);

  pub const fn new(value: u8) -> Self {
    Prec(value)
  }

  pub const fn tighter(self) -> Self {
    Prec(self.0 + 1)
  }

  pub fn of(op: OperatorName) -> Self {
    // Every operator is in the table; a miss just means "wrap everything".
    Prec(OPERATORS.get(&op).map_or(0, |o| o.precedence))
  }
}

/// Anything that can appear where an assignment expression is expected, i.e.
/// everything but the comma operator.
pub const ASSIGNMENT_PRECEDENCE: Prec = Prec::new(2);
/// Precedence for optional chaining, member access, and call-like operators.
pub const CALL_MEMBER_PRECEDENCE: Prec = Prec::new(18);
/// Precedence for atomic expressions (identifiers, literals, etc.).
pub const PRIMARY_PRECEDENCE: Prec = Prec::new(19);
/// Precedence for arrow functions (lower than assignment to force parentheses when
/// used as operands).
pub const ARROW_FUNCTION_PRECEDENCE: Prec = Prec::new(2);

#[derive(Clone, Copy, Debug)]
pub enum Side {
  Left,
  Right,
}

pub fn needs_parens(child_prec: Prec, min_prec: Prec) -> bool {
  child_prec < min_prec
}

pub fn child_min_prec_for_binary(op: OperatorName, side: Side) -> Prec {
  let Some(operator) = OPERATORS.get(&op) else {
    return PRIMARY_PRECEDENCE;
  };
  let prec = Prec::new(operator.precedence);
  match (operator.associativity, side) {
    (Associativity::Left, Side::Left) | (Associativity::Right, Side::Right) => prec,
    (Associativity::Left, Side::Right) | (Associativity::Right, Side::Left) => prec.tighter(),
  }
}

/// Returns the precedence of an expression as printed. This is derived from the
/// parser's precedence table so that printing without any record of the
/// original parentheses re-parses to the same tree.
pub fn expr_prec(expr: &Node<Expr>) -> Prec {
  match expr.stx.as_ref() {
    Expr::Binary(binary) => Prec::of(binary.stx.operator),
    Expr::Cond(_) => Prec::of(OperatorName::Conditional),
    Expr::Unary(unary) => Prec::of(unary.stx.operator),
    Expr::UnaryPostfix(unary) => Prec::of(unary.stx.operator),
    // `new X()` is always printed with its argument list, so it sits with calls.
    Expr::Call(_)
    | Expr::Member(_)
    | Expr::ComputedMember(_)
    | Expr::TaggedTemplate(_)
    | Expr::New(_) => CALL_MEMBER_PRECEDENCE,
    Expr::ArrowFunc(_) => ARROW_FUNCTION_PRECEDENCE,
    Expr::Yield(_) => Prec::of(OperatorName::Yield),
    // Numbers without a literal spelling print as `-x`, `1/0`, `-1/0` or `0/0`.
    Expr::LitNum(num) if !num.stx.value.is_finite() => Prec::of(OperatorName::Division),
    Expr::LitNum(num) if num.stx.value.0.is_sign_negative() => Prec::of(OperatorName::UnaryNegation),
    Expr::Func(_)
    | Expr::Class(_)
    | Expr::Id(_)
    | Expr::This(_)
    | Expr::Super(_)
    | Expr::LitArr(_)
    | Expr::LitBigInt(_)
    | Expr::LitBool(_)
    | Expr::LitNull(_)
    | Expr::LitNum(_)
    | Expr::LitObj(_)
    | Expr::LitRegex(_)
    | Expr::LitStr(_)
    | Expr::LitTemplate(_)
    | Expr::ArrPat(_)
    | Expr::IdPat(_)
    | Expr::ObjPat(_) => PRIMARY_PRECEDENCE,
  }
}

/// Whether the expression prints with a leading prefix operator, which the base
/// of `**` must not have.
pub fn is_unary_like(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::Unary(_) => true,
    Expr::LitNum(num) => num.stx.value.is_finite() && num.stx.value.0.is_sign_negative(),
    _ => false,
  }
}

pub fn starts_with_optional_chaining(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::Member(member) => {
      member.stx.optional_chaining || starts_with_optional_chaining(&member.stx.left)
    }
    Expr::ComputedMember(member) => {
      member.stx.optional_chaining || starts_with_optional_chaining(&member.stx.object)
    }
    Expr::Call(call) => {
      call.stx.optional_chaining || starts_with_optional_chaining(&call.stx.callee)
    }
    _ => false,
  }
}

/// Whether a call appears anywhere along the member chain, which would otherwise
/// be taken as the argument list of an enclosing `new`.
pub fn member_chain_has_call(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::Call(_) => true,
    Expr::Member(member) => member_chain_has_call(&member.stx.left),
    Expr::ComputedMember(member) => member_chain_has_call(&member.stx.object),
    Expr::TaggedTemplate(tagged) => member_chain_has_call(&tagged.stx.function),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn binary_sides_follow_associativity() {
    let add = Prec::of(OperatorName::Addition);
    assert_eq!(child_min_prec_for_binary(OperatorName::Addition, Side::Left), add);
    assert_eq!(
      child_min_prec_for_binary(OperatorName::Addition, Side::Right),
      add.tighter()
    );
    let exp = Prec::of(OperatorName::Exponentiation);
    assert_eq!(
      child_min_prec_for_binary(OperatorName::Exponentiation, Side::Left),
      exp.tighter()
    );
    assert_eq!(child_min_prec_for_binary(OperatorName::Exponentiation, Side::Right), exp);
  }

  #[test]
  fn assignment_sits_above_comma() {
    assert_eq!(Prec::of(OperatorName::Assignment), ASSIGNMENT_PRECEDENCE);
    assert!(needs_parens(Prec::of(OperatorName::Comma), ASSIGNMENT_PRECEDENCE));
    assert!(!needs_parens(ARROW_FUNCTION_PRECEDENCE, ASSIGNMENT_PRECEDENCE));
  }
}
