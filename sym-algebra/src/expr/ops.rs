//! Arithmetic operator implementations for [`Expression`].

use crate::{factor::Factor, term::Term};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use super::Expression;

/// Implements an assigning operator and its by-value counterpart for each operand type, by
/// forwarding to the named [`Expression`] methods.
macro_rules! forward_ops {
    ($($rhs:ty => $add:ident, $sub:ident, $mul:ident;)*) => {
        $(
            impl AddAssign<&$rhs> for Expression {
                fn add_assign(&mut self, rhs: &$rhs) {
                    self.$add(rhs);
                }
            }

            impl SubAssign<&$rhs> for Expression {
                fn sub_assign(&mut self, rhs: &$rhs) {
                    self.$sub(rhs);
                }
            }

            impl MulAssign<&$rhs> for Expression {
                fn mul_assign(&mut self, rhs: &$rhs) {
                    self.$mul(rhs);
                }
            }

            impl Add<&$rhs> for Expression {
                type Output = Expression;

                fn add(mut self, rhs: &$rhs) -> Self::Output {
                    self.$add(rhs);
                    self
                }
            }

            impl Sub<&$rhs> for Expression {
                type Output = Expression;

                fn sub(mut self, rhs: &$rhs) -> Self::Output {
                    self.$sub(rhs);
                    self
                }
            }

            impl Mul<&$rhs> for Expression {
                type Output = Expression;

                fn mul(mut self, rhs: &$rhs) -> Self::Output {
                    self.$mul(rhs);
                    self
                }
            }
        )*
    };
}

forward_ops! {
    Factor => add_factor, sub_factor, mul_factor;
    Term => add_term, sub_term, mul_term;
    Expression => add_expr, sub_expr, mul_expr;
}

impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Self::Output {
        self + &rhs
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Self::Output {
        self - &rhs
    }
}

impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Self::Output {
        self * &rhs
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(mut self) -> Self::Output {
        self.negate();
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::factor::Sign;
    use super::*;

    fn parse(source: &str) -> Expression {
        Expression::parse(source).unwrap()
    }

    #[test]
    fn operators_match_methods() {
        let a = parse("a + 1");
        let b = parse("a - 1");
        assert_eq!(a.clone() * b.clone(), parse("a*a - 1"));
        assert_eq!(a.clone() + b.clone(), parse("2*a"));
        assert_eq!(a.clone() - b, parse("2"));
        assert_eq!(-a, parse("-a - 1"));
    }

    #[test]
    fn assigning_operators() {
        let mut e = parse("x");
        e += &Factor::new("y", Sign::Pos);
        e *= &Term::new("z", Sign::Neg);
        e -= &parse("-x*z");
        assert_eq!(e, parse("-y*z"));
    }
}
