//! The formatted (grouped exponent) rendering of terms and expressions.

use crate::{expr::{write_sum, Expression}, term::Term};
use std::{collections::BTreeMap, fmt};

/// Displays a [`Term`] or [`Expression`] in formatted form.
///
/// In formatted form, the coefficient of each term is written first (and omitted if its
/// magnitude is 1), followed by the non-numeric factors sorted by name, with repeated factors
/// written once with an exponent: `x * 3 * y * x` is written as `3 * x^2 * y`.
#[derive(Debug, Clone, Copy)]
pub struct Formatted<'a, T>(&'a T);

impl Term {
    /// Returns a value that displays this term in formatted form.
    pub fn formatted(&self) -> Formatted<'_, Term> {
        Formatted(self)
    }
}

impl Expression {
    /// Returns a value that displays this expression in formatted form.
    pub fn formatted(&self) -> Formatted<'_, Expression> {
        Formatted(self)
    }
}

/// Writes the unsigned formatted body of a term.
fn write_term(f: &mut fmt::Formatter<'_>, term: &Term) -> fmt::Result {
    let mut powers = BTreeMap::<&str, usize>::new();
    for factor in term.non_numeric_factors() {
        *powers.entry(factor.name()).or_default() += 1;
    }

    let coefficient = term.numeric_factor_value(false);
    let mut first = true;
    if coefficient != 1 || powers.is_empty() {
        write!(f, "{}", coefficient)?;
        first = false;
    }

    for (name, power) in powers {
        if !first {
            write!(f, " * ")?;
        }
        first = false;

        write!(f, "{}", name)?;
        if power > 1 {
            write!(f, "^{}", power)?;
        }
    }

    Ok(())
}

impl fmt::Display for Formatted<'_, Term> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.sign().is_negative() {
            write!(f, "-")?;
        }
        write_term(f, self.0)
    }
}

impl fmt::Display for Formatted<'_, Expression> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sum(f, self.0.terms(), write_term)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn formatted(source: &str) -> String {
        Expression::parse(source).unwrap().formatted().to_string()
    }

    #[test]
    fn groups_repeated_factors() {
        assert_eq!(formatted("x * 3 * y * x"), "3 * x^2 * y");
        assert_eq!(formatted("b * a"), "a * b");
    }

    #[test]
    fn unit_coefficient_is_omitted() {
        assert_eq!(formatted("x*x - 2*x + 1"), "x^2 - 2 * x + 1");
        assert_eq!(formatted("-y*y*y"), "-y^3");
    }

    #[test]
    fn zero_expression() {
        assert_eq!(formatted("a - a"), "0");
    }

    #[test]
    fn signed_term() {
        let e = Expression::parse("-2*b*a").unwrap();
        assert_eq!(e.terms()[0].formatted().to_string(), "-2 * a * b");
    }
}
