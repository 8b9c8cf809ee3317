//! Numeric evaluation of expressions.

use crate::{expr::Expression, factor::Factor, term::Term};
use std::collections::HashMap;

/// Numeric values to substitute for symbols during evaluation.
///
/// Symbols without an explicit value evaluate to [`Substitutions::other`], which defaults to
/// `1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitutions {
    values: HashMap<String, f64>,
    other: f64,
}

impl Default for Substitutions {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            other: 1.0,
        }
    }
}

impl Substitutions {
    /// Creates an empty set of substitutions, where every symbol evaluates to `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of the given symbol.
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Sets the value of every symbol that has no explicit value.
    pub fn set_other(&mut self, value: f64) -> &mut Self {
        self.other = value;
        self
    }

    /// Returns the explicit value of the given symbol.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Returns the value of symbols without an explicit value.
    pub fn other(&self) -> f64 {
        self.other
    }

    /// Returns the value the given symbol evaluates to.
    pub fn value_of(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(self.other)
    }
}

impl Factor {
    /// Evaluates the magnitude of this factor. The sign is applied by [`Term::evaluate`].
    pub fn evaluate(&self, subst: &Substitutions) -> f64 {
        match self.magnitude() {
            Some(value) => value.to_f64(),
            None => subst.value_of(self.name()),
        }
    }
}

impl Term {
    /// Evaluates this term: the product of its factors, signed by the sign of the term.
    pub fn evaluate(&self, subst: &Substitutions) -> f64 {
        let product = self.factors()
            .iter()
            .map(|f| f.evaluate(subst))
            .product::<f64>();

        if self.sign().is_negative() {
            -product
        } else {
            product
        }
    }
}

impl Expression {
    /// Evaluates this expression: the sum of its terms.
    pub fn evaluate(&self, subst: &Substitutions) -> f64 {
        self.terms().iter().map(|t| t.evaluate(subst)).sum()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn eval(source: &str, subst: &Substitutions) -> f64 {
        Expression::parse(source).unwrap().evaluate(subst)
    }

    #[test]
    fn unlisted_symbols_default_to_one() {
        assert_eq!(eval("2*a*b - 3", &Substitutions::new()), -1.0);
    }

    #[test]
    fn explicit_values() {
        let mut subst = Substitutions::new();
        subst.set("x", 2.0).set("y", -0.5);
        assert_eq!(eval("x*x*y + x", &subst), 0.0);
    }

    #[test]
    fn other_value() {
        let mut subst = Substitutions::new();
        subst.set("x", 3.0).set_other(0.0);
        assert_eq!(eval("x*x + a*x + b", &subst), 9.0);
    }

    #[test]
    fn zero_expression() {
        assert_eq!(eval("a - a", &Substitutions::new()), 0.0);
    }

    #[test]
    fn negative_factors() {
        let mut subst = Substitutions::new();
        subst.set("a", 4.0);
        assert_eq!(eval("-a*3", &subst), -12.0);
    }
}
