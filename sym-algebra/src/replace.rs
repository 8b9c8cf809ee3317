//! Substitution of factors by expressions.

use crate::{
    error::DuplicateRule,
    expr::{merge_term, Expression},
    factor::{Factor, Sign},
    term::Term,
};
use sym_error::Error;
use tracing::debug;

/// An operation that maps an expression to a new expression.
pub trait Operator {
    /// Applies the operator to the given expression, returning the result.
    fn operate(&self, expr: &Expression) -> Expression;
}

/// A single replacement rule of a [`Replace`] operator.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The factor to replace.
    pub from: Factor,

    /// The terms of the replacement expression. [`None`] marks the factor as known, but
    /// annihilating: terms containing it are not rewritten by this rule.
    pub to: Option<Vec<Term>>,
}

/// Replaces factors with expressions, according to an ordered list of [`Rule`]s.
///
/// Each term of the operand is rewritten by the **first** rule whose factor it contains and
/// whose replacement is present: the term is multiplied by the replacement, and the matched
/// factor is removed from every product. A term that no such rule matches is dropped from the
/// output, as if it had been replaced by zero, so a [`Replace`] acts as a projection onto the
/// terms it knows about.
///
/// ```
/// use sym_algebra::{Expression, Operator, Replace};
///
/// let mut replace = Replace::new();
/// replace.define("a", Some("b + 1")).unwrap();
///
/// let expr = Expression::parse("a*x + y").unwrap();
/// assert_eq!(replace.operate(&expr), Expression::parse("(b + 1)*x").unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Replace {
    rules: Vec<Rule>,
}

impl Replace {
    /// Creates an operator with no rules. It maps every expression to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule replacing `from` with the given terms, or marking it as annihilating if
    /// `to` is [`None`].
    ///
    /// Fails if a rule for a factor with the same name already exists.
    pub fn create_rule(&mut self, from: Factor, to: Option<Vec<Term>>) -> Result<(), Error> {
        if self.rules.iter().any(|rule| rule.from.is_equal(&from)) {
            return Err(Error::unspanned(DuplicateRule {
                name: from.name().to_string(),
            }));
        }

        self.rules.push(Rule { from, to });
        Ok(())
    }

    /// Adds a rule replacing the symbol `from` with the parsed expression `to`, or marking it as
    /// annihilating if `to` is [`None`].
    pub fn define(&mut self, from: &str, to: Option<&str>) -> Result<(), Error> {
        let to = to
            .map(|source| Expression::parse(source).map(|mut expr| expr.take_terms()))
            .transpose()?;
        self.create_rule(Factor::new(from, Sign::Pos), to)
    }

    /// Returns the rules of this operator, in definition order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Operator for Replace {
    fn operate(&self, expr: &Expression) -> Expression {
        let mut result = Vec::new();

        for term in expr.terms() {
            let applied = self.rules.iter().find_map(|rule| match &rule.to {
                Some(to) if term.has_factor(&rule.from) => Some((&rule.from, to)),
                _ => None,
            });

            let Some((from, to)) = applied else {
                debug!(%term, "no rule applies, dropping term");
                continue;
            };

            debug!(%term, from = %from, "applying rule");
            for mut product in Expression::multiply_terms(std::slice::from_ref(term), to) {
                product.remove_factor(from);
                product.remove_unit_factor();
                merge_term(&mut result, product);
            }
        }

        Expression::from_terms(result)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expression {
        Expression::parse(source).unwrap()
    }

    #[test]
    fn terms_without_rule_are_dropped() {
        let mut replace = Replace::new();
        replace.define("a", Some("b+1")).unwrap();

        let result = replace.operate(&parse("a*x+y"));
        assert_eq!(result, parse("(b+1)*x"));
        assert_eq!(result.num_terms(), 2);
    }

    #[test]
    fn first_matching_rule_wins() {
        let mut replace = Replace::new();
        replace.define("a", Some("c")).unwrap();
        replace.define("b", Some("d")).unwrap();

        // `a*b` only has `a` replaced
        assert_eq!(replace.operate(&parse("a*b + b")), parse("c*b + d"));
    }

    #[test]
    fn annihilating_rule_is_skipped() {
        let mut replace = Replace::new();
        replace.define("a", None).unwrap();
        replace.define("b", Some("2")).unwrap();

        assert_eq!(replace.operate(&parse("a + a*b + b")), parse("2*a + 2"));
        assert!(replace.operate(&parse("a")).is_zero());
    }

    #[test]
    fn replaced_terms_are_merged() {
        let mut replace = Replace::new();
        replace.define("x", Some("y")).unwrap();
        replace.define("z", Some("-y")).unwrap();

        let result = replace.operate(&parse("x + z + 2*x"));
        assert_eq!(result, parse("2*y"));
        assert_eq!(result.num_terms(), 1);
    }

    #[test]
    fn unit_factors_are_not_displayed() {
        let mut replace = Replace::new();
        replace.define("a", Some("b + 1")).unwrap();
        replace.define("c", Some("d - 1")).unwrap();

        assert_eq!(replace.operate(&parse("a*x")).to_string(), "x * b + x");
        assert_eq!(replace.operate(&parse("c*x")).to_string(), "x * d - x");
    }

    #[test]
    fn negated_factor_keeps_sign() {
        let mut replace = Replace::new();
        replace.define("a", Some("b")).unwrap();
        assert_eq!(replace.operate(&parse("-a*x")), parse("-b*x"));
    }

    #[test]
    fn repeated_factor_is_replaced_once() {
        let mut replace = Replace::new();
        replace.define("a", Some("b")).unwrap();
        assert_eq!(replace.operate(&parse("a*a")), parse("a*b"));
    }

    #[test]
    fn duplicate_rule() {
        let mut replace = Replace::new();
        replace.define("a", Some("b")).unwrap();
        let err = replace.define("a", None).unwrap_err();
        assert_eq!(err.downcast_ref(), Some(&DuplicateRule { name: "a".to_string() }));
        assert_eq!(replace.len(), 1);
    }

    #[test]
    fn invalid_replacement_is_rejected() {
        let mut replace = Replace::new();
        assert!(replace.define("a", Some("(b")).is_err());
        assert!(replace.is_empty());
    }

    #[test]
    fn empty_operator_maps_to_zero() {
        assert!(Replace::new().operate(&parse("a + b")).is_zero());
    }
}
