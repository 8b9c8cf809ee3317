//! Canonical sums of terms.
//!
//! An [`Expression`] is kept in canonical form after every mutation: it never holds two
//! proportional terms, and it never holds a zero term that was added through the public API.
//! Canonicalization is done by a single merge-on-insert rule ([`merge_term`]); every other
//! mutator is written in terms of it.

mod ops;

use crate::{factor::{Factor, Sign}, parser::ExpressionParser, term::Term};
use std::{fmt, str::FromStr};
use sym_error::Error;

/// Folds `term` into `terms` using the canonical merge rule.
///
/// - A zero term is ignored.
/// - If `terms` holds a term proportional to `term`, their signed coefficients are summed. A
///   zero sum removes the existing term; otherwise the existing term is rebuilt from its
///   non-numeric factors and the new coefficient.
/// - Otherwise, `term` is appended.
pub(crate) fn merge_term(terms: &mut Vec<Term>, term: Term) {
    if term.is_zero() {
        return;
    }

    let Some(index) = terms.iter().position(|t| t.is_proportional(&term)) else {
        terms.push(term);
        return;
    };

    let existing = terms[index].numeric_factor_value(true);
    let incoming = term.numeric_factor_value(true);
    let sum = existing + incoming;
    if sum == 0 {
        terms.remove(index);
        return;
    }

    let target = &mut terms[index];
    let mut factors = target.non_numeric_factors().cloned().collect::<Vec<_>>();
    let sign = Sign::of(&sum);
    let magnitude = sum.abs();
    if magnitude != 1 {
        factors.push(Factor::number(magnitude));
    }
    target.replace_factors(factors);

    if target.sign() != sign {
        target.negate();
    }
}

/// Writes the given terms as a signed sum, using `write_term` to write the unsigned body of
/// each term. An empty sum is written as `0`.
pub(crate) fn write_sum<F>(f: &mut fmt::Formatter<'_>, terms: &[Term], mut write_term: F) -> fmt::Result
where
    F: FnMut(&mut fmt::Formatter<'_>, &Term) -> fmt::Result,
{
    if terms.is_empty() {
        return write!(f, "0");
    }

    for (i, term) in terms.iter().enumerate() {
        match (i, term.sign()) {
            (0, Sign::Pos) => {},
            (0, Sign::Neg) => write!(f, "-")?,
            (_, Sign::Pos) => write!(f, " + ")?,
            (_, Sign::Neg) => write!(f, " - ")?,
        }
        write_term(f, term)?;
    }

    Ok(())
}

/// A canonical sum of non-proportional, non-zero [`Term`]s.
///
/// The empty expression is zero. Terms are kept in insertion order; no other ordering is
/// imposed, so two equal expressions may list their terms differently. Use
/// [`Expression::is_equal`] (or `==`) to compare expressions.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    terms: Vec<Term>,
}

impl Expression {
    /// Creates the zero expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an expression from infix source, such as `(a + b) * c - 2 * d`.
    pub fn parse(source: &str) -> Result<Self, Error> {
        ExpressionParser::new().parse(source)
    }

    /// Creates an expression holding the single symbol or number `name` with the given sign.
    pub fn symbol(name: impl Into<String>, sign: Sign) -> Self {
        Self::from(Factor::new(name, sign))
    }

    /// Creates an expression from the given terms, taking ownership of them.
    ///
    /// The terms are **not** canonicalized; the caller must ensure they are pairwise
    /// non-proportional. Use [`Expression::add_term`] to build an expression from arbitrary
    /// terms.
    pub fn from_terms(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    /// Moves the terms out of this expression, leaving it zero.
    pub fn take_terms(&mut self) -> Vec<Term> {
        std::mem::take(&mut self.terms)
    }

    /// Returns the terms of this expression, in insertion order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Returns the number of terms in this expression.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if this expression holds a term strictly equal to the given term.
    pub fn has_term(&self, term: &Term) -> bool {
        self.terms.iter().any(|t| t.is_equal(term, true))
    }

    /// Returns true if this expression is zero: it has no terms, or only zero terms.
    pub fn is_zero(&self) -> bool {
        self.terms.iter().all(Term::is_zero)
    }

    /// Returns true if the two expressions are equal, i.e. their difference cancels out.
    pub fn is_equal(&self, other: &Expression) -> bool {
        let mut difference = self.clone();
        difference.sub_expr(other);
        difference.is_zero()
    }

    /// Negates every term of this expression.
    pub fn negate(&mut self) {
        self.terms.iter_mut().for_each(Term::negate);
    }

    /// Adds a term to this expression.
    pub fn add_term(&mut self, term: &Term) {
        merge_term(&mut self.terms, term.clone());
    }

    /// Adds a factor to this expression.
    pub fn add_factor(&mut self, factor: &Factor) {
        merge_term(&mut self.terms, Term::from(factor.clone()));
    }

    /// Adds every term of another expression to this expression.
    pub fn add_expr(&mut self, other: &Expression) {
        for term in &other.terms {
            self.add_term(term);
        }
    }

    /// Subtracts a term from this expression.
    pub fn sub_term(&mut self, term: &Term) {
        let mut term = term.clone();
        term.negate();
        merge_term(&mut self.terms, term);
    }

    /// Subtracts a factor from this expression.
    pub fn sub_factor(&mut self, factor: &Factor) {
        self.sub_term(&Term::from(factor.clone()));
    }

    /// Subtracts every term of another expression from this expression.
    pub fn sub_expr(&mut self, other: &Expression) {
        for term in &other.terms {
            self.sub_term(term);
        }
    }

    /// Multiplies every term of this expression by a factor.
    pub fn mul_factor(&mut self, factor: &Factor) {
        if factor.is_zero() {
            self.terms.clear();
        } else {
            self.terms.iter_mut().for_each(|t| t.multiply_factor(factor));
        }
    }

    /// Multiplies every term of this expression by a term.
    pub fn mul_term(&mut self, term: &Term) {
        if term.is_zero() {
            self.terms.clear();
        } else {
            self.terms.iter_mut().for_each(|t| t.multiply(term));
        }
    }

    /// Multiplies this expression by another expression, distributing every term.
    pub fn mul_expr(&mut self, other: &Expression) {
        self.terms = Self::multiply_terms(&self.terms, &other.terms);
    }

    /// Returns the canonical expansion of the product of two sums of terms.
    ///
    /// Every pair of terms is multiplied and folded into the result with the merge rule, so
    /// like terms cancel as soon as they appear.
    pub fn multiply_terms(lhs: &[Term], rhs: &[Term]) -> Vec<Term> {
        let mut result = Vec::new();
        for b in rhs {
            for a in lhs {
                let mut product = a.clone();
                product.multiply(b);
                merge_term(&mut result, product);
            }
        }
        result
    }

    /// Groups the terms of this expression by the given patterns.
    ///
    /// Returns one expression per pattern, holding the co-factors of the terms that contain
    /// the pattern (the pattern's factors are removed from each term). A term is assigned to
    /// the first pattern it contains. A pattern that matches nothing yields an expression
    /// holding a single zero term.
    ///
    /// If any terms contain none of the patterns, they are returned in one more, trailing
    /// expression.
    pub fn group_by(&self, patterns: &[Term]) -> Vec<Expression> {
        let mut remaining = self.terms.clone();
        let mut groups = Vec::with_capacity(patterns.len() + 1);

        for pattern in patterns {
            let (matched, rest): (Vec<_>, Vec<_>) = remaining
                .into_iter()
                .partition(|t| t.contains_term(pattern));
            remaining = rest;

            let mut bucket = matched.into_iter()
                .map(|mut t| {
                    t.remove_term(pattern);
                    t
                })
                .collect::<Vec<_>>();
            if bucket.is_empty() {
                bucket.push(Term::zero());
            }
            groups.push(Self::from_terms(bucket));
        }

        if !remaining.is_empty() {
            groups.push(Self::from_terms(remaining));
        }

        groups
    }
}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        let mut terms = Vec::with_capacity(1);
        merge_term(&mut terms, term);
        Self { terms }
    }
}

impl From<Factor> for Expression {
    fn from(factor: Factor) -> Self {
        Self::from(Term::from(factor))
    }
}

impl FromStr for Expression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for Expression {}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sum(f, &self.terms, |f, term| write!(f, "{}", term))
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
    fn like_terms_merge() {
        let mut e = Expression::new();
        e.add_term(&Term::new("x", Sign::Pos));
        e.add_term(&Term::new("y", Sign::Pos));
        e.add_term(&Term::new("x", Sign::Pos));
        assert_eq!(e.num_terms(), 2);
        assert_eq!(e.to_string(), "x * 2 + y");
    }

    #[test]
    fn exact_cancellation_removes_term() {
        let e = parse("x - x");
        assert!(e.is_zero());
        assert_eq!(e.num_terms(), 0);
        assert_eq!(e.to_string(), "0");
    }

    #[test]
    fn coefficient_of_one_is_dropped() {
        let e = parse("3*x - 2*x");
        assert_eq!(e.to_string(), "x");
        assert_eq!(e.terms()[0].num_factors(), 1);

        let e = parse("2*x - 3*x");
        assert_eq!(e.to_string(), "-x");
        assert_eq!(e.terms()[0].sign(), Sign::Neg);
    }

    #[test]
    fn numbers_merge() {
        let e = parse("2 + 3 - 1");
        assert_eq!(e.to_string(), "4");

        let e = parse("2 - 3");
        assert_eq!(e.to_string(), "-1");
    }

    #[test]
    fn zero_term_is_ignored() {
        let mut e = parse("a");
        e.add_term(&Term::zero());
        assert_eq!(e.num_terms(), 1);
        assert!(Expression::from(Term::zero()).terms().is_empty());
    }

    #[test]
    fn multiply_by_zero_clears() {
        let mut e = parse("a + b");
        e.mul_factor(&Factor::zero());
        assert!(e.is_zero());
        assert_eq!(e.num_terms(), 0);
    }

    #[test]
    fn multiply_by_factor() {
        let mut e = parse("a - b");
        e.mul_factor(&Factor::new("x", Sign::Pos));
        assert_eq!(e, parse("a*x - b*x"));
    }

    #[test]
    fn distributivity() {
        assert_eq!(parse("(a+b)*c"), parse("a*c+b*c"));
        assert_eq!(parse("(a+b)*(a-b)"), parse("a*a - b*b"));
        assert_eq!(parse("(a+b)*(a-b)").num_terms(), 2);
    }

    #[test]
    fn multiply_terms_merges_products() {
        let lhs = parse("x + 1");
        let product = Expression::multiply_terms(lhs.terms(), lhs.terms());
        assert_eq!(Expression::from_terms(product), parse("x*x + 2*x + 1"));
    }

    #[test]
    fn commutativity_and_associativity() {
        let e = parse("a+b+c");
        assert_eq!(e, parse("c+a+b"));
        assert_eq!(e, parse("(a+b)+c"));
        assert_ne!(e, parse("a+b"));
    }

    #[test]
    fn leading_negation() {
        assert_eq!(parse("-a+b"), parse("b-a"));
        assert_eq!(parse("-a+b").to_string(), "-a + b");
    }

    #[test]
    fn self_equality() {
        let e = parse("2*a*x - 3*b + 7");
        assert!(e.is_equal(&e));
    }

    #[test]
    fn add_then_subtract_is_zero() {
        let t = Term::from_factors(vec![Factor::new("x", Sign::Neg), Factor::number(4)]);
        let mut e = Expression::new();
        e.add_term(&t);
        e.sub_term(&t);
        assert!(e.is_zero());
    }

    #[test]
    fn group_by_single_pattern() {
        let e = parse("2*a*x+3*b*x+z");
        let groups = e.group_by(&[Term::new("x", Sign::Pos)]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], parse("2*a+3*b"));
        assert_eq!(groups[1], parse("z"));
    }

    #[test]
    fn group_by_first_matching_pattern_wins() {
        let e = parse("a*x*y + b*y + c");
        let groups = e.group_by(&[Term::new("x", Sign::Pos), Term::new("y", Sign::Pos)]);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], parse("a*y"));
        assert_eq!(groups[1], parse("b"));
        assert_eq!(groups[2], parse("c"));
    }

    #[test]
    fn group_by_without_match() {
        let e = parse("a + b");
        let groups = e.group_by(&[Term::new("x", Sign::Pos)]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].num_terms(), 1);
        assert!(groups[0].is_zero());
        assert_eq!(groups[1], e);
    }

    #[test]
    fn group_by_negated_factor() {
        // -a*x grouped by x leaves -a
        let e = parse("-a*x + b");
        let groups = e.group_by(&[Term::new("x", Sign::Pos)]);
        assert_eq!(groups[0], parse("-a"));
    }

    #[test]
    fn group_by_without_remainder() {
        let e = parse("x + 2*x*y");
        let groups = e.group_by(&[Term::new("x", Sign::Pos)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0], parse("1 + 2*y"));
    }

    #[test]
    fn take_terms_empties_source() {
        let mut e = parse("a + b");
        let terms = e.take_terms();
        assert_eq!(terms.len(), 2);
        assert!(e.is_zero());
        assert_eq!(Expression::from_terms(terms), parse("b + a"));
    }

    #[test]
    fn has_term_is_strict() {
        let e = parse("2*x + y");
        let mut two_x = Term::new("x", Sign::Pos);
        two_x.multiply_factor(&Factor::number(2));
        assert!(e.has_term(&two_x));
        assert!(!e.has_term(&Term::new("x", Sign::Pos)));
    }

    #[test]
    fn display_signs() {
        assert_eq!(parse("a - b + c").to_string(), "a - b + c");
        assert_eq!(parse("-a - 2*b").to_string(), "-a - 2 * b");
        assert_eq!(Expression::new().to_string(), "0");
    }

    #[test]
    fn coefficients_past_i64_do_not_collapse() {
        let max = parse("9223372036854775807");
        let doubled = parse("9223372036854775807 * 2");
        assert_eq!(doubled.to_string(), "18446744073709551614");
        assert!(!(doubled.clone() - &max).is_zero());
        assert_ne!(doubled, max);

        let sum = parse("9223372036854775807*x + 9223372036854775807*x");
        assert_eq!(sum.to_string(), "x * 18446744073709551614");
        assert!((sum - &parse("18446744073709551614*x")).is_zero());
    }

    #[test]
    fn long_digit_symbols_are_numbers() {
        let big = Expression::symbol("10000000000000000000", Sign::Pos);
        assert_eq!((big.clone() * &Factor::number(2)).to_string(), "20000000000000000000");
        assert!((big + &Expression::symbol("10000000000000000000", Sign::Neg)).is_zero());
    }
}
