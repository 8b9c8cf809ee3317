//! Products of factors.

use crate::factor::{Factor, Sign};
use rug::Integer;
use std::fmt;

/// An ordered product of [`Factor`]s.
///
/// A term holds at most one numeric factor: multiplying in another number merges it into the
/// existing one. The sign of a term is not stored; it is the parity of the signs of its
/// factors. A term never has zero factors; operations that would empty it substitute the unit
/// factor `1`.
///
/// The numeric factor (or `±1` if there is none) is the term's **coefficient**. Two terms are
/// **proportional** if they hold the same multiset of non-numeric factors, i.e. they differ only
/// in their coefficients.
#[derive(Debug, Clone)]
pub struct Term {
    factors: Vec<Factor>,
}

impl Term {
    /// Creates a term containing a single factor with the given name and sign.
    pub fn new(name: impl Into<String>, sign: Sign) -> Self {
        Self::from(Factor::new(name, sign))
    }

    /// Creates a term from the given factors, taking ownership of them. Numeric factors are
    /// merged into one, and an empty list becomes the unit term `1`.
    pub fn from_factors(factors: Vec<Factor>) -> Self {
        let mut term = Self { factors: Vec::new() };
        term.replace_factors(factors);
        term
    }

    /// The term `1`.
    pub fn one() -> Self {
        Self::from(Factor::one())
    }

    /// The term `0`.
    pub fn zero() -> Self {
        Self::from(Factor::zero())
    }

    /// Returns the factors of this term, in insertion order.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Consumes the term and returns its factors.
    pub fn into_factors(self) -> Vec<Factor> {
        self.factors
    }

    /// Returns the number of factors in this term.
    pub fn num_factors(&self) -> usize {
        self.factors.len()
    }

    /// Returns an iterator over the non-numeric factors of this term.
    pub fn non_numeric_factors(&self) -> impl Iterator<Item = &Factor> + '_ {
        self.factors.iter().filter(|f| !f.is_number())
    }

    /// Returns the numeric factor of this term, if there is one.
    pub fn numeric_factor(&self) -> Option<&Factor> {
        self.factors.iter().find(|f| f.is_number())
    }

    /// Returns the coefficient of this term: the magnitude of its numeric factor, or `1` if it
    /// has none. If `with_sign` is true, the coefficient is signed by the sign of the term.
    pub fn numeric_factor_value(&self, with_sign: bool) -> Integer {
        let magnitude = self.numeric_factor()
            .and_then(|f| f.numeric_value(false))
            .unwrap_or_else(|| Integer::from(1));

        if with_sign {
            self.sign().apply(magnitude)
        } else {
            magnitude
        }
    }

    /// Returns the sign of this term, the parity of the signs of its factors.
    pub fn sign(&self) -> Sign {
        self.factors.iter().fold(Sign::Pos, |acc, f| acc * f.sign())
    }

    /// Returns true if this term has a factor equal to (with the same name as) the given
    /// factor.
    pub fn has_factor(&self, factor: &Factor) -> bool {
        self.factors.iter().any(|f| f.is_equal(factor))
    }

    /// Returns true if this term has a numeric factor.
    pub fn has_numeric_factor(&self) -> bool {
        self.numeric_factor().is_some()
    }

    /// Returns true if every factor of `other` can be matched to a distinct factor of this
    /// term, i.e. `other` divides this term.
    ///
    /// Each factor of this term satisfies at most one factor of `other`, so `x * x` is
    /// contained in `x * x * y` but not in `x * y`.
    pub fn contains_term(&self, other: &Term) -> bool {
        let mut matched = vec![false; self.factors.len()];
        other.factors.iter().all(|needle| {
            let slot = self.factors
                .iter()
                .zip(matched.iter_mut())
                .find(|(f, used)| !**used && f.is_equal(needle));
            match slot {
                Some((_, used)) => {
                    *used = true;
                    true
                },
                None => false,
            }
        })
    }

    /// Returns true if any factor of this term is zero.
    pub fn is_zero(&self) -> bool {
        self.factors.iter().any(Factor::is_zero)
    }

    /// Multiplies this term by the given factor.
    ///
    /// If the factor is numeric and this term already holds a numeric factor, the two are
    /// merged. Otherwise the factor is appended.
    pub fn multiply_factor(&mut self, factor: &Factor) {
        self.push_factor(factor.clone());
    }

    /// Owned version of [`Term::multiply_factor`].
    fn push_factor(&mut self, factor: Factor) {
        if factor.is_number() {
            if let Some(existing) = self.factors.iter_mut().find(|f| f.is_number()) {
                existing.merge_numeric(&factor);
                return;
            }
        }

        self.factors.push(factor);
    }

    /// Multiplies this term by each factor of the given term, in order.
    pub fn multiply(&mut self, other: &Term) {
        for factor in &other.factors {
            self.multiply_factor(factor);
        }
    }

    /// Removes the first factor with the same name as the given factor.
    ///
    /// If the removed factor's sign differs from the given factor's sign, the term is negated
    /// to compensate, so that `-a * x` divided by `a` is `-x`. If the term runs out of factors,
    /// it becomes `1`.
    pub fn remove_factor(&mut self, factor: &Factor) {
        let Some(index) = self.factors.iter().position(|f| f.is_equal(factor)) else {
            return;
        };

        let removed = self.factors.remove(index);
        if self.factors.is_empty() {
            self.factors.push(Factor::one());
        }

        if removed.sign() != factor.sign() {
            self.negate();
        }
    }

    /// Removes a numeric factor of magnitude one, keeping the sign of the term. A term with no
    /// other factor is left as it is.
    pub fn remove_unit_factor(&mut self) {
        if self.factors.len() < 2 {
            return;
        }

        let unit = self.factors
            .iter()
            .position(|f| f.magnitude().is_some_and(|m| *m == 1));
        if let Some(index) = unit {
            let removed = self.factors.remove(index);
            if removed.sign().is_negative() {
                self.negate();
            }
        }
    }

    /// Removes one occurrence of each factor of the given term from this term.
    pub fn remove_term(&mut self, other: &Term) {
        for factor in &other.factors {
            self.remove_factor(factor);
        }
    }

    /// Replaces the factors of this term with the given factors. Numeric factors are merged
    /// into one, and an empty list becomes the unit factor `1`.
    pub fn replace_factors(&mut self, factors: Vec<Factor>) {
        self.factors = Vec::with_capacity(factors.len());
        for factor in factors {
            self.push_factor(factor);
        }
        if self.factors.is_empty() {
            self.factors.push(Factor::one());
        }
    }

    /// Negates this term.
    pub fn negate(&mut self) {
        if let Some(first) = self.factors.first_mut() {
            first.negate();
        }
    }

    /// Returns true if the two terms are equal.
    ///
    /// If `numeric_equality` is true, both terms must hold the same multiset of factors,
    /// numeric factor included. Otherwise numeric factors are ignored, which tests whether
    /// the terms are proportional.
    pub fn is_equal(&self, other: &Term, numeric_equality: bool) -> bool {
        let keep = |f: &&Factor| numeric_equality || !f.is_number();
        let lhs = self.factors.iter().filter(keep).collect::<Vec<_>>();
        let mut rhs = other.factors.iter().filter(keep).map(Some).collect::<Vec<_>>();

        if lhs.len() != rhs.len() {
            return false;
        }

        lhs.into_iter().all(|needle| {
            let slot = rhs.iter_mut()
                .find(|slot| matches!(slot, Some(f) if f.is_equal(needle)));
            match slot {
                Some(slot) => {
                    *slot = None;
                    true
                },
                None => false,
            }
        })
    }

    /// Returns true if the two terms differ only in their coefficients.
    pub fn is_proportional(&self, other: &Term) -> bool {
        self.is_equal(other, false)
    }
}

impl From<Factor> for Term {
    fn from(factor: Factor) -> Self {
        Self { factors: vec![factor] }
    }
}

/// Strict equality: same multiset of factors, including the numeric factor.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other, true)
    }
}

impl Eq for Term {}

/// Writes the factor names joined by ` * `, in insertion order. The sign of the term is not
/// written; [`Expression`](crate::expr::Expression) writes it as the separator between terms.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.factors.iter();
        if let Some(factor) = iter.next() {
            write!(f, "{}", factor)?;
            for factor in iter {
                write!(f, " * {}", factor)?;
            }
        }
        Ok(())
    }
}
