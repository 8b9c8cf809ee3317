//! Property-based tests for canonical expressions.

use proptest::prelude::*;
use rug::Integer;

use crate::{Expression, Factor, Operator, Replace, Sign, Substitutions, Term};

fn sign() -> impl Strategy<Value = Sign> {
    prop_oneof![Just(Sign::Pos), Just(Sign::Neg)]
}

// Strategy for generating terms over a small alphabet, so that proportional terms are common
fn term() -> impl Strategy<Value = Term> {
    (
        prop::collection::vec((prop::sample::select(vec!["a", "b", "c", "x"]), sign()), 0..4),
        prop::option::of(-20i64..20i64),
    )
        .prop_map(|(symbols, coefficient)| {
            let mut factors = symbols.into_iter()
                .map(|(name, sign)| Factor::new(name, sign))
                .collect::<Vec<_>>();
            if let Some(coefficient) = coefficient {
                factors.push(Factor::number(coefficient));
            }
            Term::from_factors(factors)
        })
}

// Coefficients at both ends of the `i64` range
fn large_coefficient() -> impl Strategy<Value = i64> {
    prop_oneof![i64::MAX - 16..=i64::MAX, i64::MIN..=i64::MIN + 16]
}

fn scaled(name: &str, coefficient: i64) -> Term {
    Term::from_factors(vec![Factor::new(name, Sign::Pos), Factor::number(coefficient)])
}

fn expression() -> impl Strategy<Value = Expression> {
    prop::collection::vec(term(), 0..6).prop_map(|terms| {
        let mut expr = Expression::new();
        for term in &terms {
            expr.add_term(term);
        }
        expr
    })
}

fn substitutions() -> impl Strategy<Value = Substitutions> {
    (-3i32..4, -3i32..4, -3i32..4, -3i32..4).prop_map(|(a, b, c, x)| {
        let mut subst = Substitutions::new();
        subst.set("a", a.into()).set("b", b.into()).set("c", c.into()).set("x", x.into());
        subst
    })
}

proptest! {
    #[test]
    fn add_then_subtract_cancels(t in term()) {
        let mut expr = Expression::new();
        expr.add_term(&t);
        expr.sub_term(&t);
        prop_assert!(expr.is_zero());
    }

    #[test]
    fn equality_is_reflexive(e in expression()) {
        prop_assert!(e.is_equal(&e));
    }

    #[test]
    fn no_two_terms_are_proportional(terms in prop::collection::vec(term(), 0..12)) {
        let mut expr = Expression::new();
        for t in &terms {
            expr.add_term(t);
        }

        let retained = expr.terms();
        for (i, lhs) in retained.iter().enumerate() {
            prop_assert!(!lhs.is_zero());
            for rhs in &retained[i + 1..] {
                prop_assert!(!lhs.is_proportional(rhs));
            }
        }
    }

    #[test]
    fn addition_order_is_irrelevant(terms in prop::collection::vec(term(), 0..8)) {
        let mut forward = Expression::new();
        let mut backward = Expression::new();
        for t in &terms {
            forward.add_term(t);
        }
        for t in terms.iter().rev() {
            backward.add_term(t);
        }
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn multiplication_distributes(a in expression(), b in expression(), c in expression()) {
        let lhs = (a.clone() + &b) * &c;
        let rhs = a * &c + &(b * &c);
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn display_reparses(e in expression()) {
        let reparsed = Expression::parse(&e.to_string()).unwrap();
        prop_assert_eq!(reparsed, e);
    }

    #[test]
    fn evaluation_is_a_homomorphism(a in expression(), b in expression(), subst in substitutions()) {
        let sum = (a.clone() + &b).evaluate(&subst);
        let product = (a.clone() * &b).evaluate(&subst);
        prop_assert_eq!(sum, a.evaluate(&subst) + b.evaluate(&subst));
        prop_assert_eq!(product, a.evaluate(&subst) * b.evaluate(&subst));
    }

    #[test]
    fn identity_rules_preserve_terms(e in expression()) {
        // every symbol maps to itself, so only terms without any symbol are dropped
        let mut replace = Replace::new();
        for name in ["a", "b", "c", "x"] {
            replace.define(name, Some(name)).unwrap();
        }

        let mut expected = Expression::new();
        for t in e.terms().iter().filter(|t| t.non_numeric_factors().next().is_some()) {
            expected.add_term(t);
        }
        prop_assert_eq!(replace.operate(&e), expected);
    }

    #[test]
    fn large_coefficients_sum_exactly(p in large_coefficient(), q in large_coefficient()) {
        let mut expr = Expression::new();
        expr.add_term(&scaled("x", p));
        expr.add_term(&scaled("x", q));

        let expected = Integer::from(p) + q;
        if expected == 0 {
            prop_assert!(expr.is_zero());
        } else {
            prop_assert_eq!(expr.num_terms(), 1);
            prop_assert_eq!(expr.terms()[0].numeric_factor_value(true), expected);
        }
    }

    #[test]
    fn doubling_a_large_coefficient_is_not_identity(p in large_coefficient()) {
        let single = Expression::from(scaled("y", p));
        let doubled = single.clone() * &Factor::number(2);
        prop_assert!(!doubled.is_equal(&single));
        prop_assert_eq!(doubled - &single, single);
    }
}
