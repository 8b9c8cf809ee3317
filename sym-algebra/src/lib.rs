//! A small symbolic algebra engine over opaque symbols.
//!
//! Symbols and integer literals ([`Factor`]s) multiply into [`Term`]s, and terms add into
//! [`Expression`]s. An expression is always kept in canonical form: proportional terms are
//! merged by summing their integer coefficients, and terms that cancel out are removed. The
//! engine knows nothing about what a symbol means; `x`, `p_mu`, and `g(1,2)` are all just names.
//!
//! Expressions are built from infix text by the [`ExpressionParser`], and rewritten by
//! [`Replace`], an [`Operator`] that substitutes factors with expressions.
//!
//! ```
//! use sym_algebra::Expression;
//!
//! let lhs = Expression::parse("(a + b) * (a - b)").unwrap();
//! let rhs = Expression::parse("a*a - b*b").unwrap();
//! assert_eq!(lhs, rhs);
//! assert_eq!(lhs.formatted().to_string(), "a^2 - b^2");
//! ```

pub mod error;
pub mod eval;
pub mod expr;
pub mod factor;
pub mod fmt;
pub mod parser;
pub mod replace;
pub mod term;

#[cfg(test)]
mod proptests;

pub use eval::Substitutions;
pub use expr::Expression;
pub use factor::{Factor, Sign};
pub use parser::ExpressionParser;
pub use replace::{Operator, Replace, Rule};
pub use term::Term;
