//! Signed symbols and integer literals, the leaves of every expression.

use crate::error::NonNumericMultiply;
use rug::Integer;
use std::{cmp::Ordering, fmt, ops::{Mul, Neg}};
use sym_error::Error;

/// The sign of a [`Factor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sign {
    #[default]
    Pos,
    Neg,
}

impl Sign {
    /// Returns the sign of the given integer. Zero is positive.
    pub fn of(value: &Integer) -> Self {
        match value.cmp0() {
            Ordering::Less => Self::Neg,
            _ => Self::Pos,
        }
    }

    /// Returns true if the sign is [`Sign::Neg`].
    pub fn is_negative(self) -> bool {
        self == Self::Neg
    }

    /// Applies this sign to the given magnitude.
    pub fn apply(self, magnitude: Integer) -> Integer {
        match self {
            Self::Pos => magnitude,
            Self::Neg => -magnitude,
        }
    }
}

impl Neg for Sign {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Pos => Self::Neg,
            Self::Neg => Self::Pos,
        }
    }
}

/// Combines two signs the way multiplication does (their parity).
impl Mul for Sign {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        if self == rhs {
            Self::Pos
        } else {
            Self::Neg
        }
    }
}

/// An atomic signed symbol or signed integer literal.
///
/// The identity of a factor is its name **only**: `x` and `-x` are the same factor as far as
/// [`Factor::is_equal`] (and [`PartialEq`]) are concerned. The sign is carried alongside the
/// name and combined at the [`Term`](crate::term::Term) level, which is why removing a factor
/// from a term may negate the term.
///
/// A factor is numeric if its name is a non-empty run of decimal digits. Numbers have
/// arbitrary precision, and the name of a numeric factor is always its magnitude written in
/// canonical decimal form (`007` is stored as `7`).
#[derive(Debug, Clone)]
pub struct Factor {
    /// The symbol name, or the magnitude of the number.
    name: String,

    /// The sign of the factor.
    sign: Sign,

    /// The magnitude of the factor, if it is numeric.
    magnitude: Option<Integer>,
}

impl Factor {
    /// Creates a new factor from a name and a sign.
    pub fn new(name: impl Into<String>, sign: Sign) -> Self {
        let name = name.into();
        let magnitude = Self::is_number_str(&name)
            .then(|| name.parse::<Integer>().ok())
            .flatten();

        match magnitude {
            Some(magnitude) => Self {
                name: magnitude.to_string(),
                sign,
                magnitude: Some(magnitude),
            },
            None => Self { name, sign, magnitude: None },
        }
    }

    /// Creates a numeric factor with the given signed value.
    pub fn number(value: impl Into<Integer>) -> Self {
        let value = value.into();
        let sign = Sign::of(&value);
        let magnitude = value.abs();
        Self {
            name: magnitude.to_string(),
            sign,
            magnitude: Some(magnitude),
        }
    }

    /// The multiplicative identity, `1`.
    pub fn one() -> Self {
        Self::number(1)
    }

    /// The additive identity, `0`.
    pub fn zero() -> Self {
        Self::number(0)
    }

    /// Returns true if the given string represents a non-negative integer (a non-empty run of
    /// decimal digits).
    pub fn is_number_str(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }

    /// Returns the name of the factor.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the sign of the factor.
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Returns true if the factor is numeric.
    pub fn is_number(&self) -> bool {
        self.magnitude.is_some()
    }

    /// Returns the magnitude of a numeric factor. Returns [`None`] for symbols.
    pub fn magnitude(&self) -> Option<&Integer> {
        self.magnitude.as_ref()
    }

    /// Returns the value of a numeric factor, signed by the factor's sign if `with_sign` is
    /// true. Returns [`None`] for symbols.
    pub fn numeric_value(&self, with_sign: bool) -> Option<Integer> {
        let magnitude = self.magnitude.clone()?;
        if with_sign {
            Some(self.sign.apply(magnitude))
        } else {
            Some(magnitude)
        }
    }

    /// Returns true if the factor is the number zero.
    pub fn is_zero(&self) -> bool {
        self.name == "0"
    }

    /// Returns true if the two factors have the same name. Signs are ignored.
    pub fn is_equal(&self, other: &Factor) -> bool {
        self.name == other.name
    }

    /// Multiplies two factors.
    ///
    /// If both factors are numeric, the result is a single factor holding their product.
    /// Otherwise, the result holds copies of both factors, unchanged; symbols are never
    /// combined at this level.
    pub fn multiply(&self, other: &Factor) -> Vec<Factor> {
        if self.is_number() && other.is_number() {
            let mut product = self.clone();
            product.merge_numeric(other);
            vec![product]
        } else {
            vec![self.clone(), other.clone()]
        }
    }

    /// Multiplies this factor by the given factor in place. Both factors must be numeric.
    pub fn multiply_numeric(&mut self, other: &Factor) -> Result<(), Error> {
        if self.is_number() && other.is_number() {
            self.merge_numeric(other);
            Ok(())
        } else {
            Err(Error::unspanned(NonNumericMultiply {
                lhs: self.name.clone(),
                rhs: other.name.clone(),
            }))
        }
    }

    /// Merges the numeric factor `other` into this numeric factor.
    ///
    /// The magnitude and the sign are tracked separately: the resulting sign is the parity of
    /// the two operand signs. A symbol on either side is treated as `1`.
    pub(crate) fn merge_numeric(&mut self, other: &Factor) {
        let mut magnitude = self.magnitude.take().unwrap_or_else(|| Integer::from(1));
        if let Some(rhs) = &other.magnitude {
            magnitude *= rhs;
        }
        self.sign = self.sign * other.sign;
        self.name = magnitude.to_string();
        self.magnitude = Some(magnitude);
    }

    /// Negates this factor, flipping its sign.
    pub fn negate(&mut self) {
        self.sign = -self.sign;
    }
}

impl PartialEq for Factor {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for Factor {}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
