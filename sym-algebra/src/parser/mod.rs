//! Compiles infix source text into canonical [`Expression`]s.
//!
//! Parsing happens in two passes. [`ExpressionParser::to_postfix`] runs the shunting-yard
//! algorithm over the token stream and produces the operands and operators in postfix order;
//! the parser then folds the postfix queue into a single expression with the canonical
//! [`Expression`] operations, so the result is canonical by construction.

pub mod token;

use crate::{
    error::{
        DanglingOperands,
        EmptyExpression,
        MissingOperand,
        UnclosedParenthesis,
    },
    expr::Expression,
    factor::Sign,
};
use std::{fmt, ops::Range};
use sym_error::Error;
use token::{tokenize_complete, TokenKind};
use tracing::trace;

/// The precedence of an operator, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
///
/// Subtraction binds tighter than addition. Since expressions are canonical sums, `(a + b) - c`
/// and `a + (b - c)` produce the same result, so this only changes the order in which
/// intermediate results are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// Precedence of addition (`+`).
    Add,

    /// Precedence of subtraction (`-`).
    Sub,

    /// Precedence of multiplication (`*`).
    Mul,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

/// The binary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
}

impl BinOpKind {
    /// Returns the precedence of the binary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Add => Precedence::Add,
            Self::Sub => Precedence::Sub,
            Self::Mul => Precedence::Mul,
        }
    }

    /// Returns the binary operator kind for the given token kind, if it is an operator.
    fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Add => Some(Self::Add),
            TokenKind::Sub => Some(Self::Sub),
            TokenKind::Mul => Some(Self::Mul),
            _ => None,
        }
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
        }
    }
}

/// A binary operator that takes two operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinOp {
    /// The kind of binary operator.
    pub kind: BinOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

/// An item of the postfix queue produced by [`ExpressionParser::to_postfix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Postfix<'source> {
    /// A symbol or integer literal.
    Symbol {
        /// The symbol as written.
        name: &'source str,

        /// The region of the source code that this symbol was parsed from. The implicit zero
        /// inserted before a leading operator has an empty span.
        span: Range<usize>,
    },

    /// A binary operator.
    Op(BinOp),
}

impl fmt::Display for Postfix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol { name, .. } => write!(f, "{}", name),
            Self::Op(op) => write!(f, "{}", op.kind),
        }
    }
}

/// An entry of the operator stack used while converting to postfix.
#[derive(Debug)]
enum Pending {
    Op(BinOp),
    OpenParen(Range<usize>),
}

/// Parses infix source text into an [`Expression`].
///
/// The parser understands `+`, `-`, `*`, and parentheses (any of `( [ {` paired with any of
/// `) ] }`). Everything else that is not whitespace is a symbol; symbols made only of decimal
/// digits are integer literals. If the input begins with an operator, an implicit `0` is
/// inserted before it, so that `-x` is parsed as `0 - x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionParser;

impl ExpressionParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Converts the given source into postfix order using the shunting-yard algorithm.
    pub fn to_postfix<'source>(&self, source: &'source str) -> Result<Vec<Postfix<'source>>, Error> {
        let tokens = tokenize_complete(source)?;
        let mut output = Vec::with_capacity(tokens.len() + 1);
        let mut stack = Vec::new();

        if let Some(first) = tokens.first() {
            if first.kind.is_operator() {
                output.push(Postfix::Symbol {
                    name: "0",
                    span: first.span.start..first.span.start,
                });
            }
        }

        for token in tokens {
            match token.kind {
                TokenKind::Symbol => output.push(Postfix::Symbol { name: token.lexeme, span: token.span }),
                TokenKind::Add | TokenKind::Sub | TokenKind::Mul => {
                    let Some(kind) = BinOpKind::from_token(token.kind) else {
                        continue;
                    };

                    while let Some(Pending::Op(top)) = stack.last() {
                        if top.kind.precedence() < kind.precedence() {
                            break;
                        }
                        if let Some(Pending::Op(top)) = stack.pop() {
                            output.push(Postfix::Op(top));
                        }
                    }

                    stack.push(Pending::Op(BinOp { kind, span: token.span }));
                },
                TokenKind::OpenParen => stack.push(Pending::OpenParen(token.span)),
                TokenKind::CloseParen => loop {
                    match stack.pop() {
                        Some(Pending::Op(op)) => output.push(Postfix::Op(op)),
                        Some(Pending::OpenParen(_)) => break,
                        None => return Err(Error::new(
                            vec![token.span],
                            UnclosedParenthesis { opening: false },
                        )),
                    }
                },
                TokenKind::Whitespace => {},
            }
        }

        while let Some(pending) = stack.pop() {
            match pending {
                Pending::Op(op) => output.push(Postfix::Op(op)),
                Pending::OpenParen(span) => return Err(Error::new(
                    vec![span],
                    UnclosedParenthesis { opening: true },
                )),
            }
        }

        Ok(output)
    }

    /// Parses the given source into a canonical expression.
    pub fn parse(&self, source: &str) -> Result<Expression, Error> {
        let postfix = self.to_postfix(source)?;
        trace!(
            source,
            postfix = %postfix.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
            "converted expression to postfix"
        );

        let mut operands = Vec::new();
        for item in postfix {
            match item {
                Postfix::Symbol { name, .. } => operands.push(Expression::symbol(name, Sign::Pos)),
                Postfix::Op(op) => {
                    let (Some(rhs), Some(mut lhs)) = (operands.pop(), operands.pop()) else {
                        return Err(Error::new(vec![op.span], MissingOperand));
                    };

                    match op.kind {
                        BinOpKind::Add => lhs.add_expr(&rhs),
                        BinOpKind::Sub if lhs.is_zero() => lhs = -rhs,
                        BinOpKind::Sub => lhs.sub_expr(&rhs),
                        BinOpKind::Mul => lhs.mul_expr(&rhs),
                    }
                    operands.push(lhs);
                },
            }
        }

        let whole = 0..source.len();
        match operands.len() {
            0 => Err(Error::new(vec![whole], EmptyExpression)),
            1 => Ok(operands.pop().unwrap_or_default()),
            count => Err(Error::new(vec![whole], DanglingOperands { count })),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn postfix(source: &str) -> String {
        ExpressionParser::new()
            .to_postfix(source)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn parse(source: &str) -> Expression {
        Expression::parse(source).unwrap()
    }

    #[test]
    fn postfix_order() {
        assert_eq!(postfix("a + b * c"), "a b c * +");
        assert_eq!(postfix("(a + b) * c"), "a b + c *");
        assert_eq!(postfix("a - b - c"), "a b - c -");
        assert_eq!(postfix("a - b + c"), "a b - c +");
        assert_eq!(postfix("a + b - c"), "a b c - +");
    }

    #[test]
    fn implicit_leading_zero() {
        assert_eq!(postfix("-x"), "0 x -");
        assert_eq!(postfix("  * x"), "0 x *");
        assert_eq!(postfix("x"), "x");
    }

    #[test]
    fn mixed_parentheses() {
        assert_eq!(postfix("[a + b} * {c - d)"), "a b + c d - *");
    }

    #[test]
    fn negation() {
        assert_eq!(parse("-a+b"), parse("b-a"));
        assert_eq!(parse("-x").to_string(), "-x");
        assert_eq!(parse("-(a - b)"), parse("b - a"));
    }

    #[test]
    fn asymmetric_precedence_is_unobservable() {
        assert_eq!(parse("a + b - c"), parse("(a + b) - c"));
        assert_eq!(parse("a - b + c"), parse("a - (b - c)"));
    }

    #[test]
    fn cancellation() {
        let e = parse("x - x");
        assert!(e.is_zero());
        assert_eq!(e.num_terms(), 0);
    }

    #[test]
    fn leading_zeros_in_literals() {
        assert_eq!(parse("007 * x"), parse("7 * x"));
    }

    #[test]
    fn unclosed_parenthesis() {
        let err = Expression::parse("(a + b").unwrap_err();
        assert_eq!(err.downcast_ref(), Some(&UnclosedParenthesis { opening: true }));
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn unmatched_close_parenthesis() {
        let err = Expression::parse("a + b)").unwrap_err();
        assert_eq!(err.downcast_ref(), Some(&UnclosedParenthesis { opening: false }));
        assert_eq!(err.spans, vec![5..6]);
    }

    #[test]
    fn missing_operand() {
        let err = Expression::parse("a +").unwrap_err();
        assert!(err.is::<MissingOperand>());
        assert_eq!(err.spans, vec![2..3]);

        assert!(Expression::parse("-").unwrap_err().is::<MissingOperand>());
        assert!(Expression::parse("a * * b").unwrap_err().is::<MissingOperand>());
    }

    #[test]
    fn empty_expression() {
        assert!(Expression::parse("").unwrap_err().is::<EmptyExpression>());
        assert!(Expression::parse("  ( ) ").unwrap_err().is::<EmptyExpression>());
    }

    #[test]
    fn dangling_operands() {
        let err = Expression::parse("a b c").unwrap_err();
        assert_eq!(err.downcast_ref(), Some(&DanglingOperands { count: 3 }));
        assert_eq!(err.category(), sym_error::Category::Syntax);
    }

    #[test]
    fn literals_past_i64() {
        let expr = Expression::parse("x * 99999999999999999999 * 10").unwrap();
        assert_eq!(expr.to_string(), "x * 999999999999999999990");

        let expr = Expression::parse("9223372036854775807 * 2").unwrap();
        assert_eq!(expr.to_string(), "18446744073709551614");
    }
}
