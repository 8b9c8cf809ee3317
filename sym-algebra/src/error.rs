//! Error kinds raised by the algebra engine and its expression parser.

use ariadne::Fmt;
use sym_attrs::ErrorKind;
use sym_error::{Category, EXPR};

/// A character sequence that the expression tokenizer could not classify.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Lexical,
    message = "unknown character in expression",
    labels = ["this character"],
)]
pub struct UnknownCharacter;

/// A parenthesis was not closed, or a closing parenthesis has no partner.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Syntax,
    message = "mismatched parenthesis in expression",
    labels = ["this parenthesis is not matched"],
    help = if *opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the unmatched parenthesis was an opening parenthesis. Otherwise, it was a
    /// closing parenthesis.
    pub opening: bool,
}

/// An operator did not have two operands to combine.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Syntax,
    message = "missing operand",
    labels = ["this operator needs an expression on both sides"],
)]
pub struct MissingOperand;

/// The expression contained no symbols at all.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Syntax,
    message = "empty expression",
    labels = [format!("add an {} here", "expression".fg(EXPR))],
)]
pub struct EmptyExpression;

/// Several operands were left over with no operator joining them.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Syntax,
    message = format!("{} operands are not joined by any operator", count),
    labels = ["in this expression"],
    help = format!("products must be written with an explicit {}", "*".fg(EXPR)),
)]
pub struct DanglingOperands {
    /// The number of operands left on the stack.
    pub count: usize,
}

/// Two factors were multiplied as numbers, but at least one of them is a symbol.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = format!("cannot multiply `{}` and `{}` as numbers", lhs, rhs),
    help = "only integer literals can be merged into a coefficient",
)]
pub struct NonNumericMultiply {
    /// The name of the left factor.
    pub lhs: String,

    /// The name of the right factor.
    pub rhs: String,
}

/// A replacement rule was defined twice for the same factor.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = format!("a rule for the factor `{}` has already been defined", name),
    labels = ["this rule"],
    help = "each factor can only be replaced by a single rule",
)]
pub struct DuplicateRule {
    /// The name of the factor.
    pub name: String,
}
