//! Error kinds raised while tokenizing, parsing, and running SymScript.

use ariadne::Fmt;
use sym_attrs::ErrorKind;
use sym_error::{Category, EXPR};

/// Formats a list of suggested labels into a help message.
fn suggest(kind: &str, suggestions: &[String]) -> String {
    match suggestions {
        [] => format!("define it first, for example: {} : {};", "[name]".fg(EXPR), "<expression>".fg(EXPR)),
        [one] => format!("did you mean the {} `{}`?", kind, one.fg(EXPR)),
        many => format!(
            "did you mean one of these? {}",
            many.iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// A quoted string was not closed before the end of the source.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Lexical,
    message = "unterminated string",
    labels = ["this string"],
    help = format!("add a closing quote {} to the end of the string", "\"".fg(EXPR)),
)]
pub struct UnterminatedString;

/// A block comment was not closed before the end of the source.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Lexical,
    message = "unterminated block comment",
    labels = ["this comment"],
    help = format!("close the comment with {}", "*/".fg(EXPR)),
)]
pub struct UnterminatedComment;

/// A label with no name, `[]`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Lexical,
    message = "label is empty",
    labels = ["this label"],
    help = format!("write the name between the brackets, such as {}", "[result]".fg(EXPR)),
)]
pub struct EmptyLabel;

/// A character sequence that the tokenizer could not classify.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Lexical,
    message = "unknown token",
    labels = ["this"],
)]
pub struct UnknownToken;

/// A different token was expected at this position.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Syntax,
    message = format!("unexpected `{}`", found),
    labels = [format!("expected {}", expected)],
)]
pub struct UnexpectedToken {
    /// A description of what was expected.
    pub expected: String,

    /// The lexeme that was found.
    pub found: String,
}

/// The source ended in the middle of a statement.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Syntax,
    message = "unexpected end of file",
    labels = [format!("expected {}", expected)],
    help = format!("statements end with {} or {}", ";".fg(EXPR), "end".fg(EXPR)),
)]
pub struct UnexpectedEof {
    /// A description of what was expected.
    pub expected: String,
}

/// A statement that stores its result was not given a label.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Syntax,
    message = "this statement needs a label to store its result",
    labels = ["this statement"],
    help = format!("put a label in front of it, such as {}", "[result]".fg(EXPR)),
)]
pub struct MissingLabel;

/// A value in an `eval` statement is not a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Syntax,
    message = format!("`{}` is not a number", value),
    labels = ["this value"],
)]
pub struct InvalidNumber {
    /// The value as written.
    pub value: String,
}

/// A reference names an expression label that was never defined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = format!("no expression is labelled `{}`", name),
    labels = ["this reference"],
    help = suggest("expression", suggestions),
)]
pub struct UndefinedExpression {
    /// The name of the label.
    pub name: String,

    /// Similarly named expression labels, if any.
    pub suggestions: Vec<String>,
}

/// A reference names a rule label that was never defined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = format!("no rule is labelled `{}`", name),
    labels = ["this reference"],
    help = suggest("rule", suggestions),
)]
pub struct UndefinedRule {
    /// The name of the label.
    pub name: String,

    /// Similarly named rule labels, if any.
    pub suggestions: Vec<String>,
}

/// A label is already used by a value of another kind.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = format!("the label `{}` is already used by {}", name, existing),
    labels = ["this label"],
    help = "expressions and rules share one set of labels; pick another name",
)]
pub struct LabelConflict {
    /// The name of the label.
    pub name: String,

    /// What the label currently holds, e.g. `a rule`.
    pub existing: &'static str,
}

/// The two sides of an `assert` statement are not equal.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = "assertion failed: the two expressions are not equal",
    labels = ["this assertion"],
)]
pub struct AssertionFailed;

/// An `eval ... assert` statement evaluated to an unexpected value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = format!("assertion failed: evaluated to {}, expected {}", actual, expected),
    labels = ["this evaluation"],
)]
pub struct EvalAssertionFailed {
    /// The expected value.
    pub expected: f64,

    /// The value the expression evaluated to.
    pub actual: f64,
}

/// A `group` pattern is not a single term.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = "expressions to group by must consist of a single term",
    labels = ["this pattern"],
    help = format!("split it into several patterns, such as {} and {}", "[a] x;".fg(EXPR), "[b] y;".fg(EXPR)),
)]
pub struct PatternNotSingleTerm;

/// An included file could not be found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = format!("cannot find the file `{}`", path),
    labels = ["included here"],
    help = "paths are resolved against the including file's directory, then the include directories",
)]
pub struct IncludeNotFound {
    /// The path as written.
    pub path: String,
}

/// A file includes itself, directly or through other files.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = format!("the file `{}` includes itself", path),
    labels = ["included here"],
)]
pub struct RecursiveInclude {
    /// The resolved path of the file.
    pub path: String,
}

/// A substitution in an `eval` statement refers to a name that has no value yet.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = format!("`{}` has no value in this evaluation", name),
    labels = ["this value"],
    help = "a value must be a number, or a symbol given a value earlier in the same statement",
)]
pub struct UnknownSubstitution {
    /// The name as written.
    pub name: String,
}

/// Output could not be written.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Category::Semantic,
    message = format!("cannot write output: {}", reason),
    labels = ["while running this statement"],
)]
pub struct WriteFailed {
    /// The underlying I/O error, as text.
    pub reason: String,
}
