//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Error`] type that pairs a kind with the regions of source code it came
//! from.
//!
//! Every error produced by the algebra engine or by SymScript belongs to one of three
//! [`Category`]s. Errors are terminal: the operation that raised one is abandoned, and its
//! receiver should not be reused.

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::{self, Debug}, io, ops::Range};

#[cfg(test)]
extern crate self as sym_error;

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// The broad class an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Malformed input at the character level, such as an unterminated string or an integer
    /// literal that does not fit a coefficient.
    Lexical,

    /// Well-formed tokens in an invalid arrangement, such as mismatched parentheses.
    Syntax,

    /// A well-formed request that cannot be carried out, such as defining the same
    /// replacement rule twice or referencing an undefined label.
    Semantic,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical error"),
            Self::Syntax => write!(f, "syntax error"),
            Self::Semantic => write!(f, "semantic error"),
        }
    }
}

/// Represents any kind of error that can occur during some operation.
///
/// Implementations are usually generated with `#[derive(ErrorKind)]` from the `sym-attrs`
/// crate.
pub trait ErrorKind: Debug + Send {
    /// Returns the category of this error.
    fn category(&self) -> Category;

    /// Returns the error as [`Any`], so that callers can inspect the concrete kind.
    fn as_any(&self) -> &dyn Any;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Creates a new error that does not point at any source code.
    pub fn unspanned(kind: impl ErrorKind + 'static) -> Self {
        Self::new(Vec::new(), kind)
    }

    /// Returns the category of the contained error kind.
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Returns true if the contained error kind is of type `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<K>()
    }

    /// Returns a reference to the contained error kind if it is of type `K`.
    pub fn downcast_ref<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Replaces the spans of this error with a single span.
    ///
    /// This is used when an error was raised against text the user never wrote (for example,
    /// an expression assembled from several labels), so that the report points at the part of
    /// the user's source that produced it instead.
    pub fn respan(mut self, span: Range<usize>) -> Self {
        self.spans = vec![span];
        self
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Writes the rendered report to the given writer.
    pub fn write_report(&self, src_id: &str, input: &str, w: impl io::Write) -> io::Result<()> {
        self.build_report(src_id).write((src_id, Source::from(input)), w)
    }

    /// Report this error to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type does not have a `Display` implementation, so we
    /// can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from(input)))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.category(), self.kind)
    }
}

impl std::error::Error for Error {}
