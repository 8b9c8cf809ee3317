//! Substitution of `$references` into expression sources.
//!
//! The algebra engine parses plain text, so a script expression is first flattened into text,
//! with each reference replaced by the parenthesised text of the expression it names. Errors
//! raised by the engine point into that text; [`Expanded`] maps them back onto the script.

use crate::parser::ast::{ExprItem, ExprSource};
use std::{io::Write, ops::Range};
use super::{FileSystem, Interpreter};
use sym_algebra::{Expression, ExpressionParser};
use sym_error::Error;
use tracing::trace;

/// The flattened text of an expression, along with the origin of each piece.
#[derive(Debug, Clone, PartialEq)]
pub struct Expanded {
    /// The text handed to the expression parser.
    pub text: String,

    /// Pairs of (range in `text`, span in the script) for every piece of text.
    origins: Vec<(Range<usize>, Range<usize>)>,

    /// The span of the whole expression in the script.
    whole: Range<usize>,
}

impl Expanded {
    /// Creates an empty expansion of the expression at the given span.
    pub fn new(whole: Range<usize>) -> Self {
        Self { text: String::new(), origins: Vec::new(), whole }
    }

    /// Appends a piece of text that was produced by the given span of the script.
    pub fn push(&mut self, piece: &str, span: Range<usize>) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        let start = self.text.len();
        self.text.push_str(piece);
        self.origins.push((start..self.text.len(), span));
    }

    /// Maps a span of the expanded text onto the script.
    ///
    /// Every piece of text overlapping the span contributes its origin; a span that overlaps
    /// nothing, such as the end of the text, maps to the whole expression.
    pub fn source_span(&self, span: &Range<usize>) -> Range<usize> {
        let overlaps = |text: &Range<usize>| {
            if span.is_empty() {
                text.start <= span.start && span.start < text.end
            } else {
                text.start < span.end && span.start < text.end
            }
        };

        self.origins
            .iter()
            .filter(|(text, _)| overlaps(text))
            .map(|(_, source)| source.clone())
            .reduce(|a, b| a.start.min(b.start)..a.end.max(b.end))
            .unwrap_or_else(|| self.whole.clone())
    }

    /// Moves the spans of an error raised against the expanded text onto the script.
    pub fn map_error(&self, mut err: Error) -> Error {
        if err.spans.is_empty() {
            return err.respan(self.whole.clone());
        }
        err.spans = err.spans.iter().map(|span| self.source_span(span)).collect();
        err
    }
}

impl<W: Write, F: FileSystem> Interpreter<W, F> {
    /// Flattens an expression source into text, substituting references.
    pub(super) fn expand(&self, source: &ExprSource) -> Result<Expanded, Error> {
        let mut expanded = Expanded::new(source.span.clone());

        for item in &source.items {
            match item {
                ExprItem::Text(name) => expanded.push(&name.name, name.span.clone()),
                ExprItem::Reference(name) => {
                    let expr = self.lookup_expression(name)?;

                    // the engine only accepts a leading minus at the very start of its input
                    let text = if expr.terms().first().is_some_and(|term| term.sign().is_negative()) {
                        format!("(0 {})", expr)
                    } else {
                        format!("({})", expr)
                    };
                    expanded.push(&text, name.span.clone());
                },
            }
        }

        Ok(expanded)
    }

    /// Expands and parses an expression source.
    pub(super) fn compile(&self, source: &ExprSource) -> Result<Expression, Error> {
        let expanded = self.expand(source)?;
        trace!(text = %expanded.text, "compiling expression");
        ExpressionParser::new()
            .parse(&expanded.text)
            .map_err(|err| expanded.map_error(err))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn expanded() -> Expanded {
        // script: "[e] : 2 * $f + x;" with $f = "a - b"
        let mut expanded = Expanded::new(6..16);
        expanded.push("2", 6..7);
        expanded.push("*", 8..9);
        expanded.push("(a - b)", 10..12);
        expanded.push("+", 13..14);
        expanded.push("x", 15..16);
        expanded
    }

    #[test]
    fn text_is_space_separated() {
        assert_eq!(expanded().text, "2 * (a - b) + x");
    }

    #[test]
    fn span_inside_reference_maps_to_reference() {
        // "b" in the expanded text
        assert_eq!(expanded().source_span(&(9..10)), 10..12);
    }

    #[test]
    fn span_across_pieces_is_joined() {
        assert_eq!(expanded().source_span(&(0..3)), 6..9);
    }

    #[test]
    fn span_past_the_end_maps_to_whole() {
        let expanded = expanded();
        let end = expanded.text.len();
        assert_eq!(expanded.source_span(&(end..end)), 6..16);
    }
}
