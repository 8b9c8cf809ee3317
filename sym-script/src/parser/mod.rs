//! Parses SymScript statements.
//!
//! Statements are parsed one at a time with [`Parser::try_parse`], so that a program can be
//! run statement by statement: a syntax error in a later statement does not prevent earlier
//! statements from running. Expressions inside statements are kept as [`ExprSource`]s and
//! compiled by the interpreter when the statement runs.

pub mod ast;
mod stmt;

use crate::{
    error::{InvalidNumber, UnexpectedEof, UnexpectedToken},
    tokenizer::{tokenize_complete, Token, TokenKind},
};
use ast::{ExprItem, ExprSource, Label, Name, Stmt};
use std::ops::Range;
use sym_error::Error;

/// Any type that can be parsed from a stream of tokens.
pub trait Parse<'source>: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    fn parse(input: &mut Parser<'source>) -> Result<Self, Error>;
}

/// Describes a list of token kinds as an English alternative, such as "`;` or `end`".
fn describe(kinds: &[TokenKind]) -> String {
    match kinds {
        [] => "nothing".to_string(),
        [one] => one.to_string(),
        [init @ .., last] => format!(
            "{} or {}",
            init.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            last,
        ),
    }
}

/// A parser for SymScript source code.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The length of the source code.
    source_len: usize,
}

impl<'source> Parser<'source> {
    /// Tokenizes the given source and creates a parser for it.
    pub fn new(source: &'source str) -> Result<Self, Error> {
        Ok(Self {
            tokens: tokenize_complete(source)?.into_boxed_slice(),
            cursor: 0,
            source_len: source.len(),
        })
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.source_len..self.source_len
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.current_token().map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the end of the previously consumed token, or `0` at the start of the stream.
    pub fn prev_end(&self) -> usize {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |token| token.span.end)
    }

    /// Returns true if every token has been consumed.
    pub fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns true if the current token is of the given kind.
    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.current_token().is_some_and(|token| token.kind == kind)
    }

    /// Returns the next token to be parsed, then advances the cursor.
    ///
    /// Returns an EOF error mentioning `expected` if there are no more tokens.
    pub fn next_token(&mut self, expected: &str) -> Result<Token<'source>, Error> {
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                // cloning is cheap: only Range<_> is cloned
                Ok(token.clone())
            },
            None => Err(Error::new(vec![self.eof_span()], UnexpectedEof {
                expected: expected.to_string(),
            })),
        }
    }

    /// Consumes the next token, which must be one of the given kinds.
    pub fn expect_one_of(&mut self, kinds: &[TokenKind]) -> Result<Token<'source>, Error> {
        let expected = describe(kinds);
        let token = self.next_token(&expected)?;
        if kinds.contains(&token.kind) {
            Ok(token)
        } else {
            Err(Error::new(vec![token.span], UnexpectedToken {
                expected,
                found: token.lexeme.to_string(),
            }))
        }
    }

    /// Consumes the next token, which must be of the given kind.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'source>, Error> {
        self.expect_one_of(&[kind])
    }

    /// Consumes the next token as a [`Name`]; it must be one of the given kinds.
    pub fn expect_name(&mut self, kinds: &[TokenKind]) -> Result<Name, Error> {
        let token = self.expect_one_of(kinds)?;
        Ok(Name {
            name: token.text().to_string(),
            span: token.span,
        })
    }

    /// Speculatively parses a value from the given stream of tokens.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse<'source>>(&mut self) -> Result<T, Error> {
        let start = self.cursor;
        let result = T::parse(self);
        if result.is_err() {
            self.cursor = start;
        }
        result
    }

    /// Parses every remaining statement.
    pub fn try_parse_full_many(&mut self) -> Result<Vec<Stmt>, Error> {
        let mut stmts = Vec::new();
        while !self.is_eof() {
            stmts.push(self.try_parse()?);
        }
        Ok(stmts)
    }

    /// Parses the tokens of an expression up to (and including) one of the given terminators.
    ///
    /// Returns the expression and the terminator that ended it. The expression may be empty.
    pub fn parse_expr(
        &mut self,
        terminators: &[TokenKind],
    ) -> Result<(ExprSource, Token<'source>), Error> {
        let mut items = Vec::new();

        let terminator = loop {
            let token = self.next_token(&describe(terminators))?;
            if terminators.contains(&token.kind) {
                break token;
            }

            let name = Name {
                name: token.text().to_string(),
                span: token.span.clone(),
            };
            match token.kind {
                TokenKind::Word | TokenKind::Str
                    | TokenKind::Add | TokenKind::Sub | TokenKind::Mul
                    | TokenKind::OpenParen | TokenKind::CloseParen => items.push(ExprItem::Text(name)),
                TokenKind::Reference => items.push(ExprItem::Reference(name)),
                _ => return Err(Error::new(vec![token.span], UnexpectedToken {
                    expected: format!("an expression or {}", describe(terminators)),
                    found: token.lexeme.to_string(),
                })),
            }
        };

        let span = match (items.first(), items.last()) {
            (Some(first), Some(last)) => first.span().start..last.span().end,
            _ => terminator.span.start..terminator.span.start,
        };

        Ok((ExprSource { items, span }, terminator))
    }

    /// Parses a number, optionally preceded by `-`.
    pub fn parse_number(&mut self) -> Result<(f64, Range<usize>), Error> {
        let negative = self.peek_is(TokenKind::Sub);
        let start = self.span().start;
        if negative {
            self.cursor += 1;
        }

        let token = self.expect(TokenKind::Word)?;
        let span = start..token.span.end;
        match token.lexeme.parse::<f64>() {
            Ok(value) if negative => Ok((-value, span)),
            Ok(value) => Ok((value, span)),
            Err(_) => Err(Error::new(vec![span], InvalidNumber {
                value: token.lexeme.to_string(),
            })),
        }
    }
}

impl<'source> Parse<'source> for Label {
    fn parse(input: &mut Parser<'source>) -> Result<Self, Error> {
        let token = input.expect(TokenKind::Label)?;
        Ok(Label {
            name: token.text().to_string(),
            span: token.span,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::error::{EmptyLabel, MissingLabel};
    use super::*;
    use super::ast::*;

    fn parse(source: &str) -> Vec<Stmt> {
        Parser::new(source).unwrap().try_parse_full_many().unwrap()
    }

    fn parse_err(source: &str) -> Error {
        match Parser::new(source) {
            Ok(mut parser) => parser.try_parse_full_many().unwrap_err(),
            Err(err) => err,
        }
    }

    fn text(name: &str, span: Range<usize>) -> ExprItem {
        ExprItem::Text(Name { name: name.to_string(), span })
    }

    #[test]
    fn assignment() {
        let stmts = parse("[e] : 2*$x;");
        assert_eq!(stmts, vec![Stmt {
            label: Some(Label { name: "e".to_string(), span: 0..3 }),
            kind: StmtKind::Assign(ExprSource {
                items: vec![
                    text("2", 6..7),
                    text("*", 7..8),
                    ExprItem::Reference(Name { name: "x".to_string(), span: 8..10 }),
                ],
                span: 6..10,
            }),
            span: 4..11,
        }]);
    }

    #[test]
    fn define_with_annihilator() {
        let stmts = parse("[r] define a -> b + 1; c -> ; end");
        let StmtKind::Define(rules) = &stmts[0].kind else {
            panic!("expected define, got {:?}", stmts[0].kind);
        };
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].from.name, "a");
        assert_eq!(rules[0].to.as_ref().map(|to| to.items.len()), Some(3));
        assert_eq!(rules[1].from.name, "c");
        assert_eq!(rules[1].to, None);
    }

    #[test]
    fn eval_with_substitutions() {
        let stmts = parse("eval x*y with x = -2; y = x; other = 0.5; assert -4;");
        let StmtKind::Eval(eval) = &stmts[0].kind else {
            panic!("expected eval, got {:?}", stmts[0].kind);
        };
        assert_eq!(eval.substitutions.len(), 3);
        assert_eq!(eval.substitutions[0].value, SubstValue::Number(-2.0));
        assert!(matches!(&eval.substitutions[1].value, SubstValue::Name(name) if name.name == "x"));
        assert_eq!(eval.substitutions[2].target, SubstTarget::Other);
        assert_eq!(eval.expected.as_ref().map(|(value, _)| *value), Some(-4.0));
    }

    #[test]
    fn group_arms() {
        let stmts = parse("[g] group $e by [x] x; [xy] x*y; [rest] other; end");
        let StmtKind::Group(group) = &stmts[0].kind else {
            panic!("expected group, got {:?}", stmts[0].kind);
        };
        let labels = group.arms.iter().map(|arm| arm.label.name.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["x", "xy"]);
        assert_eq!(group.other.as_ref().map(|l| l.name.as_str()), Some("rest"));
    }

    #[test]
    fn several_statements() {
        let stmts = parse("
            # build an expression
            [e] : a + b;
            [f] replace a -> c in $e;
            /* show it */
            print e is $f;
            include \"more.sym\"
            printn $f;
        ");
        assert_eq!(stmts.len(), 5);
        assert!(matches!(&stmts[3].kind, StmtKind::Include(name) if name.name == "more.sym"));
    }

    #[test]
    fn missing_label() {
        let err = parse_err(": a + b;");
        assert!(err.is::<MissingLabel>());
        assert_eq!(err.spans, vec![0..8]);
    }

    #[test]
    fn unexpected_keyword_in_expression() {
        let err = parse_err("[e] : a + end;");
        assert_eq!(err.downcast_ref(), Some(&UnexpectedToken {
            expected: "an expression or `;`".to_string(),
            found: "end".to_string(),
        }));
        assert_eq!(err.spans, vec![10..13]);
    }

    #[test]
    fn unexpected_eof() {
        let err = parse_err("[e] : a + b");
        assert_eq!(err.downcast_ref(), Some(&UnexpectedEof { expected: "`;`".to_string() }));
        assert_eq!(err.spans, vec![11..11]);
    }

    #[test]
    fn invalid_assert_number() {
        let err = parse_err("eval x with x = 1; assert two;");
        assert_eq!(err.downcast_ref(), Some(&InvalidNumber { value: "two".to_string() }));
    }

    #[test]
    fn empty_label() {
        assert!(parse_err("[] : a;").is::<EmptyLabel>());
    }

    #[test]
    fn describe_alternatives() {
        assert_eq!(describe(&[TokenKind::Semicolon]), "`;`");
        assert_eq!(describe(&[TokenKind::Word, TokenKind::Other, TokenKind::End]), "word, `other` or `end`");
    }
}
