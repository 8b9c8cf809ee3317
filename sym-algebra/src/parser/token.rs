//! Tokenizer for infix expressions.

use crate::error::UnknownCharacter;
use logos::{Lexer, Logos};
use std::ops::Range;
use sym_error::Error;

/// The different kinds of tokens that can be produced by the tokenizer.
///
/// Any of `( [ {` opens a group and any of `) ] }` closes one; they are interchangeable. Every
/// other run of characters that are not whitespace, operators, or parentheses is a single
/// [`TokenKind::Symbol`].
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"\s+")]
    Whitespace,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[regex(r"[(\[{]")]
    OpenParen,

    #[regex(r"[)\]}]")]
    CloseParen,

    #[regex(r"[^\s+\-*(\[{)\]}]+")]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(self) -> bool {
        self == TokenKind::Whitespace
    }

    /// Returns true if the token is one of the binary operators.
    pub fn is_operator(self) -> bool {
        matches!(self, TokenKind::Add | TokenKind::Sub | TokenKind::Mul)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}

/// Returns an iterator over the tokens in the given string.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Tokenizes the whole input, dropping whitespace.
pub fn tokenize_complete(input: &str) -> Result<Vec<Token<'_>>, Error> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let kind = result.map_err(|_| Error::new(vec![lexer.span()], UnknownCharacter))?;
        if kind.is_whitespace() {
            continue;
        }

        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    Ok(tokens)
}
