//! Tokenizer for SymScript source.

use crate::error::{EmptyLabel, UnknownToken, UnterminatedComment, UnterminatedString};
use logos::{Lexer, Logos};
use std::{fmt, ops::Range};
use sym_error::Error;

/// The ways tokenizing can fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LexError {
    #[default]
    Unknown,
    UnterminatedString,
    UnterminatedComment,
}

/// Skips to the closing `*/` of a block comment.
fn block_comment(lexer: &mut Lexer<TokenKind>) -> Result<(), LexError> {
    match lexer.remainder().find("*/") {
        Some(end) => {
            lexer.bump(end + 2);
            Ok(())
        },
        None => {
            lexer.bump(lexer.remainder().len());
            Err(LexError::UnterminatedComment)
        },
    }
}

/// Skips to the closing quote of a string.
fn quoted(lexer: &mut Lexer<TokenKind>) -> Result<(), LexError> {
    match lexer.remainder().find('"') {
        Some(end) => {
            lexer.bump(end + 1);
            Ok(())
        },
        None => {
            lexer.bump(lexer.remainder().len());
            Err(LexError::UnterminatedString)
        },
    }
}

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
#[logos(error = LexError)]
pub enum TokenKind {
    #[regex(r"[\n\r]+")]
    NewLine,

    #[regex(r"[^\S\r\n]+")]
    Whitespace,

    #[regex(r"#[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("=")]
    Eq,

    #[token("->")]
    Arrow,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token("\"", quoted)]
    Str,

    #[token("apply")]
    Apply,

    #[token("assert")]
    Assert,

    #[token("by")]
    By,

    #[token("define")]
    Define,

    #[token("end")]
    End,

    #[token("eval")]
    Eval,

    #[token("group")]
    Group,

    #[token("in")]
    In,

    #[token("include")]
    Include,

    #[token("other")]
    Other,

    #[token("print")]
    Print,

    #[token("printf")]
    Printf,

    #[token("printn")]
    Printn,

    #[token("replace")]
    Replace,

    #[token("to")]
    To,

    #[token("with")]
    With,

    #[regex(r##"\$[^\s+\-*=():;"#]+"##)]
    Reference,

    #[regex(r##"\[[^\s+\-*=():;"#\[\]]*\]"##)]
    Label,

    #[regex(r##"[^\s+\-*=():;"#]+"##)]
    Word,
}

impl TokenKind {
    /// Returns true if the token carries no meaning: whitespace or a comment.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::NewLine | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Returns true if the token is a keyword.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Apply | TokenKind::Assert | TokenKind::By | TokenKind::Define
                | TokenKind::End | TokenKind::Eval | TokenKind::Group | TokenKind::In
                | TokenKind::Include | TokenKind::Other | TokenKind::Print | TokenKind::Printf
                | TokenKind::Printn | TokenKind::Replace | TokenKind::To | TokenKind::With
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NewLine => "newline",
            Self::Whitespace => "whitespace",
            Self::LineComment | Self::BlockComment => "comment",
            Self::Add => "`+`",
            Self::Sub => "`-`",
            Self::Mul => "`*`",
            Self::Eq => "`=`",
            Self::Arrow => "`->`",
            Self::OpenParen => "`(`",
            Self::CloseParen => "`)`",
            Self::Colon => "`:`",
            Self::Semicolon => "`;`",
            Self::Str => "string",
            Self::Apply => "`apply`",
            Self::Assert => "`assert`",
            Self::By => "`by`",
            Self::Define => "`define`",
            Self::End => "`end`",
            Self::Eval => "`eval`",
            Self::Group => "`group`",
            Self::In => "`in`",
            Self::Include => "`include`",
            Self::Other => "`other`",
            Self::Print => "`print`",
            Self::Printf => "`printf`",
            Self::Printn => "`printn`",
            Self::Replace => "`replace`",
            Self::To => "`to`",
            Self::With => "`with`",
            Self::Reference => "reference",
            Self::Label => "label",
            Self::Word => "word",
        };
        write!(f, "{}", name)
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

impl<'source> Token<'source> {
    /// Returns the meaningful text of the token: the name of a reference or label, the contents
    /// of a string, or the lexeme of anything else.
    pub fn text(&self) -> &'source str {
        let lexeme = self.lexeme;
        match self.kind {
            TokenKind::Reference => &lexeme[1..],
            TokenKind::Label | TokenKind::Str => &lexeme[1..lexeme.len() - 1],
            _ => lexeme,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?} at {}..{}", self.kind, self.lexeme, self.span.start, self.span.end)
    }
}

/// Returns an iterator over the tokens in the given string.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Tokenizes the whole input, dropping whitespace and comments.
pub fn tokenize_complete(input: &str) -> Result<Vec<Token<'_>>, Error> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let kind = result.map_err(|err| match err {
            LexError::Unknown => Error::new(vec![span.clone()], UnknownToken),
            LexError::UnterminatedString => Error::new(vec![span.clone()], UnterminatedString),
            LexError::UnterminatedComment => Error::new(vec![span.clone()], UnterminatedComment),
        })?;

        if kind.is_trivia() {
            continue;
        }
        if kind == TokenKind::Label && lexer.slice() == "[]" {
            return Err(Error::new(vec![span], EmptyLabel));
        }

        tokens.push(Token {
            span,
            kind,
            lexeme: lexer.slice(),
        });
    }

    Ok(tokens)
}
