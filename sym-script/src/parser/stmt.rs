use crate::{
    error::{InvalidNumber, MissingLabel, UnexpectedToken},
    tokenizer::TokenKind,
};
use super::{ast::*, Parse, Parser};
use sym_error::Error;

impl<'source> Parse<'source> for Stmt {
    fn parse(input: &mut Parser<'source>) -> Result<Self, Error> {
        let label = if input.peek_is(TokenKind::Label) {
            Some(input.try_parse::<Label>()?)
        } else {
            None
        };

        let keyword = input.next_token("a statement")?;
        let start = keyword.span.start;
        let kind = match keyword.kind {
            TokenKind::Colon => StmtKind::Assign(input.parse_expr(&[TokenKind::Semicolon])?.0),
            TokenKind::Apply => {
                let rule = input.expect_name(&[TokenKind::Reference])?;
                input.expect(TokenKind::To)?;
                let (expr, _) = input.parse_expr(&[TokenKind::Semicolon])?;
                StmtKind::Apply { rule, expr }
            },
            TokenKind::Assert => {
                let (lhs, _) = input.parse_expr(&[TokenKind::Eq])?;
                let (rhs, _) = input.parse_expr(&[TokenKind::Semicolon])?;
                StmtKind::Assert { lhs, rhs }
            },
            TokenKind::Define => StmtKind::Define(parse_rules(input)?),
            TokenKind::Eval => StmtKind::Eval(parse_eval(input)?),
            TokenKind::Group => StmtKind::Group(parse_group(input)?),
            TokenKind::Print => StmtKind::Print(input.parse_expr(&[TokenKind::Semicolon])?.0),
            TokenKind::Printf => StmtKind::Printf(input.parse_expr(&[TokenKind::Semicolon])?.0),
            TokenKind::Printn => StmtKind::Printn(input.parse_expr(&[TokenKind::Semicolon])?.0),
            TokenKind::Replace => {
                let from = input.expect_name(&[TokenKind::Word])?;
                input.expect(TokenKind::Arrow)?;
                let (to, _) = input.parse_expr(&[TokenKind::In])?;
                let (expr, _) = input.parse_expr(&[TokenKind::Semicolon])?;
                StmtKind::Replace {
                    from,
                    to: (!to.is_empty()).then_some(to),
                    expr,
                }
            },
            TokenKind::Include => {
                let path = input.expect_name(&[TokenKind::Str, TokenKind::Word])?;
                if input.peek_is(TokenKind::Semicolon) {
                    input.next_token("`;`")?;
                }
                StmtKind::Include(path)
            },
            _ => return Err(Error::new(vec![keyword.span], UnexpectedToken {
                expected: "a statement".to_string(),
                found: keyword.lexeme.to_string(),
            })),
        };
        let span = start..input.prev_end();

        let needs_label = matches!(
            kind,
            StmtKind::Assign(_) | StmtKind::Apply { .. } | StmtKind::Define(_) | StmtKind::Replace { .. }
        );
        if needs_label && label.is_none() {
            return Err(Error::new(vec![span], MissingLabel));
        }

        Ok(Stmt { label, kind, span })
    }
}

/// Parses the `from -> to ;` rules of a `define` statement, up to and including `end`. At least
/// one rule is required.
fn parse_rules(input: &mut Parser) -> Result<Vec<RuleDef>, Error> {
    let mut rules = Vec::new();
    loop {
        let from = input.expect_name(&[TokenKind::Word])?;
        input.expect(TokenKind::Arrow)?;
        let (to, _) = input.parse_expr(&[TokenKind::Semicolon])?;
        rules.push(RuleDef {
            from,
            to: (!to.is_empty()).then_some(to),
        });

        if input.peek_is(TokenKind::End) {
            input.next_token("`end`")?;
            return Ok(rules);
        }
    }
}

/// Parses the right-hand side of a substitution.
fn parse_value(input: &mut Parser) -> Result<SubstValue, Error> {
    if input.peek_is(TokenKind::Sub) {
        return Ok(SubstValue::Number(input.parse_number()?.0));
    }

    let token = input.expect(TokenKind::Word)?;
    Ok(match token.lexeme.parse::<f64>() {
        Ok(value) => SubstValue::Number(value),
        Err(_) if token.lexeme.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            return Err(Error::new(vec![token.span], InvalidNumber {
                value: token.lexeme.to_string(),
            }));
        },
        Err(_) => SubstValue::Name(Name {
            name: token.lexeme.to_string(),
            span: token.span,
        }),
    })
}

/// `eval <expr> with (target = value ;)* (end | assert <number> ;)`
fn parse_eval(input: &mut Parser) -> Result<Eval, Error> {
    let (expr, _) = input.parse_expr(&[TokenKind::With])?;
    let mut substitutions = Vec::new();

    let expected = loop {
        if input.peek_is(TokenKind::End) {
            input.next_token("`end`")?;
            break None;
        }
        if input.peek_is(TokenKind::Assert) {
            input.next_token("`assert`")?;
            let expected = input.parse_number()?;
            input.expect(TokenKind::Semicolon)?;
            break Some(expected);
        }

        let target = input.expect_one_of(&[TokenKind::Word, TokenKind::Other, TokenKind::End, TokenKind::Assert])?;
        let target = match target.kind {
            TokenKind::Other => SubstTarget::Other,
            _ => SubstTarget::Symbol(Name {
                name: target.lexeme.to_string(),
                span: target.span,
            }),
        };
        input.expect(TokenKind::Eq)?;
        let value = parse_value(input)?;
        input.expect(TokenKind::Semicolon)?;
        substitutions.push(SubstDef { target, value });
    };

    Ok(Eval { expr, substitutions, expected })
}

/// `group <expr> by ([label] <pattern> ; | [label] other ;)* end`
fn parse_group(input: &mut Parser) -> Result<Group, Error> {
    let (expr, _) = input.parse_expr(&[TokenKind::By])?;
    let mut arms = Vec::new();
    let mut other = None;

    loop {
        if input.peek_is(TokenKind::End) {
            input.next_token("`end`")?;
            break;
        }

        let label = input.try_parse::<Label>()?;
        if input.peek_is(TokenKind::Other) {
            input.next_token("`other`")?;
            input.expect(TokenKind::Semicolon)?;
            other = Some(label);
        } else {
            let (pattern, _) = input.parse_expr(&[TokenKind::Semicolon])?;
            arms.push(GroupArm { label, pattern });
        }
    }

    Ok(Group { expr, arms, other })
}
