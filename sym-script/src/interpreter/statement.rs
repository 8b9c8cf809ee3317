use crate::{
    error::{
        AssertionFailed, EvalAssertionFailed, MissingLabel, PatternNotSingleTerm,
        UnknownSubstitution, WriteFailed,
    },
    parser::ast::{Eval, ExprItem, ExprSource, Group, Label, RuleDef, Stmt, StmtKind, SubstTarget, SubstValue},
};
use std::{fmt::Display, io::Write, ops::Range};
use super::{Binding, FileSystem, Interpreter};
use sym_algebra::{Expression, Factor, Operator, Replace, Sign, Substitutions, Term};
use sym_error::Error;
use tracing::debug;

/// Returns the label of a statement that stores its result.
fn required_label(stmt: &Stmt) -> Result<&Label, Error> {
    stmt.label
        .as_ref()
        .ok_or_else(|| Error::new(vec![stmt.span.clone()], MissingLabel))
}

impl<W: Write, F: FileSystem> Interpreter<W, F> {
    /// Executes a single statement. `include` statements are handled by the caller.
    pub(super) fn execute(&mut self, stmt: &Stmt) -> Result<(), Error> {
        match &stmt.kind {
            StmtKind::Assign(source) => {
                let expr = self.compile(source)?;
                self.bind(required_label(stmt)?, Binding::Expression(expr))
            },
            StmtKind::Apply { rule, expr } => {
                let expr = self.compile(expr)?;
                let result = self.lookup_rule(rule)?.operate(&expr);
                self.bind(required_label(stmt)?, Binding::Expression(result))
            },
            StmtKind::Assert { lhs, rhs } => {
                let lhs = self.compile(lhs)?;
                let rhs = self.compile(rhs)?;
                if lhs.is_equal(&rhs) {
                    Ok(())
                } else {
                    debug!(%lhs, %rhs, "assertion failed");
                    Err(Error::new(vec![stmt.span.clone()], AssertionFailed))
                }
            },
            StmtKind::Define(rules) => {
                let replace = self.define(rules)?;
                self.bind(required_label(stmt)?, Binding::Rule(replace))
            },
            StmtKind::Eval(eval) => self.eval(eval, stmt.span.clone()),
            StmtKind::Group(group) => self.group(group, stmt.label.as_ref()),
            StmtKind::Print(source) => {
                let line = self.print_items(source)?;
                self.write_line(line, &stmt.span)
            },
            StmtKind::Printf(source) => {
                let expr = self.compile(source)?;
                self.write_line(expr.formatted(), &stmt.span)
            },
            StmtKind::Printn(source) => {
                let expr = self.compile(source)?;
                let count = if expr.is_zero() { 0 } else { expr.num_terms() };
                self.write_line(count, &stmt.span)
            },
            StmtKind::Replace { from, to, expr } => {
                let to = self.compile_terms(to.as_ref())?;
                let mut replace = Replace::new();
                replace
                    .create_rule(Factor::new(from.name.as_str(), Sign::Pos), to)
                    .map_err(|err| err.respan(from.span.clone()))?;

                let expr = self.compile(expr)?;
                let result = replace.operate(&expr);
                self.bind(required_label(stmt)?, Binding::Expression(result))
            },
            StmtKind::Include(_) => Ok(()),
        }
    }

    /// Writes one line of output.
    fn write_line(&mut self, value: impl Display, span: &Range<usize>) -> Result<(), Error> {
        writeln!(self.out, "{}", value).map_err(|err| {
            Error::new(vec![span.clone()], WriteFailed { reason: err.to_string() })
        })
    }

    /// Compiles the right-hand side of a rule; an absent right-hand side stays absent.
    fn compile_terms(&self, source: Option<&ExprSource>) -> Result<Option<Vec<Term>>, Error> {
        source
            .map(|source| self.compile(source).map(|mut expr| expr.take_terms()))
            .transpose()
    }

    /// Builds the operator of a `define` statement.
    fn define(&self, rules: &[RuleDef]) -> Result<Replace, Error> {
        let mut replace = Replace::new();
        for rule in rules {
            let to = self.compile_terms(rule.to.as_ref())?;
            replace
                .create_rule(Factor::new(rule.from.name.as_str(), Sign::Pos), to)
                .map_err(|err| err.respan(rule.from.span.clone()))?;
        }
        Ok(replace)
    }

    /// Evaluates an expression numerically, printing the value or checking it against the
    /// expected value.
    fn eval(&mut self, eval: &Eval, span: Range<usize>) -> Result<(), Error> {
        let expr = self.compile(&eval.expr)?;

        let mut subst = Substitutions::new();
        for def in &eval.substitutions {
            let value = match &def.value {
                SubstValue::Number(value) => *value,
                SubstValue::Name(name) => subst.get(&name.name).ok_or_else(|| {
                    Error::new(vec![name.span.clone()], UnknownSubstitution { name: name.name.clone() })
                })?,
            };
            match &def.target {
                SubstTarget::Symbol(name) => subst.set(name.name.as_str(), value),
                SubstTarget::Other => subst.set_other(value),
            };
        }

        let actual = expr.evaluate(&subst);
        match eval.expected {
            Some((expected, _)) if actual == expected => Ok(()),
            Some((expected, _)) => Err(Error::new(vec![span], EvalAssertionFailed { expected, actual })),
            None => self.write_line(actual, &span),
        }
    }

    /// Groups an expression by its patterns, storing each bucket under its label. Bucket labels
    /// of a labelled statement are qualified by the statement's label, as in `label.bucket`.
    fn group(&mut self, group: &Group, label: Option<&Label>) -> Result<(), Error> {
        let expr = self.compile(&group.expr)?;

        let mut patterns = Vec::with_capacity(group.arms.len());
        for arm in &group.arms {
            let mut pattern = self.compile(&arm.pattern)?;
            if pattern.num_terms() != 1 {
                return Err(Error::new(vec![arm.pattern.span.clone()], PatternNotSingleTerm));
            }
            patterns.extend(pattern.take_terms());
        }

        let qualify = |sub: &Label| match label {
            Some(label) => Label {
                name: format!("{}.{}", label.name, sub.name),
                span: sub.span.clone(),
            },
            None => sub.clone(),
        };

        let mut buckets = expr.group_by(&patterns).into_iter();
        for arm in &group.arms {
            let bucket = buckets.next().unwrap_or_default();
            self.bind(&qualify(&arm.label), Binding::Expression(bucket))?;
        }
        if let Some(other) = &group.other {
            let remainder = buckets.next().unwrap_or_else(Expression::new);
            self.bind(&qualify(other), Binding::Expression(remainder))?;
        }

        Ok(())
    }

    /// Renders the items of a `print` statement, separated by spaces.
    fn print_items(&self, source: &ExprSource) -> Result<String, Error> {
        let mut items = Vec::with_capacity(source.items.len());
        for item in &source.items {
            match item {
                ExprItem::Text(name) => items.push(name.name.clone()),
                ExprItem::Reference(name) => items.push(self.lookup_expression(name)?.to_string()),
            }
        }
        Ok(items.join(" "))
    }
}
