//! The syntax tree of a SymScript program.

use std::ops::Range;

/// A `[name]` label in front of a statement or a `group` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// The name between the brackets.
    pub name: String,

    /// The region of the source code that this label was parsed from, brackets included.
    pub span: Range<usize>,
}

/// A bare name: the factor of a rule, a `$reference`, a substitution target, or a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    /// The name, without any `$` or quotes.
    pub name: String,

    /// The region of the source code that this name was parsed from.
    pub span: Range<usize>,
}

/// One piece of an expression's source.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprItem {
    /// A symbol, number, operator, or parenthesis, copied verbatim into the expression text.
    Text(Name),

    /// A `$reference` to a labelled expression, substituted before the expression is parsed.
    Reference(Name),
}

impl ExprItem {
    /// Returns the region of the source code that this item was parsed from.
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Text(name) | Self::Reference(name) => name.span.clone(),
        }
    }
}

/// The source of an algebraic expression, as the run of tokens up to its terminator.
///
/// The expression is compiled only when the statement runs, because the labels it references
/// may be defined by earlier statements.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprSource {
    /// The pieces of the expression.
    pub items: Vec<ExprItem>,

    /// The region of the source code that this expression was parsed from. For an empty
    /// expression, this is an empty span just before its terminator.
    pub span: Range<usize>,
}

impl ExprSource {
    /// Returns true if the expression has no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One `from -> to ;` rule of a `define` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDef {
    /// The factor to replace.
    pub from: Name,

    /// The replacement, or [`None`] if the right-hand side is empty.
    pub to: Option<ExprSource>,
}

/// The left-hand side of a substitution in an `eval` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SubstTarget {
    /// A single symbol.
    Symbol(Name),

    /// Every symbol without a value of its own (`other`).
    Other,
}

/// The right-hand side of a substitution in an `eval` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SubstValue {
    /// A literal number.
    Number(f64),

    /// The value of an earlier substitution in the same statement.
    Name(Name),
}

/// A `target = value ;` substitution of an `eval` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstDef {
    pub target: SubstTarget,
    pub value: SubstValue,
}

/// `eval <expr> with ... end` or `eval <expr> with ... assert <number> ;`
#[derive(Debug, Clone, PartialEq)]
pub struct Eval {
    /// The expression to evaluate.
    pub expr: ExprSource,

    /// The substitutions, in order.
    pub substitutions: Vec<SubstDef>,

    /// The value the expression must evaluate to, and its span, for `assert`.
    pub expected: Option<(f64, Range<usize>)>,
}

/// One `[label] <pattern> ;` arm of a `group` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupArm {
    pub label: Label,
    pub pattern: ExprSource,
}

/// `group <expr> by ... end`
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// The expression to group.
    pub expr: ExprSource,

    /// The patterns to group by, in order.
    pub arms: Vec<GroupArm>,

    /// The label of the `[label] other ;` arm, if any.
    pub other: Option<Label>,
}

/// The different kinds of statements.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `[l] : <expr> ;`
    Assign(ExprSource),

    /// `[l] apply $rule to <expr> ;`
    Apply {
        rule: Name,
        expr: ExprSource,
    },

    /// `assert <expr> = <expr> ;`
    Assert {
        lhs: ExprSource,
        rhs: ExprSource,
    },

    /// `[l] define a -> <expr> ; ... end`
    Define(Vec<RuleDef>),

    Eval(Eval),

    Group(Group),

    /// `print <items> ;`
    Print(ExprSource),

    /// `printf <expr> ;`
    Printf(ExprSource),

    /// `printn <expr> ;`
    Printn(ExprSource),

    /// `[l] replace a -> <expr> in <expr> ;`
    Replace {
        from: Name,
        to: Option<ExprSource>,
        expr: ExprSource,
    },

    /// `include "path"`
    Include(Name),
}

/// A statement, with its optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// The label in front of the statement, if any.
    pub label: Option<Label>,

    /// The kind of statement.
    pub kind: StmtKind,

    /// The region of the source code that this statement was parsed from, label excluded.
    pub span: Range<usize>,
}
