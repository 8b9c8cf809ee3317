//! Runs SymScript programs.
//!
//! An [`Interpreter`] holds the labelled expressions and rules of a session. Statements are
//! parsed and executed one at a time, in order; the first statement that fails stops its
//! source, and the error is returned as a [`Diagnostic`] carrying the source it points into.
//! Everything defined before the failure stays defined.

mod expand;
pub mod filesystem;
mod statement;


pub use expand::Expanded;
pub use filesystem::{FileSystem, MemoryFileSystem, OsFileSystem};

use crate::{
    error::{IncludeNotFound, LabelConflict, RecursiveInclude, UndefinedExpression, UndefinedRule},
    parser::{ast::{Label, Name, Stmt, StmtKind}, Parser},
};
use levenshtein::levenshtein;
use std::{
    collections::HashMap,
    fmt,
    io::{self, Write},
    mem,
    path::{Path, PathBuf},
};
use sym_algebra::{Expression, Replace};
use sym_error::Error;
use tracing::debug;

/// A value stored under a label.
#[derive(Debug, Clone)]
pub enum Binding {
    Expression(Expression),
    Rule(Replace),
}

impl Binding {
    /// Describes the kind of value, for error messages.
    fn describe(&self) -> &'static str {
        match self {
            Self::Expression(_) => "an expression",
            Self::Rule(_) => "a rule",
        }
    }
}

/// An error raised while running a script, along with the source it points into.
///
/// The source is kept because the error may come from an included file rather than the source
/// that was run.
#[derive(Debug)]
pub struct Diagnostic {
    /// The name of the source, usually its path.
    pub src_id: String,

    /// The full text of the source.
    pub source: String,

    /// The error.
    pub error: Error,
}

impl Diagnostic {
    /// Creates a diagnostic for an error in the given source.
    pub fn new(src_id: &str, source: &str, error: Error) -> Self {
        Self {
            src_id: src_id.to_string(),
            source: source.to_string(),
            error,
        }
    }

    /// Writes the rendered report to the given writer.
    pub fn write_report(&self, w: impl Write) -> io::Result<()> {
        self.error.write_report(&self.src_id, &self.source, w)
    }

    /// Reports the error to stderr.
    pub fn report_to_stderr(&self) -> io::Result<()> {
        self.error.report_to_stderr(&self.src_id, &self.source)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.src_id, self.error)
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A SymScript session, writing its output to `W` and reading included files from `F`.
#[derive(Debug)]
pub struct Interpreter<W: Write, F: FileSystem = OsFileSystem> {
    /// Labelled expressions and rules. The two kinds share one namespace.
    bindings: HashMap<String, Binding>,

    /// Where `print`, `printf`, `printn`, and `eval` write to.
    out: W,

    fs: F,

    /// Directories searched by `include` after the including file's own directory.
    include_dirs: Vec<PathBuf>,

    /// The sources currently running, innermost last.
    include_stack: Vec<PathBuf>,
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter that reads included files from disk.
    pub fn new(out: W) -> Self {
        Self::with_file_system(out, OsFileSystem)
    }
}

impl<W: Write, F: FileSystem> Interpreter<W, F> {
    /// Creates an interpreter that reads included files from the given file system.
    pub fn with_file_system(out: W, fs: F) -> Self {
        Self {
            bindings: HashMap::new(),
            out,
            fs,
            include_dirs: Vec::new(),
            include_stack: Vec::new(),
        }
    }

    /// Adds a directory to search for included files.
    pub fn add_include_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.include_dirs.push(dir.into());
        self
    }

    /// Returns the expression stored under the given label, if any.
    pub fn expression(&self, label: &str) -> Option<&Expression> {
        match self.bindings.get(label) {
            Some(Binding::Expression(expr)) => Some(expr),
            _ => None,
        }
    }

    /// Returns the rule stored under the given label, if any.
    pub fn rule(&self, label: &str) -> Option<&Replace> {
        match self.bindings.get(label) {
            Some(Binding::Rule(rule)) => Some(rule),
            _ => None,
        }
    }

    /// Returns the output written so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consumes the interpreter, returning its output.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs every statement of the given source, stopping at the first failure.
    pub fn run_source(&mut self, src_id: &str, source: &str) -> Result<(), Diagnostic> {
        self.include_stack.push(PathBuf::from(src_id));
        let result = self.run_statements(src_id, source);
        self.include_stack.pop();
        result
    }

    /// Reads the file at the given path through the file system and runs it.
    pub fn run_file(&mut self, path: impl AsRef<Path>) -> Result<(), Diagnostic> {
        let path = path.as_ref();
        let src_id = path.to_string_lossy();
        let Some(source) = self.fs.read_file(path) else {
            return Err(Diagnostic::new(&src_id, "", Error::unspanned(IncludeNotFound {
                path: src_id.to_string(),
            })));
        };
        self.run_source(&src_id, &source)
    }

    fn run_statements(&mut self, src_id: &str, source: &str) -> Result<(), Diagnostic> {
        let diagnostic = |error| Diagnostic::new(src_id, source, error);
        let mut parser = Parser::new(source).map_err(diagnostic)?;

        while !parser.is_eof() {
            let stmt = parser.try_parse::<Stmt>().map_err(diagnostic)?;
            debug!(
                src_id,
                label = stmt.label.as_ref().map(|label| label.name.as_str()),
                span = ?stmt.span,
                "running statement",
            );

            match &stmt.kind {
                StmtKind::Include(path) => self.include(path, src_id, source)?,
                _ => self.execute(&stmt).map_err(diagnostic)?,
            }
        }

        Ok(())
    }

    /// Runs the file named by an `include` statement of the given source.
    ///
    /// The path is resolved against the including file's directory first, then each include
    /// directory in order.
    fn include(&mut self, path: &Name, src_id: &str, source: &str) -> Result<(), Diagnostic> {
        let found = Path::new(src_id)
            .parent()
            .into_iter()
            .chain(self.include_dirs.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(&path.name))
            .find_map(|candidate| self.fs.read_file(&candidate).map(|contents| (candidate, contents)));

        let Some((resolved, contents)) = found else {
            return Err(Diagnostic::new(src_id, source, Error::new(vec![path.span.clone()], IncludeNotFound {
                path: path.name.clone(),
            })));
        };

        if self.include_stack.contains(&resolved) {
            return Err(Diagnostic::new(src_id, source, Error::new(vec![path.span.clone()], RecursiveInclude {
                path: resolved.display().to_string(),
            })));
        }

        debug!(path = %resolved.display(), "including file");
        self.run_source(&resolved.to_string_lossy(), &contents)
    }

    /// Returns the labels holding values of the same kind as `kind` whose names are similar to
    /// the given name, sorted.
    fn similar_labels(&self, name: &str, kind: &Binding) -> Vec<String> {
        let mut labels = self.bindings
            .iter()
            .filter(|(_, binding)| mem::discriminant(*binding) == mem::discriminant(kind))
            .filter(|(n, _)| levenshtein(n, name) < 2)
            .map(|(n, _)| n.clone())
            .collect::<Vec<_>>();
        labels.sort();
        labels
    }

    /// Looks up the expression a reference names.
    pub(crate) fn lookup_expression(&self, name: &Name) -> Result<&Expression, Error> {
        self.expression(&name.name).ok_or_else(|| {
            let kind = Binding::Expression(Expression::new());
            Error::new(vec![name.span.clone()], UndefinedExpression {
                name: name.name.clone(),
                suggestions: self.similar_labels(&name.name, &kind),
            })
        })
    }

    /// Looks up the rule a reference names.
    pub(crate) fn lookup_rule(&self, name: &Name) -> Result<&Replace, Error> {
        self.rule(&name.name).ok_or_else(|| {
            let kind = Binding::Rule(Replace::new());
            Error::new(vec![name.span.clone()], UndefinedRule {
                name: name.name.clone(),
                suggestions: self.similar_labels(&name.name, &kind),
            })
        })
    }

    /// Stores a value under the given label.
    ///
    /// A value of the same kind is overwritten; a value of the other kind is a conflict.
    pub(crate) fn bind(&mut self, label: &Label, binding: Binding) -> Result<(), Error> {
        if let Some(existing) = self.bindings.get(&label.name) {
            if mem::discriminant(existing) != mem::discriminant(&binding) {
                return Err(Error::new(vec![label.span.clone()], LabelConflict {
                    name: label.name.clone(),
                    existing: existing.describe(),
                }));
            }
        }

        debug!(label = %label.name, kind = binding.describe(), "binding label");
        self.bindings.insert(label.name.clone(), binding);
        Ok(())
    }
}
