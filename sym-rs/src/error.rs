use rustyline::error::ReadlineError;
use std::io;
use sym_script::Diagnostic;

/// Utility enum to package errors that can occur while running scripts.
#[derive(Debug)]
pub enum Error {
    /// A statement of a script failed.
    Script(Diagnostic),

    /// A script could not be read.
    Io {
        /// Where the script was read from.
        src_id: String,
        err: io::Error,
    },

    /// The line editor failed.
    Readline(ReadlineError),
}

impl Error {
    /// Report this error to stderr.
    ///
    /// Script errors are rendered with `ariadne`, pointing into the script's source.
    pub fn report_to_stderr(&self) {
        match self {
            Self::Script(diagnostic) => {
                if diagnostic.report_to_stderr().is_err() {
                    eprintln!("{}", diagnostic);
                }
            },
            Self::Io { src_id, err } => eprintln!("error: cannot read `{}`: {}", src_id, err),
            Self::Readline(err) => eprintln!("error: {}", err),
        }
    }
}

impl From<Diagnostic> for Error {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::Script(diagnostic)
    }
}

impl From<ReadlineError> for Error {
    fn from(err: ReadlineError) -> Self {
        Self::Readline(err)
    }
}
