mod error;

use clap::Parser;
use error::Error;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{
    fs,
    io::{self, IsTerminal, Read, Stdout},
    path::{Path, PathBuf},
    process::ExitCode,
};
use sym_script::{tokenizer::tokenize_complete, Diagnostic, Interpreter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Runs SymScript programs, or starts an interactive session if no program is given.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Script files to run, in order. Labels defined by one file are visible to the next.
    files: Vec<PathBuf>,

    /// Run the given source instead of reading files.
    #[arg(short = 'e', long = "eval", value_name = "SOURCE", conflicts_with = "files")]
    eval: Option<String>,

    /// Additional directories to search for included files.
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    include_dirs: Vec<PathBuf>,

    /// Print the tokens of each input instead of running it.
    #[arg(long)]
    tokens: bool,
}

/// Installs the log subscriber. Logs go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Prints the tokens of the given source, one per line.
fn print_tokens(src_id: &str, input: &str) -> Result<(), Error> {
    let tokens = tokenize_complete(input)
        .map_err(|err| Diagnostic::new(src_id, input, err))?;
    for token in tokens {
        println!("{}", token);
    }
    Ok(())
}

/// Reads a script from a file.
fn read_file(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|err| Error::Io {
        src_id: path.display().to_string(),
        err,
    })
}

/// Reads a script from stdin.
fn read_stdin() -> Result<String, Error> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|err| Error::Io { src_id: "stdin".to_string(), err })?;
    Ok(input)
}

/// Runs each input in turn, reporting every failure. Returns true if all of them succeeded.
fn run_inputs<I>(interp: &mut Interpreter<Stdout>, inputs: I, tokens: bool) -> bool
where
    I: IntoIterator<Item = (String, Result<String, Error>)>,
{
    let mut success = true;
    for (src_id, input) in inputs {
        debug!(src_id = %src_id, "running input");
        let result = input.and_then(|input| {
            if tokens {
                print_tokens(&src_id, &input)
            } else {
                interp.run_source(&src_id, &input).map_err(Error::from)
            }
        });

        if let Err(err) = result {
            err.report_to_stderr();
            success = false;
        }
    }
    success
}

/// Runs the interactive session. Each line is run as a complete program; definitions persist
/// from one line to the next, and errors are reported without ending the session.
fn repl(interp: &mut Interpreter<Stdout>, tokens: bool) -> Result<(), Error> {
    let mut rl = DefaultEditor::new()?;

    fn process_line(
        rl: &mut DefaultEditor,
        interp: &mut Interpreter<Stdout>,
        tokens: bool,
    ) -> Result<(), ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        run_inputs(interp, [("input".to_string(), Ok(input))], tokens);
        Ok(())
    }

    loop {
        match process_line(&mut rl, interp, tokens) {
            Ok(()) => (),
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => return Ok(()),
            Err(err) => return Err(err.into()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let mut interp = Interpreter::new(io::stdout());
    for dir in &cli.include_dirs {
        interp.add_include_dir(dir);
    }

    let success = if let Some(source) = cli.eval {
        // run the given source
        run_inputs(&mut interp, [("eval".to_string(), Ok(source))], cli.tokens)
    } else if !cli.files.is_empty() {
        // run source files
        let inputs = cli.files
            .iter()
            .map(|path| (path.display().to_string(), read_file(path)));
        run_inputs(&mut interp, inputs, cli.tokens)
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        run_inputs(&mut interp, [("stdin".to_string(), read_stdin())], cli.tokens)
    } else {
        // run the repl / interactive mode
        match repl(&mut interp, cli.tokens) {
            Ok(()) => true,
            Err(err) => {
                err.report_to_stderr();
                false
            },
        }
    };

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
