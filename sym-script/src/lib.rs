//! SymScript, a small scripting language for the `sym-algebra` engine.
//!
//! A script is a sequence of statements that build expressions, label them, and rewrite them
//! with replacement rules:
//!
//! ```text
//! [r] define a -> b + 1; end
//! [e] : a*x + a*y;
//! [f] apply $r to $e;
//! printf $f;              # b * x + x + b * y + y
//! ```
//!
//! Source is turned into tokens by the [`tokenizer`], into statements by the [`parser`], and
//! run by the [`Interpreter`].
//!
//! ```
//! use sym_script::{Interpreter, MemoryFileSystem};
//!
//! let mut interp = Interpreter::with_file_system(Vec::new(), MemoryFileSystem::new());
//! interp.run_source("example", "[e] : (x + 1)*(x - 1); printf $e;").unwrap();
//! assert_eq!(interp.into_output(), b"x^2 - 1\n");
//! ```

pub mod error;
pub mod interpreter;
pub mod parser;
pub mod tokenizer;

pub use interpreter::{Binding, Diagnostic, FileSystem, Interpreter, MemoryFileSystem, OsFileSystem};
pub use parser::{Parse, Parser};
