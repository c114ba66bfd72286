//! A tiny Brainfuck tape machine and interpreter.
//!
//! The crate is split the way a run flows:
//! - [`tokenize`] / [`Program::parse`] keep only the eight instructions
//!   `><+-.,[]`; everything else is a comment.
//! - [`Machine`] owns a fixed tape of integer cells, a pointer, and the
//!   injected [`InputSource`] / [`OutputSink`] used by `,` and `.`.
//! - [`Interpreter`] walks the program and resolves loops.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0, 256 cells unless configured otherwise.
//! - Moving past either end of the tape is ignored, or refused when the
//!   machine runs with [`BoundsPolicy::Strict`].
//! - Cells are 64-bit signed integers; they do not wrap at 255.
//! - Loop partners are found by scanning with a nesting counter; a
//!   precomputed [`JumpTable`] is available and behaves identically.
//! - Unbalanced brackets are reported as [`BrainfuckError::MalformedProgram`].
//!
//! Quick start:
//!
//! ```
//! use brainfrick::{Interpreter, IterSource, Machine, Program};
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
//! let machine = Machine::with_io(8, IterSource::new(Vec::new()), String::new()).unwrap();
//! let mut bf = Interpreter::new(machine);
//! bf.interpret(&Program::parse(code)).expect("program should run");
//! assert_eq!(bf.machine().sink(), "Hello World!\n");
//! ```

pub mod error;
pub mod interpreter;
pub mod io;
pub mod machine;
pub mod token;

pub use error::{BoundsError, BrainfuckError, SinkError, SourceError, UnmatchedBracketKind};
pub use interpreter::{BracketStrategy, Interpreter, JumpTable};
pub use io::{InputSource, IterSource, OutputSink, ReaderSource, WriterSink};
pub use machine::{BoundsPolicy, Cell, DEFAULT_CELLS, Machine, StdMachine};
pub use token::{Program, Token, tokenize};
