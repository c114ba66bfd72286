use std::fmt;

use crate::machine::Cell;
use crate::token::Token;

/// Errors that can abort a Brainfuck run.
#[derive(Debug, thiserror::Error)]
pub enum BrainfuckError {
    /// A bracket scan walked off the program without finding its partner.
    #[error("Malformed program: unmatched bracket {kind} at instruction {ip}")]
    MalformedProgram { ip: usize, kind: UnmatchedBracketKind },

    /// The input source had nothing left to give to `,`.
    #[error("Input exhausted at instruction {ip}")]
    InputExhausted { ip: usize },

    /// The machine was asked for a tape it cannot build.
    #[error("Invalid configuration: cannot build a tape of {cells} cells")]
    InvalidConfiguration { cells: usize },

    /// A move left the tape while running with [`BoundsPolicy::Strict`](crate::BoundsPolicy::Strict).
    #[error("Pointer out of bounds at instruction {ip} (ptr={ptr}, op='{token}')")]
    PointerOutOfBounds { ip: usize, ptr: usize, token: Token },

    /// `.` hit a cell value the output sink could not render.
    #[error("Cannot output cell value {value} at instruction {ip}: not a Unicode scalar value")]
    InvalidOutput { ip: usize, value: Cell },

    /// An underlying I/O error occurred in the input source or output sink.
    #[error("I/O error at instruction {ip}: {source}")]
    Io { ip: usize, #[source] source: std::io::Error },

    /// Execution aborted due to cooperative cancellation (e.g., Ctrl+C)
    #[error("Execution aborted: cancelled")]
    Canceled,
}

impl BrainfuckError {
    /// Instruction index the error is attached to, if any.
    pub fn ip(&self) -> Option<usize> {
        match self {
            BrainfuckError::MalformedProgram { ip, .. }
            | BrainfuckError::InputExhausted { ip }
            | BrainfuckError::PointerOutOfBounds { ip, .. }
            | BrainfuckError::InvalidOutput { ip, .. }
            | BrainfuckError::Io { ip, .. } => Some(*ip),
            BrainfuckError::InvalidConfiguration { .. } | BrainfuckError::Canceled => None,
        }
    }
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// Failure reported by an [`InputSource`](crate::InputSource).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("input exhausted")]
    Exhausted,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure reported by an [`OutputSink`](crate::OutputSink).
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("{0} is not a Unicode scalar value")]
    InvalidCodePoint(Cell),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A strict-mode move tried to leave the tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pointer {ptr} cannot move past the end of a {len}-cell tape")]
pub struct BoundsError {
    pub ptr: usize,
    pub len: usize,
}
