//! The control-flow interpreter.
//!
//! Walks a [`Program`] with an explicit instruction pointer, hands the six
//! plain instructions to the [`Machine`], and resolves `[`/`]` itself.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::{debug, trace};

use crate::error::{BrainfuckError, SinkError, SourceError, UnmatchedBracketKind};
use crate::io::{InputSource, OutputSink};
use crate::machine::Machine;
use crate::token::{Program, Token};

/// How the interpreter finds the partner of a bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BracketStrategy {
    /// Scan the program for the partner every time a jump is taken,
    /// counting nesting depth. Unbalanced brackets surface only when a scan
    /// runs off the program.
    #[default]
    Scan,
    /// Build a [`JumpTable`] once before running. Unbalanced programs are
    /// rejected before any instruction executes.
    JumpTable,
}

/// Precomputed bracket partners for one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    // partners[i] holds the matching index for '[' or ']' at index i.
    partners: Vec<Option<usize>>,
}

impl JumpTable {
    /// Match every bracket of `program` in one pass.
    pub fn build(program: &Program) -> Result<Self, BrainfuckError> {
        let mut partners = vec![None; program.len()];
        let mut stack: Vec<usize> = Vec::new();

        for (i, token) in program.iter().enumerate() {
            match token {
                Token::JumpIfZero => stack.push(i),
                Token::JumpIfNonZero => {
                    let Some(open) = stack.pop() else {
                        return Err(BrainfuckError::MalformedProgram {
                            ip: i,
                            kind: UnmatchedBracketKind::Close,
                        });
                    };
                    partners[open] = Some(i);
                    partners[i] = Some(open);
                }
                _ => {}
            }
        }

        if let Some(&open) = stack.last() {
            return Err(BrainfuckError::MalformedProgram {
                ip: open,
                kind: UnmatchedBracketKind::Open,
            });
        }

        Ok(Self { partners })
    }

    /// Partner of the bracket at `ip`, `None` for non-bracket positions.
    pub fn partner(&self, ip: usize) -> Option<usize> {
        self.partners.get(ip).copied().flatten()
    }
}

/// Runs programs against a single [`Machine`].
///
/// ```
/// use brainfrick::{Interpreter, IterSource, Machine, Program};
///
/// let machine = Machine::with_io(2, IterSource::new(Vec::new()), String::new()).unwrap();
/// let mut interpreter = Interpreter::new(machine);
/// interpreter.interpret(&Program::parse("++[>++<-]")).unwrap();
/// assert_eq!(interpreter.machine().cells(), &[0, 4]);
/// ```
pub struct Interpreter<I, O> {
    machine: Machine<I, O>,
    strategy: BracketStrategy,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl<I: InputSource, O: OutputSink> Interpreter<I, O> {
    pub fn new(machine: Machine<I, O>) -> Self {
        Self {
            machine,
            strategy: BracketStrategy::default(),
            cancel_flag: None,
        }
    }

    pub fn with_strategy(mut self, strategy: BracketStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Abort with [`BrainfuckError::Canceled`] once `flag` is set.
    ///
    /// The flag is checked before every instruction.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub fn strategy(&self) -> BracketStrategy {
        self.strategy
    }

    pub fn machine(&self) -> &Machine<I, O> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine<I, O> {
        &mut self.machine
    }

    pub fn into_machine(self) -> Machine<I, O> {
        self.machine
    }

    /// Execute `program` until the instruction pointer runs off its end.
    ///
    /// The machine is not reset first: tape and pointer carry over from
    /// any previous run.
    pub fn interpret(&mut self, program: &Program) -> Result<(), BrainfuckError> {
        debug!(tokens = program.len(), strategy = ?self.strategy, "starting run");

        let result = self.execute(program);
        match &result {
            Ok(steps) => debug!(steps, pointer = self.machine.pointer(), "run finished"),
            Err(err) => debug!(error = %err, "run aborted"),
        }
        result.map(|_| ())
    }

    fn execute(&mut self, program: &Program) -> Result<u64, BrainfuckError> {
        let table = match self.strategy {
            BracketStrategy::Scan => None,
            BracketStrategy::JumpTable => Some(JumpTable::build(program)?),
        };

        let mut ip = 0;
        let mut steps: u64 = 0;

        while let Some(token) = program.get(ip) {
            if let Some(flag) = &self.cancel_flag {
                if flag.load(Ordering::Relaxed) {
                    return Err(BrainfuckError::Canceled);
                }
            }

            trace!(
                step = steps,
                ip,
                token = %token,
                ptr = self.machine.pointer(),
                cell = self.machine.current_value(),
                "step"
            );

            ip = match token {
                Token::Right => {
                    self.machine
                        .move_right()
                        .map_err(|e| BrainfuckError::PointerOutOfBounds {
                            ip,
                            ptr: e.ptr,
                            token,
                        })?;
                    ip + 1
                }
                Token::Left => {
                    self.machine
                        .move_left()
                        .map_err(|e| BrainfuckError::PointerOutOfBounds {
                            ip,
                            ptr: e.ptr,
                            token,
                        })?;
                    ip + 1
                }
                Token::Inc => {
                    self.machine.increment();
                    ip + 1
                }
                Token::Dec => {
                    self.machine.decrement();
                    ip + 1
                }
                Token::Out => {
                    self.machine.output().map_err(|e| sink_error(ip, e))?;
                    ip + 1
                }
                Token::In => {
                    self.machine.input().map_err(|e| source_error(ip, e))?;
                    ip + 1
                }
                Token::JumpIfZero => {
                    if self.machine.current_value() == 0 {
                        let close = match &table {
                            Some(table) => partner(table, ip, UnmatchedBracketKind::Open)?,
                            None => scan_forward(program, ip)?,
                        };
                        trace!(from = ip, to = close + 1, "cell is 0; skip loop");
                        close + 1
                    } else {
                        ip + 1
                    }
                }
                Token::JumpIfNonZero => {
                    if self.machine.current_value() != 0 {
                        let open = match &table {
                            Some(table) => partner(table, ip, UnmatchedBracketKind::Close)?,
                            None => scan_backward(program, ip)?,
                        };
                        trace!(from = ip, to = open + 1, "cell is non-zero; repeat loop");
                        open + 1
                    } else {
                        ip + 1
                    }
                }
            };
            steps += 1;
        }

        Ok(steps)
    }
}

/// Find the `]` matching the `[` at `ip`.
fn scan_forward(program: &Program, ip: usize) -> Result<usize, BrainfuckError> {
    let mut depth = 1usize;
    for pos in ip + 1..program.len() {
        match program.get(pos) {
            Some(Token::JumpIfZero) => depth += 1,
            Some(Token::JumpIfNonZero) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos);
                }
            }
            _ => {}
        }
    }
    Err(BrainfuckError::MalformedProgram {
        ip,
        kind: UnmatchedBracketKind::Open,
    })
}

/// Find the `[` matching the `]` at `ip`.
fn scan_backward(program: &Program, ip: usize) -> Result<usize, BrainfuckError> {
    let mut depth = 1usize;
    for pos in (0..ip).rev() {
        match program.get(pos) {
            Some(Token::JumpIfNonZero) => depth += 1,
            Some(Token::JumpIfZero) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos);
                }
            }
            _ => {}
        }
    }
    Err(BrainfuckError::MalformedProgram {
        ip,
        kind: UnmatchedBracketKind::Close,
    })
}

fn partner(
    table: &JumpTable,
    ip: usize,
    kind: UnmatchedBracketKind,
) -> Result<usize, BrainfuckError> {
    table
        .partner(ip)
        .ok_or(BrainfuckError::MalformedProgram { ip, kind })
}

fn source_error(ip: usize, err: SourceError) -> BrainfuckError {
    match err {
        SourceError::Exhausted => BrainfuckError::InputExhausted { ip },
        SourceError::Io(source) => BrainfuckError::Io { ip, source },
    }
}

fn sink_error(ip: usize, err: SinkError) -> BrainfuckError {
    match err {
        SinkError::InvalidCodePoint(value) => BrainfuckError::InvalidOutput { ip, value },
        SinkError::Io(source) => BrainfuckError::Io { ip, source },
    }
}
