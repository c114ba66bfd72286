//! The tape machine: a fixed row of integer cells and one pointer into it.

use std::io;

use crate::error::{BoundsError, BrainfuckError, SinkError, SourceError};
use crate::io::{InputSource, OutputSink, ReaderSource, WriterSink};

/// Value held by one tape cell.
///
/// Cells are signed 64-bit integers with no 8-bit wraparound: `-` on a zero
/// cell gives `-1`, and 256 increments give `256`. Arithmetic wraps only at
/// the 64-bit boundary so the machine never panics.
pub type Cell = i64;

/// Tape length used when none is given.
pub const DEFAULT_CELLS: usize = 256;

/// What happens when the pointer is pushed past either end of the tape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// The move is silently ignored.
    #[default]
    Saturate,
    /// The move is refused with a [`BoundsError`].
    Strict,
}

/// A machine wired to stdin and stdout.
pub type StdMachine = Machine<ReaderSource<io::Stdin>, WriterSink<io::Stdout>>;

/// A Brainfuck tape machine.
///
/// The machine maintains:
/// - a tape of zero-initialised cells whose length is fixed at construction,
/// - a data pointer that always stays on the tape,
/// - the input source used by `,` and the output sink used by `.`.
pub struct Machine<I, O> {
    cells: Vec<Cell>,
    pointer: usize,
    bounds: BoundsPolicy,
    input: I,
    output: O,
}

impl StdMachine {
    /// Create a machine with `cells` cells reading stdin and writing stdout.
    pub fn new(cells: usize) -> Result<Self, BrainfuckError> {
        Machine::with_io(cells, ReaderSource::stdin(), WriterSink::stdout())
    }
}

impl Default for StdMachine {
    fn default() -> Self {
        Self {
            cells: vec![0; DEFAULT_CELLS],
            pointer: 0,
            bounds: BoundsPolicy::default(),
            input: ReaderSource::stdin(),
            output: WriterSink::stdout(),
        }
    }
}

impl<I: InputSource, O: OutputSink> Machine<I, O> {
    /// Create a machine with `cells` cells and the given I/O backends.
    ///
    /// Fails with [`BrainfuckError::InvalidConfiguration`] when `cells` is 0
    /// or the tape cannot be allocated.
    pub fn with_io(cells: usize, input: I, output: O) -> Result<Self, BrainfuckError> {
        if cells == 0 {
            return Err(BrainfuckError::InvalidConfiguration { cells });
        }
        let mut tape = Vec::new();
        tape.try_reserve_exact(cells)
            .map_err(|_| BrainfuckError::InvalidConfiguration { cells })?;
        tape.resize(cells, 0);
        Ok(Self {
            cells: tape,
            pointer: 0,
            bounds: BoundsPolicy::default(),
            input,
            output,
        })
    }

    /// Switch the boundary policy.
    pub fn with_bounds(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn move_right(&mut self) -> Result<(), BoundsError> {
        if self.pointer < self.cells.len() - 1 {
            self.pointer += 1;
            Ok(())
        } else {
            self.refuse_move()
        }
    }

    pub fn move_left(&mut self) -> Result<(), BoundsError> {
        if self.pointer > 0 {
            self.pointer -= 1;
            Ok(())
        } else {
            self.refuse_move()
        }
    }

    fn refuse_move(&self) -> Result<(), BoundsError> {
        match self.bounds {
            BoundsPolicy::Saturate => Ok(()),
            BoundsPolicy::Strict => Err(BoundsError {
                ptr: self.pointer,
                len: self.cells.len(),
            }),
        }
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1);
    }

    pub fn current_value(&self) -> Cell {
        self.cells[self.pointer]
    }

    /// Hand the current cell to the output sink.
    pub fn output(&mut self) -> Result<(), SinkError> {
        self.output.emit(self.cells[self.pointer])
    }

    /// Overwrite the current cell with the next value from the input source.
    ///
    /// On failure the cell keeps its old value.
    pub fn input(&mut self) -> Result<(), SourceError> {
        self.cells[self.pointer] = self.input.next_value()?;
        Ok(())
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a machine has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn bounds(&self) -> BoundsPolicy {
        self.bounds
    }

    /// Zero the tape and rewind the pointer, keeping the I/O backends.
    pub fn reset(&mut self) {
        self.cells.fill(0);
        self.pointer = 0;
    }

    pub fn source(&self) -> &I {
        &self.input
    }

    pub fn sink(&self) -> &O {
        &self.output
    }

    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Take the I/O backends back out of the machine.
    pub fn into_io(self) -> (I, O) {
        (self.input, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::IterSource;

    fn machine(cells: usize) -> Machine<IterSource<std::vec::IntoIter<Cell>>, Vec<Cell>> {
        Machine::with_io(cells, IterSource::new(vec![65, 66]), Vec::new()).unwrap()
    }

    #[test]
    fn zero_cells_is_invalid() {
        let result = Machine::with_io(0, IterSource::new(Vec::new()), Vec::<Cell>::new());
        assert!(matches!(result, Err(BrainfuckError::InvalidConfiguration { cells: 0 })));
    }

    #[test]
    fn unallocatable_tape_is_invalid() {
        let result = Machine::with_io(usize::MAX, IterSource::new(Vec::new()), Vec::<Cell>::new());
        assert!(matches!(
            result,
            Err(BrainfuckError::InvalidConfiguration { cells: usize::MAX })
        ));
    }

    #[test]
    fn default_machine_has_default_length() {
        let m = StdMachine::default();
        assert_eq!(m.len(), DEFAULT_CELLS);
        assert_eq!(m.pointer(), 0);
        assert!(m.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn pointer_saturates_at_both_ends() {
        let mut m = machine(3);
        m.move_left().unwrap();
        assert_eq!(m.pointer(), 0);
        for _ in 0..10 {
            m.move_right().unwrap();
        }
        assert_eq!(m.pointer(), 2);
        for _ in 0..10 {
            m.move_left().unwrap();
        }
        assert_eq!(m.pointer(), 0);
    }

    #[test]
    fn pointer_stays_on_tape_for_any_move_sequence() {
        // Deterministic pseudo-random walk over a few tape sizes.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for len in [1, 2, 5, 17] {
            let mut m = machine(len);
            for _ in 0..500 {
                seed ^= seed << 13;
                seed ^= seed >> 7;
                seed ^= seed << 17;
                if seed & 1 == 0 {
                    m.move_right().unwrap();
                } else {
                    m.move_left().unwrap();
                }
                assert!(m.pointer() < len);
            }
        }
    }

    #[test]
    fn strict_bounds_refuse_moves_off_the_tape() {
        let mut m = machine(2).with_bounds(BoundsPolicy::Strict);
        assert_eq!(m.move_left(), Err(BoundsError { ptr: 0, len: 2 }));
        m.move_right().unwrap();
        assert_eq!(m.move_right(), Err(BoundsError { ptr: 1, len: 2 }));
        assert_eq!(m.pointer(), 1);
    }

    #[test]
    fn cells_do_not_wrap_at_a_byte() {
        let mut m = machine(1);
        m.decrement();
        assert_eq!(m.current_value(), -1);
        for _ in 0..257 {
            m.increment();
        }
        assert_eq!(m.current_value(), 256);
    }

    #[test]
    fn input_and_output_go_through_the_backends() {
        let mut m = machine(2);
        m.input().unwrap();
        m.move_right().unwrap();
        m.input().unwrap();
        m.output().unwrap();
        m.move_left().unwrap();
        m.output().unwrap();
        assert_eq!(m.cells(), &[65, 66]);
        assert_eq!(m.sink(), &vec![66, 65]);

        m.increment();
        assert!(matches!(m.input(), Err(SourceError::Exhausted)));
        assert_eq!(m.current_value(), 66, "failed input leaves the cell alone");
    }

    #[test]
    fn reset_clears_tape_and_pointer() {
        let mut m = machine(4);
        m.move_right().unwrap();
        m.increment();
        m.reset();
        assert_eq!(m.pointer(), 0);
        assert!(m.cells().iter().all(|&c| c == 0));
    }
}
