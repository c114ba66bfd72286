//! Pluggable I/O for `,` and `.`.
//!
//! The [`Machine`](crate::Machine) only talks to an [`InputSource`] and an
//! [`OutputSink`]; where the values come from or go to is up to the backend.
//! Closures work as backends too:
//!
//! ```
//! use brainfrick::{Interpreter, Machine, Program, SourceError};
//!
//! let input = || -> Result<i64, SourceError> { Ok(7) };
//! let machine = Machine::with_io(4, input, String::new()).unwrap();
//! let mut interpreter = Interpreter::new(machine);
//! interpreter.interpret(&Program::parse(",++++++++++++++++++++++++++.")).unwrap();
//! assert_eq!(interpreter.machine().current_value(), 33);
//! assert_eq!(interpreter.machine().sink(), "!");
//! ```

use std::io::{self, Read, Write};

use crate::error::{SinkError, SourceError};
use crate::machine::Cell;

/// Produces the value stored by `,`.
pub trait InputSource {
    fn next_value(&mut self) -> Result<Cell, SourceError>;
}

/// Consumes the value emitted by `.`.
pub trait OutputSink {
    fn emit(&mut self, value: Cell) -> Result<(), SinkError>;
}

impl<F> InputSource for F
where
    F: FnMut() -> Result<Cell, SourceError>,
{
    fn next_value(&mut self) -> Result<Cell, SourceError> {
        self()
    }
}

impl<F> OutputSink for F
where
    F: FnMut(Cell) -> Result<(), SinkError>,
{
    fn emit(&mut self, value: Cell) -> Result<(), SinkError> {
        self(value)
    }
}

/// Collects emitted values as characters.
impl OutputSink for String {
    fn emit(&mut self, value: Cell) -> Result<(), SinkError> {
        self.push(to_char(value)?);
        Ok(())
    }
}

/// Collects emitted values untouched.
impl OutputSink for Vec<Cell> {
    fn emit(&mut self, value: Cell) -> Result<(), SinkError> {
        self.push(value);
        Ok(())
    }
}

/// Map a cell value to the character with that code point.
pub fn to_char(value: Cell) -> Result<char, SinkError> {
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .ok_or(SinkError::InvalidCodePoint(value))
}

/// Reads one UTF-8 encoded character per `,` and yields its code point.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(SourceError::Io(e)),
            }
        }
    }
}

impl ReaderSource<io::Stdin> {
    pub fn stdin() -> Self {
        Self::new(io::stdin())
    }
}

impl<R: Read> InputSource for ReaderSource<R> {
    fn next_value(&mut self) -> Result<Cell, SourceError> {
        let Some(lead) = self.read_byte()? else {
            return Err(SourceError::Exhausted);
        };

        let width = match lead {
            0x00..=0x7f => 1,
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Err(invalid_utf8()),
        };

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            // A character cut off by end of input is malformed, not exhausted
            *slot = self.read_byte()?.ok_or_else(invalid_utf8)?;
        }

        let ch = std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(invalid_utf8)?;
        Ok(Cell::from(u32::from(ch)))
    }
}

fn invalid_utf8() -> SourceError {
    SourceError::Io(io::Error::new(io::ErrorKind::InvalidData, "input is not valid UTF-8"))
}

/// Feeds values from any iterator; exhausted once the iterator ends.
pub struct IterSource<I> {
    values: I,
}

impl<I: Iterator<Item = Cell>> IterSource<I> {
    pub fn new(values: impl IntoIterator<IntoIter = I>) -> Self {
        Self { values: values.into_iter() }
    }
}

/// Characters of `text`, one code point per `,`.
impl IterSource<std::vec::IntoIter<Cell>> {
    pub fn from_text(text: &str) -> Self {
        let values: Vec<Cell> = text.chars().map(|c| Cell::from(u32::from(c))).collect();
        Self::new(values)
    }
}

impl<I: Iterator<Item = Cell>> InputSource for IterSource<I> {
    fn next_value(&mut self) -> Result<Cell, SourceError> {
        self.values.next().ok_or(SourceError::Exhausted)
    }
}

/// Writes each emitted value as a UTF-8 character, flushing immediately.
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn emit(&mut self, value: Cell) -> Result<(), SinkError> {
        let ch = to_char(value)?;
        let mut utf8 = [0u8; 4];
        self.writer.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reader_source_decodes_multibyte_characters() {
        let mut source = ReaderSource::new(Cursor::new("aé→".as_bytes().to_vec()));
        assert_eq!(source.next_value().unwrap(), 'a' as Cell);
        assert_eq!(source.next_value().unwrap(), 'é' as Cell);
        assert_eq!(source.next_value().unwrap(), '→' as Cell);
        assert!(matches!(source.next_value(), Err(SourceError::Exhausted)));
    }

    #[test]
    fn reader_source_rejects_truncated_utf8() {
        let mut source = ReaderSource::new(Cursor::new(vec![0xe2, 0x86]));
        match source.next_value() {
            Err(SourceError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            other => panic!("expected invalid data, got {other:?}"),
        }
    }

    #[test]
    fn iter_source_runs_dry() {
        let mut source = IterSource::from_text("hi");
        assert_eq!(source.next_value().unwrap(), 'h' as Cell);
        assert_eq!(source.next_value().unwrap(), 'i' as Cell);
        assert!(matches!(source.next_value(), Err(SourceError::Exhausted)));
    }

    #[test]
    fn writer_sink_writes_utf8() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit('H' as Cell).unwrap();
        sink.emit('ü' as Cell).unwrap();
        assert_eq!(sink.into_inner(), "Hü".as_bytes());
    }

    #[test]
    fn sinks_reject_values_outside_unicode() {
        let mut text = String::new();
        assert!(matches!(text.emit(-1), Err(SinkError::InvalidCodePoint(-1))));
        assert!(matches!(text.emit(0xD800), Err(SinkError::InvalidCodePoint(_))));
        assert!(text.is_empty());

        // Raw collection does not care.
        let mut raw: Vec<Cell> = Vec::new();
        raw.emit(-1).unwrap();
        assert_eq!(raw, vec![-1]);
    }
}
