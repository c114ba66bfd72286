use std::io::{self, Write};

use brainfrick::BrainfuckError;

/// Pretty-print a BrainfuckError with caret positioning.
/// `code` is the filtered program text, so instruction indices line up with characters.
pub fn print_run_error(program: &str, code: &str, err: &BrainfuckError) {
    let msg = match err {
        BrainfuckError::MalformedProgram { kind, .. } => {
            format!("{program}: Malformed program: unmatched bracket {kind}")
        }
        BrainfuckError::InputExhausted { .. } => {
            format!("{program}: Runtime error: input exhausted")
        }
        BrainfuckError::PointerOutOfBounds { ptr, token, .. } => {
            format!("{program}: Runtime error: pointer out of bounds (ptr={ptr}, op={token})")
        }
        BrainfuckError::InvalidOutput { value, .. } => {
            format!("{program}: Runtime error: cannot output cell value {value}")
        }
        BrainfuckError::Io { source, .. } => format!("{program}: I/O error: {source}"),
        BrainfuckError::InvalidConfiguration { .. } | BrainfuckError::Canceled => {
            eprintln!("{program}: {err}");
            let _ = io::stderr().flush();
            return;
        }
    };

    match err.ip() {
        Some(ip) => print_error_with_context(&msg, code, ip),
        None => {
            eprintln!("{msg}");
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    eprintln!("  {}", &code[start_byte..end_byte]);

    let caret_offset_chars = pos.saturating_sub(start_char);
    eprintln!("  {}^", " ".repeat(caret_offset_chars));
    let _ = io::stderr().flush();
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(s.len())
}
