//! Turning source text into a [`Program`].
//!
//! Brainfuck has no syntax worth parsing: every character outside `><+-.,[]`
//! is a comment and is dropped without complaint.

use std::fmt;

/// One Brainfuck instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `>`
    Right,
    /// `<`
    Left,
    /// `+`
    Inc,
    /// `-`
    Dec,
    /// `.`
    Out,
    /// `,`
    In,
    /// `[`
    JumpIfZero,
    /// `]`
    JumpIfNonZero,
}

impl Token {
    pub fn from_char(c: char) -> Option<Token> {
        Some(match c {
            '>' => Token::Right,
            '<' => Token::Left,
            '+' => Token::Inc,
            '-' => Token::Dec,
            '.' => Token::Out,
            ',' => Token::In,
            '[' => Token::JumpIfZero,
            ']' => Token::JumpIfNonZero,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Token::Right => '>',
            Token::Left => '<',
            Token::Inc => '+',
            Token::Dec => '-',
            Token::Out => '.',
            Token::In => ',',
            Token::JumpIfZero => '[',
            Token::JumpIfNonZero => ']',
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Lazily yield the instructions found in `source`, in order.
///
/// Never fails. Text without any instruction characters yields nothing.
pub fn tokenize(source: &str) -> impl Iterator<Item = Token> + '_ {
    source.chars().filter_map(Token::from_char)
}

/// An immutable, ordered sequence of tokens ready to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    tokens: Vec<Token>,
}

impl Program {
    /// Tokenize `source` into a program.
    pub fn parse(source: &str) -> Self {
        tokenize(source).collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, ip: usize) -> Option<Token> {
        self.tokens.get(ip).copied()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = Token> + '_ {
        self.tokens.iter().copied()
    }
}

impl FromIterator<Token> for Program {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        Self { tokens: iter.into_iter().collect() }
    }
}

impl From<Vec<Token>> for Program {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

/// Renders the canonical instruction string, comments stripped.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
