//! Tokens produced by the lexer.

use strum_macros::Display;

/// The eight kinds of tokens the lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TokenKind {
    /// `_begin`
    FunctionStart,
    /// any other `_`-marker, usually `_end`
    FunctionEnd,
    /// the name following a marker. Builtin-style names keep their `#`
    FunctionName,
    Instruction,
    /// a decimal numeral, kept as text until emission
    Number,
    /// `#name`, the text holds the bare name without the sigil
    BuiltinRef,
    Semicolon,
    /// the sentinel at the end of every token stream
    EndOfInput,
}

/// A single token. `offset` is the byte offset in the source at which the
/// token starts, for every kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// true for the tokens that may follow a mnemonic
    pub fn is_operand(&self) -> bool {
        matches!(self.kind, TokenKind::Number | TokenKind::BuiltinRef)
    }
}
