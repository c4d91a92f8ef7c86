//! Turns source text into tokens.
//!
//! The lexer never fails: characters that don't start a token are skipped,
//! which is also how comments work. Every token records the byte offset at
//! which it starts, and the returned vec always ends with an `EndOfInput`
//! token located at `src.len()`.

use crate::core::{Token, TokenKind};

use std::iter::Peekable;
use std::str::CharIndices;

/// The only marker spelling that opens a function. Every other `_`-word closes one.
pub const FUNCTION_START_MARKER: &str = "_begin";

/// Prefix of builtin references, as in `call #iprint ;`
pub const BUILTIN_SIGIL: char = '#';

pub fn tokenize(src: &str) -> Vec<Token> {
    let mut cursor = Cursor::new(src);
    let mut tokens = vec![];

    use TokenKind::*;
    while let Some((offset, c)) = cursor.peek() {
        match c {
            '_' => {
                let marker = cursor.eat_while(|c| !c.is_whitespace());
                let kind = if marker == FUNCTION_START_MARKER {
                    FunctionStart
                } else {
                    FunctionEnd
                };
                tokens.push(Token::new(kind, marker, offset));
                cursor.eat_while(char::is_whitespace);
                if let Some(name) = cursor.function_name() {
                    tokens.push(name);
                }
            }
            c if c.is_alphabetic() => {
                let ident = cursor.identifier();
                tokens.push(Token::new(Instruction, ident, offset));
            }
            BUILTIN_SIGIL => {
                cursor.bump();
                let name = cursor.identifier();
                tokens.push(Token::new(BuiltinRef, name, offset));
            }
            c if c.is_ascii_digit() => {
                let digits = cursor.eat_while(|c| c.is_ascii_digit());
                tokens.push(Token::new(Number, digits, offset));
            }
            ';' => {
                cursor.bump();
                tokens.push(Token::new(Semicolon, "", offset));
            }
            _ => cursor.bump(),
        }
    }

    tokens.push(Token::new(EndOfInput, "", src.len()));
    tokens
}

/// `_` is left out, it always starts a function marker
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric()
}

/// A position in the source with one character of lookahead
struct Cursor<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) {
        self.chars.next();
    }

    /// byte offset of the next character
    fn offset(&mut self) -> usize {
        self.peek().map_or(self.src.len(), |(i, _)| i)
    }

    /// consumes characters as long as `pred` holds and returns them as one slice
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.offset();
        while self.chars.next_if(|&(_, c)| pred(c)).is_some() {}
        &self.src[start..self.offset()]
    }

    /// an alphabetic character followed by alphanumerics.
    /// Returns an empty slice if the next character can't start an identifier.
    fn identifier(&mut self) -> &'a str {
        match self.peek() {
            Some((_, c)) if c.is_alphabetic() => self.eat_while(is_ident_continue),
            _ => "",
        }
    }

    /// the name after a function marker, either `name` or `#name`
    fn function_name(&mut self) -> Option<Token> {
        let (offset, c) = self.peek()?;
        if c == BUILTIN_SIGIL {
            self.bump();
            let name = format!("{}{}", BUILTIN_SIGIL, self.identifier());
            Some(Token::new(TokenKind::FunctionName, name, offset))
        } else if c.is_alphabetic() {
            let name = self.identifier();
            Some(Token::new(TokenKind::FunctionName, name, offset))
        } else {
            None
        }
    }
}
