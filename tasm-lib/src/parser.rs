//! Recursive descent parser with one token of lookahead.
//!
//! ```text
//! Program      := Item*
//! Item         := FunctionDecl | <any other token, skipped>
//! FunctionDecl := FunctionStart FunctionName Instruction* FunctionEnd
//! Instruction  := INSTRUCTION Operand* Semicolon
//! Operand      := NUMBER | BUILTIN_REF
//! ```
//!
//! Tokens outside of a function are skipped, but inside of one the grammar is
//! strict and the first error aborts parsing.

use thiserror::Error;

use crate::core::*;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `position` is the offset of the last token that was consumed
    #[error("unexpected end of input after offset {position}")]
    UnexpectedEndOfInput { position: usize },

    #[error("expected {expected}, found {found} `{text}` at offset {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
        text: String,
        position: usize,
    },
}

impl ParseError {
    pub fn position(&self) -> usize {
        match self {
            Self::UnexpectedEndOfInput { position } => *position,
            Self::UnexpectedToken { position, .. } => *position,
        }
    }
}

/// Parses all function declarations. The token slice doesn't need to end with
/// an `EndOfInput` token, running off its end is treated the same way.
pub fn parse(tokens: &[Token]) -> ParseResult<Program> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        last_offset: 0,
    };
    let mut program = vec![];
    while let Some(token) = parser.peek() {
        if token.kind == TokenKind::FunctionStart {
            program.push(parser.function_decl()?);
        } else {
            parser.advance()?;
        }
    }
    Ok(program)
}

struct Parser<'t> {
    tokens: &'t [Token],
    /// index of the next token
    pos: usize,
    /// offset of the last consumed token, reported when the input ends early
    last_offset: usize,
}

impl<'t> Parser<'t> {
    /// the next token, or None at the end of the stream
    fn peek(&self) -> Option<&'t Token> {
        self.tokens
            .get(self.pos)
            .filter(|t| t.kind != TokenKind::EndOfInput)
    }

    fn advance(&mut self) -> ParseResult<&'t Token> {
        let token = self.peek().ok_or(ParseError::UnexpectedEndOfInput {
            position: self.last_offset,
        })?;
        self.pos += 1;
        self.last_offset = token.offset;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> ParseResult<&'t Token> {
        let token = self.advance()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(token, expected))
        }
    }

    fn function_decl(&mut self) -> ParseResult<FunctionDecl> {
        self.expect(TokenKind::FunctionStart, "`_begin`")?;
        let name = self.expect(TokenKind::FunctionName, "a function name")?.clone();
        let mut instructions = vec![];
        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::FunctionEnd => break,
                TokenKind::Instruction => instructions.push(self.instruction(token)?),
                _ => return Err(unexpected(token, "an instruction or `_end`")),
            }
        }
        Ok(FunctionDecl { name, instructions })
    }

    /// parses the rest of an instruction whose mnemonic was already consumed
    fn instruction(&mut self, mnemonic: &Token) -> ParseResult<InstructionNode> {
        let mut operands = vec![];
        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::Semicolon => break,
                _ if token.is_operand() => operands.push(token.clone()),
                _ => return Err(unexpected(token, "an operand or `;`")),
            }
        }
        Ok(InstructionNode {
            mnemonic: mnemonic.clone(),
            operands,
        })
    }
}

fn unexpected(token: &Token, expected: &'static str) -> ParseError {
    ParseError::UnexpectedToken {
        expected,
        found: token.kind,
        text: token.text.clone(),
        position: token.offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_src(src: &str) -> ParseResult<Program> {
        parse(&tokenize(src))
    }

    #[test]
    fn test_single_function() {
        let program = parse_src("_begin main push 1 ; call #iprint ; return ; _end").unwrap();
        assert_eq!(program.len(), 1);
        let f = &program[0];
        assert_eq!(f.name(), "main");
        let mnemonics: Vec<_> = f.instructions.iter().map(|i| i.mnemonic.text.as_str()).collect();
        assert_eq!(mnemonics, vec!["push", "call", "return"]);
        assert_eq!(f.instructions[0].operands[0].text, "1");
        assert_eq!(f.instructions[1].operands[0].kind, TokenKind::BuiltinRef);
        assert!(f.instructions[2].operands.is_empty());
    }

    #[test]
    fn test_several_operands() {
        let program = parse_src("_begin f store 1 2 #alloc 3 ; _end").unwrap();
        let operands: Vec<_> = program[0].instructions[0]
            .operands
            .iter()
            .map(|t| (t.kind, t.text.as_str()))
            .collect();
        assert_eq!(
            operands,
            vec![
                (TokenKind::Number, "1"),
                (TokenKind::Number, "2"),
                (TokenKind::BuiltinRef, "alloc"),
                (TokenKind::Number, "3"),
            ]
        );
    }

    #[test]
    fn test_functions_keep_source_order() {
        let program = parse_src("_begin b pop ; _end _begin a _end _begin b add ; _end").unwrap();
        let names: Vec<_> = program.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
        assert!(program[1].instructions.is_empty());
    }

    #[test]
    fn test_top_level_tokens_are_skipped() {
        let program = parse_src("push 3 ; _end x ; _begin f pop ; _end 12 #nl").unwrap();
        assert_eq!(program.len(), 1);
        assert_eq!(program[0].name(), "f");
    }

    #[test]
    fn test_missing_end() {
        let src = "_begin f push 1 ; ";
        assert_eq!(
            parse_src(src),
            Err(ParseError::UnexpectedEndOfInput { position: 16 })
        );
    }

    #[test]
    fn test_missing_semicolon() {
        assert_eq!(
            parse_src("_begin f push 1"),
            Err(ParseError::UnexpectedEndOfInput { position: 14 })
        );
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(
            parse_src("_begin"),
            Err(ParseError::UnexpectedEndOfInput { position: 0 })
        );
        let err = parse_src("_begin ; _end").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                found: TokenKind::Semicolon,
                position: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_instruction_is_no_operand() {
        let err = parse_src("_begin f push add ; _end").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "an operand or `;`",
                found: TokenKind::Instruction,
                text: "add".into(),
                position: 14,
            }
        );
    }

    #[test]
    fn test_nested_begin() {
        let err = parse_src("_begin f _begin g _end _end").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                found: TokenKind::FunctionStart,
                position: 9,
                ..
            }
        ));
    }

    #[test]
    fn test_without_sentinel() {
        let mut tokens = tokenize("_begin f pop ;");
        tokens.pop();
        assert_eq!(
            parse(&tokens),
            Err(ParseError::UnexpectedEndOfInput { position: 13 })
        );
        assert_eq!(parse(&[]), Ok(vec![]));
    }
}
