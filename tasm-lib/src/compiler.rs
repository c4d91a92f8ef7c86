use thiserror::Error;

use crate::bytecode::CompiledFunction;
use crate::core::*;

/// Implemented by the AST nodes that turn into opcodes
pub trait Compilable {
    type Output;
    fn compile(&self) -> CompilationResult<Self::Output>;
}

pub type CompilationResult<T> = Result<T, CodeGenError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeGenError {
    #[error("unknown mnemonic `{name}` at offset {position}")]
    UnknownMnemonic { name: String, position: usize },

    #[error("unknown builtin `{name}` at offset {position}")]
    UnknownBuiltin { name: String, position: usize },

    #[error("number `{literal}` at offset {position} does not fit into 64 bits")]
    NumberOutOfRange { literal: String, position: usize },

    /// the parser only creates Number and BuiltinRef operands, so this is only
    /// reachable with a hand built AST
    #[error("a {kind} token can't be used as an operand (offset {position})")]
    InvalidOperand { kind: TokenKind, position: usize },
}

impl CodeGenError {
    pub fn position(&self) -> usize {
        match self {
            Self::UnknownMnemonic { position, .. }
            | Self::UnknownBuiltin { position, .. }
            | Self::NumberOutOfRange { position, .. }
            | Self::InvalidOperand { position, .. } => *position,
        }
    }
}

macro_rules! impl_compilable {
    ($t:ty => $out:ty: $self:ident => $code:block) => {
        impl Compilable for $t {
            type Output = $out;
            fn compile(&$self) -> CompilationResult<$out> {
                $code
            }
        }
    };
}

impl_compilable! { Token => i64: self => {
    use TokenKind::*;
    match self.kind {
        Number => self.text.parse().map_err(|_| CodeGenError::NumberOutOfRange {
            literal: self.text.clone(),
            position: self.offset,
        }),
        BuiltinRef => Builtin::from_name(&self.text)
            .map(Builtin::opcode)
            .ok_or_else(|| CodeGenError::UnknownBuiltin {
                name: self.text.clone(),
                position: self.offset,
            }),
        kind => Err(CodeGenError::InvalidOperand { kind, position: self.offset }),
    }
}}

impl_compilable! { InstructionNode => Vec<i64>: self => {
    let InstructionNode { mnemonic, operands } = self;
    let opcode = Mnemonic::from_name(&mnemonic.text).ok_or_else(|| CodeGenError::UnknownMnemonic {
        name: mnemonic.text.clone(),
        position: mnemonic.offset,
    })?;

    let mut code = Vec::with_capacity(operands.len() + 1);
    code.push(opcode.opcode());
    for operand in operands {
        code.push(operand.compile()?);
    }
    Ok(code)
}}

impl_compilable! { FunctionDecl => CompiledFunction: self => {
    let mut opcodes = vec![];
    for instruction in &self.instructions {
        opcodes.append(&mut instruction.compile()?);
    }
    tracing::trace!(function = %self.name(), opcodes = opcodes.len(), "emitted function");
    Ok(CompiledFunction { name: self.name().to_owned(), opcodes })
}}

/// compiles one function declaration into its flat opcode list
pub fn emit(decl: &FunctionDecl) -> CompilationResult<CompiledFunction> {
    decl.compile()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction(mnemonic: &str, operands: Vec<Token>) -> InstructionNode {
        InstructionNode {
            mnemonic: Token::new(TokenKind::Instruction, mnemonic, 0),
            operands,
        }
    }

    fn number(n: &str, offset: usize) -> Token {
        Token::new(TokenKind::Number, n, offset)
    }

    fn builtin(name: &str, offset: usize) -> Token {
        Token::new(TokenKind::BuiltinRef, name, offset)
    }

    #[test]
    fn test_instruction() {
        let code = instruction("store", vec![number("3", 6), builtin("Alloc", 8), number("0", 15)])
            .compile()
            .unwrap();
        assert_eq!(code, vec![3, 3, -109, 0]);
    }

    #[test]
    fn test_control_flow_is_emitted_verbatim() {
        let decl = FunctionDecl {
            name: Token::new(TokenKind::FunctionName, "f", 7),
            instructions: vec![
                instruction("if", vec![number("2", 0)]),
                instruction("loop", vec![]),
                instruction("break", vec![number("1", 0)]),
                instruction("return", vec![]),
            ],
        };
        assert_eq!(
            emit(&decl).unwrap(),
            CompiledFunction {
                name: "f".into(),
                opcodes: vec![4, 2, 5, 6, 1, 7]
            }
        );
    }

    #[test]
    fn test_large_numbers() {
        let max = i64::MAX.to_string();
        assert_eq!(number(&max, 0).compile(), Ok(i64::MAX));
        assert_eq!(number("0007", 0).compile(), Ok(7));
        assert_eq!(
            number("9223372036854775808", 4).compile(),
            Err(CodeGenError::NumberOutOfRange {
                literal: "9223372036854775808".into(),
                position: 4
            })
        );
    }

    #[test]
    fn test_unknown_names() {
        let err = instruction("frobnicate", vec![]).compile().unwrap_err();
        assert_eq!(
            err,
            CodeGenError::UnknownMnemonic {
                name: "frobnicate".into(),
                position: 0
            }
        );
        let err = instruction("call", vec![builtin("nope", 5)]).compile().unwrap_err();
        assert_eq!(
            err,
            CodeGenError::UnknownBuiltin {
                name: "nope".into(),
                position: 5
            }
        );
        assert_eq!(err.position(), 5);
    }

    #[test]
    fn test_invalid_operand() {
        let err = instruction("push", vec![Token::new(TokenKind::Instruction, "add", 5)])
            .compile()
            .unwrap_err();
        assert_eq!(
            err,
            CodeGenError::InvalidOperand {
                kind: TokenKind::Instruction,
                position: 5
            }
        );
    }
}
