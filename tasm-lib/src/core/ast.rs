//! Contains the AST types. The nodes keep the tokens they were built from, so
//! every later error can point back into the source.

use crate::core::Token;

/// One statement: a mnemonic and everything up to its terminating `;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionNode {
    pub mnemonic: Token,
    /// each of these is either a `Number` or a `BuiltinRef`
    pub operands: Vec<Token>,
}

/// Everything between a `_begin` and its `_end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: Token,
    pub instructions: Vec<InstructionNode>,
}

impl FunctionDecl {
    pub fn name(&self) -> &str {
        &self.name.text
    }
}

/// All function declarations of a source file, in source order. Names don't
/// have to be unique.
pub type Program = Vec<FunctionDecl>;
