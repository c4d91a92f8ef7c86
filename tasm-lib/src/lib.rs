//! Compiles tasm source into opcode lists for the stack VM.
//!
//! A source file contains function blocks like this one:
//!
//! ```text
//! _begin main
//!     push 40 ; push 2 ; add ;
//!     call #iprint ;
//! _end
//! ```
//!
//! Compiling a file takes three steps, each of which only looks at the output of
//! the previous one:
//! 1. [`lexer::tokenize`] turns the source into tokens. It never fails, anything
//!    it doesn't understand is skipped.
//! 1. [`parser::parse`] builds one [`FunctionDecl`](crate::core::FunctionDecl) per `_begin`/`_end`
//!    block.
//! 1. [`compiler::emit`] resolves mnemonics and builtins through the tables in
//!    [`core::opcode`](crate::core::opcode) and flattens each declaration into a
//!    [`bytecode::CompiledFunction`].
//!
//! [`compile`] runs all of them:
//!
//! ```
//! let functions = tasm_lib::compile("_begin f push 1 ; push 2 ; add ; _end").unwrap();
//! assert_eq!(functions[0].name, "f");
//! assert_eq!(functions[0].opcodes, vec![1, 1, 1, 2, 10]);
//! ```
//!
//! The first error aborts the whole compilation, there are no partial results.
pub mod bytecode;
pub mod compiler;
pub mod core;
pub mod lexer;
pub mod parser;
pub mod utils;

use thiserror::Error;

use bytecode::CompiledFunction;
use compiler::CodeGenError;
use parser::ParseError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    CodeGen(#[from] CodeGenError),
}

impl CompileError {
    /// byte offset in the source that the error refers to
    pub fn position(&self) -> usize {
        match self {
            Self::Parse(e) => e.position(),
            Self::CodeGen(e) => e.position(),
        }
    }
}

/// Compiles every function of `src`, in declaration order.
pub fn compile(src: &str) -> Result<Vec<CompiledFunction>, CompileError> {
    let _span = tracing::debug_span!("compile", len = src.len()).entered();

    let tokens = lexer::tokenize(src);
    tracing::debug!(tokens = tokens.len(), "tokenized source");

    let program = parser::parse(&tokens)?;
    tracing::debug!(functions = program.len(), "parsed source");

    let functions = program
        .iter()
        .map(compiler::emit)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(functions)
}
