//! contains all important data structures

pub mod token;
pub use token::*;

pub mod ast;
pub use ast::*;

pub mod opcode;
pub use opcode::*;
