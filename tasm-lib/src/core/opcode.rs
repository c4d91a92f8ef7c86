//! The two resolution tables: instruction mnemonics and builtin calls.
//!
//! Both are enums whose opcodes come from the `OpcodeTable` derive, while the
//! source spelling of each entry is its lower-cased variant name (`LShift` is
//! written `lshift`). Name lookup goes through maps that are built once on first
//! use and never change afterwards, so they can be shared between threads.

use once_cell::sync::Lazy;
use proc_macros::OpcodeTable;
use strum_macros::{Display, IntoStaticStr};

use std::collections::HashMap;

/// The instructions of the target VM. Lookup is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, OpcodeTable, IntoStaticStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mnemonic {
    #[opcode(1)]
    Push,
    #[opcode(2)]
    Fetch,
    #[opcode(3)]
    Store,
    #[opcode(4)]
    If,
    #[opcode(5)]
    Loop,
    #[opcode(6)]
    Break,
    #[opcode(7)]
    Return,
    #[opcode(8)]
    Call,
    #[opcode(9)]
    FpPlus,
    #[opcode(10)]
    Add,
    #[opcode(11)]
    Sub,
    #[opcode(12)]
    Mul,
    #[opcode(13)]
    Div,
    #[opcode(14)]
    Mod,
    #[opcode(15)]
    Not,
    #[opcode(16)]
    And,
    #[opcode(17)]
    Or,
    #[opcode(18)]
    Xor,
    #[opcode(19)]
    Eq,
    #[opcode(20)]
    Neq,
    #[opcode(21)]
    Lt,
    #[opcode(22)]
    Leq,
    #[opcode(23)]
    Gt,
    #[opcode(24)]
    Geq,
    #[opcode(25)]
    Pop,
    #[opcode(26)]
    LShift,
    #[opcode(27)]
    RShift,
}

/// Operations provided by the host, referenced as `#name` in source.
///
/// The opcodes are negative and grouped by subsystem: I/O and memory live in
/// `-101..=-111`, the GUI in `-201..=-210`. Lookup ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, OpcodeTable, IntoStaticStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Builtin {
    #[opcode(-101)]
    Iprint,
    #[opcode(-102)]
    Sprint,
    #[opcode(-103)]
    Iread,
    #[opcode(-104)]
    Sread,
    #[opcode(-105)]
    Nl,
    #[opcode(-106)]
    Random,
    #[opcode(-107)]
    Timer,
    #[opcode(-108)]
    StopTimer,
    #[opcode(-109)]
    Alloc,
    #[opcode(-110)]
    Free,
    #[opcode(-111)]
    I2s,
    #[opcode(-201)]
    MakeImg,
    #[opcode(-202)]
    SetImg,
    #[opcode(-203)]
    Button,
    #[opcode(-204)]
    Html,
    #[opcode(-205)]
    MakeLabel,
    #[opcode(-206)]
    SetLabel,
    #[opcode(-207)]
    MakeTable,
    #[opcode(-208)]
    SetCell,
    #[opcode(-209)]
    SetCellColor,
    #[opcode(-210)]
    ButtonLabel,
}

static MNEMONICS: Lazy<HashMap<&'static str, Mnemonic>> =
    Lazy::new(|| Mnemonic::ALL.iter().map(|m| (m.name(), *m)).collect());

static BUILTINS: Lazy<HashMap<&'static str, Builtin>> =
    Lazy::new(|| Builtin::ALL.iter().map(|b| (b.name(), *b)).collect());

impl Mnemonic {
    /// the spelling used in source
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        MNEMONICS.get(name).copied()
    }
}

impl Builtin {
    /// the canonical (lower case) spelling
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// looks up a builtin by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        BUILTINS.get(name.to_lowercase().as_str()).copied()
    }
}
