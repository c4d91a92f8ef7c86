use proc_macro::TokenStream;
mod opcode_table;

/// Used on the resolution tables (`Mnemonic` and `Builtin`).
///
/// Each variant of the table is a unit variant carrying its opcode in an
/// `#[opcode(..)]` attribute, e.g. `#[opcode(-101)] Iprint`. The opcode is what
/// the target VM expects, so it is spelled out per variant instead of being
/// derived from the declaration order.
///
/// This Macro generates the following:
/// * `Self::ALL: &[Self]`, every variant in declaration order
/// * `Self::opcode(self) -> i64`
///
/// Duplicate opcodes inside one table are rejected at compile time.
#[proc_macro_derive(OpcodeTable, attributes(opcode))]
pub fn opcode_table(tokens: TokenStream) -> TokenStream {
    opcode_table::opcode_table_impl(tokens)
}
