//! Bytecode primitives: chunk and opcodes, disassembler, validation helpers.

/// Chunk, opcodes, line table.
pub mod chunk;
/// Textual disassembly.
pub mod disasm;
/// Structural validation.
pub mod helpers;

pub use chunk::{Chunk, ChunkError, ChunkResult, LineRangeIter, LineTable, OpCode, MAX_CONSTANTS};
