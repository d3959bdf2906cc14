//! Textual disassembly, one line per instruction.
//!
//! The format is diagnostic only:
//!
//! ```text
//! == demo ==
//! 0000  123 OP_CONST            0 '1.2'
//! 0002    | OP_NEGATE
//! 0003    | OP_RETURN
//! ```
//!
//! Offset, source line (`|` when unchanged from the previous byte), mnemonic,
//! then for `OP_CONST` the pool index and the value.

use core::fmt::Write;

use crate::bytecode::chunk::{Chunk, OpCode};

/// Full dump: header then every instruction.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {name} ==");
    for (_, line) in Disassembly::new(chunk) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Dump with metadata and the constant pool listed before the code.
pub fn disassemble_full(chunk: &Chunk, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== {name} == (bytes={}, consts={})",
        chunk.len(),
        chunk.constants().len()
    );

    if !chunk.constants().is_empty() {
        let _ = writeln!(out, ";; constants");
        for (idx, value) in chunk.constants().iter().enumerate() {
            let _ = writeln!(out, "const[{idx:04}] = {value}");
        }
        out.push('\n');
    }

    let _ = writeln!(out, ";; code");
    for (_, line) in Disassembly::new(chunk) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Render the instruction at `offset` into `out` (no trailing newline) and
/// return the offset of the next instruction.
///
/// Unknown bytes count as one-byte instructions so a walk over corrupt code
/// still moves forward.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let _ = write!(out, "{offset:04} ");
    let line = chunk.line_at(offset).unwrap_or_default();
    if offset > 0 && chunk.line_at(offset - 1) == Some(line) {
        out.push_str("   | ");
    } else {
        let _ = write!(out, "{line:4} ");
    }

    let Some(&byte) = chunk.code().get(offset) else {
        out.push_str("<end of code>");
        return offset + 1;
    };

    match OpCode::from_byte(byte) {
        Some(OpCode::Const) => constant_instruction(chunk, offset, out),
        Some(op) => simple_instruction(op, offset, out),
        None => {
            let _ = write!(out, "unknown opcode {byte}");
            offset + 1
        }
    }
}

fn simple_instruction(op: OpCode, offset: usize, out: &mut String) -> usize {
    out.push_str(op.mnemonic());
    offset + op.width()
}

fn constant_instruction(chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let name = OpCode::Const.mnemonic();
    match chunk.code().get(offset + 1) {
        None => {
            let _ = write!(out, "{name:<16} <missing operand>");
        }
        Some(&index) => match chunk.constant(index) {
            Some(value) => {
                let _ = write!(out, "{name:<16} {index:4} '{value}'");
            }
            None => {
                let _ = write!(out, "{name:<16} {index:4} <out of range>");
            }
        },
    }
    offset + OpCode::Const.width()
}

/// Iterator over `(offset, rendered line)` for every instruction of a chunk.
pub struct Disassembly<'a> {
    chunk: &'a Chunk,
    offset: usize,
}

impl<'a> Disassembly<'a> {
    /// Start at offset 0.
    pub const fn new(chunk: &'a Chunk) -> Self { Self { chunk, offset: 0 } }
}

impl Iterator for Disassembly<'_> {
    type Item = (usize, String);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.chunk.len() {
            return None;
        }
        let at = self.offset;
        let mut line = String::new();
        self.offset = disassemble_instruction(self.chunk, at, &mut line);
        Some((at, line))
    }
}
