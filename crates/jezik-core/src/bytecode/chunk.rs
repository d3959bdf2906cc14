//! Bytecode chunk: encoded instructions, per-byte line table and constant pool.

use core::{fmt, ops::Range};

use thiserror::Error;

use crate::value::Value;

/// Highest number of constants a chunk can hold: indices are one operand byte.
pub const MAX_CONSTANTS: usize = u8::MAX as usize + 1;

/* ─────────────────────────── Opcodes ─────────────────────────── */

/// Instruction set. The discriminant is the encoded opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Push `constants[operand]`. One operand byte.
    Const = 0x00,
    /// Pop b, pop a, push a + b.
    Add = 0x01,
    /// Pop b, pop a, push a - b.
    Subtract = 0x02,
    /// Pop b, pop a, push a * b.
    Multiply = 0x03,
    /// Pop b, pop a, push a / b.
    Divide = 0x04,
    /// Pop a, push -a.
    Negate = 0x05,
    /// Pop a, emit it as the program result and halt.
    Return = 0x06,
}

impl OpCode {
    /// Every opcode, in encoding order.
    pub const ALL: [OpCode; 7] = [
        OpCode::Const,
        OpCode::Add,
        OpCode::Subtract,
        OpCode::Multiply,
        OpCode::Divide,
        OpCode::Negate,
        OpCode::Return,
    ];

    /// Decode one opcode byte.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(OpCode::Const),
            0x01 => Some(OpCode::Add),
            0x02 => Some(OpCode::Subtract),
            0x03 => Some(OpCode::Multiply),
            0x04 => Some(OpCode::Divide),
            0x05 => Some(OpCode::Negate),
            0x06 => Some(OpCode::Return),
            _ => None,
        }
    }

    /// Encoded opcode byte.
    pub const fn as_byte(self) -> u8 { self as u8 }

    /// Number of operand bytes following the opcode.
    pub const fn operand_count(self) -> usize {
        match self {
            OpCode::Const => 1,
            _ => 0,
        }
    }

    /// Total encoded width (opcode + operands).
    pub const fn width(self) -> usize { 1 + self.operand_count() }

    /// Name used in disassembly listings.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Const => "OP_CONST",
            OpCode::Add => "OP_ADD",
            OpCode::Subtract => "OP_SUBTRACT",
            OpCode::Multiply => "OP_MULTIPLY",
            OpCode::Divide => "OP_DIVIDE",
            OpCode::Negate => "OP_NEGATE",
            OpCode::Return => "OP_RETURN",
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;
    fn try_from(byte: u8) -> Result<Self, Self::Error> { OpCode::from_byte(byte).ok_or(byte) }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self { op.as_byte() }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.mnemonic()) }
}

/* ─────────────────────────── Erreurs ─────────────────────────── */

/// Errors raised while building or validating a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The pool already holds [`MAX_CONSTANTS`] entries.
    #[error("constant pool is full ({max} entries max)")]
    ConstantPoolFull {
        /// Pool capacity.
        max: usize,
    },
    /// A byte in opcode position does not decode.
    #[error("unknown opcode 0x{byte:02X} at offset {offset}")]
    UnknownOpcode {
        /// Offending byte.
        byte: u8,
        /// Offset of that byte.
        offset: usize,
    },
    /// The code ends before the operand bytes of an instruction.
    #[error("{opcode} at offset {offset} is missing its operand")]
    MissingOperand {
        /// Truncated instruction.
        opcode: OpCode,
        /// Offset of the opcode byte.
        offset: usize,
    },
    /// A `CONST` operand points past the end of the pool.
    #[error("constant index {index} at offset {offset} out of range (pool size {len})")]
    ConstantOutOfRange {
        /// Referenced index.
        index: u8,
        /// Pool length.
        len: usize,
        /// Offset of the `CONST` opcode.
        offset: usize,
    },
    /// The line table and the code disagree in length.
    #[error("line table has {lines} entries for {code} code bytes")]
    LineTableMismatch {
        /// Code length.
        code: usize,
        /// Line table length.
        lines: usize,
    },
}

/// Result alias for chunk operations.
pub type ChunkResult<T> = Result<T, ChunkError>;

/* ─────────────────────────── Line table ─────────────────────────── */

/// Source line for each code byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTable {
    lines: Vec<u32>,
}

impl LineTable {
    /// Empty table.
    pub const fn new() -> Self { Self { lines: Vec::new() } }
    /// Record the line of the next code byte.
    pub fn push(&mut self, line: u32) { self.lines.push(line); }
    /// Number of entries.
    pub fn len(&self) -> usize { self.lines.len() }
    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    /// Line of the byte at `offset`.
    pub fn line_at(&self, offset: usize) -> Option<u32> { self.lines.get(offset).copied() }
    /// Raw view.
    pub fn as_slice(&self) -> &[u32] { &self.lines }
    /// Iterate over contiguous runs of bytes sharing one line.
    pub fn iter_ranges(&self) -> LineRangeIter<'_> { LineRangeIter { lines: &self.lines, index: 0 } }
    /// Drop every entry.
    pub fn clear(&mut self) { self.lines.clear(); }
}

/// Iterator yielding `(offsets, line)` runs, see [`LineTable::iter_ranges`].
pub struct LineRangeIter<'a> {
    lines: &'a [u32],
    index: usize,
}

impl Iterator for LineRangeIter<'_> {
    type Item = (Range<usize>, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.index;
        let line = *self.lines.get(start)?;
        self.index += 1;
        while self.lines.get(self.index) == Some(&line) {
            self.index += 1;
        }
        Some((start..self.index, line))
    }
}

/* ─────────────────────────── Chunk ─────────────────────────── */

/// One compiled unit: code bytes, their source lines, and the constants they reference.
///
/// Only appends mutate a chunk, which keeps `lines.len() == code.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    code: Vec<u8>,
    lines: LineTable,
    constants: Vec<Value>,
}

impl Chunk {
    /// Empty chunk.
    pub const fn new() -> Self {
        Self { code: Vec::new(), lines: LineTable::new(), constants: Vec::new() }
    }

    /// Append one raw byte produced by source line `line`.
    pub fn write(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    /// Append an opcode byte.
    pub fn write_op(&mut self, op: OpCode, line: u32) { self.write(op.as_byte(), line); }

    /// Append `value` to the constant pool and return its index.
    ///
    /// Fails once the pool holds [`MAX_CONSTANTS`] values; the pool is left untouched.
    pub fn add_constant(&mut self, value: impl Into<Value>) -> ChunkResult<u8> {
        let index = u8::try_from(self.constants.len())
            .map_err(|_| ChunkError::ConstantPoolFull { max: MAX_CONSTANTS })?;
        self.constants.push(value.into());
        Ok(index)
    }

    /// Add a constant and emit `CONST index`.
    pub fn emit_constant(&mut self, value: impl Into<Value>, line: u32) -> ChunkResult<u8> {
        let index = self.add_constant(value)?;
        self.write_op(OpCode::Const, line);
        self.write(index, line);
        Ok(index)
    }

    /// Encoded instructions.
    pub fn code(&self) -> &[u8] { &self.code }

    /// Per-byte source lines.
    pub fn lines(&self) -> &LineTable { &self.lines }

    /// Constant pool.
    pub fn constants(&self) -> &[Value] { &self.constants }

    /// Constant at `index`, if present.
    pub fn constant(&self, index: u8) -> Option<Value> { self.constants.get(usize::from(index)).copied() }

    /// Source line of the byte at `offset`.
    pub fn line_at(&self, offset: usize) -> Option<u32> { self.lines.line_at(offset) }

    /// Number of code bytes.
    pub fn len(&self) -> usize { self.code.len() }

    /// Whether no code has been written.
    pub fn is_empty(&self) -> bool { self.code.is_empty() }

    /// Release the contents; the chunk is empty again afterwards.
    pub fn clear(&mut self) {
        self.code.clear();
        self.lines.clear();
        self.constants.clear();
    }
}
