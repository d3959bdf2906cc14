//! Static checks reused by tooling before a chunk is handed to the VM.

use crate::bytecode::chunk::{Chunk, ChunkError, ChunkResult, OpCode};

/// Structural validation of a chunk.
///
/// Walks the code once, instruction by instruction, and reports the first
/// defect: unknown opcode, truncated operand, constant index past the pool,
/// or a line table out of step with the code. The VM performs the same checks
/// at dispatch time, so running an unvalidated chunk is still safe.
pub fn validate_chunk(chunk: &Chunk) -> ChunkResult<()> {
    if chunk.lines().len() != chunk.len() {
        return Err(ChunkError::LineTableMismatch { code: chunk.len(), lines: chunk.lines().len() });
    }

    let code = chunk.code();
    let mut offset = 0;
    while offset < code.len() {
        let byte = code[offset];
        let op = OpCode::from_byte(byte).ok_or(ChunkError::UnknownOpcode { byte, offset })?;
        if offset + op.width() > code.len() {
            return Err(ChunkError::MissingOperand { opcode: op, offset });
        }
        if op == OpCode::Const {
            let index = code[offset + 1];
            if chunk.constant(index).is_none() {
                return Err(ChunkError::ConstantOutOfRange {
                    index,
                    len: chunk.constants().len(),
                    offset,
                });
            }
        }
        offset += op.width();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_code() -> ChunkResult<()> {
        let mut chunk = Chunk::new();
        chunk.emit_constant(1.0, 1)?;
        chunk.write_op(OpCode::Negate, 1);
        chunk.write_op(OpCode::Return, 1);
        validate_chunk(&chunk)
    }

    #[test]
    fn empty_chunk_is_valid() {
        assert_eq!(validate_chunk(&Chunk::new()), Ok(()));
    }

    #[test]
    fn rejects_unknown_opcode() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Add, 1);
        chunk.write(0xFF, 1);
        assert_eq!(validate_chunk(&chunk), Err(ChunkError::UnknownOpcode { byte: 0xFF, offset: 1 }));
    }

    #[test]
    fn rejects_truncated_const() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Const, 1);
        assert_eq!(
            validate_chunk(&chunk),
            Err(ChunkError::MissingOperand { opcode: OpCode::Const, offset: 0 })
        );
    }

    #[test]
    fn rejects_dangling_constant_index() -> ChunkResult<()> {
        let mut chunk = Chunk::new();
        chunk.add_constant(1.0)?;
        chunk.write_op(OpCode::Const, 1);
        chunk.write(1, 1);
        assert_eq!(
            validate_chunk(&chunk),
            Err(ChunkError::ConstantOutOfRange { index: 1, len: 1, offset: 0 })
        );
        Ok(())
    }

    #[test]
    fn operand_bytes_are_not_decoded_as_opcodes() -> ChunkResult<()> {
        let mut chunk = Chunk::new();
        for i in 0..8 {
            chunk.add_constant(f64::from(i))?;
        }
        // operand 7 is not an opcode, but it sits in operand position
        chunk.write_op(OpCode::Const, 1);
        chunk.write(7, 1);
        chunk.write_op(OpCode::Return, 1);
        validate_chunk(&chunk)
    }
}
