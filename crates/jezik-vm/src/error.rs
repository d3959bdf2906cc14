//! Runtime errors and the coarse interpret status.

use std::io;

use thiserror::Error;

/// Everything that stops a run before `RETURN`.
#[derive(Debug, Error)]
pub enum VmError {
    /// Byte in opcode position does not decode.
    #[error("unknown opcode {byte} at offset {offset}")]
    UnknownOpcode {
        /// Offending byte.
        byte: u8,
        /// Its offset.
        offset: usize,
    },

    /// Pop on an empty stack.
    #[error("stack underflow at offset {offset}")]
    StackUnderflow {
        /// Offset of the instruction that popped.
        offset: usize,
    },

    /// Push on a full stack.
    #[error("stack overflow at offset {offset} (capacity {capacity})")]
    StackOverflow {
        /// Configured capacity.
        capacity: usize,
        /// Offset of the instruction that pushed.
        offset: usize,
    },

    /// `CONST` operand past the end of the pool.
    #[error("constant index {index} out of range (pool size {len}) at offset {offset}")]
    ConstantOutOfRange {
        /// Referenced index.
        index: u8,
        /// Pool length.
        len: usize,
        /// Offset of the `CONST` opcode.
        offset: usize,
    },

    /// Code ends inside an instruction.
    #[error("instruction at offset {offset} is missing its operand")]
    TruncatedInstruction {
        /// Offset of the opcode byte.
        offset: usize,
    },

    /// Instruction pointer ran off the end of the code without `RETURN`.
    #[error("reached end of code ({len} bytes) without RETURN")]
    UnexpectedEnd {
        /// Code length.
        len: usize,
    },

    /// Writing the result or the trace failed.
    #[error("output: {0}")]
    Output(#[from] io::Error),
}

impl VmError {
    /// Offset of the faulting instruction, when there is one.
    pub const fn offset(&self) -> Option<usize> {
        match self {
            VmError::UnknownOpcode { offset, .. }
            | VmError::StackUnderflow { offset }
            | VmError::StackOverflow { offset, .. }
            | VmError::ConstantOutOfRange { offset, .. }
            | VmError::TruncatedInstruction { offset } => Some(*offset),
            VmError::UnexpectedEnd { .. } | VmError::Output(_) => None,
        }
    }
}

/// Result alias for VM operations.
pub type VmResult<T> = Result<T, VmError>;

/// Outcome of [`Vm::interpret`](crate::Vm::interpret).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpretResult {
    /// `RETURN` executed.
    Ok,
    /// Execution stopped on a [`VmError`].
    RuntimeError,
}

impl InterpretResult {
    /// True for [`InterpretResult::Ok`].
    pub const fn is_ok(self) -> bool { matches!(self, InterpretResult::Ok) }

    /// Process exit code: `0`, or `70` (`EX_SOFTWARE`) on runtime error.
    pub const fn exit_code(self) -> u8 {
        match self {
            InterpretResult::Ok => 0,
            InterpretResult::RuntimeError => 70,
        }
    }
}

impl<T> From<&VmResult<T>> for InterpretResult {
    fn from(result: &VmResult<T>) -> Self {
        match result {
            Ok(_) => InterpretResult::Ok,
            Err(_) => InterpretResult::RuntimeError,
        }
    }
}
