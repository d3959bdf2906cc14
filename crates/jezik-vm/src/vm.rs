//! Fetch-decode-execute loop over a [`Chunk`].

use std::io::{self, Write};

use jezik_core::{disasm::disassemble_instruction, Chunk, OpCode, Value};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::{
    config::VmConfig,
    error::{InterpretResult, VmError, VmResult},
};

/// Default value stack capacity.
pub const STACK_MAX: usize = 256;

/// Lifecycle of a [`Vm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmState {
    /// Nothing run yet (or [`Vm::reset`] called).
    Idle,
    /// Inside the dispatch loop.
    Running,
    /// Stopped, with the final status.
    Halted(InterpretResult),
}

/// Stack-based bytecode interpreter.
///
/// Each instance owns its stack and instruction pointer; the chunk is only
/// borrowed for the duration of a run and never modified. `RETURN` values and
/// the optional trace go to `W` (stdout by default).
pub struct Vm<W: Write = io::Stdout> {
    config: VmConfig,
    ip: usize,
    stack: SmallVec<[Value; STACK_MAX]>,
    state: VmState,
    out: W,
}

impl Vm<io::Stdout> {
    /// VM with default settings writing to stdout.
    pub fn new() -> Self { Self::with_config(VmConfig::default()) }

    /// VM with `config` writing to stdout.
    pub fn with_config(config: VmConfig) -> Self { Self::with_output(config, io::stdout()) }
}

impl Default for Vm<io::Stdout> {
    fn default() -> Self { Self::new() }
}

impl<W: Write> Vm<W> {
    /// VM with `config` writing results and trace to `out`.
    pub fn with_output(config: VmConfig, out: W) -> Self {
        Self { config, ip: 0, stack: SmallVec::new(), state: VmState::Idle, out }
    }

    /// Active settings.
    pub const fn config(&self) -> &VmConfig { &self.config }

    /// Current lifecycle state.
    pub const fn state(&self) -> VmState { self.state }

    /// Offset of the next byte to fetch.
    pub const fn ip(&self) -> usize { self.ip }

    /// Stack contents, bottom first.
    pub fn stack(&self) -> &[Value] { &self.stack }

    /// Output sink.
    pub const fn output(&self) -> &W { &self.out }

    /// Consume the VM and return its output sink.
    pub fn into_output(self) -> W { self.out }

    /// Empty the stack and go back to [`VmState::Idle`].
    pub fn reset(&mut self) {
        self.stack.clear();
        self.ip = 0;
        self.state = VmState::Idle;
    }

    /// Run `chunk` from its first byte and report the coarse status.
    ///
    /// The error detail is logged; use [`Vm::run`] to get it.
    pub fn interpret(&mut self, chunk: &Chunk) -> InterpretResult {
        match self.run(chunk) {
            Ok(_) => InterpretResult::Ok,
            Err(err) => {
                let line = err.offset().and_then(|offset| chunk.line_at(offset));
                warn!(error = %err, line = ?line, "runtime error");
                InterpretResult::RuntimeError
            }
        }
    }

    /// Run `chunk` from its first byte and return the value of its `RETURN`.
    pub fn run(&mut self, chunk: &Chunk) -> VmResult<Value> {
        self.reset();
        self.state = VmState::Running;
        debug!(bytes = chunk.len(), constants = chunk.constants().len(), "interpret");

        let result = self.execute(chunk);
        self.state = VmState::Halted(InterpretResult::from(&result));
        debug!(ip = self.ip, ok = result.is_ok(), "halted");
        result
    }

    fn execute(&mut self, chunk: &Chunk) -> VmResult<Value> {
        loop {
            if self.config.trace && self.ip < chunk.len() {
                self.trace_state(chunk)?;
            }

            let offset = self.ip;
            let byte = self.read_byte(chunk).ok_or(VmError::UnexpectedEnd { len: chunk.len() })?;
            let op = OpCode::from_byte(byte).ok_or(VmError::UnknownOpcode { byte, offset })?;
            trace!(offset, op = op.mnemonic(), depth = self.stack.len(), "dispatch");

            match op {
                OpCode::Const => {
                    let value = self.read_constant(chunk, offset)?;
                    self.push(value, offset)?;
                }
                OpCode::Add => self.binary_op(offset, |a, b| a + b)?,
                OpCode::Subtract => self.binary_op(offset, |a, b| a - b)?,
                OpCode::Multiply => self.binary_op(offset, |a, b| a * b)?,
                OpCode::Divide => self.binary_op(offset, |a, b| a / b)?,
                OpCode::Negate => {
                    let value = self.pop(offset)?;
                    self.push(-value, offset)?;
                }
                OpCode::Return => {
                    let value = self.pop(offset)?;
                    writeln!(self.out, "{value}")?;
                    self.out.flush()?;
                    return Ok(value);
                }
            }
        }
    }

    /* ───────────── helpers ───────────── */

    #[inline]
    fn read_byte(&mut self, chunk: &Chunk) -> Option<u8> {
        let byte = chunk.code().get(self.ip).copied()?;
        self.ip += 1;
        Some(byte)
    }

    #[inline]
    fn read_constant(&mut self, chunk: &Chunk, offset: usize) -> VmResult<Value> {
        let index = self.read_byte(chunk).ok_or(VmError::TruncatedInstruction { offset })?;
        chunk.constant(index).ok_or(VmError::ConstantOutOfRange {
            index,
            len: chunk.constants().len(),
            offset,
        })
    }

    #[inline]
    fn push(&mut self, value: Value, offset: usize) -> VmResult<()> {
        if self.stack.len() >= self.config.stack_capacity {
            return Err(VmError::StackOverflow { capacity: self.config.stack_capacity, offset });
        }
        self.stack.push(value);
        Ok(())
    }

    #[inline]
    fn pop(&mut self, offset: usize) -> VmResult<Value> {
        self.stack.pop().ok_or(VmError::StackUnderflow { offset })
    }

    /// Right operand is on top: pop `b`, then `a`, push `a op b`.
    #[inline]
    fn binary_op(&mut self, offset: usize, op: fn(Value, Value) -> Value) -> VmResult<()> {
        let b = self.pop(offset)?;
        let a = self.pop(offset)?;
        self.push(op(a, b), offset)
    }

    fn trace_state(&mut self, chunk: &Chunk) -> io::Result<()> {
        let mut line = String::from("          ");
        for value in &self.stack {
            line.push_str("[ ");
            line.push_str(&value.to_string());
            line.push_str(" ]");
        }
        line.push('\n');
        disassemble_instruction(chunk, self.ip, &mut line);
        writeln!(self.out, "{line}")
    }
}
