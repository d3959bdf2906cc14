//! jezik-cli — bibliothèque interne du binaire `jezik`
//!
//! Pas de front-end ni d'arguments : le binaire assemble à la main un chunk de
//! démonstration, affiche son désassemblage, le valide puis l'exécute.
//! Réglages via l'environnement (`RUST_LOG`, `JEZIK_TRACE`, `JEZIK_STACK_MAX`).

#![deny(unused_must_use)]
#![forbid(unsafe_code)]

use std::io::Write;

use anyhow::{Context, Result};
use jezik_core::{
    disasm::disassemble_chunk, helpers::validate_chunk, Chunk, OpCode,
};
use jezik_vm::{InterpretResult, Vm, VmConfig};
use log::{info, warn};

/// Label printed above the demo listing.
pub const DEMO_NAME: &str = "test chunk";

// ───────────────────────────── Initialisation ─────────────────────────────

/// Installe `env_logger` (filtre `RUST_LOG`, `info` par défaut).
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();
}

// ───────────────────────────── Démo ─────────────────────────────

/// `-((1.2 + 3.4) / 5.6)`, every byte attributed to line 123.
pub fn demo_chunk() -> Result<Chunk> {
    let mut chunk = Chunk::new();
    chunk.emit_constant(1.2, 123).context("constant 1.2")?;
    chunk.emit_constant(3.4, 123).context("constant 3.4")?;
    chunk.write_op(OpCode::Add, 123);
    chunk.emit_constant(5.6, 123).context("constant 5.6")?;
    chunk.write_op(OpCode::Divide, 123);
    chunk.write_op(OpCode::Negate, 123);
    chunk.write_op(OpCode::Return, 123);
    Ok(chunk)
}

/// Dump `chunk` to `out`, validate it, then interpret it with a VM writing to `out`.
///
/// Validation failures are only logged: the VM reports the same defects as a
/// runtime error.
pub fn run_chunk<W: Write>(chunk: &Chunk, name: &str, config: VmConfig, mut out: W) -> Result<InterpretResult> {
    out.write_all(disassemble_chunk(chunk, name).as_bytes())
        .context("writing disassembly")?;

    match validate_chunk(chunk) {
        Ok(()) => info!("chunk `{name}`: {} bytes, {} constants", chunk.len(), chunk.constants().len()),
        Err(e) => warn!("chunk `{name}` is malformed: {e}"),
    }

    let mut vm = Vm::with_output(config, out);
    let status = vm.interpret(chunk);
    info!("chunk `{name}` finished: {status:?}");
    Ok(status)
}

// ───────────────────────────── Tests ─────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn demo_runs_to_completion() -> Result<()> {
        let mut out = Vec::new();
        let status = run_chunk(&demo_chunk()?, DEMO_NAME, VmConfig::default(), &mut out)?;
        assert_eq!(status, InterpretResult::Ok);

        let text = String::from_utf8(out)?;
        assert!(text.starts_with("== test chunk ==\n0000  123 OP_CONST"));
        assert!(text.ends_with("0009    | OP_RETURN\n-0.8214285714285714\n"));
        Ok(())
    }

    #[test]
    fn malformed_chunk_reports_runtime_error() -> Result<()> {
        let mut chunk = Chunk::new();
        chunk.write(0xFF, 1);
        let mut out = Vec::new();
        let status = run_chunk(&chunk, "bad", VmConfig::default(), &mut out)?;
        assert_eq!(status, InterpretResult::RuntimeError);
        assert_eq!(String::from_utf8(out)?, "== bad ==\n0000    1 unknown opcode 255\n");
        Ok(())
    }
}
