//! `jezik` — démonstration de la VM
//!
//! Ici on fait uniquement : initialisation (logger, config depuis l'env), et
//! délégation à `jezik_cli` (lib).

#![forbid(unsafe_code)]

use std::{io, process::ExitCode};

use jezik_cli as cli;
use jezik_vm::VmConfig;

fn main() -> ExitCode {
    cli::init_logger();

    let config = VmConfig::from_env();
    let result = cli::demo_chunk()
        .and_then(|chunk| cli::run_chunk(&chunk, cli::DEMO_NAME, config, io::stdout().lock()));

    match result {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}
