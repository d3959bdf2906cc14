//! jezik-vm — interpréteur de bytecode à pile
//!
//! Exécute un [`Chunk`](jezik_core::Chunk) produit ailleurs (compilateur, tests, outils) :
//! - `Vm` : pointeur d'instruction + pile de valeurs bornée (256 par défaut)
//! - `interpret` → statut `Ok` / `RuntimeError`, `run` → valeur ou erreur précise
//! - `VmConfig` : trace pas-à-pas, capacité de pile (surchargeables par l'environnement)
//!
//! Toute mauvaise utilisation de la pile, opcode inconnu ou index de constante
//! invalide termine l'exécution avec `RuntimeError` ; rien n'est lu hors bornes.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod config;
pub mod error;
pub mod vm;

pub use config::VmConfig;
pub use error::{InterpretResult, VmError, VmResult};
pub use vm::{Vm, VmState, STACK_MAX};

/// Réexports utiles pour une importation rapide.
pub mod prelude {
    pub use super::{InterpretResult, Vm, VmConfig, VmError, VmResult, VmState};
    pub use jezik_core::prelude::*;
}
