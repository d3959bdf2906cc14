//! jezik-core — primitives partagées du bytecode jezik
//!
//! Fournit :
//! - `Value` (nombre `f64`) et son formatage
//! - `Chunk` : code encodé, table des lignes, pool de constantes
//! - `OpCode` : jeu d'instructions et encodage
//! - désassembleur textuel (`disasm`) et validation structurelle (`helpers`)
//!
//! L'exécution vit dans `jezik-vm`.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

/* ─────────────────────────── Modules publics ─────────────────────────── */

/// Primitives de bytecode (chunk, désassembleur, helpers).
pub mod bytecode;
/// Valeurs runtime.
pub mod value;

/// Raccourci : désassembleur textuel.
pub use bytecode::disasm;
/// Raccourci : validations.
pub use bytecode::helpers;

pub use bytecode::{Chunk, ChunkError, ChunkResult, LineTable, OpCode, MAX_CONSTANTS};
pub use value::Value;

/* ─────────────────────────── Prélude ─────────────────────────── */

/// Prélude pratique pour importer les types clés du crate.
pub mod prelude {
    /// Réexports utiles pour une importation rapide.
    pub use super::{
        disasm::{disassemble_chunk, disassemble_instruction},
        helpers::validate_chunk,
        Chunk, ChunkError, ChunkResult, OpCode, Value, MAX_CONSTANTS,
    };
}
