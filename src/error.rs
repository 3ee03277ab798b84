//! Error types for elfquery.
//!
//! Decoder errors that only affect one section are recovered inside the
//! projector (see [`crate::project::DecodeIssue`]); everything here stops the
//! current operation and is handed back to the caller.

use thiserror::Error;

use crate::formats::elf::ElfError;
use crate::render::RenderError;

/// Relation a failed insert belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Sections,
    Symbols,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Relation::Sections => "sections",
            Relation::Symbols => "symbols",
        })
    }
}

/// Main error type for elfquery operations.
#[derive(Debug, Error)]
pub enum ElfQueryError {
    /// Input does not start with `\x7fELF`
    #[error("Not an ELF file: magic number mismatch")]
    MagicMismatch,

    /// File header could not be decoded
    #[error("ELF decode error: {0}")]
    Decode(ElfError),

    /// In-memory database or schema could not be created
    #[error("Store initialisation failed: {0}")]
    StoreInit(#[source] rusqlite::Error),

    /// A record failed to insert
    #[error("Failed to load {relation} record {record}: {source}")]
    Load {
        relation: Relation,
        record: usize,
        #[source]
        source: rusqlite::Error,
    },

    /// Query text rejected or failed during execution
    #[error("Query failed: {0}")]
    Query(#[source] rusqlite::Error),

    /// Result set could not be rendered
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration file problems
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ElfError> for ElfQueryError {
    fn from(err: ElfError) -> Self {
        match err {
            ElfError::InvalidMagic => ElfQueryError::MagicMismatch,
            other => ElfQueryError::Decode(other),
        }
    }
}

/// Result type alias for elfquery operations
pub type Result<T> = std::result::Result<T, ElfQueryError>;
