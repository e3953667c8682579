//! # Voxel Error Types
//!
//! Errors raised while building a block catalog. Reads and writes on chunks
//! and worlds never fail; they degrade to Air or become no-ops.

use thiserror::Error;

/// Errors that can occur while registering or resolving blocks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A block with this name is already registered.
    #[error("block already registered: {0}")]
    DuplicateBlock(String),

    /// The name is reserved for the built-in Air block.
    #[error("block name is reserved: {0}")]
    ReservedName(String),

    /// Hardness must be a finite, non-negative number.
    #[error("invalid hardness {hardness} for block {name}")]
    InvalidHardness {
        /// Block name.
        name: String,
        /// Offending hardness value.
        hardness: f32,
    },

    /// The catalog cannot hold more than `u16::MAX + 1` blocks.
    #[error("block catalog full: {0} entries")]
    CatalogFull(usize),

    /// No block with this name is registered.
    #[error("unknown block: {0}")]
    UnknownBlock(String),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
