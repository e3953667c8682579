//! # Generation Config Errors
//!
//! Everything that can go wrong while loading and resolving a
//! [`GenerationConfig`](crate::config::GenerationConfig). Generation itself
//! never fails.

use std::path::PathBuf;

use strata_voxel::CatalogError;
use thiserror::Error;

/// Errors raised while loading generation config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config text is not valid TOML for this schema.
    #[error("invalid generation config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A block definition was rejected by the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A biome refers to a block the catalog does not define.
    #[error("biome {biome} references unknown block {block}")]
    UnknownBlock {
        /// Biome with the bad reference.
        biome: String,
        /// Block name that failed to resolve.
        block: String,
    },

    /// Ore parameters out of range.
    #[error("invalid ore {ore} in biome {biome}: {reason}")]
    InvalidOre {
        /// Biome declaring the ore.
        biome: String,
        /// Ore block name.
        ore: String,
        /// What is wrong.
        reason: String,
    },

    /// `[world]` bounds that cannot describe a world.
    #[error("invalid world bounds: {reason}")]
    InvalidWorld {
        /// What is wrong.
        reason: String,
    },

    /// Biome parameters out of range.
    #[error("invalid biome {biome}: {reason}")]
    InvalidBiome {
        /// Biome name.
        biome: String,
        /// What is wrong.
        reason: String,
    },
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
