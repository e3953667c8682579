//! # STRATA Procedural Generation
//!
//! Deterministic terrain for STRATA chunks.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same seed and config, same world
//! 2. **Column-local**: a chunk is generated from its own columns only
//! 3. **Configurable**: blocks, biomes and ores come from TOML
//!
//! ## Core Components
//!
//! - `SimplexNoise`: seeded 2D noise behind the `Noise2D` trait
//! - `BiomeSelector`: picks one biome per world column
//! - `OreField`: decides where ore veins replace stone
//! - `TerrainGenerator`: fills chunks with terrain, ores and trees
//! - `GenerationConfig`: TOML world description
//!
//! ## Example
//!
//! ```rust
//! use strata_procedural::GenerationConfig;
//! use strata_voxel::{BlockPos, ChunkCoord, VoxelWorld};
//!
//! let config = GenerationConfig::from_toml_str(r#"
//!     seed = 7
//!
//!     [[blocks]]
//!     name = "stone"
//!
//!     [[biomes]]
//!     name = "rock"
//!     top = "stone"
//!     filler = "stone"
//!     stone = "stone"
//!     base_height = 4
//! "#).unwrap();
//!
//! let catalog = config.build_catalog().unwrap();
//! let generator = config.build_generator(&catalog).unwrap();
//! let world = VoxelWorld::new(config.world);
//!
//! generator.generate_chunk(&world, ChunkCoord::new(0, 0, 0));
//! assert_eq!(world.get_block(BlockPos::new(3, 4, 3)), catalog.lookup("stone").unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod config;
pub mod error;
pub mod noise;
pub mod ore;
pub mod terrain;

pub use biome::{BiomeDefinition, BiomeSelector};
pub use config::{BiomeConfig, GenerationConfig, OreConfigEntry};
pub use error::{ConfigError, ConfigResult};
pub use noise::{Noise2D, SimplexNoise, WorldSeed, NOISE_MAX};
pub use ore::{OreConfig, OreField};
pub use terrain::{TerrainGenerator, TerrainSettings};
