//! # STRATA Voxel Storage
//!
//! Chunked block storage for the STRATA terrain core.
//!
//! ## Design Principles
//!
//! 1. **Total**: reads outside a chunk or world return Air, writes are no-ops
//! 2. **By identity**: cells store [`BlockId`]s, the [`BlockCatalog`] owns properties
//! 3. **Dirty tracking**: chunks remember whether their mesh is stale
//! 4. **Non-owning links**: chunks reach their world through a weak handle
//!
//! ## Core Components
//!
//! - `BlockCatalog`: block properties and the Air sentinel
//! - `Chunk`: flat `16^3` grid, dirty flag, change notifications
//! - `VoxelWorld`: chunk map and cross-chunk neighbor resolution
//! - `ChunkPool`: recycled chunk allocations
//! - `MeshExtractor`: the seam surface extraction plugs into
//!
//! ## Example
//!
//! ```rust
//! use strata_voxel::{BlockCatalog, BlockPos, BlockType, ChunkCoord, Rgba, VoxelWorld, WorldBounds};
//!
//! let mut catalog = BlockCatalog::new();
//! let stone = catalog.register(BlockType::solid("stone", Rgba::rgb(0.5, 0.5, 0.5))).unwrap();
//!
//! let world = VoxelWorld::new(WorldBounds::default());
//! world.create_chunk(ChunkCoord::new(-1, 0, 0), |chunk| {
//!     chunk.set_block_local(15, 0, 0, stone);
//! });
//! assert_eq!(world.get_block(BlockPos::new(-1, 0, 0)), stone);
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod chunk;
pub mod coords;
pub mod error;
pub mod extract;
pub mod pool;
pub mod world;

pub use block::{BlockCatalog, BlockId, BlockType, Rgba, AIR_NAME};
pub use chunk::{Adjacent, BlockChange, Chunk};
pub use coords::{BlockPos, ChunkCoord, Face, LocalPos, CHUNK_SIZE, CHUNK_SIZE_I32, CHUNK_VOLUME};
pub use error::{CatalogError, CatalogResult};
pub use extract::MeshExtractor;
pub use pool::ChunkPool;
pub use world::{VoxelWorld, WorldAccess, WorldBounds, WorldLink};
