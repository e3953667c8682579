//! # Terrain Generation
//!
//! Fills chunks column by column:
//!
//! ```text
//!   y > surface                  water up to water_level, then Air
//!   y == surface                 top (beach near water)
//!   surface - filler_depth < y   filler (beach near water)
//!   below                        stone, or ore where a vein matches
//! ```
//!
//! Trees are placed afterwards from a per-column RNG. Generation only reads
//! the chunk being generated, so chunks can be generated in any order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use strata_voxel::{BlockId, BlockPos, Chunk, ChunkCoord, VoxelWorld, CHUNK_SIZE_I32};

use crate::biome::{BiomeDefinition, BiomeSelector};
use crate::noise::{to_unit, SimplexNoise, WorldSeed};
use crate::ore::OreField;

/// Sub-seed purposes.
mod purpose {
    pub const BIOME: u64 = 0x4249_4f4d;
    pub const HEIGHT: u64 = 0x4845_4947;
    pub const ORE: u64 = 0x4f52_4553;
    pub const TREES: u64 = 0x5452_4545;
}

/// Shortest tree trunk.
const MIN_TRUNK: i32 = 4;
/// Tallest tree trunk.
const MAX_TRUNK: i32 = 6;
/// Horizontal canopy radius.
const CANOPY_RADIUS: i32 = 2;

/// Noise frequencies shared by every biome.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Biome noise frequency. Smaller means larger biomes.
    pub biome_scale: f64,
    /// Biome noise offset.
    pub biome_offset: f64,
    /// Height noise frequency.
    pub height_scale: f64,
    /// Height noise octaves.
    pub height_octaves: u32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            biome_scale: 0.005,
            biome_offset: 1024.0,
            height_scale: 0.02,
            height_octaves: 4,
        }
    }
}

/// Populates chunks with biome terrain, ores and trees.
///
/// # Example
///
/// ```rust
/// use strata_procedural::{BiomeDefinition, TerrainGenerator, TerrainSettings, WorldSeed};
/// use strata_voxel::{BlockId, ChunkCoord, VoxelWorld, WorldBounds};
///
/// let plains = BiomeDefinition::new("plains", BlockId(1), BlockId(2), BlockId(3)).with_height(8, 4);
/// let generator = TerrainGenerator::new(WorldSeed::new(7), vec![plains], TerrainSettings::default());
///
/// let world = VoxelWorld::new(WorldBounds::default());
/// assert!(generator.generate_chunk(&world, ChunkCoord::new(0, 0, 0)));
/// assert!(world.with_chunk(ChunkCoord::new(0, 0, 0), |c| c.is_generated()).unwrap());
/// ```
#[derive(Debug)]
pub struct TerrainGenerator {
    seed: WorldSeed,
    selector: BiomeSelector,
    height_noise: SimplexNoise,
    ores: OreField,
    settings: TerrainSettings,
}

impl TerrainGenerator {
    /// Creates a generator for `biomes`, every noise derived from `seed`.
    #[must_use]
    pub fn new(seed: WorldSeed, biomes: Vec<BiomeDefinition>, settings: TerrainSettings) -> Self {
        let ore_seed = seed.derive(purpose::ORE);
        // Keep the offset small enough that f64 noise inputs stay precise.
        let ore_offset = (ore_seed.value() % 4096) as f64;

        Self {
            seed,
            selector: BiomeSelector::new(
                biomes,
                SimplexNoise::new(seed.derive(purpose::BIOME)),
                settings.biome_offset,
                settings.biome_scale,
            ),
            height_noise: SimplexNoise::new(seed.derive(purpose::HEIGHT)),
            ores: OreField::new(SimplexNoise::new(ore_seed), ore_offset),
            settings,
        }
    }

    /// Returns the world seed.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Returns the configured biomes.
    #[must_use]
    pub fn biomes(&self) -> &[BiomeDefinition] {
        self.selector.biomes()
    }

    /// Biome owning column `(x, z)`.
    #[must_use]
    pub fn biome_at(&self, x: i32, z: i32) -> Option<&BiomeDefinition> {
        self.selector.select(x, z)
    }

    /// Surface height of column `(x, z)`, or `None` if no biome covers it.
    #[must_use]
    pub fn surface_height(&self, x: i32, z: i32) -> Option<i32> {
        self.biome_at(x, z).map(|biome| self.column_height(biome, x, z))
    }

    fn column_height(&self, biome: &BiomeDefinition, x: i32, z: i32) -> i32 {
        let scale = self.settings.height_scale;
        let raw = self.height_noise.octaved(
            f64::from(x) * scale,
            f64::from(z) * scale,
            self.settings.height_octaves,
            0.5,
            2.0,
        );
        let variation = (to_unit(raw) * f64::from(biome.height_variation.max(0))).floor() as i32;
        biome.base_height.saturating_add(variation)
    }

    /// Block for world position `pos` in a column of `biome` with the given surface.
    fn column_block(&self, biome: &BiomeDefinition, pos: BlockPos, surface: i32) -> BlockId {
        let y = pos.y;
        let beach = biome.is_beach(surface);

        if y > surface {
            if y <= biome.water_level {
                biome.water
            } else {
                BlockId::AIR
            }
        } else if y == surface {
            if beach {
                biome.beach
            } else {
                biome.top
            }
        } else if y > surface.saturating_sub(biome.filler_depth) && y > biome.stone_start_height {
            if beach {
                biome.beach
            } else {
                biome.filler
            }
        } else {
            self.ores
                .ore_for(biome, pos, surface, biome.stone)
                .unwrap_or(biome.stone)
        }
    }

    /// Fills an initialized chunk and marks it generated.
    ///
    /// Columns without a biome are left as Air.
    pub fn populate(&self, chunk: &mut Chunk) {
        let (Some(coord), Some(origin)) = (chunk.coord(), chunk.origin()) else {
            tracing::warn!("populate called on a chunk without a world origin");
            return;
        };
        let mut skipped = 0u32;

        for lz in 0..CHUNK_SIZE_I32 {
            for lx in 0..CHUNK_SIZE_I32 {
                let (x, z) = (origin.x + lx, origin.z + lz);
                let Some(biome) = self.biome_at(x, z) else {
                    skipped += 1;
                    continue;
                };
                let surface = self.column_height(biome, x, z);

                for ly in 0..CHUNK_SIZE_I32 {
                    let pos = BlockPos::new(x, origin.y + ly, z);
                    let block = self.column_block(biome, pos, surface);
                    if !block.is_air() {
                        chunk.set_block_local(lx, ly, lz, block);
                    }
                }
            }
        }

        if skipped > 0 {
            tracing::debug!(
                x = coord.x,
                y = coord.y,
                z = coord.z,
                columns = skipped,
                "no biome configured, columns left empty"
            );
        }
        self.plant_trees(chunk, origin);

        chunk.mark_generated();
        tracing::trace!(
            x = coord.x,
            y = coord.y,
            z = coord.z,
            blocks = chunk.block_count(),
            "chunk generated"
        );
    }

    /// Creates the chunk at `coord` in `world` and populates it.
    ///
    /// Returns `false` if the chunk already existed.
    pub fn generate_chunk(&self, world: &VoxelWorld, coord: ChunkCoord) -> bool {
        world.create_chunk(coord, |chunk| self.populate(chunk))
    }

    fn plant_trees(&self, chunk: &mut Chunk, origin: BlockPos) {
        let tree_seed = self.seed.derive(purpose::TREES);

        for lz in 0..CHUNK_SIZE_I32 {
            for lx in 0..CHUNK_SIZE_I32 {
                let (x, z) = (origin.x + lx, origin.z + lz);
                let Some(biome) = self.biome_at(x, z) else {
                    continue;
                };
                let (Some(trunk), Some(leaves)) = (biome.trunk, biome.leaves) else {
                    continue;
                };
                if biome.tree_chance <= 0.0 {
                    continue;
                }
                let surface = self.column_height(biome, x, z);
                if biome.is_beach(surface) {
                    continue;
                }

                let column = (u64::from(x as u32) << 32) | u64::from(z as u32);
                let mut rng = ChaCha8Rng::seed_from_u64(tree_seed.derive(column).value());
                if rng.gen::<f32>() >= biome.tree_chance {
                    continue;
                }
                let height = rng.gen_range(MIN_TRUNK..=MAX_TRUNK);

                let base = surface.saturating_add(1).saturating_sub(origin.y);
                place_tree(chunk, lx, base, lz, height, trunk, leaves);
            }
        }
    }
}

/// Places a tree whose trunk starts at local `(x, base, z)` if the whole tree
/// fits in the chunk. Returns true if it was placed.
fn place_tree(
    chunk: &mut Chunk,
    x: i32,
    base: i32,
    z: i32,
    height: i32,
    trunk: BlockId,
    leaves: BlockId,
) -> bool {
    let top = base.saturating_add(height - 1);
    let fits = base >= 0
        && top < CHUNK_SIZE_I32 - 1
        && x - CANOPY_RADIUS >= 0
        && x + CANOPY_RADIUS < CHUNK_SIZE_I32
        && z - CANOPY_RADIUS >= 0
        && z + CANOPY_RADIUS < CHUNK_SIZE_I32;
    if !fits {
        return false;
    }

    // Two wide layers around the trunk top, one narrow cap above it.
    for y in top - 1..=top + 1 {
        let radius = if y > top { 1 } else { CANOPY_RADIUS };
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if chunk.get_block_local(x + dx, y, z + dz).is_air() {
                    chunk.set_block_local(x + dx, y, z + dz, leaves);
                }
            }
        }
    }
    for y in base..=top {
        chunk.set_block_local(x, y, z, trunk);
    }
    true
}
