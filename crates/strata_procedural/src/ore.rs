//! # Ore Veins
//!
//! Ore placement samples three axis-aligned 2D noise planes (XY, YZ, XZ) and
//! multiplies them. A product is only small where all three planes are low
//! at once, which clusters ore into localized pockets instead of smooth
//! bands.

use strata_voxel::{BlockId, BlockPos};

use crate::biome::BiomeDefinition;
use crate::noise::{Noise2D, SimplexNoise};

/// One ore a biome may contain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OreConfig {
    /// Ore block.
    pub block: BlockId,
    /// Shallowest depth below the column surface, inclusive.
    pub min_depth: i32,
    /// Deepest depth below the column surface, inclusive.
    pub max_depth: i32,
    /// Placement threshold in `[0, 1]`; higher means more ore.
    pub spawn_chance: f32,
    /// Noise frequency; higher means smaller, more frequent pockets.
    pub noise_scale: f64,
}

impl OreConfig {
    /// Creates an ore config.
    #[must_use]
    pub const fn new(
        block: BlockId,
        min_depth: i32,
        max_depth: i32,
        spawn_chance: f32,
        noise_scale: f64,
    ) -> Self {
        Self {
            block,
            min_depth,
            max_depth,
            spawn_chance,
            noise_scale,
        }
    }

    /// Returns true if `depth` lies in `[min_depth, max_depth]`.
    #[inline]
    #[must_use]
    pub const fn contains_depth(&self, depth: i32) -> bool {
        depth >= self.min_depth && depth <= self.max_depth
    }
}

/// Decides where ore replaces stone.
#[derive(Debug)]
pub struct OreField<N = SimplexNoise> {
    noise: N,
    seed_offset: f64,
}

impl<N: Noise2D> OreField<N> {
    /// Creates a field sampling `noise`, shifted by `seed_offset`.
    #[must_use]
    pub const fn new(noise: N, seed_offset: f64) -> Self {
        Self { noise, seed_offset }
    }

    /// Product of the three plane samples at `pos`, in `[0, 1)`.
    #[must_use]
    pub fn vein_density(&self, pos: BlockPos, noise_scale: f64) -> f64 {
        let x = f64::from(pos.x) * noise_scale + self.seed_offset;
        let y = f64::from(pos.y) * noise_scale + self.seed_offset;
        let z = f64::from(pos.z) * noise_scale + self.seed_offset;

        let xy = self.noise.noise_2d(x, y);
        let yz = self.noise.noise_2d(y, z);
        let xz = self.noise.noise_2d(x, z);
        xy * yz * xz
    }

    /// Returns true if `ore` belongs at `pos` in a column whose surface is at
    /// `surface_height`.
    #[must_use]
    pub fn matches(&self, ore: &OreConfig, pos: BlockPos, surface_height: i32) -> bool {
        let depth = surface_height.saturating_sub(pos.y);
        if !ore.contains_depth(depth) {
            return false;
        }
        self.vein_density(pos, ore.noise_scale) < f64::from(ore.spawn_chance)
    }

    /// First ore in `ores` that matches at `pos`.
    #[must_use]
    pub fn select<'a>(
        &self,
        ores: &'a [OreConfig],
        pos: BlockPos,
        surface_height: i32,
    ) -> Option<&'a OreConfig> {
        ores.iter().find(|ore| self.matches(ore, pos, surface_height))
    }

    /// Ore block to place at `pos` given the block currently there.
    ///
    /// Only the biome's stone is ever replaced; anything else yields `None`.
    #[must_use]
    pub fn ore_for(
        &self,
        biome: &BiomeDefinition,
        pos: BlockPos,
        surface_height: i32,
        current: BlockId,
    ) -> Option<BlockId> {
        if current != biome.stone {
            return None;
        }
        self.select(&biome.ores, pos, surface_height)
            .map(|ore| ore.block)
    }
}
