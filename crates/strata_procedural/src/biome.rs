//! # Biome Selection
//!
//! Every world column `(x, z)` belongs to exactly one biome, chosen by
//! sampling a 2D noise field and bucketing the result into the configured
//! biome list.

use strata_voxel::BlockId;

use crate::noise::{Noise2D, SimplexNoise};
use crate::ore::OreConfig;

/// Blocks and terrain shape for one biome.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDefinition {
    /// Biome name, for logs and config errors.
    pub name: String,
    /// Surface block (grass, sand, snow).
    pub top: BlockId,
    /// Layer between surface and stone.
    pub filler: BlockId,
    /// Bulk underground block. Ores only ever replace this block.
    pub stone: BlockId,
    /// Fills air at or below `water_level`.
    pub water: BlockId,
    /// Surface and filler of columns at or just above the water line.
    pub beach: BlockId,
    /// Lowest surface height.
    pub base_height: i32,
    /// Surface height spread above `base_height`.
    pub height_variation: i32,
    /// Thickness of the filler layer.
    pub filler_depth: i32,
    /// Everything at or below this height is stone.
    pub stone_start_height: i32,
    /// Water surface height.
    pub water_level: i32,
    /// Chance in `[0, 1]` that a column grows a tree.
    pub tree_chance: f32,
    /// Tree trunk block. No trees without it.
    pub trunk: Option<BlockId>,
    /// Tree canopy block. No trees without it.
    pub leaves: Option<BlockId>,
    /// Ores, checked in order; the first match wins.
    pub ores: Vec<OreConfig>,
}

impl BiomeDefinition {
    /// Creates a biome with no water, trees or ores.
    ///
    /// `top`, `filler` and `stone` are used as given; beach columns reuse `top`.
    #[must_use]
    pub fn new(name: impl Into<String>, top: BlockId, filler: BlockId, stone: BlockId) -> Self {
        Self {
            name: name.into(),
            top,
            filler,
            stone,
            water: BlockId::AIR,
            beach: top,
            base_height: 8,
            height_variation: 0,
            filler_depth: 3,
            stone_start_height: i32::MIN,
            water_level: i32::MIN,
            tree_chance: 0.0,
            trunk: None,
            leaves: None,
            ores: Vec::new(),
        }
    }

    /// Sets the surface height range.
    #[must_use]
    pub const fn with_height(mut self, base_height: i32, height_variation: i32) -> Self {
        self.base_height = base_height;
        self.height_variation = height_variation;
        self
    }

    /// Sets the water block and level.
    #[must_use]
    pub const fn with_water(mut self, water: BlockId, water_level: i32) -> Self {
        self.water = water;
        self.water_level = water_level;
        self
    }

    /// Appends an ore, checked after the ones already present.
    #[must_use]
    pub fn with_ore(mut self, ore: OreConfig) -> Self {
        self.ores.push(ore);
        self
    }

    /// Enables trees.
    #[must_use]
    pub const fn with_trees(mut self, trunk: BlockId, leaves: BlockId, chance: f32) -> Self {
        self.trunk = Some(trunk);
        self.leaves = Some(leaves);
        self.tree_chance = chance;
        self
    }

    /// Returns true if a column with this surface height is a beach.
    #[inline]
    #[must_use]
    pub const fn is_beach(&self, surface: i32) -> bool {
        surface <= self.water_level.saturating_add(1)
    }
}

/// Picks the biome for a world column.
///
/// Pure: the same biomes, noise, offset and column always give the same
/// answer.
#[derive(Debug)]
pub struct BiomeSelector<N = SimplexNoise> {
    biomes: Vec<BiomeDefinition>,
    noise: N,
    seed_offset: f64,
    scale: f64,
}

impl<N: Noise2D> BiomeSelector<N> {
    /// Creates a selector over `biomes`.
    ///
    /// Columns are sampled at `((x + seed_offset) * scale, (z + seed_offset) * scale)`.
    #[must_use]
    pub fn new(biomes: Vec<BiomeDefinition>, noise: N, seed_offset: f64, scale: f64) -> Self {
        Self {
            biomes,
            noise,
            seed_offset,
            scale,
        }
    }

    /// Index of the biome owning column `(x, z)`, or `None` with no biomes.
    #[must_use]
    pub fn index_at(&self, x: i32, z: i32) -> Option<usize> {
        match self.biomes.len() {
            0 => None,
            1 => Some(0),
            count => {
                let sample = self.noise.noise_2d(
                    (f64::from(x) + self.seed_offset) * self.scale,
                    (f64::from(z) + self.seed_offset) * self.scale,
                );
                let index = (sample * count as f64).floor() as usize;
                Some(index.min(count - 1))
            }
        }
    }

    /// Biome owning column `(x, z)`, or `None` with no biomes.
    #[must_use]
    pub fn select(&self, x: i32, z: i32) -> Option<&BiomeDefinition> {
        self.index_at(x, z).map(|index| &self.biomes[index])
    }

    /// The configured biomes, in selection order.
    #[must_use]
    pub fn biomes(&self) -> &[BiomeDefinition] {
        &self.biomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WorldSeed;

    struct Fixed(f64);

    impl Noise2D for Fixed {
        fn noise_2d(&self, _x: f64, _y: f64) -> f64 {
            self.0
        }
    }

    fn biome(name: &str, top: u16) -> BiomeDefinition {
        BiomeDefinition::new(name, BlockId(top), BlockId(10), BlockId(11))
    }

    fn three() -> Vec<BiomeDefinition> {
        vec![biome("plains", 1), biome("desert", 2), biome("tundra", 3)]
    }

    #[test]
    fn test_no_biomes() {
        let selector = BiomeSelector::new(Vec::new(), Fixed(0.5), 0.0, 1.0);
        assert!(selector.select(0, 0).is_none());
    }

    #[test]
    fn test_single_biome_always_selected() {
        let selector = BiomeSelector::new(vec![biome("only", 1)], Fixed(0.99), 0.0, 1.0);
        for x in -50..50 {
            assert_eq!(selector.select(x, x * 3).map(|b| b.name.as_str()), Some("only"));
        }
    }

    #[test]
    fn test_noise_buckets() {
        let pick = |value| BiomeSelector::new(three(), Fixed(value), 0.0, 1.0).index_at(7, 7);
        assert_eq!(pick(0.0), Some(0));
        assert_eq!(pick(0.33), Some(0));
        assert_eq!(pick(0.34), Some(1));
        assert_eq!(pick(0.67), Some(2));
        assert_eq!(pick(crate::noise::NOISE_MAX), Some(2));
    }

    #[test]
    fn test_out_of_range_noise_is_clamped() {
        let selector = BiomeSelector::new(three(), Fixed(1.0), 0.0, 1.0);
        assert_eq!(selector.index_at(0, 0), Some(2));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let seed = WorldSeed::new(99);
        let a = BiomeSelector::new(three(), SimplexNoise::new(seed), 1000.0, 0.05);
        let b = BiomeSelector::new(three(), SimplexNoise::new(seed), 1000.0, 0.05);

        for x in -64..64 {
            for z in (-64..64).step_by(7) {
                assert_eq!(a.index_at(x, z), b.index_at(x, z));
            }
        }
    }

    #[test]
    fn test_all_biomes_reachable() {
        let selector = BiomeSelector::new(three(), SimplexNoise::new(WorldSeed::new(7)), 0.0, 0.05);
        let mut seen = [false; 3];
        for x in -256..256 {
            for z in (-256..256).step_by(16) {
                if let Some(index) = selector.index_at(x, z) {
                    seen[index] = true;
                }
            }
        }
        assert_eq!(seen, [true; 3]);
    }
}
