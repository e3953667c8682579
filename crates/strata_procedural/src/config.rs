//! # Generation Config
//!
//! One TOML document describes a whole generated world:
//!
//! ```toml
//! seed = 1337
//!
//! [world]
//! min_y = 0
//! height = 128
//!
//! [terrain]
//! biome_scale = 0.004
//!
//! [[blocks]]
//! name = "stone"
//! color = [0.5, 0.5, 0.5, 1.0]
//!
//! [[biomes]]
//! name = "plains"
//! top = "grass"
//! filler = "dirt"
//! stone = "stone"
//! base_height = 32
//! height_variation = 12
//!
//! [[biomes.ores]]
//! block = "coal_ore"
//! min_depth = 4
//! max_depth = 40
//! spawn_chance = 0.08
//! noise_scale = 0.15
//! ```
//!
//! Blocks are named by string in the config and resolved against the
//! [`BlockCatalog`] built from `[[blocks]]`.

use std::path::Path;

use serde::Deserialize;
use strata_voxel::{BlockCatalog, BlockId, BlockType, WorldBounds};

use crate::biome::BiomeDefinition;
use crate::error::{ConfigError, ConfigResult};
use crate::noise::WorldSeed;
use crate::ore::OreConfig;
use crate::terrain::{TerrainGenerator, TerrainSettings};

fn default_filler_depth() -> i32 {
    3
}

/// Biome as written in config.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BiomeConfig {
    /// Biome name.
    pub name: String,
    /// Surface block.
    pub top: String,
    /// Filler block.
    pub filler: String,
    /// Stone block.
    pub stone: String,
    /// Water block. No water when absent.
    #[serde(default)]
    pub water: Option<String>,
    /// Beach block. Defaults to `top`.
    #[serde(default)]
    pub beach: Option<String>,
    /// Lowest surface height.
    pub base_height: i32,
    /// Surface height spread.
    #[serde(default)]
    pub height_variation: i32,
    /// Filler thickness.
    #[serde(default = "default_filler_depth")]
    pub filler_depth: i32,
    /// Everything at or below this height is stone.
    #[serde(default)]
    pub stone_start_height: Option<i32>,
    /// Water surface height.
    #[serde(default)]
    pub water_level: Option<i32>,
    /// Chance in `[0, 1]` of a tree per column.
    #[serde(default)]
    pub tree_chance: f32,
    /// Tree trunk block.
    #[serde(default)]
    pub trunk: Option<String>,
    /// Tree canopy block.
    #[serde(default)]
    pub leaves: Option<String>,
    /// Ores, first match wins.
    #[serde(default)]
    pub ores: Vec<OreConfigEntry>,
}

/// Ore as written in config.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OreConfigEntry {
    /// Ore block name.
    pub block: String,
    /// Shallowest depth, inclusive.
    pub min_depth: i32,
    /// Deepest depth, inclusive.
    pub max_depth: i32,
    /// Placement threshold in `[0, 1]`.
    pub spawn_chance: f32,
    /// Noise frequency, `> 0`.
    pub noise_scale: f64,
}

/// Complete world generation config.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// World seed.
    #[serde(default)]
    pub seed: u64,
    /// World extent.
    #[serde(default)]
    pub world: WorldBounds,
    /// Noise frequencies.
    #[serde(default)]
    pub terrain: TerrainSettings,
    /// Block definitions, registered in order after Air.
    #[serde(default)]
    pub blocks: Vec<BlockType>,
    /// Biomes, in selection order.
    #[serde(default)]
    pub biomes: Vec<BiomeConfig>,
}

impl GenerationConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown fields,
    /// and [`ConfigError::InvalidWorld`] for unusable `[world]` bounds.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        validate_world(&config.world)?;
        Ok(config)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`GenerationConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            blocks = config.blocks.len(),
            biomes = config.biomes.len(),
            "generation config loaded"
        );
        Ok(config)
    }

    /// Returns the world seed.
    #[must_use]
    pub const fn world_seed(&self) -> WorldSeed {
        WorldSeed::new(self.seed)
    }

    /// Builds the block catalog from `[[blocks]]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Catalog`] for duplicate, reserved or invalid blocks.
    pub fn build_catalog(&self) -> ConfigResult<BlockCatalog> {
        Ok(BlockCatalog::from_definitions(self.blocks.iter().cloned())?)
    }

    /// Resolves and validates every biome against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownBlock`] for unresolved names, and
    /// [`ConfigError::InvalidBiome`] / [`ConfigError::InvalidOre`] for
    /// parameters out of range.
    pub fn build_biomes(&self, catalog: &BlockCatalog) -> ConfigResult<Vec<BiomeDefinition>> {
        self.biomes
            .iter()
            .map(|biome| biome.resolve(catalog))
            .collect()
    }

    /// Builds a terrain generator for this config.
    ///
    /// # Errors
    ///
    /// Same as [`GenerationConfig::build_biomes`].
    pub fn build_generator(&self, catalog: &BlockCatalog) -> ConfigResult<TerrainGenerator> {
        let biomes = self.build_biomes(catalog)?;
        if biomes.is_empty() {
            tracing::warn!("no biomes configured, generated chunks will be empty");
        }
        Ok(TerrainGenerator::new(
            self.world_seed(),
            biomes,
            self.terrain.clone(),
        ))
    }
}

/// World bounds must hold at least one layer, end inside the `i32` range and
/// have a positive horizontal limit when one is set.
fn validate_world(world: &WorldBounds) -> ConfigResult<()> {
    let invalid = |reason: String| Err(ConfigError::InvalidWorld { reason });

    if world.height <= 0 {
        return invalid(format!("height {} must be positive", world.height));
    }
    if world.min_y.checked_add(world.height).is_none() {
        return invalid(format!(
            "min_y {} plus height {} overflows",
            world.min_y, world.height
        ));
    }
    match world.horizontal_limit {
        Some(limit) if limit <= 0 => invalid(format!("horizontal_limit {limit} must be positive")),
        _ => Ok(()),
    }
}

impl BiomeConfig {
    fn block(&self, catalog: &BlockCatalog, name: &str) -> ConfigResult<BlockId> {
        catalog.lookup(name).ok_or_else(|| ConfigError::UnknownBlock {
            biome: self.name.clone(),
            block: name.to_owned(),
        })
    }

    fn optional_block(&self, catalog: &BlockCatalog, name: Option<&str>) -> ConfigResult<Option<BlockId>> {
        name.map(|name| self.block(catalog, name)).transpose()
    }

    fn invalid(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidBiome {
            biome: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Resolves block names and validates parameters.
    fn resolve(&self, catalog: &BlockCatalog) -> ConfigResult<BiomeDefinition> {
        if self.height_variation < 0 {
            return Err(self.invalid(format!("height_variation {} is negative", self.height_variation)));
        }
        if self.filler_depth < 0 {
            return Err(self.invalid(format!("filler_depth {} is negative", self.filler_depth)));
        }
        if self.base_height.checked_add(self.height_variation).is_none() {
            return Err(self.invalid(format!(
                "base_height {} plus height_variation {} overflows",
                self.base_height, self.height_variation
            )));
        }
        if self.base_height.checked_sub(self.filler_depth).is_none() {
            return Err(self.invalid(format!(
                "base_height {} minus filler_depth {} overflows",
                self.base_height, self.filler_depth
            )));
        }
        if !(0.0..=1.0).contains(&self.tree_chance) {
            return Err(self.invalid(format!("tree_chance {} is outside [0, 1]", self.tree_chance)));
        }
        if self.water.is_some() != self.water_level.is_some() {
            return Err(self.invalid("water and water_level must be set together"));
        }

        let top = self.block(catalog, &self.top)?;
        let ores = self
            .ores
            .iter()
            .map(|ore| self.resolve_ore(catalog, ore))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(BiomeDefinition {
            name: self.name.clone(),
            top,
            filler: self.block(catalog, &self.filler)?,
            stone: self.block(catalog, &self.stone)?,
            water: self.optional_block(catalog, self.water.as_deref())?.unwrap_or(BlockId::AIR),
            beach: self.optional_block(catalog, self.beach.as_deref())?.unwrap_or(top),
            base_height: self.base_height,
            height_variation: self.height_variation,
            filler_depth: self.filler_depth,
            stone_start_height: self.stone_start_height.unwrap_or(i32::MIN),
            water_level: self.water_level.unwrap_or(i32::MIN),
            tree_chance: self.tree_chance,
            trunk: self.optional_block(catalog, self.trunk.as_deref())?,
            leaves: self.optional_block(catalog, self.leaves.as_deref())?,
            ores,
        })
    }

    fn resolve_ore(&self, catalog: &BlockCatalog, ore: &OreConfigEntry) -> ConfigResult<OreConfig> {
        let invalid = |reason: String| ConfigError::InvalidOre {
            biome: self.name.clone(),
            ore: ore.block.clone(),
            reason,
        };

        if ore.min_depth > ore.max_depth {
            return Err(invalid(format!(
                "min_depth {} is greater than max_depth {}",
                ore.min_depth, ore.max_depth
            )));
        }
        if !(0.0..=1.0).contains(&ore.spawn_chance) {
            return Err(invalid(format!("spawn_chance {} is outside [0, 1]", ore.spawn_chance)));
        }
        if ore.noise_scale <= 0.0 || !ore.noise_scale.is_finite() {
            return Err(invalid(format!("noise_scale {} must be positive", ore.noise_scale)));
        }

        Ok(OreConfig::new(
            self.block(catalog, &ore.block)?,
            ore.min_depth,
            ore.max_depth,
            ore.spawn_chance,
            ore.noise_scale,
        ))
    }
}
