//! # Block Catalog
//!
//! Blocks are referenced by identity: chunks store a compact [`BlockId`] per
//! cell and the [`BlockCatalog`] resolves it to the shared [`BlockType`].
//!
//! ID 0 is always Air (non-solid, transparent). Lookups of unknown IDs
//! resolve to Air instead of failing, which keeps neighbor queries total.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use serde::Deserialize;

use crate::error::{CatalogError, CatalogResult};

/// Name reserved for the built-in Air block.
pub const AIR_NAME: &str = "air";

/// Compact block handle issued by a [`BlockCatalog`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Air (always ID 0).
    pub const AIR: Self = Self(0);

    /// Creates a block ID from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw ID.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns true for the Air block.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

/// Linear RGBA color, one `f32` per channel.
///
/// Deserializes from a four element array: `color = [0.4, 0.8, 0.3, 1.0]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Deserialize)]
#[serde(from = "[f32; 4]")]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from its channels.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Returns the channels as an array, the layout vertex buffers use.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Rgba {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

fn default_solid() -> bool {
    true
}

fn default_hardness() -> f32 {
    1.0
}

fn default_color() -> Rgba {
    Rgba::WHITE
}

/// Properties of one kind of block.
///
/// Two block types are the same block iff their names are equal.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockType {
    /// Unique string identifier (e.g. `"stone"`).
    pub name: String,
    /// Solid blocks can own visible faces.
    #[serde(default = "default_solid")]
    pub solid: bool,
    /// Transparent blocks never hide their neighbors' faces.
    #[serde(default)]
    pub transparent: bool,
    /// Mining hardness, `>= 0`.
    #[serde(default = "default_hardness")]
    pub hardness: f32,
    /// Flat color used for vertex shading.
    #[serde(default = "default_color")]
    pub color: Rgba,
    /// Item dropped when the block is broken. Items live outside this crate.
    #[serde(default)]
    pub drops: Option<String>,
}

impl BlockType {
    /// Creates a solid, opaque block with the given color.
    #[must_use]
    pub fn solid(name: impl Into<String>, color: Rgba) -> Self {
        Self {
            name: name.into(),
            solid: true,
            transparent: false,
            hardness: default_hardness(),
            color,
            drops: None,
        }
    }

    /// Creates a solid block that does not hide neighboring faces (glass, leaves).
    #[must_use]
    pub fn translucent(name: impl Into<String>, color: Rgba) -> Self {
        Self {
            transparent: true,
            ..Self::solid(name, color)
        }
    }

    /// Creates a non-solid, transparent block (water, gas).
    #[must_use]
    pub fn fluid(name: impl Into<String>, color: Rgba) -> Self {
        Self {
            solid: false,
            transparent: true,
            hardness: 0.0,
            ..Self::solid(name, color)
        }
    }

    /// Sets the hardness.
    #[must_use]
    pub fn with_hardness(mut self, hardness: f32) -> Self {
        self.hardness = hardness;
        self
    }

    /// Sets the dropped item.
    #[must_use]
    pub fn with_drops(mut self, item: impl Into<String>) -> Self {
        self.drops = Some(item.into());
        self
    }

    /// The Air block.
    #[must_use]
    pub fn air() -> Self {
        Self {
            name: AIR_NAME.to_owned(),
            solid: false,
            transparent: true,
            hardness: 0.0,
            color: Rgba::TRANSPARENT,
            drops: None,
        }
    }

    /// Returns true if the block is solid and hides the faces behind it.
    #[inline]
    #[must_use]
    pub fn is_opaque_solid(&self) -> bool {
        self.solid && !self.transparent
    }
}

impl PartialEq for BlockType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for BlockType {}

/// Registry resolving [`BlockId`]s to [`BlockType`]s.
#[derive(Clone, Debug)]
pub struct BlockCatalog {
    /// Block properties indexed by ID. Index 0 is Air.
    blocks: Vec<BlockType>,
    /// Name to ID lookup.
    by_name: HashMap<String, BlockId>,
}

impl BlockCatalog {
    /// Creates a catalog containing only Air.
    #[must_use]
    pub fn new() -> Self {
        let mut by_name = HashMap::new();
        by_name.insert(AIR_NAME.to_owned(), BlockId::AIR);
        Self {
            blocks: vec![BlockType::air()],
            by_name,
        }
    }

    /// Builds a catalog from a list of block definitions, in order.
    ///
    /// # Errors
    ///
    /// Returns the first registration error.
    pub fn from_definitions(definitions: impl IntoIterator<Item = BlockType>) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        for block in definitions {
            catalog.register(block)?;
        }
        Ok(catalog)
    }

    /// Registers a block and returns its ID.
    ///
    /// # Errors
    ///
    /// Fails on duplicate or reserved names, invalid hardness, or when the
    /// ID space is exhausted.
    pub fn register(&mut self, block: BlockType) -> CatalogResult<BlockId> {
        if block.name == AIR_NAME {
            return Err(CatalogError::ReservedName(block.name));
        }
        if self.by_name.contains_key(&block.name) {
            return Err(CatalogError::DuplicateBlock(block.name));
        }
        if !block.hardness.is_finite() || block.hardness < 0.0 {
            return Err(CatalogError::InvalidHardness {
                name: block.name,
                hardness: block.hardness,
            });
        }
        let raw = u16::try_from(self.blocks.len())
            .map_err(|_| CatalogError::CatalogFull(self.blocks.len()))?;
        let id = BlockId(raw);

        self.by_name.insert(block.name.clone(), id);
        self.blocks.push(block);
        Ok(id)
    }

    /// Looks up a block by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Looks up a block by name, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownBlock`] if no block has this name.
    pub fn id(&self, name: &str) -> CatalogResult<BlockId> {
        self.lookup(name)
            .ok_or_else(|| CatalogError::UnknownBlock(name.to_owned()))
    }

    /// Returns the properties of a block. Unknown IDs resolve to Air.
    #[inline]
    #[must_use]
    pub fn get(&self, id: BlockId) -> &BlockType {
        self.blocks
            .get(usize::from(id.0))
            .unwrap_or(&self.blocks[0])
    }

    /// Returns the Air block.
    #[inline]
    #[must_use]
    pub fn air(&self) -> &BlockType {
        &self.blocks[0]
    }

    /// Returns true if the block is solid.
    #[inline]
    #[must_use]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).solid
    }

    /// Returns true if the block is solid and opaque.
    #[inline]
    #[must_use]
    pub fn is_opaque_solid(&self, id: BlockId) -> bool {
        self.get(id).is_opaque_solid()
    }

    /// Returns the flat color of a block.
    #[inline]
    #[must_use]
    pub fn color(&self, id: BlockId) -> Rgba {
        self.get(id).color
    }

    /// Number of registered blocks, Air included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: Air is always registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over all blocks with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockType)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (BlockId(index as u16), block))
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::new()
    }
}
