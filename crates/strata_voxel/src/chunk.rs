//! # Chunk Storage
//!
//! A chunk owns a `16x16x16` grid of block IDs for one cubic region of the
//! world. Blocks live in a flat buffer indexed `x + 16 * (y + 16 * z)`.
//!
//! ## Lifecycle
//!
//! 1. `Chunk::new()` - all Air, not yet placed in a world
//! 2. `initialize(coord, link)` - positioned, linked to its world, dirty
//! 3. `set_block_local` / `mark_dirty` - content changes, dirty flag set
//! 4. `rebuild_mesh_if_dirty` - extractor runs, dirty flag cleared
//! 5. `reset()` - back to step 1 for pooled reuse
//!
//! ## Boundary Behavior
//!
//! Local reads outside `[0, 16)` return Air and writes are ignored. Lookups
//! of neighbors outside the chunk go through [`Chunk::neighbor`], which asks
//! the linked world and substitutes a sentinel when the world has no answer.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;

use crate::block::{BlockCatalog, BlockId};
use crate::coords::{BlockPos, ChunkCoord, LocalPos, CHUNK_SIZE, CHUNK_VOLUME};
use crate::extract::MeshExtractor;
use crate::world::WorldLink;

/// A block edit reported to chunk observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockChange {
    /// World position of the edited block.
    pub pos: BlockPos,
    /// Block before the edit.
    pub old: BlockId,
    /// Block after the edit.
    pub new: BlockId,
}

/// Answer to a neighbor query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjacent {
    /// A real block (Air included).
    Block(BlockId),
    /// Below the world floor: treated as solid and opaque so the underside of
    /// the world never produces faces.
    VirtualSolid,
}

impl Adjacent {
    /// Air neighbor.
    pub const AIR: Self = Self::Block(BlockId::AIR);

    /// Returns the block, if this is a real one.
    #[inline]
    #[must_use]
    pub const fn block(self) -> Option<BlockId> {
        match self {
            Self::Block(id) => Some(id),
            Self::VirtualSolid => None,
        }
    }

    /// Returns true if the neighbor is solid.
    #[inline]
    #[must_use]
    pub fn is_solid(self, catalog: &BlockCatalog) -> bool {
        match self {
            Self::Block(id) => catalog.is_solid(id),
            Self::VirtualSolid => true,
        }
    }

    /// Returns true if the neighbor hides faces behind it.
    #[inline]
    #[must_use]
    pub fn is_opaque_solid(self, catalog: &BlockCatalog) -> bool {
        match self {
            Self::Block(id) => catalog.is_opaque_solid(id),
            Self::VirtualSolid => true,
        }
    }
}

/// One cubic region of the voxel grid.
pub struct Chunk {
    /// Position in chunk space. `None` until initialized.
    coord: Option<ChunkCoord>,
    /// Block IDs, exactly `CHUNK_VOLUME` entries.
    blocks: Box<[BlockId]>,
    /// Set on content change, cleared after a mesh rebuild.
    ///
    /// Atomic so a rebuild can clear it while the world is share-locked.
    dirty: AtomicBool,
    /// Number of non-Air cells.
    block_count: u32,
    /// Set once terrain generation has populated this chunk.
    generated: bool,
    /// Non-owning link used to resolve out-of-chunk neighbors.
    world: WorldLink,
    /// Receives a [`BlockChange`] for every effective edit.
    observer: Option<Sender<BlockChange>>,
}

impl Chunk {
    /// Creates an uninitialized, all-Air chunk.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coord: None,
            blocks: vec![BlockId::AIR; CHUNK_VOLUME].into_boxed_slice(),
            dirty: AtomicBool::new(false),
            block_count: 0,
            generated: false,
            world: WorldLink::detached(),
            observer: None,
        }
    }

    /// Places the chunk at `coord`, links it to its world, and clears it to Air.
    ///
    /// The chunk starts dirty so its first mesh gets built.
    pub fn initialize(&mut self, coord: ChunkCoord, world: WorldLink) {
        self.clear_blocks();
        self.coord = Some(coord);
        self.world = world;
        self.generated = false;
        self.dirty.store(true, Ordering::Release);
    }

    /// Clears the chunk for pooled reuse.
    ///
    /// All cells become Air and the position, world link and observer are
    /// dropped.
    pub fn reset(&mut self) {
        self.clear_blocks();
        self.coord = None;
        self.world = WorldLink::detached();
        self.observer = None;
        self.generated = false;
        self.dirty.store(false, Ordering::Release);
    }

    fn clear_blocks(&mut self) {
        self.blocks.fill(BlockId::AIR);
        self.block_count = 0;
    }

    /// Returns the chunk coordinate, if initialized.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> Option<ChunkCoord> {
        self.coord
    }

    /// Returns true once `initialize` has been called (and not undone by `reset`).
    #[inline]
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.coord.is_some()
    }

    /// Returns the world position of the chunk's minimum corner.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Option<BlockPos> {
        self.coord.and_then(ChunkCoord::checked_origin)
    }

    /// Calculates the linear index for a local position.
    #[inline]
    const fn index(local: LocalPos) -> usize {
        local.x + CHUNK_SIZE * (local.y + CHUNK_SIZE * local.z)
    }

    /// Gets the block at a local position.
    #[inline]
    #[must_use]
    pub fn block(&self, local: LocalPos) -> BlockId {
        self.blocks[Self::index(local)]
    }

    /// Gets a block at local coordinates, or Air if any axis is outside
    /// `[0, CHUNK_SIZE)`.
    #[inline]
    #[must_use]
    pub fn get_block_local(&self, x: i32, y: i32, z: i32) -> BlockId {
        LocalPos::from_signed(x, y, z).map_or(BlockId::AIR, |local| self.block(local))
    }

    /// Gets a block by world position, or Air if the position is in another chunk.
    #[must_use]
    pub fn block_at_world(&self, pos: BlockPos) -> BlockId {
        self.coord
            .and_then(|coord| coord.to_local(pos))
            .map_or(BlockId::AIR, |local| self.block(local))
    }

    /// Sets a block at local coordinates.
    ///
    /// Returns `false` without touching anything if the coordinates are out
    /// of range. Writing the value a cell already holds changes nothing: the
    /// dirty flag is left alone and no notification is sent.
    ///
    /// Effective edits mark the chunk dirty and, for an initialized chunk with
    /// an observer, send a [`BlockChange`].
    pub fn set_block_local(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> bool {
        let Some(local) = LocalPos::from_signed(x, y, z) else {
            return false;
        };
        self.set_block(local, block);
        true
    }

    /// Sets the block at a local position. Returns the previous block if it changed.
    pub fn set_block(&mut self, local: LocalPos, block: BlockId) -> Option<BlockId> {
        let index = Self::index(local);
        let old = self.blocks[index];
        if old == block {
            return None;
        }

        if old.is_air() {
            self.block_count += 1;
        } else if block.is_air() {
            self.block_count -= 1;
        }
        self.blocks[index] = block;
        self.dirty.store(true, Ordering::Release);

        if let (Some(observer), Some(origin)) = (&self.observer, self.origin()) {
            let change = BlockChange {
                pos: origin.offset(local.x as i32, local.y as i32, local.z as i32),
                old,
                new: block,
            };
            // A dropped receiver only means nobody is listening anymore.
            let _ = observer.send(change);
        }
        Some(old)
    }

    /// Forces the dirty flag without a content change.
    ///
    /// Used after bulk edits or when a neighboring chunk changed.
    #[inline]
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Returns true if the chunk needs re-meshing.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clears the dirty flag.
    #[inline]
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::Release);
    }

    /// Runs the extractor if the chunk is initialized and dirty, then clears
    /// the dirty flag. Returns `None` when nothing was rebuilt.
    pub fn rebuild_mesh_if_dirty<E>(&self, extractor: &mut E) -> Option<E::Output>
    where
        E: MeshExtractor + ?Sized,
    {
        if !self.is_initialized() || !self.is_dirty() {
            return None;
        }
        let mesh = extractor.build_mesh(self);
        self.clear_dirty();
        Some(mesh)
    }

    /// Resolves the block at local coordinates that may lie outside this chunk.
    ///
    /// Inside the chunk this is a plain lookup. Outside, the linked world is
    /// asked; positions the world rejects below its floor become
    /// [`Adjacent::VirtualSolid`], every other missing answer is Air.
    #[inline]
    #[must_use]
    pub fn neighbor(&self, x: i32, y: i32, z: i32) -> Adjacent {
        if let Some(local) = LocalPos::from_signed(x, y, z) {
            return Adjacent::Block(self.block(local));
        }
        // Positions past the edge of world space have no block.
        match self.origin().and_then(|origin| origin.checked_offset(x, y, z)) {
            Some(pos) => self.world.resolve(pos),
            None => Adjacent::AIR,
        }
    }

    /// Returns the world link.
    #[inline]
    #[must_use]
    pub const fn world(&self) -> &WorldLink {
        &self.world
    }

    /// Registers the channel that receives block edit notifications.
    pub fn subscribe(&mut self, observer: Sender<BlockChange>) {
        self.observer = Some(observer);
    }

    /// Records that terrain generation has populated this chunk.
    #[inline]
    pub fn mark_generated(&mut self) {
        self.generated = true;
    }

    /// Returns true once terrain generation has run.
    #[inline]
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.generated
    }

    /// Number of non-Air cells.
    #[inline]
    #[must_use]
    pub const fn block_count(&self) -> u32 {
        self.block_count
    }

    /// Returns true if every cell is Air.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.block_count == 0
    }

    /// Raw block buffer in index order.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("dirty", &self.is_dirty())
            .field("block_count", &self.block_count)
            .field("generated", &self.generated)
            .field("linked", &self.world.is_attached())
            .finish_non_exhaustive()
    }
}
