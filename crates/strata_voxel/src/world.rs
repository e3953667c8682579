//! # Voxel World
//!
//! Owns the loaded chunks and answers block queries that cross chunk borders.
//!
//! Chunks hold a [`WorldLink`] back to their world: a weak, non-owning handle
//! resolved on every out-of-chunk lookup. A chunk never keeps its world
//! alive, and a chunk whose world is gone sees Air past its borders.
//!
//! ## Locking
//!
//! The chunk map sits behind a `parking_lot::RwLock`. Meshing a chunk reads
//! its neighbors through the same world while the map is already
//! share-locked, so every read path uses `read_recursive`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crossbeam_channel::Sender;
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;

use crate::block::BlockId;
use crate::chunk::{Adjacent, BlockChange, Chunk};
use crate::coords::{BlockPos, ChunkCoord, Face, LocalPos, CHUNK_SIZE};
use crate::extract::MeshExtractor;
use crate::pool::ChunkPool;

/// Block queries a chunk needs from the world it lives in.
pub trait WorldAccess: Send + Sync {
    /// Returns the block at a world position. Air for unloaded chunks.
    fn block_at(&self, pos: BlockPos) -> BlockId;

    /// Returns true if the position lies inside the world's extent.
    fn is_position_valid(&self, pos: BlockPos) -> bool;

    /// Lowest valid block Y.
    fn floor_y(&self) -> i32;
}

/// Weak back-reference from a chunk to its world.
#[derive(Clone, Default)]
pub struct WorldLink(Option<Weak<dyn WorldAccess>>);

impl WorldLink {
    /// A link to no world. Every out-of-chunk neighbor resolves to Air.
    #[must_use]
    pub const fn detached() -> Self {
        Self(None)
    }

    /// Links to a shared world without keeping it alive.
    #[must_use]
    pub fn to<W: WorldAccess + 'static>(world: &Arc<W>) -> Self {
        let weak: Weak<dyn WorldAccess> = Arc::downgrade(world) as Weak<dyn WorldAccess>;
        Self(Some(weak))
    }

    /// Wraps an existing weak handle.
    #[must_use]
    pub fn from_weak(world: Weak<dyn WorldAccess>) -> Self {
        Self(Some(world))
    }

    /// Returns true if the link was ever attached to a world.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.0.is_some()
    }

    /// Upgrades to the world, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Arc<dyn WorldAccess>> {
        self.0.as_ref().and_then(Weak::upgrade)
    }

    /// Resolves a world position through the linked world.
    ///
    /// Positions the world rejects are Air, except those below its floor,
    /// which are [`Adjacent::VirtualSolid`].
    #[must_use]
    pub fn resolve(&self, pos: BlockPos) -> Adjacent {
        let Some(world) = self.upgrade() else {
            return Adjacent::AIR;
        };
        if world.is_position_valid(pos) {
            Adjacent::Block(world.block_at(pos))
        } else if pos.y < world.floor_y() {
            Adjacent::VirtualSolid
        } else {
            Adjacent::AIR
        }
    }
}

/// Valid extent of a world, in blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    /// Lowest valid Y.
    pub min_y: i32,
    /// Number of valid Y levels above `min_y`.
    pub height: i32,
    /// Valid X and Z lie in `[-limit, limit)`. `None` means unbounded.
    pub horizontal_limit: Option<i32>,
}

impl WorldBounds {
    /// Exclusive upper Y bound.
    #[inline]
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.min_y.saturating_add(self.height)
    }

    /// Returns true if the position lies inside the bounds.
    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        let vertical = pos.y >= self.min_y && pos.y < self.max_y();
        let horizontal = self
            .horizontal_limit
            .map_or(true, |limit| {
                let range = limit.saturating_neg()..limit;
                range.contains(&pos.x) && range.contains(&pos.z)
            });
        vertical && horizontal
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_y: 0,
            height: 128,
            horizontal_limit: None,
        }
    }
}

/// Chunk map plus neighbor resolution.
///
/// Always lives in an `Arc` so chunks can link back to it weakly.
pub struct VoxelWorld {
    /// Weak handle to ourselves, handed to chunks as their world link.
    this: Weak<VoxelWorld>,
    /// Valid extent.
    bounds: WorldBounds,
    /// Chunks indexed by coordinate.
    chunks: RwLock<HashMap<ChunkCoord, Chunk>>,
    /// Recycled chunk allocations.
    pool: Mutex<ChunkPool>,
    /// Channel subscribed to every chunk.
    observer: Mutex<Option<Sender<BlockChange>>>,
}

impl VoxelWorld {
    /// Creates an empty world with the given bounds.
    #[must_use]
    pub fn new(bounds: WorldBounds) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            bounds,
            chunks: RwLock::new(HashMap::new()),
            pool: Mutex::new(ChunkPool::default()),
            observer: Mutex::new(None),
        })
    }

    /// Returns the world bounds.
    #[must_use]
    pub const fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    fn link(&self) -> WorldLink {
        let weak: Weak<dyn WorldAccess> = self.this.clone();
        WorldLink::from_weak(weak)
    }

    /// Creates the chunk at `coord` and populates it.
    ///
    /// The chunk is initialized and linked before `populate` runs, and only
    /// becomes visible to queries once `populate` returns, so generation
    /// always finishes before the chunk's first mesh. The six neighbors are
    /// marked dirty since their border faces may have changed.
    ///
    /// Returns `false` if the chunk already exists, or if its origin lies
    /// outside the `i32` range of world space.
    pub fn create_chunk(&self, coord: ChunkCoord, populate: impl FnOnce(&mut Chunk)) -> bool {
        if coord.checked_origin().is_none() {
            tracing::warn!(x = coord.x, y = coord.y, z = coord.z, "chunk lies outside world space");
            return false;
        }
        if self.chunks.read_recursive().contains_key(&coord) {
            return false;
        }

        let mut chunk = self.pool.lock().acquire();
        chunk.initialize(coord, self.link());
        populate(&mut chunk);
        if let Some(observer) = self.observer.lock().clone() {
            chunk.subscribe(observer);
        }

        let mut chunks = self.chunks.write();
        match chunks.entry(coord) {
            Entry::Occupied(_) => {
                self.pool.lock().release(chunk);
                return false;
            }
            Entry::Vacant(slot) => {
                slot.insert(chunk);
            }
        }
        Self::mark_neighbors_dirty(&chunks, coord);

        tracing::trace!(x = coord.x, y = coord.y, z = coord.z, "chunk created");
        true
    }

    /// Removes a chunk and returns its allocation to the pool.
    ///
    /// Returns `false` if no chunk was loaded there.
    pub fn unload_chunk(&self, coord: ChunkCoord) -> bool {
        let mut chunks = self.chunks.write();
        let Some(chunk) = chunks.remove(&coord) else {
            return false;
        };
        Self::mark_neighbors_dirty(&chunks, coord);
        drop(chunks);

        self.pool.lock().release(chunk);
        tracing::trace!(x = coord.x, y = coord.y, z = coord.z, "chunk unloaded");
        true
    }

    fn mark_neighbors_dirty(chunks: &HashMap<ChunkCoord, Chunk>, coord: ChunkCoord) {
        for neighbor in coord.neighbors() {
            if let Some(chunk) = chunks.get(&neighbor) {
                chunk.mark_dirty();
            }
        }
    }

    /// Gets a block at a world position. Air if its chunk is not loaded.
    #[must_use]
    pub fn get_block(&self, pos: BlockPos) -> BlockId {
        let (coord, local) = LocalPos::split(pos);
        self.chunks
            .read_recursive()
            .get(&coord)
            .map_or(BlockId::AIR, |chunk| chunk.block(local))
    }

    /// Sets a block at a world position.
    ///
    /// Returns `false` if the position is outside the world or its chunk is
    /// not loaded. Edits on a chunk border also dirty the adjacent chunk.
    pub fn set_block(&self, pos: BlockPos, block: BlockId) -> bool {
        if !self.bounds.contains(pos) {
            return false;
        }
        let (coord, local) = LocalPos::split(pos);
        let mut chunks = self.chunks.write();
        let Some(chunk) = chunks.get_mut(&coord) else {
            return false;
        };

        if chunk.set_block(local, block).is_some() && local.is_on_border() {
            for face in Self::border_faces(local) {
                if let Some(neighbor) = chunks.get(&coord.neighbor(face)) {
                    neighbor.mark_dirty();
                }
            }
        }
        true
    }

    /// Faces of the chunk that a local position touches.
    fn border_faces(local: LocalPos) -> impl Iterator<Item = Face> {
        let last = CHUNK_SIZE - 1;
        let axes = [local.x, local.y, local.z];
        Face::ALL.into_iter().filter(move |face| {
            let value = axes[face.axis()];
            if face.is_positive() {
                value == last
            } else {
                value == 0
            }
        })
    }

    /// Rebuilds every dirty chunk. This is the per-tick chunk update pass.
    ///
    /// Chunks are visited bottom-up in a fixed order so output is
    /// reproducible.
    pub fn rebuild_dirty<E>(&self, extractor: &mut E) -> Vec<(ChunkCoord, E::Output)>
    where
        E: MeshExtractor + ?Sized,
    {
        let chunks = self.chunks.read_recursive();
        let mut dirty: Vec<ChunkCoord> = chunks
            .iter()
            .filter(|(_, chunk)| chunk.is_dirty())
            .map(|(coord, _)| *coord)
            .collect();
        dirty.sort_unstable_by_key(|c| (c.y, c.z, c.x));

        let meshes: Vec<_> = dirty
            .into_iter()
            .filter_map(|coord| {
                let mesh = chunks.get(&coord)?.rebuild_mesh_if_dirty(extractor)?;
                Some((coord, mesh))
            })
            .collect();

        if !meshes.is_empty() {
            tracing::debug!(rebuilt = meshes.len(), "dirty chunks rebuilt");
        }
        meshes
    }

    /// Executes a closure with read access to a chunk.
    pub fn with_chunk<F, R>(&self, coord: ChunkCoord, f: F) -> Option<R>
    where
        F: FnOnce(&Chunk) -> R,
    {
        self.chunks.read_recursive().get(&coord).map(f)
    }

    /// Executes a closure with write access to a chunk.
    ///
    /// The closure must not query this world.
    pub fn with_chunk_mut<F, R>(&self, coord: ChunkCoord, f: F) -> Option<R>
    where
        F: FnOnce(&mut Chunk) -> R,
    {
        self.chunks.write().get_mut(&coord).map(f)
    }

    /// Sends every future block edit to `observer`, for current and future chunks.
    pub fn subscribe(&self, observer: Sender<BlockChange>) {
        for chunk in self.chunks.write().values_mut() {
            chunk.subscribe(observer.clone());
        }
        *self.observer.lock() = Some(observer);
    }

    /// Returns true if a chunk is loaded at `coord`.
    #[must_use]
    pub fn has_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.read_recursive().contains_key(&coord)
    }

    /// Returns the number of loaded chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.read_recursive().len()
    }

    /// Returns the number of chunks waiting for a rebuild.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.chunks
            .read_recursive()
            .values()
            .filter(|chunk| chunk.is_dirty())
            .count()
    }

    /// Returns the coordinates of all loaded chunks.
    #[must_use]
    pub fn chunk_coords(&self) -> Vec<ChunkCoord> {
        self.chunks.read_recursive().keys().copied().collect()
    }

    /// Number of recycled chunks ready for reuse.
    #[must_use]
    pub fn pooled_chunks(&self) -> usize {
        self.pool.lock().available()
    }
}

impl WorldAccess for VoxelWorld {
    fn block_at(&self, pos: BlockPos) -> BlockId {
        self.get_block(pos)
    }

    fn is_position_valid(&self, pos: BlockPos) -> bool {
        self.bounds.contains(pos)
    }

    fn floor_y(&self) -> i32 {
        self.bounds.min_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    const STONE: BlockId = BlockId(1);

    fn world() -> Arc<VoxelWorld> {
        VoxelWorld::new(WorldBounds {
            min_y: 0,
            height: 32,
            horizontal_limit: Some(32),
        })
    }

    #[test]
    fn test_world_operations() {
        let world = world();

        assert!(world.create_chunk(ChunkCoord::new(0, 0, 0), |_| {}));
        assert!(!world.create_chunk(ChunkCoord::new(0, 0, 0), |_| {}));

        assert!(world.set_block(BlockPos::new(5, 10, 15), STONE));
        assert_eq!(world.get_block(BlockPos::new(5, 10, 15)), STONE);
        assert_eq!(world.chunk_count(), 1);
    }

    #[test]
    fn test_negative_coordinates() {
        let world = world();
        world.create_chunk(ChunkCoord::new(-1, 0, -1), |_| {});

        assert!(world.set_block(BlockPos::new(-5, 0, -1), STONE));
        assert_eq!(world.get_block(BlockPos::new(-5, 0, -1)), STONE);
        assert_eq!(
            world.with_chunk(ChunkCoord::new(-1, 0, -1), |c| c.get_block_local(11, 0, 15)),
            Some(STONE)
        );
    }

    #[test]
    fn test_unloaded_chunk_reads_air_and_rejects_writes() {
        let world = world();
        assert_eq!(world.get_block(BlockPos::new(100, 5, 100)), BlockId::AIR);
        assert!(!world.set_block(BlockPos::new(1, 1, 1), STONE));
    }

    #[test]
    fn test_out_of_bounds_writes_are_rejected() {
        let world = world();
        world.create_chunk(ChunkCoord::new(0, -1, 0), |_| {});
        assert!(!world.set_block(BlockPos::new(0, -1, 0), STONE));
    }

    #[test]
    fn test_neighbor_resolution_through_world() {
        let world = world();
        // The world spans x in [-32, 32): chunk -2 sits on its western edge
        world.create_chunk(ChunkCoord::new(-2, 0, 0), |_| {});
        world.create_chunk(ChunkCoord::new(-1, 0, 0), |chunk| {
            chunk.set_block_local(0, 4, 4, STONE);
        });

        world.with_chunk(ChunkCoord::new(-2, 0, 0), |chunk| {
            // Across the +X border into the loaded neighbor
            assert_eq!(chunk.neighbor(16, 4, 4), Adjacent::Block(STONE));
            // Below the world floor
            assert_eq!(chunk.neighbor(4, -1, 4), Adjacent::VirtualSolid);
            // Past the lateral edge of the world
            assert_eq!(chunk.neighbor(-1, 4, 4), Adjacent::AIR);
            // Above the top of the world
            assert_eq!(chunk.neighbor(4, 32, 4), Adjacent::AIR);
        });
    }

    #[test]
    fn test_neighbors_past_the_edge_of_world_space_are_air() {
        let world = VoxelWorld::new(WorldBounds::default());
        let east = BlockPos::new(i32::MAX, 5, 0).chunk();
        let west = BlockPos::new(i32::MIN, 5, 0).chunk();
        assert!(world.create_chunk(east, |chunk| {
            chunk.set_block_local(15, 5, 0, STONE);
        }));
        assert!(world.create_chunk(west, |_| {}));
        assert_eq!(world.get_block(BlockPos::new(i32::MAX, 5, 0)), STONE);

        world.with_chunk(east, |chunk| {
            assert_eq!(chunk.neighbor(16, 5, 0), Adjacent::AIR);
            assert_eq!(chunk.neighbor(15, 5, -1), Adjacent::AIR);
        });
        world.with_chunk(west, |chunk| {
            assert_eq!(chunk.neighbor(-1, 5, 0), Adjacent::AIR);
            assert_eq!(chunk.neighbor(-1, -1, 0), Adjacent::AIR);
            assert_eq!(chunk.neighbor(0, -1, 0), Adjacent::VirtualSolid);
        });
    }

    #[test]
    fn test_unrepresentable_chunk_is_rejected() {
        let world = VoxelWorld::new(WorldBounds::default());
        assert!(!world.create_chunk(ChunkCoord::new(i32::MAX, 0, 0), |_| {}));
        assert!(!world.create_chunk(ChunkCoord::new(0, i32::MIN, 0), |_| {}));
        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn test_dropped_world_leaves_chunks_with_air_neighbors() {
        let world = world();
        let link = WorldLink::to(&world);
        drop(world);
        assert!(link.upgrade().is_none());
        assert_eq!(link.resolve(BlockPos::new(0, -5, 0)), Adjacent::AIR);
    }

    #[test]
    fn test_creating_a_chunk_dirties_its_neighbors() {
        let world = world();
        world.create_chunk(ChunkCoord::new(0, 0, 0), |_| {});
        world.with_chunk(ChunkCoord::new(0, 0, 0), Chunk::clear_dirty);
        assert_eq!(world.dirty_count(), 0);

        world.create_chunk(ChunkCoord::new(0, 0, 1), |_| {});
        assert!(world.with_chunk(ChunkCoord::new(0, 0, 0), Chunk::is_dirty).unwrap());
    }

    #[test]
    fn test_border_edit_dirties_adjacent_chunk() {
        let world = world();
        world.create_chunk(ChunkCoord::new(0, 0, 0), |_| {});
        world.create_chunk(ChunkCoord::new(1, 0, 0), |_| {});
        world.create_chunk(ChunkCoord::new(0, 1, 0), |_| {});
        for coord in world.chunk_coords() {
            world.with_chunk(coord, Chunk::clear_dirty);
        }

        // Interior edit: only the owner
        world.set_block(BlockPos::new(5, 5, 5), STONE);
        assert_eq!(world.dirty_count(), 1);

        for coord in world.chunk_coords() {
            world.with_chunk(coord, Chunk::clear_dirty);
        }

        // +X border edit: owner and the +X neighbor, not the +Y one
        world.set_block(BlockPos::new(15, 5, 5), STONE);
        assert!(world.with_chunk(ChunkCoord::new(0, 0, 0), Chunk::is_dirty).unwrap());
        assert!(world.with_chunk(ChunkCoord::new(1, 0, 0), Chunk::is_dirty).unwrap());
        assert!(!world.with_chunk(ChunkCoord::new(0, 1, 0), Chunk::is_dirty).unwrap());
    }

    #[test]
    fn test_subscribe_reports_edits_but_not_generation() {
        let world = world();
        let (tx, rx) = unbounded();
        world.subscribe(tx);

        world.create_chunk(ChunkCoord::new(0, 0, 0), |chunk| {
            chunk.set_block_local(1, 1, 1, STONE);
        });
        assert!(rx.try_recv().is_err());

        world.set_block(BlockPos::new(1, 1, 1), BlockId::AIR);
        assert_eq!(
            rx.try_recv().unwrap(),
            BlockChange { pos: BlockPos::new(1, 1, 1), old: STONE, new: BlockId::AIR }
        );
    }

    #[test]
    fn test_unload_recycles_chunk() {
        let world = world();
        world.create_chunk(ChunkCoord::new(0, 0, 0), |chunk| {
            chunk.set_block_local(0, 0, 0, STONE);
        });
        assert!(world.unload_chunk(ChunkCoord::new(0, 0, 0)));
        assert!(!world.unload_chunk(ChunkCoord::new(0, 0, 0)));
        assert_eq!(world.pooled_chunks(), 1);

        world.create_chunk(ChunkCoord::new(2, 0, 0), |_| {});
        assert_eq!(world.pooled_chunks(), 0);
        assert_eq!(world.get_block(BlockPos::new(32, 0, 0)), BlockId::AIR);
    }

    struct CoordRecorder;

    impl MeshExtractor for CoordRecorder {
        type Output = Adjacent;

        fn build_mesh(&mut self, chunk: &Chunk) -> Adjacent {
            // Reads back into the world while it is share-locked
            chunk.neighbor(-1, 0, 0)
        }
    }

    #[test]
    fn test_rebuild_dirty_reads_neighbors_without_deadlock() {
        let world = VoxelWorld::new(WorldBounds::default());
        world.create_chunk(ChunkCoord::new(-1, 0, 0), |chunk| {
            chunk.set_block_local(15, 0, 0, STONE);
        });
        world.create_chunk(ChunkCoord::new(0, 0, 0), |_| {});

        let rebuilt = world.rebuild_dirty(&mut CoordRecorder);
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt[1], (ChunkCoord::new(0, 0, 0), Adjacent::Block(STONE)));
        assert_eq!(world.dirty_count(), 0);
        assert!(world.rebuild_dirty(&mut CoordRecorder).is_empty());
    }

    #[test]
    fn test_bounds_from_toml() {
        let bounds: WorldBounds = toml::from_str("min_y = -64\nheight = 384").unwrap();
        assert_eq!(bounds.max_y(), 320);
        assert_eq!(bounds.horizontal_limit, None);
        assert!(bounds.contains(BlockPos::new(1_000_000, -64, 0)));
        assert!(!bounds.contains(BlockPos::new(0, 320, 0)));
    }

    #[test]
    fn test_bounds_near_i32_limits_do_not_overflow() {
        let tall = WorldBounds {
            min_y: 10,
            height: i32::MAX,
            horizontal_limit: Some(i32::MIN),
        };
        assert_eq!(tall.max_y(), i32::MAX);
        assert!(!tall.contains(BlockPos::new(0, 20, 0)));
    }
}
