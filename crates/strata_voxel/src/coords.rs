//! # Coordinate Spaces
//!
//! Three integer spaces are in play:
//!
//! - **World** ([`BlockPos`]): one unit per block.
//! - **Chunk** ([`ChunkCoord`]): one unit per chunk, `world = chunk * CHUNK_SIZE`.
//! - **Local** ([`LocalPos`]): `[0, CHUNK_SIZE)` inside one chunk.
//!
//! World to chunk conversion floors toward negative infinity, so block `-1`
//! lives in chunk `-1` at local `15`, not in chunk `0`.

use bytemuck::{Pod, Zeroable};

/// Chunk dimension - 16 blocks per axis.
pub const CHUNK_SIZE: usize = 16;

/// Chunk dimension as a signed integer, for world-space math.
pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

/// Total blocks per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// A block position in world space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct BlockPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate (up).
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this position moved by the given deltas.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Like [`BlockPos::offset`], but `None` if any axis leaves the `i32` range.
    #[inline]
    #[must_use]
    pub const fn checked_offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy), self.z.checked_add(dz)) {
            (Some(x), Some(y), Some(z)) => Some(Self::new(x, y, z)),
            _ => None,
        }
    }

    /// Returns the position adjacent across a face.
    #[inline]
    #[must_use]
    pub const fn neighbor(self, face: Face) -> Self {
        let [dx, dy, dz] = face.offset();
        self.offset(dx, dy, dz)
    }

    /// Returns the chunk containing this position.
    #[inline]
    #[must_use]
    pub const fn chunk(self) -> ChunkCoord {
        ChunkCoord::from_block_pos(self)
    }
}

/// Chunk coordinate in chunk space (not block units).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct ChunkCoord {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Converts a world block position to the chunk containing it.
    ///
    /// Uses floor division, so negative positions map correctly.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(pos: BlockPos) -> Self {
        Self::new(
            pos.x.div_euclid(CHUNK_SIZE_I32),
            pos.y.div_euclid(CHUNK_SIZE_I32),
            pos.z.div_euclid(CHUNK_SIZE_I32),
        )
    }

    /// Returns the world position of the chunk's minimum corner.
    ///
    /// Only coordinates with a representable origin may be passed here, which
    /// holds for every coordinate produced by [`ChunkCoord::from_block_pos`].
    /// Use [`ChunkCoord::checked_origin`] for arbitrary coordinates.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> BlockPos {
        BlockPos::new(
            self.x * CHUNK_SIZE_I32,
            self.y * CHUNK_SIZE_I32,
            self.z * CHUNK_SIZE_I32,
        )
    }

    /// Returns the chunk's minimum corner, or `None` if it does not fit in
    /// world space.
    ///
    /// When this is `Some`, every local position of the chunk converts to
    /// world space without overflow.
    #[inline]
    #[must_use]
    pub const fn checked_origin(self) -> Option<BlockPos> {
        match (
            self.x.checked_mul(CHUNK_SIZE_I32),
            self.y.checked_mul(CHUNK_SIZE_I32),
            self.z.checked_mul(CHUNK_SIZE_I32),
        ) {
            (Some(x), Some(y), Some(z)) => Some(BlockPos::new(x, y, z)),
            _ => None,
        }
    }

    /// Converts a local position in this chunk to world space.
    #[inline]
    #[must_use]
    pub const fn to_world(self, local: LocalPos) -> BlockPos {
        let origin = self.origin();
        BlockPos::new(
            origin.x + local.x as i32,
            origin.y + local.y as i32,
            origin.z + local.z as i32,
        )
    }

    /// Converts a world position to local coordinates in this chunk.
    ///
    /// Returns `None` if the position belongs to another chunk.
    #[must_use]
    pub fn to_local(self, pos: BlockPos) -> Option<LocalPos> {
        let (chunk, local) = LocalPos::split(pos);
        (chunk == self).then_some(local)
    }

    /// Returns the chunk adjacent across a face.
    #[inline]
    #[must_use]
    pub const fn neighbor(self, face: Face) -> Self {
        let [dx, dy, dz] = face.offset();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Returns the six face-adjacent chunk coordinates.
    #[must_use]
    pub fn neighbors(self) -> [Self; 6] {
        Face::ALL.map(|face| self.neighbor(face))
    }
}

/// A position inside a chunk, each axis in `[0, CHUNK_SIZE)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalPos {
    /// X coordinate.
    pub x: usize,
    /// Y coordinate.
    pub y: usize,
    /// Z coordinate.
    pub z: usize,
}

impl LocalPos {
    /// Creates a local position, or `None` if any axis is out of range.
    #[inline]
    #[must_use]
    pub const fn new(x: usize, y: usize, z: usize) -> Option<Self> {
        if x < CHUNK_SIZE && y < CHUNK_SIZE && z < CHUNK_SIZE {
            Some(Self { x, y, z })
        } else {
            None
        }
    }

    /// Creates a local position from signed coordinates, or `None` if any
    /// axis is outside `[0, CHUNK_SIZE)`.
    #[inline]
    #[must_use]
    pub const fn from_signed(x: i32, y: i32, z: i32) -> Option<Self> {
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        Self::new(x as usize, y as usize, z as usize)
    }

    /// Splits a world position into its chunk and local position.
    #[inline]
    #[must_use]
    pub const fn split(pos: BlockPos) -> (ChunkCoord, Self) {
        (
            ChunkCoord::from_block_pos(pos),
            Self {
                x: pos.x.rem_euclid(CHUNK_SIZE_I32) as usize,
                y: pos.y.rem_euclid(CHUNK_SIZE_I32) as usize,
                z: pos.z.rem_euclid(CHUNK_SIZE_I32) as usize,
            },
        )
    }

    /// Returns true if the position touches a chunk face.
    #[inline]
    #[must_use]
    pub const fn is_on_border(self) -> bool {
        let last = CHUNK_SIZE - 1;
        self.x == 0 || self.y == 0 || self.z == 0 || self.x == last || self.y == last || self.z == last
    }
}

/// One of the six axis-aligned block faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// +X
    PosX = 0,
    /// -X
    NegX = 1,
    /// +Y (up)
    PosY = 2,
    /// -Y (down)
    NegY = 3,
    /// +Z
    PosZ = 4,
    /// -Z
    NegZ = 5,
}

impl Face {
    /// All faces, in normal-index order.
    pub const ALL: [Self; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Returns the face pointing along `axis` (0 = X, 1 = Y, 2 = Z).
    #[inline]
    #[must_use]
    pub const fn from_axis(axis: usize, positive: bool) -> Self {
        match (axis, positive) {
            (0, true) => Self::PosX,
            (0, false) => Self::NegX,
            (1, true) => Self::PosY,
            (1, false) => Self::NegY,
            (_, true) => Self::PosZ,
            (_, false) => Self::NegZ,
        }
    }

    /// Integer step to the adjacent block.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Self::PosX => [1, 0, 0],
            Self::NegX => [-1, 0, 0],
            Self::PosY => [0, 1, 0],
            Self::NegY => [0, -1, 0],
            Self::PosZ => [0, 0, 1],
            Self::NegZ => [0, 0, -1],
        }
    }

    /// Outward unit normal.
    #[inline]
    #[must_use]
    pub const fn normal(self) -> [f32; 3] {
        let [x, y, z] = self.offset();
        [x as f32, y as f32, z as f32]
    }

    /// Axis the face is perpendicular to (0 = X, 1 = Y, 2 = Z).
    #[inline]
    #[must_use]
    pub const fn axis(self) -> usize {
        (self as usize) / 2
    }

    /// True for +X, +Y and +Z.
    #[inline]
    #[must_use]
    pub const fn is_positive(self) -> bool {
        (self as usize) % 2 == 0
    }

    /// Index into per-face tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}
