//! # Mesh Buffers
//!
//! Plain parallel arrays a renderer converts into whatever vertex format it
//! needs. Once returned, a [`Mesh`] belongs to the caller; extractors keep
//! only their scratch [`MeshBuilder`].
//!
//! ## Index Width
//!
//! Indices are stored as `u16` while the vertex count fits and switch to
//! `u32` once it exceeds 65,535. This is a correctness requirement: a 16-bit
//! buffer cannot address more vertices.

use std::time::Duration;

use strata_voxel::Chunk;

/// Largest vertex count addressable by 16-bit indices.
pub const MAX_U16_VERTICES: usize = u16::MAX as usize;

/// Mesh builds slower than this are logged as warnings.
const SLOW_BUILD: Duration = Duration::from_millis(10);

/// Index element width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// 16-bit indices.
    U16,
    /// 32-bit indices.
    U32,
}

/// Triangle list indices, 3 per triangle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexBuffer {
    /// Narrow indices, used while every vertex is addressable with `u16`.
    U16(Vec<u16>),
    /// Wide indices.
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Picks the narrowest format able to address `vertex_count` vertices.
    #[must_use]
    pub fn for_vertex_count(indices: Vec<u32>, vertex_count: usize) -> Self {
        if vertex_count > MAX_U16_VERTICES {
            Self::U32(indices)
        } else {
            Self::U16(indices.into_iter().map(|i| i as u16).collect())
        }
    }

    /// Returns the element format.
    #[must_use]
    pub const fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::U16,
            Self::U32(_) => IndexFormat::U32,
        }
    }

    /// Number of indices.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U16(indices) => indices.len(),
            Self::U32(indices) => indices.len(),
        }
    }

    /// Returns true if there are no indices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the index at `position`, widened to `u32`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<u32> {
        match self {
            Self::U16(indices) => indices.get(position).map(|&i| u32::from(i)),
            Self::U32(indices) => indices.get(position).copied(),
        }
    }

    /// Copies the indices out as `u32`.
    #[must_use]
    pub fn to_u32(&self) -> Vec<u32> {
        match self {
            Self::U16(indices) => indices.iter().map(|&i| u32::from(i)).collect(),
            Self::U32(indices) => indices.clone(),
        }
    }

    /// Raw bytes for an index buffer upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(indices) => bytemuck::cast_slice(indices),
            Self::U32(indices) => bytemuck::cast_slice(indices),
        }
    }
}

impl Default for IndexBuffer {
    fn default() -> Self {
        Self::U16(Vec::new())
    }
}

/// Geometry for one chunk. Positions are chunk-local.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex outward normals.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex RGBA colors.
    pub colors: Vec<[f32; 4]>,
    /// Per-vertex texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list.
    pub indices: IndexBuffer,
}

impl Mesh {
    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of quads (every quad has 4 vertices).
    #[inline]
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.positions.len() / 4
    }

    /// Returns true if the mesh has no geometry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Index element width.
    #[inline]
    #[must_use]
    pub const fn index_format(&self) -> IndexFormat {
        self.indices.format()
    }

    /// Raw bytes of the position buffer.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the normal buffer.
    #[must_use]
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Raw bytes of the color buffer.
    #[must_use]
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Raw bytes of the UV buffer.
    #[must_use]
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }
}

/// Two triangles per quad, wound counter-clockwise about the quad normal
/// when the corners are given in counter-clockwise order.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Scratch buffers shared by both extraction strategies.
///
/// Buffers keep their capacity between builds; [`MeshBuilder::finish`]
/// copies the geometry out and clears them.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops any geometry from an unfinished build.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.colors.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    /// Appends one quad. Corners must be counter-clockwise about `normal`.
    pub fn push_quad(
        &mut self,
        corners: [[f32; 3]; 4],
        normal: [f32; 3],
        color: [f32; 4],
        uvs: [[f32; 2]; 4],
    ) {
        let base = self.positions.len() as u32;

        self.positions.extend_from_slice(&corners);
        self.normals.extend_from_slice(&[normal; 4]);
        self.colors.extend_from_slice(&[color; 4]);
        self.uvs.extend_from_slice(&uvs);
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    /// Number of vertices pushed so far.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Copies the geometry into a [`Mesh`] and clears the builder.
    ///
    /// The index format is chosen from the final vertex count.
    pub fn finish(&mut self) -> Mesh {
        let vertex_count = self.positions.len();
        let indices: Vec<u32> = self.indices.drain(..).collect();

        Mesh {
            positions: self.positions.drain(..).collect(),
            normals: self.normals.drain(..).collect(),
            colors: self.colors.drain(..).collect(),
            uvs: self.uvs.drain(..).collect(),
            indices: IndexBuffer::for_vertex_count(indices, vertex_count),
        }
    }
}

/// Logs the outcome of one extraction.
pub(crate) fn report_build(strategy: &'static str, chunk: &Chunk, mesh: &Mesh, elapsed: Duration) {
    let coord = chunk.coord().unwrap_or_default();

    if mesh.is_empty() && !chunk.is_generated() {
        tracing::warn!(
            strategy,
            x = coord.x,
            y = coord.y,
            z = coord.z,
            "mesh is empty for a chunk that was never generated; terrain generation may not have run"
        );
    }
    if elapsed > SLOW_BUILD {
        tracing::warn!(
            strategy,
            x = coord.x,
            y = coord.y,
            z = coord.z,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow mesh build"
        );
    }
    tracing::debug!(
        strategy,
        x = coord.x,
        y = coord.y,
        z = coord.z,
        quads = mesh.quad_count(),
        elapsed_us = elapsed.as_micros() as u64,
        "mesh built"
    );
}
