//! Greedy meshing for voxel chunks.
//!
//! Reduces vertex count by merging coplanar faces of the same block into
//! larger rectangles while enclosing exactly the surface the naive extractor
//! produces.
//!
//! ## Algorithm
//!
//! 1. For each axis (X, Y, Z) and each slice of blocks along it
//! 2. For each facing (+/-), build a 2D mask of visible faces owned by the slice
//! 3. Grow a run along U, then extend it along V while whole rows match
//! 4. Emit the rectangle and clear its cells from the mask
//!
//! A mask cell holds the owning block, so merges never cross a block type,
//! and each mask covers one facing, so they never cross a normal either.

use std::sync::Arc;
use std::time::Instant;

use strata_voxel::{BlockCatalog, BlockId, Chunk, Face, MeshExtractor, CHUNK_SIZE};

use crate::mesh::{report_build, Mesh, MeshBuilder};

/// Visible faces of one slice, `mask[v][u]`.
type FaceMask = [[Option<BlockId>; CHUNK_SIZE]; CHUNK_SIZE];

/// Mesh extractor that merges coplanar same-block faces.
///
/// The mask is allocated once and reused for every slice.
#[derive(Debug)]
pub struct GreedyExtractor {
    catalog: Arc<BlockCatalog>,
    builder: MeshBuilder,
    mask: Box<FaceMask>,
}

impl GreedyExtractor {
    /// Creates an extractor resolving blocks through `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<BlockCatalog>) -> Self {
        Self {
            catalog,
            builder: MeshBuilder::new(),
            mask: Box::new([[None; CHUNK_SIZE]; CHUNK_SIZE]),
        }
    }

    /// Returns the catalog used for block properties.
    #[must_use]
    pub fn catalog(&self) -> &Arc<BlockCatalog> {
        &self.catalog
    }

    /// Meshes faces perpendicular to `axis`.
    fn mesh_axis(&mut self, chunk: &Chunk, axis: usize) {
        for d in 0..CHUNK_SIZE {
            for positive in [true, false] {
                let face = Face::from_axis(axis, positive);
                if self.build_mask(chunk, face, d) {
                    self.extract_quads(face, d);
                }
            }
        }
    }

    /// Fills the mask with faces of slice `d` pointing along `face`.
    ///
    /// Returns false if the slice has nothing to emit.
    fn build_mask(&mut self, chunk: &Chunk, face: Face, d: usize) -> bool {
        let axis = face.axis();
        let (u_axis, v_axis) = ((axis + 1) % 3, (axis + 2) % 3);
        let step = face.offset();
        let mut any = false;

        for v in 0..CHUNK_SIZE {
            for u in 0..CHUNK_SIZE {
                let mut pos = [0i32; 3];
                pos[axis] = d as i32;
                pos[u_axis] = u as i32;
                pos[v_axis] = v as i32;

                let block = chunk.get_block_local(pos[0], pos[1], pos[2]);
                let visible = self.catalog.is_solid(block)
                    && !chunk
                        .neighbor(pos[0] + step[0], pos[1] + step[1], pos[2] + step[2])
                        .is_opaque_solid(&self.catalog);

                self.mask[v][u] = visible.then_some(block);
                any |= visible;
            }
        }
        any
    }

    /// Greedily turns the mask into quads.
    fn extract_quads(&mut self, face: Face, d: usize) {
        for v in 0..CHUNK_SIZE {
            let mut u = 0;
            while u < CHUNK_SIZE {
                let Some(block) = self.mask[v][u] else {
                    u += 1;
                    continue;
                };
                let cell = Some(block);

                let mut width = 1;
                while u + width < CHUNK_SIZE && self.mask[v][u + width] == cell {
                    width += 1;
                }

                let mut height = 1;
                'height: while v + height < CHUNK_SIZE {
                    for du in 0..width {
                        if self.mask[v + height][u + du] != cell {
                            break 'height;
                        }
                    }
                    height += 1;
                }

                self.push_rect(face, d, u, v, width, height, block);

                for row in &mut self.mask[v..v + height] {
                    row[u..u + width].fill(None);
                }
                u += width;
            }
        }
    }

    /// Emits one `width x height` rectangle anchored at `(u, v)` of slice `d`.
    #[allow(clippy::too_many_arguments)]
    fn push_rect(
        &mut self,
        face: Face,
        d: usize,
        u: usize,
        v: usize,
        width: usize,
        height: usize,
        block: BlockId,
    ) {
        let axis = face.axis();
        let (u_axis, v_axis) = ((axis + 1) % 3, (axis + 2) % 3);

        let mut origin = [0.0f32; 3];
        origin[axis] = (if face.is_positive() { d + 1 } else { d }) as f32;
        origin[u_axis] = u as f32;
        origin[v_axis] = v as f32;

        let mut du = [0.0f32; 3];
        du[u_axis] = width as f32;
        let mut dv = [0.0f32; 3];
        dv[v_axis] = height as f32;

        let add = |a: [f32; 3], b: [f32; 3]| [a[0] + b[0], a[1] + b[1], a[2] + b[2]];
        let (w, h) = (width as f32, height as f32);

        // (u, v, axis) is right-handed, so u then v runs counter-clockwise
        // about the positive normal.
        let (corners, uvs) = if face.is_positive() {
            (
                [origin, add(origin, du), add(add(origin, du), dv), add(origin, dv)],
                [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]],
            )
        } else {
            (
                [origin, add(origin, dv), add(add(origin, du), dv), add(origin, du)],
                [[0.0, 0.0], [0.0, h], [w, h], [w, 0.0]],
            )
        };

        let color = self.catalog.color(block).to_array();
        self.builder.push_quad(corners, face.normal(), color, uvs);
    }
}

impl MeshExtractor for GreedyExtractor {
    type Output = Mesh;

    fn build_mesh(&mut self, chunk: &Chunk) -> Mesh {
        let start = Instant::now();
        self.builder.clear();

        if !chunk.is_empty() {
            for axis in 0..3 {
                self.mesh_axis(chunk, axis);
            }
        }

        let mesh = self.builder.finish();
        report_build("greedy", chunk, &mesh, start.elapsed());
        mesh
    }
}
