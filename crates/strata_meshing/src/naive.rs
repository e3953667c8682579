//! Per-face mesh extraction.
//!
//! Every visible face of every solid block becomes its own quad. Simple,
//! predictable, and the reference the greedy extractor is checked against.

use std::sync::Arc;
use std::time::Instant;

use strata_voxel::{BlockCatalog, Chunk, Face, MeshExtractor, CHUNK_SIZE_I32};

use crate::face::{face_corners, QUAD_UVS};
use crate::mesh::{report_build, Mesh, MeshBuilder};

/// One quad per visible block face.
#[derive(Debug)]
pub struct NaiveExtractor {
    catalog: Arc<BlockCatalog>,
    builder: MeshBuilder,
}

impl NaiveExtractor {
    /// Creates an extractor resolving blocks through `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<BlockCatalog>) -> Self {
        Self {
            catalog,
            builder: MeshBuilder::new(),
        }
    }

    /// Returns the catalog used for block properties.
    #[must_use]
    pub fn catalog(&self) -> &Arc<BlockCatalog> {
        &self.catalog
    }
}

impl MeshExtractor for NaiveExtractor {
    type Output = Mesh;

    fn build_mesh(&mut self, chunk: &Chunk) -> Mesh {
        let start = Instant::now();
        self.builder.clear();

        if !chunk.is_empty() {
            for z in 0..CHUNK_SIZE_I32 {
                for y in 0..CHUNK_SIZE_I32 {
                    for x in 0..CHUNK_SIZE_I32 {
                        let block = chunk.get_block_local(x, y, z);
                        if !self.catalog.is_solid(block) {
                            continue;
                        }
                        let color = self.catalog.color(block).to_array();

                        for face in Face::ALL {
                            let [dx, dy, dz] = face.offset();
                            if chunk
                                .neighbor(x + dx, y + dy, z + dz)
                                .is_opaque_solid(&self.catalog)
                            {
                                continue;
                            }
                            self.builder.push_quad(
                                face_corners(face, x as f32, y as f32, z as f32),
                                face.normal(),
                                color,
                                QUAD_UVS,
                            );
                        }
                    }
                }
            }
        }

        let mesh = self.builder.finish();
        report_build("naive", chunk, &mesh, start.elapsed());
        mesh
    }
}
