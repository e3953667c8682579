//! Surface extraction seam.
//!
//! Chunks do not know how their geometry is built; the meshing crate
//! provides the strategies and the chunk only decides *when* to run one.

use crate::chunk::Chunk;

/// Turns a chunk's block grid into renderable geometry.
///
/// Implementations must be pure with respect to the chunk: the same content
/// and neighborhood always produce the same output, and no state from a
/// previous call leaks into the next.
pub trait MeshExtractor {
    /// Geometry produced for one chunk.
    type Output;

    /// Builds the geometry for `chunk`.
    fn build_mesh(&mut self, chunk: &Chunk) -> Self::Output;
}
