//! # STRATA Meshing
//!
//! Turns chunk contents into renderable geometry.
//!
//! ## Strategies
//!
//! ```text
//! Chunk ──► NaiveExtractor  ──► one quad per exposed face
//!       └─► GreedyExtractor ──► coplanar same-block faces merged
//! ```
//!
//! Both implement [`strata_voxel::MeshExtractor`] with [`Mesh`] output and
//! agree on which faces are visible:
//!
//! - a face is emitted for a solid block whose neighbor is not solid-opaque
//! - neighbors below the world floor count as solid, hiding the underside
//! - neighbors past any other edge of the world count as Air
//!
//! Greedy meshes cover exactly the same surface with no more vertices.

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod face;
pub mod greedy;
pub mod mesh;
pub mod naive;

pub use face::{face_corners, FACE_CORNERS, QUAD_UVS};
pub use greedy::GreedyExtractor;
pub use mesh::{IndexBuffer, IndexFormat, Mesh, MeshBuilder, MAX_U16_VERTICES, QUAD_INDICES};
pub use naive::NaiveExtractor;
