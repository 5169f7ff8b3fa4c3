//! A triangle mesh library with independently indexed attribute streams and T-junction repair.
//!
//! # Overview
//!
//! A [`Mesh`] stores one flat attribute stream per [`AttribKind`] (positions, texture coordinates,
//! normals, ...), each with its own per-corner index array, and a list of [`Batch`]es grouping
//! triangles by material. Meshes are typically loaded from Wavefront OBJ files (see the `io`
//! module), repaired with [`Mesh::fix_t_junctions`] to remove cracks along edges with
//! mismatched tessellation, and then handed to a renderer or saved back to OBJ.
//!
//! ```
//! use meshseam::{AttribKind, Mesh};
//!
//! // A triangle with an extra vertex at the midpoint of its first edge.
//! let mut mesh = Mesh::new();
//! mesh.add_stream(
//!     AttribKind::Position,
//!     vec![0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 5.0, 10.0, 0.0, 5.0, 0.0, 0.0],
//!     vec![0, 1, 2],
//! )
//! .unwrap();
//! mesh.add_batch(0, 3);
//!
//! assert_eq!(mesh.fix_t_junctions().unwrap(), 1);
//! assert_eq!(mesh.num_triangles(), 2);
//! ```

pub mod algo;
pub mod attrib;
pub mod mesh;
pub mod ops;
pub mod prim;

#[cfg(feature = "io")]
pub mod io;

// public re-exports
pub use crate::algo::TJunctionParams;
pub use crate::attrib::{AttribKind, AttribStream};
pub use crate::mesh::*;
