/**
 * This module provides convenience functions for building common meshes.
 *
 * All builders produce planar meshes in the xy-plane with a position stream and a texture
 * coordinate stream sharing the same corner indices.
 */
use super::Mesh;
use crate::attrib::AttribKind;

/// Parameters that define a regular grid of `cols x rows` unit cells in the xy-plane.
///
/// Each cell is split into two triangles. The whole grid is a single batch.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridBuilder {
    /// Number of grid cells along the y axis.
    pub rows: usize,
    /// Number of grid cells along the x axis.
    pub cols: usize,
}

impl GridBuilder {
    /// Generate a `[0,cols]x[0,rows]` grid.
    pub fn build(self) -> Mesh {
        let GridBuilder { rows, cols } = self;
        let mut data = MeshData::default();
        data.push_block([0.0, 0.0], [cols as f32, rows as f32], cols, rows);
        data.into_mesh([cols as f32, rows as f32])
    }
}

/// Builder for two blocks of triangles meeting at a seam with mismatched tessellation.
///
/// The left block covers `[0,1]x[0,rows]` with one column of unit cells. The right block covers
/// `[1,2]x[0,rows]` with cells `refinement` times smaller. Every right block vertex on the line
/// `x = 1` that is not at an integer height lies in the interior of a left block edge, so the mesh
/// has exactly `rows * (refinement - 1)` T-junctions. Each block is its own batch.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SeamBuilder {
    /// Number of cells in the coarse block.
    pub rows: usize,
    /// Subdivision factor of the fine block relative to the coarse one.
    pub refinement: usize,
}

impl SeamBuilder {
    pub fn build(self) -> Mesh {
        let SeamBuilder { rows, refinement } = self;
        let height = rows as f32;
        let mut data = MeshData::default();
        data.push_block([0.0, 0.0], [1.0, height], 1, rows);
        data.push_block([1.0, 0.0], [1.0, height], refinement, rows * refinement);
        data.into_mesh([2.0, height])
    }

    /// Number of T-junctions present in the built mesh.
    pub fn num_junctions(&self) -> usize {
        self.rows * self.refinement.saturating_sub(1)
    }
}

/// Flat buffers accumulated while building.
#[derive(Default)]
struct MeshData {
    positions: Vec<f32>,
    indices: Vec<u32>,
    batch_sizes: Vec<usize>,
}

impl MeshData {
    fn push_block(&mut self, origin: [f32; 2], size: [f32; 2], cols: usize, rows: usize) {
        let first = (self.positions.len() / 3) as u32;
        let num_corners = self.indices.len();

        // iterate over vertices
        for j in 0..=rows {
            for i in 0..=cols {
                let x = origin[0] + size[0] * i as f32 / cols as f32;
                let y = origin[1] + size[1] * j as f32 / rows as f32;
                self.positions.extend_from_slice(&[x, y, 0.0]);
            }
        }

        // iterate over faces
        let index = |i: usize, j: usize| first + (j * (cols + 1) + i) as u32;
        for j in 0..rows {
            for i in 0..cols {
                let (p00, p10) = (index(i, j), index(i + 1, j));
                let (p01, p11) = (index(i, j + 1), index(i + 1, j + 1));
                self.indices.extend_from_slice(&[p00, p10, p11, p00, p11, p01]);
            }
        }

        self.batch_sizes.push(self.indices.len() - num_corners);
    }

    fn into_mesh(self, extent: [f32; 2]) -> Mesh {
        let MeshData {
            positions,
            indices,
            batch_sizes,
        } = self;

        let uvs: Vec<f32> = positions
            .chunks_exact(3)
            .flat_map(|p| vec![p[0] / extent[0], p[1] / extent[1]])
            .collect();

        let mut mesh = Mesh::new();
        // Rows and indices are constructed consistently above, so adding streams can't fail.
        mesh.add_stream(AttribKind::Position, positions, indices.clone())
            .expect("valid position stream");
        mesh.add_stream(AttribKind::TexCoord, uvs, indices)
            .expect("valid texture coordinate stream");

        let mut start = 0;
        for count in batch_sizes {
            mesh.add_batch(start, count);
            start += count;
        }
        mesh
    }
}
