use std::slice::ChunksExact;

use super::AttribKind;
use crate::mesh::Error;

/// A single attribute stream: flat rows of `f32` components plus one row index per corner.
///
/// Rows are append-only. Corner indices are replaced wholesale when the owning mesh is
/// re-triangulated.
#[derive(Clone, Debug, PartialEq)]
pub struct AttribStream {
    kind: AttribKind,
    rows: Vec<f32>,
    indices: Vec<u32>,
}

impl AttribStream {
    /// Construct a new stream of the given kind.
    ///
    /// `rows` is a flat array of `kind.num_components()` floats per row and `indices` holds one
    /// row index per corner. Fails if `rows` does not contain a whole number of rows or if any
    /// index refers past the last row.
    pub fn new(kind: AttribKind, rows: Vec<f32>, indices: Vec<u32>) -> Result<Self, Error> {
        let n = kind.num_components();
        if rows.len() % n != 0 {
            return Err(Error::RowSizeMismatch {
                kind,
                len: rows.len(),
            });
        }

        let num_rows = rows.len() / n;
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= num_rows) {
            return Err(Error::IndexOutOfBounds {
                kind,
                index,
                num_rows,
            });
        }

        Ok(AttribStream {
            kind,
            rows,
            indices,
        })
    }

    #[inline]
    pub fn kind(&self) -> AttribKind {
        self.kind
    }

    #[inline]
    pub fn num_components(&self) -> usize {
        self.kind.num_components()
    }

    /// Raw component data, `num_components()` floats per row.
    #[inline]
    pub fn rows(&self) -> &[f32] {
        &self.rows
    }

    #[inline]
    pub fn rows_mut(&mut self) -> &mut [f32] {
        &mut self.rows
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len() / self.num_components()
    }

    /// Get the components of the row at the given index.
    #[inline]
    pub fn row(&self, index: u32) -> &[f32] {
        let n = self.num_components();
        let start = index as usize * n;
        &self.rows[start..start + n]
    }

    /// Iterate over all rows in storage order.
    #[inline]
    pub fn row_iter(&self) -> ChunksExact<f32> {
        self.rows.chunks_exact(self.num_components())
    }

    /// Per-corner row indices.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of corners addressed by this stream.
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.indices.len()
    }

    /// Row data reinterpreted as bytes, ready to be uploaded to a vertex buffer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rows)
    }

    /// Append a row linearly interpolated between rows `a` and `b` at parameter `t`, and return
    /// its index.
    pub(crate) fn push_lerp(&mut self, a: u32, b: u32, t: f32) -> u32 {
        let n = self.num_components();
        let new_index = self.num_rows() as u32;
        let (a, b) = (a as usize * n, b as usize * n);
        for i in 0..n {
            let (x, y) = (self.rows[a + i], self.rows[b + i]);
            self.rows.push(x + (y - x) * t);
        }
        new_index
    }

    /// Drop rows appended after the first `num_rows`.
    pub(crate) fn truncate_rows(&mut self, num_rows: usize) {
        let n = self.num_components();
        self.rows.truncate(num_rows * n);
    }

    pub(crate) fn replace_indices(&mut self, indices: Vec<u32>) {
        debug_assert!(indices.iter().all(|&i| (i as usize) < self.num_rows()));
        self.indices = indices;
    }
}
