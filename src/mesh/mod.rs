//!
//! This module defines the multi-stream triangle `Mesh`.
//!
//! A mesh owns one `AttribStream` per attribute kind and a list of `Batch`es. Every stream
//! addresses the same set of corners (three per triangle), but each stream resolves its own row
//! for a given corner. This mirrors the independent `v/vt/vn` indices of Wavefront OBJ files.
//!

pub mod builder;
pub mod transform;

use std::ops::Range;

use crate::attrib::{AttribKind, AttribStream};

/// A contiguous range of corners rendered with a single material.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Batch {
    /// Index of the first corner in this batch.
    pub start: usize,
    /// Number of corners in this batch. Always a multiple of 3.
    pub count: usize,
}

impl Batch {
    #[inline]
    pub fn new(start: usize, count: usize) -> Self {
        Batch { start, count }
    }

    /// Corner range covered by this batch.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.count
    }

    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.count / 3
    }
}

/// A triangle mesh with independently indexed attribute streams.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    streams: Vec<AttribStream>,
    batches: Vec<Batch>,
}

impl Mesh {
    /// Construct an empty mesh with no streams and no batches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new attribute stream to this mesh.
    ///
    /// The number of corners addressed by `indices` must match the corner count of all streams
    /// already in the mesh. Only one stream per kind is allowed.
    pub fn add_stream(
        &mut self,
        kind: AttribKind,
        rows: Vec<f32>,
        indices: Vec<u32>,
    ) -> Result<&mut AttribStream, Error> {
        if self.stream_slot(kind).is_some() {
            return Err(Error::StreamAlreadyExists(kind));
        }

        if let Some(first) = self.streams.first() {
            if first.num_corners() != indices.len() {
                return Err(Error::CornerCountMismatch {
                    expected: first.num_corners(),
                    given: indices.len(),
                });
            }
        }

        let stream = AttribStream::new(kind, rows, indices)?;
        let slot = self.streams.len();
        self.streams.push(stream);
        Ok(&mut self.streams[slot])
    }

    /// Append a batch covering `count` corners starting at corner `start`.
    ///
    /// Batches are not validated against the corner domain.
    #[inline]
    pub fn add_batch(&mut self, start: usize, count: usize) {
        self.batches.push(Batch::new(start, count));
    }

    /// Find the stream of the given kind.
    #[inline]
    pub fn stream(&self, kind: AttribKind) -> Option<&AttribStream> {
        self.streams.iter().find(|s| s.kind() == kind)
    }

    /// Find the stream of the given kind for modification.
    #[inline]
    pub fn stream_mut(&mut self, kind: AttribKind) -> Option<&mut AttribStream> {
        self.streams.iter_mut().find(|s| s.kind() == kind)
    }

    /// Position of the stream of the given kind in registration order.
    #[inline]
    pub fn stream_slot(&self, kind: AttribKind) -> Option<usize> {
        self.streams.iter().position(|s| s.kind() == kind)
    }

    /// All streams in registration order.
    #[inline]
    pub fn streams(&self) -> &[AttribStream] {
        &self.streams
    }

    /// All batches in material order.
    #[inline]
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Number of corners shared by all streams.
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.streams.first().map_or(0, AttribStream::num_corners)
    }

    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.num_corners() / 3
    }

    /// Check that every batch lies inside the corner domain and covers whole triangles.
    pub(crate) fn validate_batches(&self) -> Result<(), Error> {
        let num_corners = self.num_corners();
        for batch in self.batches.iter() {
            if batch.start % 3 != 0 || batch.count % 3 != 0 || batch.range().end > num_corners {
                return Err(Error::MalformedBatch {
                    batch: *batch,
                    num_corners,
                });
            }
        }
        Ok(())
    }

    /// Mutable access to streams and batches at once.
    pub(crate) fn parts_mut(&mut self) -> (&mut [AttribStream], &mut Vec<Batch>) {
        (self.streams.as_mut_slice(), &mut self.batches)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A stream being added addresses a different number of corners than the existing streams.
    CornerCountMismatch {
        /// Corner count of the streams already in the mesh.
        expected: usize,
        /// Corner count of the stream being added.
        given: usize,
    },
    /// A stream of this kind was already added.
    StreamAlreadyExists(AttribKind),
    /// The operation requires a stream of this kind.
    MissingStream(AttribKind),
    /// Flat row data does not contain a whole number of rows.
    RowSizeMismatch { kind: AttribKind, len: usize },
    /// A corner index refers past the last row of its stream.
    IndexOutOfBounds {
        kind: AttribKind,
        index: u32,
        num_rows: usize,
    },
    /// A batch does not cover whole triangles inside the corner domain.
    MalformedBatch { batch: Batch, num_corners: usize },
    /// T-junction elimination performed more splits than allowed.
    SplitLimitExceeded { limit: usize },
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::CornerCountMismatch { expected, given } => write!(
                f,
                "Corner count mismatch: the mesh has {} corners, the new stream has {}",
                expected, given
            ),
            Error::StreamAlreadyExists(kind) => {
                write!(f, "A {} stream already exists", kind)
            }
            Error::MissingStream(kind) => write!(f, "The mesh has no {} stream", kind),
            Error::RowSizeMismatch { kind, len } => write!(
                f,
                "{} floats do not form whole {} rows of {} components",
                len,
                kind,
                kind.num_components()
            ),
            Error::IndexOutOfBounds {
                kind,
                index,
                num_rows,
            } => write!(
                f,
                "Index {} is out of bounds for a {} stream with {} rows",
                index, kind, num_rows
            ),
            Error::MalformedBatch { batch, num_corners } => write!(
                f,
                "Batch {:?} does not cover whole triangles within {} corners",
                batch, num_corners
            ),
            Error::SplitLimitExceeded { limit } => write!(
                f,
                "T-junction elimination exceeded the limit of {} splits",
                limit
            ),
        }
    }
}
