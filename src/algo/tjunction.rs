/*!
 * T-junction elimination.
 *
 * A T-junction is a vertex lying in the interior of an edge of a triangle that does not have that
 * vertex as a corner. Rasterizers can leave visible cracks along such edges. Elimination splits
 * the offending triangle at the junction vertex until no triangle edge passes through any vertex
 * of the mesh.
 */

use math::Vector3;

use crate::attrib::{AttribKind, AttribStream};
use crate::mesh::{Batch, Error, Mesh};
use crate::prim::Triangle;

/// Tolerances controlling T-junction detection.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TJunctionParams {
    /// Edge parameters at or below this value are considered to coincide with the first edge
    /// vertex.
    pub min_param: f32,
    /// Edge parameters at or above this value are considered to coincide with the second edge
    /// vertex.
    pub max_param: f32,
    /// Points with a squared distance to the edge line below this value lie on the edge.
    pub max_distance_squared: f32,
    /// Maximum number of splits before giving up.
    ///
    /// When `None`, the limit is `2 * (num_triangles + 1) * (num_positions + 1)`.
    pub max_splits: Option<usize>,
}

impl Default for TJunctionParams {
    fn default() -> Self {
        TJunctionParams {
            min_param: 0.00001,
            max_param: 0.99999,
            max_distance_squared: 0.0001,
            max_splits: None,
        }
    }
}

/// A junction found on a triangle edge.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Junction {
    /// Local index of the edge, which runs from corner `edge` to corner `(edge + 1) % 3`.
    edge: usize,
    /// Position row of the vertex lying on the edge.
    vertex: u32,
    /// Edge parameter of the vertex.
    param: f32,
}

/// A triangle in the work list, with one triplet of row indices per stream.
#[derive(Clone, Debug)]
struct WorkTriangle {
    batch: usize,
    corners: Vec<[u32; 3]>,
}

impl WorkTriangle {
    /// Split this triangle at the given junction.
    ///
    /// This triangle keeps its second and opposite corners and has its first edge corner moved to
    /// the junction. The returned triangle covers the remaining region. Streams other than
    /// positions gain one row interpolated along the split edge.
    fn split(
        &mut self,
        junction: Junction,
        streams: &mut [AttribStream],
        pos_slot: usize,
    ) -> WorkTriangle {
        let edge_vert = junction.edge;
        let next_vert = (edge_vert + 1) % 3;
        let odd_vert = (edge_vert + 2) % 3;

        let corners = streams
            .iter_mut()
            .zip(self.corners.iter_mut())
            .enumerate()
            .map(|(slot, (stream, tri))| {
                let mid = if slot == pos_slot {
                    junction.vertex
                } else {
                    stream.push_lerp(tri[edge_vert], tri[next_vert], junction.param)
                };
                let new_tri = [mid, tri[odd_vert], tri[edge_vert]];
                tri[edge_vert] = mid;
                new_tri
            })
            .collect();

        WorkTriangle {
            batch: self.batch,
            corners,
        }
    }
}

/// Find the first vertex lying in the interior of an edge of `tri`.
///
/// Every position row is tested, including rows not referenced by any corner.
fn find_junction(
    tri: &Triangle<f32>,
    positions: &[f32],
    params: &TJunctionParams,
) -> Option<Junction> {
    for edge in 0..3 {
        for (vertex, p) in positions.chunks_exact(3).enumerate() {
            let p = Vector3::new(p[0], p[1], p[2]);
            let proj = match tri.edge_projection(edge, &p) {
                Some(proj) => proj,
                None => break,
            };

            if proj.param <= params.min_param || proj.param >= params.max_param {
                continue;
            }

            if proj.distance_squared < params.max_distance_squared {
                return Some(Junction {
                    edge,
                    vertex: vertex as u32,
                    param: proj.param,
                });
            }
        }
    }
    None
}

impl Mesh {
    /// Eliminate T-junctions using default tolerances.
    ///
    /// Returns the number of junctions fixed. See [`Mesh::fix_t_junctions_with`].
    pub fn fix_t_junctions(&mut self) -> Result<usize, Error> {
        self.fix_t_junctions_with(&TJunctionParams::default())
    }

    /// Split triangles until no position lies in the interior of any triangle edge.
    ///
    /// Each split moves a triangle corner onto the junction vertex and appends a new triangle to
    /// the same batch. Streams other than positions gain one interpolated row per split. On
    /// success all index arrays and batches are rebuilt with triangles grouped by batch, keeping
    /// their relative order within each batch. Returns the number of junctions fixed.
    ///
    /// The mesh is left untouched on error.
    pub fn fix_t_junctions_with(&mut self, params: &TJunctionParams) -> Result<usize, Error> {
        let pos_slot = self
            .stream_slot(AttribKind::Position)
            .ok_or(Error::MissingStream(AttribKind::Position))?;
        self.validate_batches()?;

        let mut work = self.work_list();
        let num_positions = self.streams()[pos_slot].num_rows();
        let limit = params
            .max_splits
            .unwrap_or_else(|| 2 * (work.len() + 1) * (num_positions + 1));

        let (streams, batches) = self.parts_mut();
        let orig_num_rows: Vec<usize> = streams.iter().map(AttribStream::num_rows).collect();

        let mut num_fixed = 0;
        let mut t = 0;
        while t < work.len() {
            let tri = Triangle::from_indexed_rows(
                &work[t].corners[pos_slot],
                streams[pos_slot].rows(),
            );

            let junction = match find_junction(&tri, streams[pos_slot].rows(), params) {
                Some(junction) => junction,
                None => {
                    t += 1;
                    continue;
                }
            };

            if num_fixed >= limit {
                for (stream, &num_rows) in streams.iter_mut().zip(orig_num_rows.iter()) {
                    stream.truncate_rows(num_rows);
                }
                return Err(Error::SplitLimitExceeded { limit });
            }

            log::trace!(
                "Splitting triangle {} at vertex {} (edge {}, t = {})",
                t,
                junction.vertex,
                junction.edge,
                junction.param
            );

            // Triangle `t` changed shape, so it is scanned again before moving on.
            let new_tri = work[t].split(junction, streams, pos_slot);
            work.push(new_tri);
            num_fixed += 1;
        }

        // Group triangles by batch. The sort is stable, which preserves order within each batch.
        work.sort_by_key(|tri| tri.batch);

        for (slot, stream) in streams.iter_mut().enumerate() {
            let indices = work
                .iter()
                .flat_map(|tri| tri.corners[slot].iter().cloned())
                .collect();
            stream.replace_indices(indices);
        }

        let mut counts = vec![0; batches.len()];
        for tri in work.iter() {
            counts[tri.batch] += 3;
        }

        let mut start = 0;
        for (batch, count) in batches.iter_mut().zip(counts) {
            *batch = Batch::new(start, count);
            start += count;
        }

        log::debug!(
            "Fixed {} T-junctions, {} triangles in {} batches",
            num_fixed,
            work.len(),
            batches.len()
        );

        Ok(num_fixed)
    }

    /// Collect the triangles of all batches, in batch order.
    fn work_list(&self) -> Vec<WorkTriangle> {
        let mut work = Vec::with_capacity(self.num_triangles());
        for (batch_id, batch) in self.batches().iter().enumerate() {
            for first in batch.range().step_by(3) {
                let corners = self
                    .streams()
                    .iter()
                    .map(|stream| {
                        let idx = stream.indices();
                        [idx[first], idx[first + 1], idx[first + 2]]
                    })
                    .collect();
                work.push(WorkTriangle {
                    batch: batch_id,
                    corners,
                });
            }
        }
        work
    }
}
