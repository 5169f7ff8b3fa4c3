use math::{RealField, Scalar, Vector3};

/// Generic triangle with three points
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle<T: Scalar>(pub Vector3<T>, pub Vector3<T>, pub Vector3<T>);

/// Location of a point relative to the supporting line of a triangle edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeProjection<T> {
    /// Parameter of the closest point on the line, `0` at the first edge vertex and `1` at the
    /// second.
    pub param: T,
    /// Squared distance from the point to the line.
    pub distance_squared: T,
}

impl<T: Scalar> Triangle<T> {
    /// Build a Triangle from a triplet of indices into a flat array of `[x, y, z]` rows.
    #[inline]
    pub fn from_indexed_rows(indices: &[u32; 3], rows: &[T]) -> Triangle<T> {
        let vertex = |i: u32| {
            let start = i as usize * 3;
            Vector3::new(
                rows[start].clone(),
                rows[start + 1].clone(),
                rows[start + 2].clone(),
            )
        };
        Triangle(vertex(indices[0]), vertex(indices[1]), vertex(indices[2]))
    }

    /// Build a new triangle from an array of vertex positions.
    #[inline]
    pub fn new([a, b, c]: [[T; 3]; 3]) -> Self {
        Triangle(a.into(), b.into(), c.into())
    }

    /// Get the vertex at the given corner.
    #[inline]
    pub fn vertex(&self, corner: usize) -> &Vector3<T> {
        match corner {
            0 => &self.0,
            1 => &self.1,
            2 => &self.2,
            _ => panic!("Triangle has only 3 vertices"),
        }
    }
}

impl<T: RealField + Copy> Triangle<T> {
    /// Project point `p` onto the line through edge `edge`, which runs from corner `edge` to
    /// corner `(edge + 1) % 3`.
    ///
    /// Returns `None` for a degenerate (zero length) edge.
    #[inline]
    pub fn edge_projection(&self, edge: usize, p: &Vector3<T>) -> Option<EdgeProjection<T>> {
        let a = self.vertex(edge);
        let b = self.vertex((edge + 1) % 3);
        let dir = b - a;
        let len_squared = dir.dot(&dir);
        if len_squared == T::zero() {
            return None;
        }

        let param = (p - a).dot(&dir) / len_squared;
        let closest = a + dir * param;
        Some(EdgeProjection {
            param,
            distance_squared: (p - closest).norm_squared(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    fn make_test_triangle() -> Triangle<f32> {
        Triangle::new([[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [5.0, 10.0, 0.0]])
    }

    #[test]
    fn indexed_rows() {
        let rows = [1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 4.0, 5.0, 6.0];
        let tri = Triangle::from_indexed_rows(&[2, 0, 1], &rows);
        assert_eq!(tri.0, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(tri.1, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(tri.2, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn projection_onto_edges() {
        let tri = make_test_triangle();
        let midpoint = Vector3::new(5.0, 0.0, 0.0);

        let proj = tri.edge_projection(0, &midpoint).unwrap();
        assert_relative_eq!(proj.param, 0.5);
        assert_relative_eq!(proj.distance_squared, 0.0);

        // The last edge runs from the apex back to the origin.
        let proj = tri.edge_projection(2, &Vector3::new(0.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(proj.param, 1.0);

        let above = Vector3::new(2.0, 3.0, 0.0);
        let proj = tri.edge_projection(0, &above).unwrap();
        assert_relative_eq!(proj.param, 0.2);
        assert_relative_eq!(proj.distance_squared, 9.0);
    }

    #[test]
    fn degenerate_edge() {
        let tri = Triangle::new([[1.0f32, 1.0, 1.0], [1.0, 1.0, 1.0], [0.0, 0.0, 0.0]]);
        assert!(tri.edge_projection(0, &Vector3::zeros()).is_none());
        assert!(tri.edge_projection(1, &Vector3::zeros()).is_some());
    }
}
