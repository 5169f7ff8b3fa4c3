//!
//! In-place transforms of mesh attribute streams.
//!
//! This module also implements the transform ops from `meshseam::ops::transform` for `Mesh`.
//! These act on the position stream only and are no-ops on a mesh without positions.
//!

use super::{Error, Mesh};
use crate::attrib::AttribKind;
use crate::ops::transform::*;

impl Mesh {
    /// Negate the z component of every position, converting between left and right handed
    /// coordinate systems.
    pub fn flip_position_z(&mut self) -> Result<(), Error> {
        self.negate_component(AttribKind::Position, 2)
    }

    /// Negate the z component of every normal.
    pub fn flip_normals(&mut self) -> Result<(), Error> {
        self.negate_component(AttribKind::Normal, 2)
    }

    /// Replace the `v` texture coordinate of every row by `1 - v`.
    pub fn invert_v(&mut self) -> Result<(), Error> {
        let stream = self
            .stream_mut(AttribKind::TexCoord)
            .ok_or(Error::MissingStream(AttribKind::TexCoord))?;
        for uv in stream.rows_mut().chunks_exact_mut(2) {
            uv[1] = 1.0 - uv[1];
        }
        Ok(())
    }

    fn negate_component(&mut self, kind: AttribKind, component: usize) -> Result<(), Error> {
        let stream = self.stream_mut(kind).ok_or(Error::MissingStream(kind))?;
        let n = stream.num_components();
        for row in stream.rows_mut().chunks_exact_mut(n) {
            row[component] = -row[component];
        }
        Ok(())
    }
}

impl Scale<f32> for Mesh {
    /// Scale mesh positions by a given vector of scale factors.
    /// `s = [1.0; 3]` corresponds to a noop.
    fn scale(&mut self, s: [f32; 3]) {
        if let Some(positions) = self.stream_mut(AttribKind::Position) {
            for p in positions.rows_mut().chunks_exact_mut(3) {
                p[0] *= s[0];
                p[1] *= s[1];
                p[2] *= s[2];
            }
        }
    }
}

impl Translate<f32> for Mesh {
    /// Translate mesh positions by the given translation vector (displacement) `t`.
    fn translate(&mut self, t: [f32; 3]) {
        if let Some(positions) = self.stream_mut(AttribKind::Position) {
            for p in positions.rows_mut().chunks_exact_mut(3) {
                p[0] += t[0];
                p[1] += t[1];
                p[2] += t[2];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    fn sample_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_stream(
            AttribKind::Position,
            vec![0.0, 0.0, 1.0, 1.0, 0.0, -2.0, 0.0, 1.0, 0.5],
            vec![0, 1, 2],
        )
        .unwrap();
        mesh.add_stream(
            AttribKind::TexCoord,
            vec![0.0, 0.0, 1.0, 0.25, 0.0, 1.0],
            vec![0, 1, 2],
        )
        .unwrap();
        mesh.add_batch(0, 3);
        mesh
    }

    #[test]
    fn flip_positions() -> Result<(), Error> {
        let mut mesh = sample_mesh();
        mesh.flip_position_z()?;
        let pos = mesh.stream(AttribKind::Position).unwrap().rows();
        assert_eq!(pos, &[0.0, 0.0, -1.0, 1.0, 0.0, 2.0, 0.0, 1.0, -0.5]);

        // Indices are untouched.
        assert_eq!(mesh.stream(AttribKind::Position).unwrap().indices(), &[0, 1, 2]);
        Ok(())
    }

    #[test]
    fn flip_normals_requires_normals() {
        let mut mesh = sample_mesh();
        assert_eq!(
            mesh.flip_normals(),
            Err(Error::MissingStream(AttribKind::Normal))
        );

        mesh.add_stream(AttribKind::Normal, vec![0.0, 0.6, 0.8], vec![0, 0, 0])
            .unwrap();
        mesh.flip_normals().unwrap();
        assert_eq!(
            mesh.stream(AttribKind::Normal).unwrap().rows(),
            &[0.0, 0.6, -0.8]
        );
    }

    #[test]
    fn invert_texcoords() -> Result<(), Error> {
        let mut mesh = sample_mesh();
        mesh.invert_v()?;
        let uvs = mesh.stream(AttribKind::TexCoord).unwrap().rows();
        assert_relative_eq!(uvs[1], 1.0);
        assert_relative_eq!(uvs[3], 0.75);
        assert_relative_eq!(uvs[5], 0.0);
        // u is untouched.
        assert_eq!([uvs[0], uvs[2], uvs[4]], [0.0, 1.0, 0.0]);
        Ok(())
    }

    #[test]
    fn transforms_require_streams() {
        let mut mesh = Mesh::new();
        assert!(mesh.flip_position_z().is_err());
        assert!(mesh.invert_v().is_err());
    }

    #[test]
    fn scale_and_translate() {
        let mesh = sample_mesh()
            .scaled([2.0, 1.0, 1.0])
            .translated([0.0, 1.0, 0.0]);
        let pos = mesh.stream(AttribKind::Position).unwrap();
        assert_eq!(pos.row(1), &[2.0, 1.0, -2.0]);
        // Other streams are unaffected.
        assert_eq!(mesh.stream(AttribKind::TexCoord).unwrap().row(1), &[1.0, 0.25]);
    }

    #[test]
    fn uniform_scale() {
        let mut mesh = sample_mesh();
        mesh.uniform_scale(2.0);
        assert_eq!(
            mesh.stream(AttribKind::Position).unwrap().rows(),
            &[0.0, 0.0, 2.0, 2.0, 0.0, -4.0, 0.0, 2.0, 1.0]
        );

        let mesh = mesh.uniformly_scaled(0.5);
        assert_eq!(mesh, sample_mesh());
    }
}
