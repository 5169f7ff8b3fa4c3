use std::convert::TryFrom;
use std::io::{BufRead, Write};
use std::ops::Range;

use ahash::AHashMap;
use objio::IndexTuple;

use crate::attrib::AttribKind;
use crate::mesh::{self, Mesh};

use super::MeshExtractor;

pub use objio::ObjError;
pub use objio::{LoadConfig, ObjData};

pub use super::Error;

/// Material assigned to faces that precede the first group statement.
const DEFAULT_MATERIAL: &str = "default";

/// A named group of faces, possibly spread over several ranges of corners.
struct Material {
    name: String,
    ranges: Vec<Range<usize>>,
}

impl Material {
    fn new(name: &str) -> Self {
        Material {
            name: name.to_string(),
            ranges: Vec::new(),
        }
    }

    /// Total number of corners in this material.
    fn span(&self) -> usize {
        self.ranges.iter().map(|r| r.len()).sum()
    }
}

/// Per-corner row indices for each of the streams an obj file can define.
#[derive(Default)]
struct Corners {
    position: Vec<u32>,
    texture: Vec<u32>,
    normal: Vec<u32>,
    /// Number of corners referencing a texture coordinate.
    num_texture_refs: usize,
    /// Number of corners referencing a normal.
    num_normal_refs: usize,
}

impl Corners {
    fn len(&self) -> usize {
        self.position.len()
    }

    fn push(&mut self, &IndexTuple(p, t, n): &IndexTuple) {
        // Out of range indices are caught when the streams are built.
        let to_u32 = |i: usize| u32::try_from(i).unwrap_or(u32::MAX);
        self.position.push(to_u32(p));
        self.texture.push(t.map_or(0, to_u32));
        self.normal.push(n.map_or(0, to_u32));
        self.num_texture_refs += t.is_some() as usize;
        self.num_normal_refs += n.is_some() as usize;
    }

    /// Fan triangulate a polygon around its first vertex.
    ///
    /// Polygons with fewer than 3 vertices are skipped, in which case `false` is returned.
    fn push_polygon(&mut self, poly: &[IndexTuple]) -> bool {
        if poly.len() < 3 {
            return false;
        }
        for i in 2..poly.len() {
            self.push(&poly[0]);
            self.push(&poly[i - 1]);
            self.push(&poly[i]);
        }
        true
    }

    fn extend_from(&mut self, other: &Corners, range: Range<usize>) {
        self.position
            .extend_from_slice(&other.position[range.clone()]);
        self.texture.extend_from_slice(&other.texture[range.clone()]);
        self.normal.extend_from_slice(&other.normal[range]);
    }
}

impl MeshExtractor for ObjData {
    /// Build a triangle mesh with one batch per group.
    ///
    /// Groups sharing a name are merged into a single batch, ordered by first appearance.
    fn extract_mesh(&self) -> Result<Mesh, Error> {
        let mut corners = Corners::default();
        let mut materials = vec![Material::new(DEFAULT_MATERIAL)];
        let mut material_ids = AHashMap::new();
        material_ids.insert(DEFAULT_MATERIAL.to_string(), 0);

        let mut current = 0;
        let mut open = 0;
        for (object_idx, object) in self.objects.iter().enumerate() {
            for (group_idx, group) in object.groups.iter().enumerate() {
                // Faces following an `o` statement are put in a fresh default group, but they
                // belong to the material that was open before it.
                let continued =
                    object_idx > 0 && group_idx == 0 && group.name == DEFAULT_MATERIAL;
                if !continued {
                    materials[current].ranges.push(open..corners.len());
                    current = *material_ids
                        .entry(group.name.clone())
                        .or_insert_with(|| {
                            materials.push(Material::new(&group.name));
                            materials.len() - 1
                        });
                    open = corners.len();
                }

                for poly in &group.polys {
                    if !corners.push_polygon(&poly.0) {
                        log::warn!(
                            "Skipping a face with {} vertices in group \"{}\"",
                            poly.0.len(),
                            group.name
                        );
                    }
                }
            }
        }
        materials[current].ranges.push(open..corners.len());

        if self.texture.is_empty() && corners.num_texture_refs > 0 {
            log::warn!(
                "Ignoring texture coordinate indices on {} corners: no texture coordinates defined",
                corners.num_texture_refs
            );
        }
        if self.normal.is_empty() && corners.num_normal_refs > 0 {
            log::warn!(
                "Ignoring normal indices on {} corners: no normals defined",
                corners.num_normal_refs
            );
        }

        materials.retain(|mtl| {
            let used = mtl.span() > 0;
            if !used {
                log::debug!("Dropping empty material \"{}\"", mtl.name);
            }
            used
        });

        // Arrange corners contiguously by material.
        let mut arranged = Corners::default();
        let mut batches = Vec::with_capacity(materials.len());
        for mtl in materials.iter() {
            let start = arranged.len();
            for range in mtl.ranges.iter() {
                arranged.extend_from(&corners, range.clone());
            }
            batches.push((start, arranged.len() - start));
        }

        let Corners {
            position,
            texture,
            normal,
            ..
        } = arranged;

        let mut mesh = Mesh::new();
        mesh.add_stream(
            AttribKind::Position,
            bytemuck::cast_slice(&self.position).to_vec(),
            position,
        )?;
        if !self.texture.is_empty() {
            mesh.add_stream(
                AttribKind::TexCoord,
                bytemuck::cast_slice(&self.texture).to_vec(),
                texture,
            )?;
        }
        if !self.normal.is_empty() {
            mesh.add_stream(
                AttribKind::Normal,
                bytemuck::cast_slice(&self.normal).to_vec(),
                normal,
            )?;
        }
        for (start, count) in batches {
            mesh.add_batch(start, count);
        }

        log::debug!(
            "Loaded {} positions, {} texture coordinates and {} normals with {} triangles in {} batches",
            self.position.len(),
            self.texture.len(),
            self.normal.len(),
            mesh.num_triangles(),
            mesh.batches().len()
        );

        Ok(mesh)
    }
}

/// Copy `obj` data from `reader`, blanking out object (`o`) statements.
///
/// Objects carry no meaning for meshes. The `obj` crate also discards groups closed by a bare `g`
/// when an `o` statement follows, so these lines are removed before parsing. Blank lines are left
/// in their place to keep line numbers in parse errors intact.
pub(crate) fn strip_object_statements<R: BufRead>(mut reader: R) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut line = Vec::new();
    while reader.read_until(b'\n', &mut line)? > 0 {
        if is_object_statement(&line) {
            out.push(b'\n');
        } else {
            out.extend_from_slice(&line);
        }
        line.clear();
    }
    Ok(out)
}

fn is_object_statement(line: &[u8]) -> bool {
    line.split(|b| b.is_ascii_whitespace())
        .find(|word| !word.is_empty())
        .map_or(false, |word| word == b"o")
}

/// Check that the given mesh can be written in `obj` format.
pub fn check_exportable(mesh: &Mesh) -> Result<(), Error> {
    if mesh.stream(AttribKind::Position).is_none() {
        return Err(mesh::Error::MissingStream(AttribKind::Position).into());
    }
    mesh.validate_batches()?;
    Ok(())
}

/// Write the given mesh in `obj` format.
///
/// Attribute rows are written with 4 decimal places. Each batch starts with `usemtl Mat<N>`,
/// where `N` is the batch index. This is preceded by an extra `g Mat<N>` line, which is not part
/// of the plain `usemtl` layout but lets [`load_mesh`](crate::io::load_mesh) rebuild the same
/// batches, since grouping on import follows `g` statements only.
pub fn write_mesh<W: Write>(mesh: &Mesh, mut out: W) -> Result<(), Error> {
    check_exportable(mesh)?;
    let positions = mesh
        .stream(AttribKind::Position)
        .ok_or(mesh::Error::MissingStream(AttribKind::Position))?;
    let texcoords = mesh.stream(AttribKind::TexCoord);
    let normals = mesh.stream(AttribKind::Normal);

    for p in positions.row_iter() {
        writeln!(out, "v {:.4} {:.4} {:.4}", p[0], p[1], p[2])?;
    }
    if let Some(texcoords) = texcoords {
        for uv in texcoords.row_iter() {
            writeln!(out, "vt {:.4} {:.4}", uv[0], uv[1])?;
        }
    }
    if let Some(normals) = normals {
        for n in normals.row_iter() {
            writeln!(out, "vn {:.4} {:.4} {:.4}", n[0], n[1], n[2])?;
        }
    }

    for (i, batch) in mesh.batches().iter().enumerate() {
        writeln!(out, "g Mat{}", i)?;
        writeln!(out, "usemtl Mat{}", i)?;
        for first in batch.range().step_by(3) {
            write!(out, "f")?;
            for corner in first..first + 3 {
                write!(out, " {}", positions.indices()[corner] + 1)?;
                match (texcoords, normals) {
                    (Some(t), Some(n)) => write!(
                        out,
                        "/{}/{}",
                        t.indices()[corner] + 1,
                        n.indices()[corner] + 1
                    )?,
                    (Some(t), None) => write!(out, "/{}", t.indices()[corner] + 1)?,
                    (None, Some(n)) => write!(out, "//{}", n.indices()[corner] + 1)?,
                    (None, None) => {}
                }
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{load_mesh_from_str, mesh_to_obj_string};
    use crate::mesh::Batch;

    const TRIANGLE_POSITIONS: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";

    fn position_indices(mesh: &Mesh) -> &[u32] {
        mesh.stream(AttribKind::Position).unwrap().indices()
    }

    #[test]
    fn fan_triangulation() -> Result<(), Error> {
        let mesh = load_mesh_from_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n")?;
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(position_indices(&mesh), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.batches(), &[Batch::new(0, 6)]);

        let mesh =
            load_mesh_from_str("v 0 0 0\nv 1 0 0\nv 2 1 0\nv 1 2 0\nv 0 1 0\nf 1 2 3 4 5\n")?;
        assert_eq!(position_indices(&mesh), &[0, 1, 2, 0, 2, 3, 0, 3, 4]);
        Ok(())
    }

    #[test]
    fn relative_indices() -> Result<(), Error> {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\nv 1 1 0\nf -3 -1 -2\n";
        let mesh = load_mesh_from_str(text)?;
        // `-1` refers to the last position at the time the face is read.
        assert_eq!(position_indices(&mesh), &[0, 1, 2, 1, 3, 2]);
        Ok(())
    }

    #[test]
    fn independent_stream_indices() -> Result<(), Error> {
        let text = format!(
            "{}vt 0 0\nvt 1 0\nvn 0 0 1\nvn 0 0 -1\nf 1/2/1 2/1/2 3/2/1\n",
            TRIANGLE_POSITIONS
        );
        let mesh = load_mesh_from_str(&text)?;
        assert_eq!(position_indices(&mesh), &[0, 1, 2]);
        let uv = mesh.stream(AttribKind::TexCoord).unwrap();
        assert_eq!(uv.indices(), &[1, 0, 1]);
        assert_eq!(uv.num_rows(), 2);
        let nml = mesh.stream(AttribKind::Normal).unwrap();
        assert_eq!(nml.indices(), &[0, 1, 0]);
        assert_eq!(nml.row(1), &[0.0, 0.0, -1.0]);
        Ok(())
    }

    #[test]
    fn object_statements_keep_the_open_group() -> Result<(), Error> {
        let text = format!(
            "{}g a\nf 1 2 3\no thing\nf 1 3 2\ng b\nf 2 3 1\n",
            TRIANGLE_POSITIONS
        );
        let mesh = load_mesh_from_str(&text)?;
        assert_eq!(mesh.batches(), &[Batch::new(0, 6), Batch::new(6, 3)]);
        assert_eq!(position_indices(&mesh), &[0, 1, 2, 0, 2, 1, 1, 2, 0]);

        // Same grouping when extracting from data parsed with objects intact.
        let data = ObjData::load_buf_with_config(text.as_bytes(), LoadConfig { strict: false })?;
        assert_eq!(data.objects.len(), 2);
        assert_eq!(data.extract_mesh()?, mesh);
        Ok(())
    }

    #[test]
    fn object_after_bare_group() -> Result<(), Error> {
        let text = format!("{}g a\nf 1 2 3\ng\no thing\nf 1 3 2\n", TRIANGLE_POSITIONS);
        let mesh = load_mesh_from_str(&text)?;
        // A bare `g` reopens the default material, and no faces are lost to the `o`.
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.batches(), &[Batch::new(0, 3), Batch::new(3, 3)]);
        assert_eq!(position_indices(&mesh), &[0, 2, 1, 0, 1, 2]);
        Ok(())
    }

    #[test]
    fn object_statement_detection() -> Result<(), Error> {
        assert!(is_object_statement(b"o thing\n"));
        assert!(is_object_statement(b"  o\r\n"));
        assert!(!is_object_statement(b"obj\n"));
        assert!(!is_object_statement(b"# o\n"));
        assert!(!is_object_statement(b"\n"));

        let stripped = strip_object_statements("v 0 0 0\no a\nf 1 1 1".as_bytes())?;
        assert_eq!(stripped, b"v 0 0 0\n\nf 1 1 1");
        Ok(())
    }

    #[test]
    fn indices_into_missing_streams_are_ignored() -> Result<(), Error> {
        let text = format!("{}f 1/1/1 2/1/1 3/1/1\n", TRIANGLE_POSITIONS);
        let mesh = load_mesh_from_str(&text)?;
        assert_eq!(mesh.streams().len(), 1);
        assert_eq!(position_indices(&mesh), &[0, 1, 2]);
        Ok(())
    }

    #[test]
    fn reopened_groups_are_merged() -> Result<(), Error> {
        let text = format!(
            "{}g a\nf 1 2 3\ng b\nf 1 3 2\ng a\nf 2 3 1\n",
            TRIANGLE_POSITIONS
        );
        let mesh = load_mesh_from_str(&text)?;
        assert_eq!(mesh.batches(), &[Batch::new(0, 6), Batch::new(6, 3)]);
        assert_eq!(position_indices(&mesh), &[0, 1, 2, 1, 2, 0, 0, 2, 1]);
        Ok(())
    }

    #[test]
    fn ungrouped_faces() -> Result<(), Error> {
        let text = format!("{}f 1 2 3\ng a\nf 1 3 2\n", TRIANGLE_POSITIONS);
        let mesh = load_mesh_from_str(&text)?;
        assert_eq!(mesh.batches(), &[Batch::new(0, 3), Batch::new(3, 3)]);
        Ok(())
    }

    #[test]
    fn empty_groups_are_dropped() -> Result<(), Error> {
        let text = format!(
            "# comment\n{}g empty\ng a\nf 1 2 3\n\ng unused\n",
            TRIANGLE_POSITIONS
        );
        let mesh = load_mesh_from_str(&text)?;
        assert_eq!(mesh.batches(), &[Batch::new(0, 3)]);
        Ok(())
    }

    #[test]
    fn no_faces() -> Result<(), Error> {
        let mesh = load_mesh_from_str(TRIANGLE_POSITIONS)?;
        assert!(mesh.batches().is_empty());
        assert_eq!(mesh.num_corners(), 0);
        assert_eq!(mesh.stream(AttribKind::Position).unwrap().num_rows(), 3);
        assert!(mesh.stream(AttribKind::TexCoord).is_none());
        Ok(())
    }

    #[test]
    fn out_of_range_index() {
        let text = format!("{}f 1 2 4\n", TRIANGLE_POSITIONS);
        assert!(load_mesh_from_str(&text).is_err());
    }

    #[test]
    fn write_positions_only() -> Result<(), Error> {
        let mesh = load_mesh_from_str(&format!("{}f 1 2 3\n", TRIANGLE_POSITIONS))?;
        let text = mesh_to_obj_string(&mesh)?;
        assert_eq!(
            text,
            "v 0.0000 0.0000 0.0000\n\
             v 1.0000 0.0000 0.0000\n\
             v 0.0000 1.0000 0.0000\n\
             g Mat0\n\
             usemtl Mat0\n\
             f 1 2 3\n"
        );
        Ok(())
    }

    #[test]
    fn write_normals_without_texcoords() -> Result<(), Error> {
        let mesh = load_mesh_from_str(&format!(
            "{}vn 0 0 1\nf 1//1 2//1 3//1\n",
            TRIANGLE_POSITIONS
        ))?;
        let text = mesh_to_obj_string(&mesh)?;
        assert!(text.contains("vn 0.0000 0.0000 1.0000\n"));
        assert!(text.ends_with("f 1//1 2//1 3//1\n"));
        Ok(())
    }

    #[test]
    fn write_all_streams() -> Result<(), Error> {
        let mesh = load_mesh_from_str(&format!(
            "{}vt 0.25 0.123456\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n",
            TRIANGLE_POSITIONS
        ))?;
        let text = mesh_to_obj_string(&mesh)?;
        assert!(text.contains("vt 0.2500 0.1235\n"));
        assert!(text.ends_with("f 1/1/1 2/1/1 3/1/1\n"));
        Ok(())
    }

    #[test]
    fn write_requires_positions() {
        let mut mesh = Mesh::new();
        mesh.add_stream(AttribKind::Normal, vec![0.0, 0.0, 1.0], vec![])
            .unwrap();
        assert!(matches!(
            mesh_to_obj_string(&mesh),
            Err(Error::Mesh {
                source: mesh::Error::MissingStream(AttribKind::Position)
            })
        ));
    }

    #[test]
    fn roundtrip_text() -> Result<(), Error> {
        let text = "v 0.0000 0.0000 0.0000\n\
                    v 1.5000 0.0000 0.0000\n\
                    v 0.0000 1.0000 0.0000\n\
                    v 1.0000 1.0000 -0.2500\n\
                    vt 0.0000 0.0000\n\
                    vt 1.0000 0.0000\n\
                    vt 0.0000 1.0000\n\
                    vn 0.0000 0.0000 1.0000\n\
                    g Mat0\n\
                    usemtl Mat0\n\
                    f 1/1/1 2/2/1 3/3/1\n\
                    g Mat1\n\
                    usemtl Mat1\n\
                    f 2/2/1 4/3/1 3/1/1\n";
        let mesh = load_mesh_from_str(text)?;
        assert_eq!(mesh.batches(), &[Batch::new(0, 3), Batch::new(3, 3)]);
        assert_eq!(mesh_to_obj_string(&mesh)?, text);
        Ok(())
    }
}
