//! IO module for mesh files.
//!
//! Supported formats:
//!  - `obj` for loading via [`obj`](https://crates.io/crates/obj) and for saving.
//!
//! Only positions, texture coordinates, normals, groups and polygonal faces are read. Groups
//! (`g <name>`) become batches and polygons are fan triangulated.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::mesh::{self, Mesh};

pub mod obj;

/// A trait for specific scene, object or mesh models to extract mesh data from.
pub trait MeshExtractor {
    /// Constructs a `Mesh` from this model.
    fn extract_mesh(&self) -> Result<Mesh, Error>;
}

/// Load a mesh from a given file.
pub fn load_mesh<P: AsRef<Path>>(file: P) -> Result<Mesh, Error> {
    load_mesh_impl(file.as_ref())
}

fn load_mesh_impl(file: &Path) -> Result<Mesh, Error> {
    match file.extension().and_then(|ext| ext.to_str()) {
        Some("obj") => load_mesh_from_reader(File::open(file)?),
        _ => Err(Error::UnsupportedFileFormat),
    }
}

/// Load a mesh from `obj` formatted data.
pub fn load_mesh_from_reader<R: Read>(reader: R) -> Result<Mesh, Error> {
    let text = obj::strip_object_statements(BufReader::new(reader))?;
    let data = obj::ObjData::load_buf_with_config(
        text.as_slice(),
        obj::LoadConfig { strict: false },
    )?;
    data.extract_mesh()
}

/// Load a mesh from an `obj` formatted string.
pub fn load_mesh_from_str(text: &str) -> Result<Mesh, Error> {
    load_mesh_from_reader(text.as_bytes())
}

/// Save a mesh to a file.
pub fn save_mesh<P: AsRef<Path>>(mesh: &Mesh, file: P) -> Result<(), Error> {
    save_mesh_impl(mesh, file.as_ref())
}

fn save_mesh_impl(mesh: &Mesh, file: &Path) -> Result<(), Error> {
    match file.extension().and_then(|ext| ext.to_str()) {
        Some("obj") => {
            // Check the mesh before creating the output file.
            obj::check_exportable(mesh)?;
            let mut writer = BufWriter::new(File::create(file)?);
            save_mesh_to_writer(mesh, &mut writer)?;
            writer.flush()?;
            Ok(())
        }
        _ => Err(Error::UnsupportedFileFormat),
    }
}

/// Write a mesh in `obj` format.
pub fn save_mesh_to_writer<W: Write>(mesh: &Mesh, writer: W) -> Result<(), Error> {
    obj::write_mesh(mesh, writer)
}

/// Convert a mesh into an `obj` formatted string.
pub fn mesh_to_obj_string(mesh: &Mesh) -> Result<String, Error> {
    let mut buf = Vec::new();
    save_mesh_to_writer(mesh, &mut buf)?;
    // Only ASCII is ever written.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[derive(Debug)]
pub enum Error {
    IO { source: std::io::Error },
    Obj { source: obj::ObjError },
    Mesh { source: mesh::Error },
    UnsupportedFileFormat,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO { source } => Some(source),
            Error::Obj { source } => Some(source),
            Error::Mesh { source } => Some(source),
            Error::UnsupportedFileFormat => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IO { source } => write!(f, "IO Error: {}", source),
            Error::Obj { source } => write!(f, "An Obj IO error occurred: {}", source),
            Error::Mesh { source } => write!(f, "Invalid mesh data: {}", source),
            Error::UnsupportedFileFormat => write!(f, "Unsupported file format specified"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IO { source: err }
    }
}

impl From<obj::ObjError> for Error {
    fn from(err: obj::ObjError) -> Error {
        Error::Obj { source: err }
    }
}

impl From<mesh::Error> for Error {
    fn from(err: mesh::Error) -> Error {
        Error::Mesh { source: err }
    }
}
