use crate::stl::{parse_stl, StlError};
use crate::surface::{SimpleMesh, ToSimpleMesh};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Failures surfaced by the mesh-loading boundary.
/// The rendering pipeline itself never touches files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read mesh file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported mesh format `{0}`, expected .stl or .obj")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Stl(#[from] StlError),
    #[error("could not load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("mesh contains no triangles")]
    EmptyMesh,
}

/// Load a triangle mesh, picking the parser from the file extension
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<SimpleMesh, LoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let mesh = match extension.as_str() {
        "stl" => parse_stl(&fs::read(path)?)?,
        "obj" => load_obj_mesh(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    if mesh.is_empty() {
        return Err(LoadError::EmptyMesh);
    }
    Ok(mesh)
}

/// Every model in the OBJ file is flattened into one triangle soup
fn load_obj_mesh(path: &Path) -> Result<SimpleMesh, LoadError> {
    let options = tobj::LoadOptions {
        triangulate: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options)?;
    let triangles = models
        .into_iter()
        .flat_map(|model| model.mesh.to_simple_mesh().triangles)
        .collect();
    Ok(SimpleMesh::new(triangles))
}
