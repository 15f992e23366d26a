//! Wavefront OBJ import.

use std::path::Path;

use glam::Vec3;
use tracing::{debug, info, warn};

use crate::error::MeshImportError;
use crate::icosphere::{DEFAULT_SUBDIVISIONS, icosphere};
use crate::mesh::Mesh;
use crate::normals::generate_normals;

/// Load an OBJ file, merging all of its objects into one mesh.
///
/// Faces are triangulated. When the file has no normals for some object,
/// smooth normals are generated from its faces.
pub fn load_obj(path: &Path) -> Result<Mesh, MeshImportError> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj(path, &options).map_err(|source| MeshImportError::Load {
            path: path.to_path_buf(),
            source,
        })?;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for model in models {
        let mesh = model.mesh;
        let base = positions.len() as u32;
        let object_positions: Vec<Vec3> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();

        let object_normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|n| Vec3::new(n[0], n[1], n[2]).try_normalize().unwrap_or(Vec3::Y))
                .collect()
        } else {
            if !mesh.normals.is_empty() {
                warn!(object = %model.name, "Ignoring partial normals");
            }
            debug!(object = %model.name, "Generating normals");
            generate_normals(&object_positions, &mesh.indices)
        };

        positions.extend(object_positions);
        normals.extend(object_normals);
        indices.extend(mesh.indices.iter().map(|i| i + base));
    }

    if indices.is_empty() {
        return Err(MeshImportError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut mesh = Mesh::new(positions, normals, indices)?;
    mesh.normalize_to_unit_sphere();
    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Mesh loaded"
    );
    Ok(mesh)
}

/// Load `path` if given, otherwise build the default sphere.
pub fn load_mesh(path: Option<&Path>) -> Result<Mesh, MeshImportError> {
    match path {
        Some(path) => load_obj(path),
        None => {
            info!("No mesh given, using built-in icosphere");
            Ok(icosphere(DEFAULT_SUBDIVISIONS))
        }
    }
}
