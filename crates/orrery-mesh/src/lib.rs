//! Triangle meshes for the orrery: OBJ import and the built-in sphere.
//!
//! A [`Mesh`] is plain indexed geometry with one normal per vertex. It knows
//! nothing about GPUs; the renderer uploads it once and refers to the result
//! by handle.

mod error;
mod icosphere;
mod mesh;
mod normals;
mod obj;

pub use error::MeshImportError;
pub use icosphere::{DEFAULT_SUBDIVISIONS, icosphere};
pub use mesh::Mesh;
pub use normals::generate_normals;
pub use obj::{load_mesh, load_obj};
