use std::path::PathBuf;

/// Errors raised while importing or assembling a mesh.
#[derive(Debug, thiserror::Error)]
pub enum MeshImportError {
    /// The OBJ loader rejected the file.
    #[error("failed to load mesh {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    /// The file parsed but contained no triangles.
    #[error("mesh {} contains no triangles", .path.display())]
    Empty { path: PathBuf },

    /// Index count is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    /// An index points past the vertex list.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// Normal count differs from position count.
    #[error("{normals} normals for {positions} positions")]
    NormalCountMismatch { positions: usize, normals: usize },
}
