use glam::Vec3;

use crate::error::MeshImportError;
use crate::normals::generate_normals;

/// Indexed triangle mesh with per-vertex normals.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Assemble a mesh, checking that every index is in range.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Result<Self, MeshImportError> {
        if indices.len() % 3 != 0 {
            return Err(MeshImportError::IncompleteTriangle(indices.len()));
        }
        if normals.len() != positions.len() {
            return Err(MeshImportError::NormalCountMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshImportError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }
        Ok(Self {
            positions,
            normals,
            indices,
        })
    }

    /// Like [`Mesh::new`], deriving normals from the faces.
    pub fn with_generated_normals(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Result<Self, MeshImportError> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshImportError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }
        let normals = generate_normals(&positions, &indices);
        Self::new(positions, normals, indices)
    }

    /// For generators whose output is valid by construction.
    pub(crate) fn from_parts_unchecked(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Self {
        debug_assert_eq!(positions.len(), normals.len());
        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Centre of the axis-aligned bounding box and the distance from it to
    /// the farthest vertex.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        let Some(&first) = self.positions.first() else {
            return (Vec3::ZERO, 0.0);
        };
        let (min, max) = self
            .positions
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        let center = (min + max) * 0.5;
        let radius = self
            .positions
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0_f32, f32::max);
        (center, radius)
    }

    /// Recentre on the bounding box and scale to fit the unit sphere, so a
    /// model matrix scale equals the displayed radius.
    pub fn normalize_to_unit_sphere(&mut self) {
        let (center, radius) = self.bounding_sphere();
        if radius <= f32::EPSILON {
            return;
        }
        for p in &mut self.positions {
            *p = (*p - center) / radius;
        }
    }
}
