use glam::Vec3;

/// Smooth per-vertex normals from area-weighted face normals.
///
/// Vertices that belong to no triangle, or only to degenerate ones, point
/// radially away from the origin (or up if they sit on it).
pub fn generate_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        // Cross product length is twice the area, which weights the sum.
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    accum
        .into_iter()
        .zip(positions)
        .map(|(n, p)| {
            n.try_normalize()
                .or_else(|| p.try_normalize())
                .unwrap_or(Vec3::Y)
        })
        .collect()
}
