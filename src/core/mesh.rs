//! Textured triangle mesh with a fixed vertex layout
//!
//! Same snapshot/live split as [`super::PointBuffer`]: uvs, texture layers
//! and indices are fixed at construction, positions are rewritten each tick
//! from the snapshot.

use crate::error::{GalleryError, Result};

/// One vertex of a [`TexturedMesh`] as built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    /// Texture coordinate, y up
    pub uv: [f32; 2],
    /// Texture slot sampled by the triangles using this vertex
    pub layer: u32,
}

#[derive(Debug, Clone)]
pub struct TexturedMesh {
    snapshot: Vec<[f32; 3]>,
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    layers: Vec<u32>,
    indices: Vec<u32>,
    generation: u64,
}

impl TexturedMesh {
    /// Every index must name a vertex and the index count must be a
    /// multiple of three.
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(GalleryError::MeshShape(format!(
                "{} indices do not form whole triangles",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(GalleryError::MeshShape(format!(
                "index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }

        Ok(Self::from_parts(vertices, indices))
    }

    fn from_parts(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        let snapshot: Vec<[f32; 3]> = vertices.iter().map(|v| v.position).collect();
        Self {
            positions: snapshot.clone(),
            snapshot,
            uvs: vertices.iter().map(|v| v.uv).collect(),
            layers: vertices.iter().map(|v| v.layer).collect(),
            indices,
            generation: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn snapshot_positions(&self) -> &[[f32; 3]] {
        &self.snapshot
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn layers(&self) -> &[u32] {
        &self.layers
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Rewrite every live position from its snapshot.
    pub fn update_positions<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &[f32; 3], &mut [f32; 3]),
    {
        for (i, (orig, live)) in self.snapshot.iter().zip(self.positions.iter_mut()).enumerate() {
            f(i, orig, live);
        }
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn checksum(&self) -> f64 {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64 + 1.0) * (p[0] as f64 + 2.0 * p[1] as f64 + 3.0 * p[2] as f64))
            .sum()
    }
}

/// Axis-aligned rectangle in a plane's `[0, 1]²` uv space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

/// Accumulates plane grids into one [`TexturedMesh`]. Indices are generated
/// alongside their vertices, so building cannot fail.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `segments[0] × segments[1]` grid covering `region` of a
    /// `size[0] × size[1]` plane centered at `center` (facing +z). Texture
    /// coordinates span the full `[0, 1]²` across the region.
    pub fn plane_region(
        &mut self,
        size: [f32; 2],
        center: [f32; 3],
        region: UvRect,
        segments: [u32; 2],
        layer: u32,
    ) -> &mut Self {
        let base = self.vertices.len() as u32;
        let [sx, sy] = [segments[0].max(1), segments[1].max(1)];

        for j in 0..=sy {
            let tv = j as f32 / sy as f32;
            let st_y = region.min[1] + (region.max[1] - region.min[1]) * tv;
            for i in 0..=sx {
                let tu = i as f32 / sx as f32;
                let st_x = region.min[0] + (region.max[0] - region.min[0]) * tu;
                self.vertices.push(MeshVertex {
                    position: [
                        center[0] + (st_x - 0.5) * size[0],
                        center[1] + (st_y - 0.5) * size[1],
                        center[2],
                    ],
                    uv: [tu, tv],
                    layer,
                });
            }
        }

        let row = sx + 1;
        for j in 0..sy {
            for i in 0..sx {
                let a = base + j * row + i;
                let b = a + 1;
                let c = a + row;
                let d = c + 1;
                self.indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }
        self
    }

    pub fn build(self) -> TexturedMesh {
        TexturedMesh::from_parts(self.vertices, self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> TexturedMesh {
        let mut builder = MeshBuilder::new();
        builder.plane_region(
            [2.0, 1.0],
            [0.0, 0.0, 0.0],
            UvRect {
                min: [0.0, 0.0],
                max: [0.5, 1.0],
            },
            [2, 2],
            1,
        );
        builder.build()
    }

    #[test]
    fn test_region_layout() {
        let mesh = quad();
        assert_eq!(mesh.len(), 9);
        assert_eq!(mesh.triangle_count(), 8);
        // Left half of a 2-wide plane
        assert_eq!(mesh.positions()[0], [-1.0, -0.5, 0.0]);
        assert_eq!(mesh.positions()[8], [0.0, 0.5, 0.0]);
        assert_eq!(mesh.uvs()[0], [0.0, 0.0]);
        assert_eq!(mesh.uvs()[8], [1.0, 1.0]);
        assert!(mesh.layers().iter().all(|&l| l == 1));
    }

    #[test]
    fn test_triangles_wind_counter_clockwise() {
        let mesh = quad();
        for tri in mesh.indices().chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.positions()[tri[k] as usize]);
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0);
        }
    }

    #[test]
    fn test_bad_indices_rejected() {
        let v = MeshVertex {
            position: [0.0; 3],
            uv: [0.0; 2],
            layer: 0,
        };
        assert!(matches!(
            TexturedMesh::new(vec![v; 3], vec![0, 1, 3]),
            Err(GalleryError::MeshShape(_))
        ));
        assert!(matches!(
            TexturedMesh::new(vec![v; 3], vec![0, 1]),
            Err(GalleryError::MeshShape(_))
        ));
    }

    #[test]
    fn test_builder_output_passes_validation() {
        let mesh = quad();
        let vertices: Vec<MeshVertex> = (0..mesh.len())
            .map(|i| MeshVertex {
                position: mesh.positions()[i],
                uv: mesh.uvs()[i],
                layer: mesh.layers()[i],
            })
            .collect();
        let checked = TexturedMesh::new(vertices, mesh.indices().to_vec()).unwrap();
        assert_eq!(checked.indices(), mesh.indices());
    }

    #[test]
    fn test_update_keeps_snapshot() {
        let mut mesh = quad();
        let before = mesh.generation();
        mesh.update_positions(|_, orig, live| *live = [orig[0], orig[1], 1.0]);
        assert_eq!(mesh.generation(), before + 1);
        assert!(mesh.positions().iter().all(|p| p[2] == 1.0));
        assert!(mesh.snapshot_positions().iter().all(|p| p[2] == 0.0));
    }
}
