//! Snapshot generators for the point demos.
//!
//! Every generator is deterministic given its inputs (and the RNG state for
//! random clouds), so snapshots are reproducible across runs.

use std::f32::consts::PI;

use rand::Rng;

/// Triangulated plane with per-vertex colors and UVs.
#[derive(Debug, Clone)]
pub struct GridPlane {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

/// `(segments + 1)^2` vertices spanning `[-size/2, size/2]` on x and y.
/// Rows run top to bottom (y is flipped), `height(x, y)` supplies the initial z.
pub fn grid_plane<F>(size: f32, segments: u32, height: F) -> GridPlane
where
    F: Fn(f32, f32) -> f32,
{
    let half = size / 2.0;
    let step = size / segments as f32;
    let row = segments as usize + 1;

    let mut positions = Vec::with_capacity(row * row);
    let mut colors = Vec::with_capacity(row * row);
    let mut uvs = Vec::with_capacity(row * row);

    for i in 0..=segments {
        let y = i as f32 * step - half;
        for j in 0..=segments {
            let x = j as f32 * step - half;
            positions.push([x, -y, height(x, y)]);

            let r = x / size + 0.5;
            let g = y / size + 0.5;
            colors.push([r, g, (r + g) / 2.0]);

            uvs.push([j as f32 / segments as f32, i as f32 / segments as f32]);
        }
    }

    let mut indices = Vec::with_capacity(segments as usize * segments as usize * 6);
    let row = segments + 1;
    for i in 0..segments {
        for j in 0..segments {
            let a = i * row + j + 1;
            let b = i * row + j;
            let c = (i + 1) * row + j;
            let d = (i + 1) * row + j + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    GridPlane {
        positions,
        colors,
        uvs,
        indices,
    }
}

/// Lattice cell metadata, useful for demos that color by axis position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeCell {
    /// Offset from the lattice center in cells, per axis
    pub offset: [f32; 3],
    /// `|offset| / mid` per axis, in [0, 1]
    pub normalized: [f32; 3],
}

/// Cube lattice layout: `ceil(cbrt(count))` points per axis.
#[derive(Debug, Clone, Copy)]
pub struct CubeLattice {
    pub count: usize,
    pub per_axis: usize,
    pub gap: f32,
}

impl CubeLattice {
    pub fn new(count: usize, gap: f32) -> Self {
        let mut per_axis = (count as f64).cbrt().ceil() as usize;
        // cbrt of a perfect cube can land a hair above the integer
        if per_axis > 1 && (per_axis - 1).pow(3) >= count {
            per_axis -= 1;
        }
        Self {
            count,
            per_axis,
            gap,
        }
    }

    pub fn mid(&self) -> f32 {
        (self.per_axis as f32 - 1.0) / 2.0
    }

    /// Iterate cells x-major, then y, then z, stopping at `count`.
    pub fn cells(&self) -> impl Iterator<Item = LatticeCell> + '_ {
        let n = self.per_axis;
        let mid = self.mid();
        let denom = if mid > 0.0 { mid } else { 1.0 };
        (0..n)
            .flat_map(move |x| (0..n).flat_map(move |y| (0..n).map(move |z| (x, y, z))))
            .take(self.count)
            .map(move |(x, y, z)| {
                let offset = [x as f32 - mid, y as f32 - mid, z as f32 - mid];
                LatticeCell {
                    offset,
                    normalized: [
                        offset[0].abs() / denom,
                        offset[1].abs() / denom,
                        offset[2].abs() / denom,
                    ],
                }
            })
    }

    /// Plain lattice positions `(axis - mid) * gap`.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.cells()
            .map(|c| {
                [
                    c.offset[0] * self.gap,
                    c.offset[1] * self.gap,
                    c.offset[2] * self.gap,
                ]
            })
            .collect()
    }
}

/// Staircase helix points and their color ramp.
#[derive(Debug, Clone)]
pub struct Helix {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

pub fn helix(radius: f32, turns: f32, segments: u32, height: f32, stair_step: f32) -> Helix {
    let total = segments as usize + 1;
    let angle_step = PI * 2.0 * turns / segments as f32;

    let mut positions = Vec::with_capacity(total);
    let mut colors = Vec::with_capacity(total);
    for i in 0..total {
        let angle = i as f32 * angle_step;
        let t = i as f32 / segments as f32;

        let mut y = t * height;
        if stair_step > 0.0 {
            y = (y / stair_step).floor() * stair_step;
        }
        positions.push([radius * angle.cos(), y, radius * angle.sin()]);
        colors.push([0.15 + 0.85 * (1.0 - t), 0.6 * t, 0.7 - 0.5 * t]);
    }

    Helix { positions, colors }
}

/// Random cloud whose y values fall inside a set of bands.
#[derive(Debug, Clone)]
pub struct BandedCloud {
    pub positions: Vec<[f32; 3]>,
    pub y_min: f32,
    pub y_max: f32,
}

impl BandedCloud {
    pub fn y_range(&self) -> f32 {
        let range = self.y_max - self.y_min;
        if range > 0.0 {
            range
        } else {
            1.0
        }
    }
}

pub fn banded_cloud<R: Rng + ?Sized>(
    count: usize,
    extent: f32,
    bands: &[(f32, f32)],
    rng: &mut R,
) -> BandedCloud {
    let mut positions = Vec::with_capacity(count);
    let mut y_min = f32::INFINITY;
    let mut y_max = f32::NEG_INFINITY;

    for _ in 0..count {
        let x = (rng.gen::<f32>() - 0.5) * extent;
        let z = (rng.gen::<f32>() - 0.5) * extent;
        let y = match bands {
            [] => 0.0,
            _ => {
                let (lo, hi) = bands[rng.gen_range(0..bands.len())];
                lo + rng.gen::<f32>() * (hi - lo)
            }
        };
        y_min = y_min.min(y);
        y_max = y_max.max(y);
        positions.push([x, y, z]);
    }

    if positions.is_empty() {
        y_min = 0.0;
        y_max = 0.0;
    }

    BandedCloud {
        positions,
        y_min,
        y_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_grid_plane_shape() {
        let plane = grid_plane(20.0, 4, |_, _| 0.0);
        assert_eq!(plane.positions.len(), 25);
        assert_eq!(plane.colors.len(), 25);
        assert_eq!(plane.uvs.len(), 25);
        assert_eq!(plane.indices.len(), 4 * 4 * 6);
        assert!(plane.indices.iter().all(|&i| i < 25));

        // First vertex is top-left, y flipped
        assert_eq!(plane.positions[0], [-10.0, 10.0, 0.0]);
        assert_eq!(plane.positions[24], [10.0, -10.0, 0.0]);
        assert_eq!(plane.uvs[24], [1.0, 1.0]);
        // Corner colors span the ramp
        assert_eq!(plane.colors[0], [0.0, 0.0, 0.0]);
        assert_eq!(plane.colors[24], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_grid_plane_height_fn() {
        let plane = grid_plane(2.0, 2, |x, y| x + 10.0 * y);
        // Vertex (i=0, j=2): x = 1, y = -1 (pre-flip)
        assert_eq!(plane.positions[2], [1.0, 1.0, -9.0]);
    }

    #[test]
    fn test_cube_lattice_perfect_cube() {
        let lattice = CubeLattice::new(3375, 0.1);
        assert_eq!(lattice.per_axis, 15);
        let positions = lattice.positions();
        assert_eq!(positions.len(), 3375);
        assert!((positions[0][0] + 0.7).abs() < 1e-5);
        assert!((positions[3374][2] - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_cube_lattice_truncates() {
        let lattice = CubeLattice::new(10, 1.0);
        assert_eq!(lattice.per_axis, 3);
        let cells: Vec<_> = lattice.cells().collect();
        assert_eq!(cells.len(), 10);
        // Corner cell is fully normalized
        assert_eq!(cells[0].normalized, [1.0, 1.0, 1.0]);
        // Index 4 is (0, 1, 1): on the x face, centered in y/z
        assert_eq!(cells[4].offset, [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_helix_staircase() {
        let h = helix(5.0, 8.0, 400, 60.0, 0.02);
        assert_eq!(h.positions.len(), 401);
        for p in &h.positions {
            let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!((r - 5.0).abs() < 1e-3);
            let steps = p[1] / 0.02;
            assert!((steps - steps.round()).abs() < 1e-2);
        }
        assert!((h.positions[400][1] - 60.0).abs() < 0.03);
        assert_eq!(h.colors[0], [1.0, 0.0, 0.7]);
    }

    #[test]
    fn test_banded_cloud_respects_bands() {
        let bands = [(-1.25, -1.0), (0.25, 0.45)];
        let mut rng = StdRng::seed_from_u64(9);
        let cloud = banded_cloud(2000, 2.5, &bands, &mut rng);
        assert_eq!(cloud.positions.len(), 2000);
        for p in &cloud.positions {
            assert!(p[0].abs() <= 1.25 && p[2].abs() <= 1.25);
            assert!(bands.iter().any(|&(lo, hi)| p[1] >= lo && p[1] <= hi));
        }
        assert!(cloud.y_min >= -1.25 && cloud.y_max <= 0.45);
    }

    #[test]
    fn test_empty_cloud_has_unit_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let cloud = banded_cloud(0, 1.0, &[(0.0, 1.0)], &mut rng);
        assert_eq!(cloud.y_range(), 1.0);
    }
}
