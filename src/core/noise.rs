//! Seeded 2D simplex noise, plus the hash/value-noise/fbm trio the fog
//! shader evaluates per pixel.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const F2: f32 = 0.366_025_42; // 0.5 * (sqrt(3) - 1)
const G2: f32 = 0.211_324_87; // (3 - sqrt(3)) / 6

const GRAD2: [[f32; 2]; 12] = [
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [0.0, 1.0],
    [0.0, -1.0],
];

/// 2D simplex noise with a seeded permutation table.
/// Output is in [-1, 1].
#[derive(Clone)]
pub struct Simplex2 {
    perm: [u8; 512],
    grad: [[f32; 2]; 512],
}

impl std::fmt::Debug for Simplex2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simplex2").finish_non_exhaustive()
    }
}

impl Simplex2 {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::from_rng(&mut rng)
    }

    /// Fisher-Yates over 0..256, duplicated to 512 to avoid index wrapping.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in 0..255 {
            let r = rng.gen_range(i..256);
            table.swap(i, r);
        }

        let mut perm = [0u8; 512];
        let mut grad = [[0.0f32; 2]; 512];
        for i in 0..512 {
            perm[i] = table[i & 255];
            grad[i] = GRAD2[perm[i] as usize % 12];
        }
        Self { perm, grad }
    }

    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        let (i1, j1) = if x0 > y0 { (1usize, 0usize) } else { (0, 1) };

        let x1 = x0 - i1 as f32 + G2;
        let y1 = y0 - j1 as f32 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;

        let corner = |gi: usize, dx: f32, dy: f32| -> f32 {
            let t = 0.5 - dx * dx - dy * dy;
            if t < 0.0 {
                return 0.0;
            }
            let g = self.grad[gi];
            let t2 = t * t;
            t2 * t2 * (g[0] * dx + g[1] * dy)
        };

        let n0 = corner(ii + self.perm[jj] as usize, x0, y0);
        let n1 = corner(ii + i1 + self.perm[jj + j1] as usize, x1, y1);
        let n2 = corner(ii + 1 + self.perm[jj + 1] as usize, x2, y2);

        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Sine-free 2D hash in [0, 1). `shaders/smoke.wgsl` has the same function.
pub fn hash12(x: f32, y: f32) -> f32 {
    let mut px = fract(x * 123.34);
    let mut py = fract(y * 456.21);
    let d = px * (px + 45.32) + py * (py + 45.32);
    px += d;
    py += d;
    fract(px * py)
}

/// Value noise over the integer lattice with a smoothstep blend, in [0, 1].
pub fn value_noise(x: f32, y: f32) -> f32 {
    let (ix, iy) = (x.floor(), y.floor());
    let (fx, fy) = (x - ix, y - iy);
    let a = hash12(ix, iy);
    let b = hash12(ix + 1.0, iy);
    let c = hash12(ix, iy + 1.0);
    let d = hash12(ix + 1.0, iy + 1.0);
    let ux = fx * fx * (3.0 - 2.0 * fx);
    let uy = fy * fy * (3.0 - 2.0 * fy);
    let bottom = a + (b - a) * ux;
    let top = c + (d - c) * ux;
    bottom + (top - bottom) * uy
}

pub const FBM_OCTAVES: u32 = 5;
const FBM_GAIN: f32 = 0.5;
const FBM_SHIFT: [f32; 2] = [1.7, -1.3];

/// Five octaves of [`value_noise`], starting at amplitude 0.6 and halving.
/// The result is in [0, 1.1625].
pub fn fbm(x: f32, y: f32) -> f32 {
    let (mut px, mut py) = (x, y);
    let mut amp = 0.6;
    let mut v = 0.0;
    for _ in 0..FBM_OCTAVES {
        v += amp * value_noise(px, py);
        px = px * 2.0 + FBM_SHIFT[0];
        py = py * 2.0 + FBM_SHIFT[1];
        amp *= FBM_GAIN;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_field() {
        let a = Simplex2::new(7);
        let b = Simplex2::new(7);
        for k in 0..50 {
            let (x, y) = (k as f32 * 0.37, k as f32 * -0.91);
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Simplex2::new(1);
        let b = Simplex2::new(2);
        let differs = (0..64).any(|k| {
            let p = k as f32 * 0.53 + 0.1;
            a.sample(p, p * 0.7) != b.sample(p, p * 0.7)
        });
        assert!(differs);
    }

    #[test]
    fn test_range_and_variation() {
        let noise = Simplex2::new(42);
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for i in 0..100 {
            for j in 0..100 {
                let v = noise.sample(i as f32 * 0.13 - 6.0, j as f32 * 0.11 - 5.0);
                assert!((-1.0..=1.0).contains(&v));
                min = min.min(v);
                max = max.max(v);
            }
        }
        assert!(max - min > 0.5, "field is too flat: {min}..{max}");
    }

    #[test]
    fn test_zero_at_lattice_origin() {
        let noise = Simplex2::new(3);
        assert_eq!(noise.sample(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_hash_unit_interval() {
        for i in 0..1000 {
            let h = hash12(i as f32 * 0.77, -(i as f32) * 1.3);
            assert!((0.0..1.0).contains(&h));
        }
        assert_eq!(hash12(3.0, 5.0), hash12(3.0, 5.0));
        assert_ne!(hash12(3.0, 5.0), hash12(5.0, 3.0));
    }

    #[test]
    fn test_value_noise_hits_lattice_hashes() {
        for &(x, y) in &[(0.0, 0.0), (4.0, -2.0), (-7.0, 11.0)] {
            assert!((value_noise(x, y) - hash12(x, y)).abs() < 1e-6);
        }
        // Continuous across a cell edge
        let left = value_noise(2.0 - 1e-4, 0.3);
        let right = value_noise(2.0 + 1e-4, 0.3);
        assert!((left - right).abs() < 1e-2);
    }

    #[test]
    fn test_fbm_range() {
        let max = 0.6 * (1.0 - 0.5f32.powi(FBM_OCTAVES as i32)) / 0.5;
        let mut seen_min = f32::MAX;
        let mut seen_max = f32::MIN;
        for i in 0..60 {
            for j in 0..60 {
                let v = fbm(i as f32 * 0.173 - 4.0, j as f32 * 0.219 + 1.0);
                assert!(v >= 0.0 && v <= max + 1e-5, "{v}");
                seen_min = seen_min.min(v);
                seen_max = seen_max.max(v);
            }
        }
        assert!(seen_max - seen_min > 0.2);
    }
}
