//! Animated point buffer
//!
//! - Snapshot: positions/colors computed once at mount, never mutated
//! - Live: same shape, rewritten in place every frame from the snapshot
//! - Dirty tracking: per-attribute flags plus a monotonic generation counter

use crate::error::{GalleryError, Result};

/// Per-attribute dirty state returned by [`PointBuffer::take_dirty`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub positions: bool,
    pub colors: bool,
}

impl DirtyFlags {
    pub fn any(&self) -> bool {
        self.positions || self.colors
    }
}

/// Fixed-length point buffer with an immutable snapshot and a live copy.
///
/// The length is chosen at construction and never changes; all update
/// methods write into the existing storage.
#[derive(Debug, Clone)]
pub struct PointBuffer {
    snapshot_positions: Vec<[f32; 3]>,
    snapshot_colors: Vec<[f32; 3]>,
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    positions_dirty: bool,
    colors_dirty: bool,
    /// Bumped every time an attribute is marked dirty
    generation: u64,
}

impl PointBuffer {
    /// Build a buffer where every point shares the same color.
    pub fn new(positions: Vec<[f32; 3]>, fill: [f32; 3]) -> Self {
        let colors = vec![fill; positions.len()];
        Self::from_parts(positions, colors)
    }

    /// Build a buffer with per-point colors. Both arrays must have equal length.
    pub fn with_colors(positions: Vec<[f32; 3]>, colors: Vec<[f32; 3]>) -> Result<Self> {
        if positions.len() != colors.len() {
            return Err(GalleryError::BufferShape {
                positions: positions.len(),
                colors: colors.len(),
            });
        }
        Ok(Self::from_parts(positions, colors))
    }

    /// Build from `(position, color)` pairs; lengths match by construction.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = ([f32; 3], [f32; 3])>,
    {
        let (positions, colors) = points.into_iter().unzip();
        Self::from_parts(positions, colors)
    }

    fn from_parts(positions: Vec<[f32; 3]>, colors: Vec<[f32; 3]>) -> Self {
        Self {
            snapshot_positions: positions.clone(),
            snapshot_colors: colors.clone(),
            positions,
            colors,
            // Freshly mounted buffers still need their first upload
            positions_dirty: true,
            colors_dirty: true,
            generation: 1,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn snapshot_positions(&self) -> &[[f32; 3]] {
        &self.snapshot_positions
    }

    pub fn snapshot_colors(&self) -> &[[f32; 3]] {
        &self.snapshot_colors
    }

    /// Rewrite every live position from its snapshot value.
    pub fn update_positions<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &[f32; 3], &mut [f32; 3]),
    {
        for (i, (orig, live)) in self
            .snapshot_positions
            .iter()
            .zip(self.positions.iter_mut())
            .enumerate()
        {
            f(i, orig, live);
        }
        self.mark_positions_dirty();
    }

    /// Rewrite every live color from its snapshot value.
    pub fn update_colors<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &[f32; 3], &mut [f32; 3]),
    {
        for (i, (orig, live)) in self
            .snapshot_colors
            .iter()
            .zip(self.colors.iter_mut())
            .enumerate()
        {
            f(i, orig, live);
        }
        self.mark_colors_dirty();
    }

    /// Single pass over both attributes.
    /// Callback receives (index, snapshot position, snapshot color, live position, live color).
    pub fn update_points<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &[f32; 3], &[f32; 3], &mut [f32; 3], &mut [f32; 3]),
    {
        let snapshots = self.snapshot_positions.iter().zip(self.snapshot_colors.iter());
        let live = self.positions.iter_mut().zip(self.colors.iter_mut());
        for (i, ((pos0, col0), (pos, col))) in snapshots.zip(live).enumerate() {
            f(i, pos0, col0, pos, col);
        }
        self.mark_positions_dirty();
        self.mark_colors_dirty();
    }

    /// Restore the live buffer to the snapshot.
    pub fn reset(&mut self) {
        self.positions.copy_from_slice(&self.snapshot_positions);
        self.colors.copy_from_slice(&self.snapshot_colors);
        self.mark_positions_dirty();
        self.mark_colors_dirty();
    }

    pub fn mark_positions_dirty(&mut self) {
        self.positions_dirty = true;
        self.generation += 1;
    }

    pub fn mark_colors_dirty(&mut self) {
        self.colors_dirty = true;
        self.generation += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.positions_dirty || self.colors_dirty
    }

    /// Return and clear the dirty flags. The generation counter is unaffected.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        let flags = DirtyFlags {
            positions: self.positions_dirty,
            colors: self.colors_dirty,
        };
        self.positions_dirty = false;
        self.colors_dirty = false;
        flags
    }

    /// Monotonic change counter for consumers that must not clear the flags.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Axis-aligned bounds of the live positions.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        let bounds = self.positions.iter().fold((first, first), |(mut lo, mut hi), p| {
            for k in 0..3 {
                lo[k] = lo[k].min(p[k]);
                hi[k] = hi[k].max(p[k]);
            }
            (lo, hi)
        });
        Some(bounds)
    }

    /// Largest distance from the origin across the snapshot.
    pub fn snapshot_radius(&self) -> f32 {
        self.snapshot_positions
            .iter()
            .map(|p| (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt())
            .fold(0.0, f32::max)
    }

    /// Order-sensitive sum over live positions, used for cheap change logging.
    pub fn checksum(&self) -> f64 {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64 + 1.0) * (p[0] as f64 + 2.0 * p[1] as f64 + 3.0 * p[2] as f64))
            .sum()
    }
}
