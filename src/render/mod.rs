//! wgpu renderers drawn straight into egui's render pass via `CallbackTrait`
//!
//! - `points`: instanced camera-facing quads for the point demos
//! - `mesh`: indexed textured triangles for the mesh demos
//! - `quad`: full-screen fragment programs for the shader demos
//!
//! Renderers live in egui's `CallbackResources` for the whole session.
//! What they hold on the GPU belongs to one mounted demo; an [`UploadKey`]
//! tells them when that demo (or its data) has changed.

mod mesh;
mod points;
mod quad;

pub use mesh::{pack_mesh, GpuMeshVertex, MeshCallback, MeshRenderer, MeshStatic, MeshUniforms};
pub use points::{pack_points, GpuPoint, PointUniforms, PointsCallback, PointsRenderer};
pub use quad::{QuadCallback, QuadRenderer};

/// Identifies the data a renderer last uploaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadKey {
    /// Gallery mount epoch
    pub epoch: u64,
    /// Buffer generation within that mount
    pub generation: u64,
}

/// Tracks what has been handed to the GPU, so unchanged data is skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct UploadTracker {
    last: Option<UploadKey>,
}

impl UploadTracker {
    /// True when `key` differs from the last recorded upload.
    pub fn is_stale(&self, key: UploadKey) -> bool {
        self.last != Some(key)
    }

    /// True when `key` belongs to a different mount than the last upload.
    pub fn is_new_mount(&self, key: UploadKey) -> bool {
        self.last.map_or(true, |last| last.epoch != key.epoch)
    }

    pub fn record(&mut self, key: UploadKey) {
        self.last = Some(key);
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// Register the renderers with eframe's wgpu backend.
pub fn install(render_state: &egui_wgpu::RenderState) {
    let device = &render_state.device;
    let format = render_state.target_format;

    let points = PointsRenderer::new(device, format);
    let mesh = MeshRenderer::new(device, format);
    let quad = QuadRenderer::new(device, &render_state.queue, format);

    let mut renderer = render_state.renderer.write();
    renderer.callback_resources.insert(points);
    renderer.callback_resources.insert(mesh);
    renderer.callback_resources.insert(quad);
    tracing::debug!(?format, "renderers installed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_skips_repeat_uploads() {
        let mut tracker = UploadTracker::default();
        let key = UploadKey { epoch: 1, generation: 4 };
        assert!(tracker.is_stale(key));
        assert!(tracker.is_new_mount(key));

        tracker.record(key);
        assert!(!tracker.is_stale(key));
        assert!(!tracker.is_new_mount(key));

        let next = UploadKey { epoch: 1, generation: 5 };
        assert!(tracker.is_stale(next));
        assert!(!tracker.is_new_mount(next));
    }

    #[test]
    fn test_new_epoch_forces_upload() {
        let mut tracker = UploadTracker::default();
        tracker.record(UploadKey { epoch: 1, generation: 9 });
        // A rebuilt demo restarts its generation counter
        let remount = UploadKey { epoch: 2, generation: 9 };
        assert!(tracker.is_stale(remount));
        assert!(tracker.is_new_mount(remount));

        tracker.clear();
        assert!(tracker.is_stale(UploadKey { epoch: 1, generation: 9 }));
    }
}
