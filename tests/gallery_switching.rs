use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use shader_gallery::core::{FrameInput, UniformSet};
use shader_gallery::{Demo, DemoId, DemoKind, Gallery, GalleryConfig};

/// Demo that records how many times it has been dropped and updated.
struct Tracked {
    drops: Arc<AtomicUsize>,
    updates: Arc<AtomicUsize>,
    uniforms: UniformSet,
}

impl Tracked {
    fn new(drops: &Arc<AtomicUsize>, updates: &Arc<AtomicUsize>) -> Box<dyn Demo> {
        Box::new(Self {
            drops: drops.clone(),
            updates: updates.clone(),
            uniforms: UniformSet::with_standard(),
        })
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl Demo for Tracked {
    fn id(&self) -> DemoId {
        DemoId::WaveGrid
    }

    fn update(&mut self, input: &FrameInput) {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.uniforms.apply_frame(input);
    }

    fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }
}

#[test]
fn switching_drops_the_previous_demo() {
    let drops = Arc::new(AtomicUsize::new(0));
    let updates = Arc::new(AtomicUsize::new(0));
    let mut gallery = Gallery::with_demo(GalleryConfig::default(), Tracked::new(&drops, &updates));

    gallery.tick(0.0, [0.0, 0.0], 0.0, [800.0, 600.0]);
    gallery.tick(0.5, [0.0, 0.0], 0.0, [800.0, 600.0]);
    assert_eq!(updates.load(Ordering::SeqCst), 2);
    assert_eq!(drops.load(Ordering::SeqCst), 0);

    let epoch = gallery.mount_epoch();
    gallery.switch(DemoId::Circle);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert_eq!(gallery.mount_epoch(), epoch + 1);
    assert_eq!(gallery.active_id(), DemoId::Circle);

    // The dropped demo never sees another tick
    gallery.tick(1.0, [0.0, 0.0], 0.0, [800.0, 600.0]);
    assert_eq!(updates.load(Ordering::SeqCst), 2);
}

#[test]
fn switch_to_replaces_a_custom_demo() {
    let drops = Arc::new(AtomicUsize::new(0));
    let updates = Arc::new(AtomicUsize::new(0));
    let mut gallery = Gallery::new(GalleryConfig::default());

    gallery.switch_to(Tracked::new(&drops, &updates));
    assert_eq!(gallery.active_id(), DemoId::WaveGrid);
    gallery.switch_to(Tracked::new(&drops, &updates));
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert_eq!(gallery.mount_epoch(), 3);

    drop(gallery);
    assert_eq!(drops.load(Ordering::SeqCst), 2);
}

#[test]
fn every_demo_mounts_and_ticks() {
    let mut gallery = Gallery::new(GalleryConfig::default());
    for &id in DemoId::ALL {
        gallery.switch(id);
        let input = *gallery.tick(3.0, [0.2, -0.4], 0.5, [1024.0, 768.0]);
        assert_eq!(input.time, 0.0, "{id}: clock restarts on mount");
        let input = *gallery.tick(4.0, [0.2, -0.4], 0.5, [1024.0, 768.0]);
        assert!((input.time - 1.0).abs() < 1e-6);

        let demo = gallery.active();
        assert_eq!(demo.id(), id);
        let kind = id.kind();
        assert_eq!(demo.points().is_some(), kind == DemoKind::Points, "{id}");
        assert_eq!(demo.mesh().is_some(), kind == DemoKind::Mesh, "{id}");
        assert_eq!(demo.shader().is_some(), kind == DemoKind::Shader, "{id}");
        assert_eq!(demo.uniforms().to_gpu().resolution, [1024.0, 768.0], "{id}");
    }
}
