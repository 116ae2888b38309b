//! Wall-clock seconds for driving [`crate::core::Clock`].
//!
//! Browser builds read `performance.now()`; everything else uses a process-wide
//! `Instant` captured on first call.

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Seconds elapsed since an earlier [`now_seconds`] reading, never negative.
pub fn seconds_since(start: f64) -> f64 {
    (now_seconds() - start).max(0.0)
}
