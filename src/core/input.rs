//! Frame clock and normalized pointer/scroll input.

/// Everything a demo sees on a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Seconds since the demo was mounted (scaled by playback speed)
    pub time: f32,
    /// Seconds since the previous tick
    pub delta: f32,
    /// Pointer in NDC, [-1, 1] on both axes, y up
    pub pointer: [f32; 2],
    /// Normalized scroll offset in [0, 1]
    pub scroll: f32,
    /// Canvas size in pixels
    pub resolution: [f32; 2],
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            time: 0.0,
            delta: 0.0,
            pointer: [0.0, 0.0],
            scroll: 0.0,
            resolution: [1.0, 1.0],
        }
    }
}

impl FrameInput {
    /// Input at a given time with everything else at rest.
    pub fn at(time: f32) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    pub fn with_pointer(mut self, x: f32, y: f32) -> Self {
        self.pointer = [x, y];
        self
    }

    pub fn with_scroll(mut self, scroll: f32) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_resolution(mut self, width: f32, height: f32) -> Self {
        self.resolution = [width, height];
        self
    }

    pub fn aspect(&self) -> f32 {
        if self.resolution[1] > 0.0 {
            self.resolution[0] / self.resolution[1]
        } else {
            1.0
        }
    }
}

/// Mount-relative clock with pause and speed control.
///
/// Fed with wall-clock seconds (see [`crate::time::now_seconds`]); the first
/// tick after creation or reset reports zero elapsed time.
#[derive(Clone, Debug)]
pub struct Clock {
    elapsed: f64,
    last: Option<f64>,
    speed: f64,
    paused: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Clock {
    pub fn new(speed: f64) -> Self {
        Self {
            elapsed: 0.0,
            last: None,
            speed: speed.max(0.0),
            paused: false,
        }
    }

    /// Advance to `now` and return `(elapsed, delta)` in seconds.
    /// Backwards jumps in `now` are treated as zero delta.
    pub fn tick(&mut self, now: f64) -> (f64, f64) {
        let raw = match self.last {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(now);

        let delta = if self.paused { 0.0 } else { raw * self.speed };
        self.elapsed += delta;
        (self.elapsed, delta)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.last = None;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }
}

/// Map a pixel position inside `size` to NDC with y up, clamped to [-1, 1].
pub fn pointer_to_ndc(pos: [f32; 2], size: [f32; 2]) -> [f32; 2] {
    if size[0] <= 0.0 || size[1] <= 0.0 {
        return [0.0, 0.0];
    }
    let x = pos[0] / size[0] * 2.0 - 1.0;
    let y = -(pos[1] / size[1] * 2.0 - 1.0);
    [x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)]
}

/// Scroll offset over the scrollable range, clamped to [0, 1].
pub fn normalize_scroll(offset: f32, max_offset: f32) -> f32 {
    if max_offset <= 0.0 {
        return 0.0;
    }
    (offset / max_offset).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = Clock::default();
        assert_eq!(clock.tick(123.0), (0.0, 0.0));
        let (elapsed, delta) = clock.tick(123.5);
        assert_eq!(elapsed, 0.5);
        assert_eq!(delta, 0.5);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut clock = Clock::default();
        clock.tick(0.0);
        clock.tick(1.0);
        clock.pause();
        clock.tick(5.0);
        assert_eq!(clock.elapsed(), 1.0);
        clock.resume();
        clock.tick(6.0);
        assert_eq!(clock.elapsed(), 2.0);
    }

    #[test]
    fn test_speed_and_backwards_jump() {
        let mut clock = Clock::new(2.0);
        clock.tick(10.0);
        clock.tick(11.0);
        assert_eq!(clock.elapsed(), 2.0);
        let (_, delta) = clock.tick(9.0);
        assert_eq!(delta, 0.0);
        clock.set_speed(-1.0);
        assert_eq!(clock.speed(), 0.0);
    }

    #[test]
    fn test_reset_restarts_from_zero() {
        let mut clock = Clock::default();
        clock.tick(0.0);
        clock.tick(3.0);
        clock.reset();
        assert_eq!(clock.tick(50.0), (0.0, 0.0));
    }

    #[test]
    fn test_pointer_to_ndc() {
        assert_eq!(pointer_to_ndc([0.0, 0.0], [200.0, 100.0]), [-1.0, 1.0]);
        assert_eq!(pointer_to_ndc([100.0, 50.0], [200.0, 100.0]), [0.0, 0.0]);
        assert_eq!(pointer_to_ndc([400.0, 200.0], [200.0, 100.0]), [1.0, -1.0]);
        assert_eq!(pointer_to_ndc([10.0, 10.0], [0.0, 100.0]), [0.0, 0.0]);
    }

    #[test]
    fn test_normalize_scroll() {
        assert_eq!(normalize_scroll(50.0, 200.0), 0.25);
        assert_eq!(normalize_scroll(-5.0, 200.0), 0.0);
        assert_eq!(normalize_scroll(500.0, 200.0), 1.0);
        assert_eq!(normalize_scroll(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_aspect() {
        assert_eq!(FrameInput::at(0.0).with_resolution(800.0, 400.0).aspect(), 2.0);
        assert_eq!(FrameInput::at(0.0).with_resolution(800.0, 0.0).aspect(), 1.0);
    }
}
