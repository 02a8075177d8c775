use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Compteur FPS par fenêtre glissante. Zéro allocation après init.
///
/// # Example
/// ```
/// use tumble_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new(60);
/// counter.tick();
/// assert!(counter.fps() >= 0.0);
/// ```
pub struct FpsCounter {
    /// Instants des dernières frames, au plus `window`.
    stamps: VecDeque<Instant>,
    window: usize,
    fps: f64,
    frame_time: Duration,
}

impl FpsCounter {
    /// Averages over the last `window` frames (at least 2).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            stamps: VecDeque::with_capacity(window + 1),
            window,
            fps: 0.0,
            frame_time: Duration::ZERO,
        }
    }

    /// Appeler une fois par frame, APRÈS le rendu.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Record a frame finished at `now`.
    pub fn tick_at(&mut self, now: Instant) {
        if let Some(&last) = self.stamps.back() {
            self.frame_time = now.saturating_duration_since(last);
        }
        self.stamps.push_back(now);
        if self.stamps.len() > self.window {
            self.stamps.pop_front();
        }
        if let Some(&first) = self.stamps.front() {
            let span = now.saturating_duration_since(first).as_secs_f64();
            if span > 0.0 {
                self.fps = (self.stamps.len() - 1) as f64 / span;
            }
        }
    }

    /// Frames per second over the window; 0 until two frames are recorded.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Time between the last two frames, in milliseconds.
    #[must_use]
    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time.as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_rate_is_measured() {
        let mut counter = FpsCounter::new(10);
        let start = Instant::now();
        for i in 0..20u32 {
            counter.tick_at(start + Duration::from_millis(u64::from(i) * 20));
        }
        assert!((counter.fps() - 50.0).abs() < 0.5, "{}", counter.fps());
        assert!((counter.frame_time_ms() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn single_frame_reports_zero() {
        let mut counter = FpsCounter::new(5);
        counter.tick_at(Instant::now());
        assert!(counter.fps().abs() < f64::EPSILON);
    }

    #[test]
    fn window_forgets_old_frames() {
        let mut counter = FpsCounter::new(3);
        let start = Instant::now();
        // Lent au début, rapide ensuite.
        counter.tick_at(start);
        counter.tick_at(start + Duration::from_secs(1));
        for i in 1..=5u64 {
            counter.tick_at(start + Duration::from_secs(1) + Duration::from_millis(i * 10));
        }
        assert!((counter.fps() - 100.0).abs() < 1.0, "{}", counter.fps());
    }
}
