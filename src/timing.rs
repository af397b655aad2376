use std::collections::VecDeque;

/// Rolling window over the most recent frame durations, in milliseconds.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: usize,
    frames_ms: VecDeque<f64>,
    last_ts_ms: Option<f64>,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120)
    }
}

impl FrameStats {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            frames_ms: VecDeque::with_capacity(window),
            last_ts_ms: None,
        }
    }

    /// Feed a frame timestamp (e.g. from `requestAnimationFrame`). The first
    /// call only primes the clock.
    pub fn tick(&mut self, now_ms: f64) {
        if let Some(prev) = self.last_ts_ms.replace(now_ms) {
            let dt = now_ms - prev;
            if dt.is_finite() && dt >= 0.0 {
                self.record(dt);
            }
        }
    }

    pub fn record(&mut self, frame_ms: f64) {
        if self.frames_ms.len() == self.window {
            self.frames_ms.pop_front();
        }
        self.frames_ms.push_back(frame_ms);
    }

    pub fn len(&self) -> usize {
        self.frames_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames_ms.is_empty()
    }

    pub fn mean_ms(&self) -> Option<f64> {
        if self.frames_ms.is_empty() {
            return None;
        }
        Some(self.frames_ms.iter().sum::<f64>() / self.frames_ms.len() as f64)
    }

    pub fn max_ms(&self) -> Option<f64> {
        self.frames_ms.iter().copied().reduce(f64::max)
    }

    pub fn fps(&self) -> Option<f64> {
        self.mean_ms().filter(|ms| *ms > 0.0).map(|ms| 1000.0 / ms)
    }

    pub fn summary(&self) -> String {
        match (self.fps(), self.mean_ms(), self.max_ms()) {
            (Some(fps), Some(mean), Some(max)) => {
                format!("{fps:.0} fps | {mean:.1} ms avg | {max:.1} ms max")
            }
            _ => "-- fps".to_string(),
        }
    }
}
