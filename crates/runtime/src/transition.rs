use crate::ease::Ease;

/// Timing of a single tween: wait `delay_ms`, then run for `duration_ms`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transition {
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Progress {
    /// Still inside the initial delay.
    Pending,
    /// Eased normalized time in `[0, 1)`.
    Running(f64),
    /// Reached `t = 1`.
    Finished,
}

impl Transition {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            delay_ms: 0.0,
            duration_ms,
            ease: Ease::default(),
        }
    }

    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Progress after `elapsed_ms` since the transition was scheduled.
    pub fn progress(&self, elapsed_ms: f64) -> Progress {
        let active_ms = elapsed_ms - self.delay_ms.max(0.0);
        if active_ms < 0.0 {
            return Progress::Pending;
        }
        if self.duration_ms <= 0.0 || active_ms >= self.duration_ms {
            return Progress::Finished;
        }
        Progress::Running(self.ease.apply(active_ms / self.duration_ms))
    }
}
