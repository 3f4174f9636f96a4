/// Frame metadata for one host tick.
///
/// The host (browser animation frame or CLI loop) supplies the timestamp, so a
/// sequence of frames can be replayed exactly in tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Host timestamp at the start of the frame (milliseconds).
    pub time_ms: f64,
}

impl Frame {
    pub fn new(index: u64, time_ms: f64) -> Self {
        Self { index, time_ms }
    }

    pub fn next(self, time_ms: f64) -> Self {
        Self::new(self.index + 1, time_ms)
    }
}
