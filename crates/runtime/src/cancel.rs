use std::cell::Cell;
use std::rc::Rc;

/// Shared cancellation flag for a scheduled tween.
///
/// Clones observe the same flag. Everything runs on one UI thread, so a plain
/// `Rc<Cell<_>>` is enough.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}
