use crate::cancel::CancelToken;
use crate::transition::{Progress, Transition};

/// Named tween slot. Scheduling into an occupied slot interrupts the tween
/// already there, mirroring how a new animation replaces a running one on the
/// same element.
pub type Slot = &'static str;

/// Handle returned by [`Scheduler::schedule`].
#[derive(Debug, Clone)]
pub struct TweenHandle {
    pub id: u64,
    pub token: CancelToken,
}

/// One sample produced by [`Scheduler::poll`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TweenSample {
    pub slot: Slot,
    pub id: u64,
    /// Eased normalized time; exactly 1.0 on the final sample.
    pub t: f64,
    pub finished: bool,
}

#[derive(Debug)]
struct Tween {
    id: u64,
    slot: Slot,
    transition: Transition,
    start_ms: f64,
    token: CancelToken,
}

/// Cooperative tween scheduler driven by host ticks.
///
/// Tweens are polled in insertion order. Cancellation is checked on every
/// poll, so a cancelled tween never yields another sample.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    tweens: Vec<Tween>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, slot: Slot, transition: Transition, now_ms: f64) -> TweenHandle {
        self.cancel(slot);

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        let token = CancelToken::new();
        self.tweens.push(Tween {
            id,
            slot,
            transition,
            start_ms: now_ms,
            token: token.clone(),
        });
        tracing::trace!(slot, id, "tween scheduled");
        TweenHandle { id, token }
    }

    /// Cancels the tween in `slot`, returning whether one was active.
    pub fn cancel(&mut self, slot: Slot) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|tw| {
            if tw.slot == slot {
                tw.token.cancel();
                false
            } else {
                true
            }
        });
        before != self.tweens.len()
    }

    /// Cancels everything, returning how many live tweens were stopped.
    pub fn cancel_all(&mut self) -> usize {
        let mut stopped = 0;
        for tw in self.tweens.drain(..) {
            if !tw.token.is_cancelled() {
                stopped += 1;
            }
            tw.token.cancel();
        }
        stopped
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Advances every live tween to `now_ms`.
    ///
    /// Finished tweens are removed after yielding their final `t = 1` sample.
    pub fn poll(&mut self, now_ms: f64) -> Vec<TweenSample> {
        let mut samples = Vec::new();
        let mut dropped = 0usize;

        self.tweens.retain(|tw| {
            if tw.token.is_cancelled() {
                dropped += 1;
                return false;
            }
            match tw.transition.progress(now_ms - tw.start_ms) {
                Progress::Pending => true,
                Progress::Running(t) => {
                    samples.push(TweenSample {
                        slot: tw.slot,
                        id: tw.id,
                        t,
                        finished: false,
                    });
                    true
                }
                Progress::Finished => {
                    samples.push(TweenSample {
                        slot: tw.slot,
                        id: tw.id,
                        t: 1.0,
                        finished: true,
                    });
                    false
                }
            }
        });

        if dropped > 0 {
            tracing::trace!(dropped, "cancelled tweens dropped");
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::Scheduler;
    use crate::ease::Ease;
    use crate::transition::Transition;

    fn linear(duration_ms: f64) -> Transition {
        Transition::new(duration_ms).with_ease(Ease::Linear)
    }

    #[test]
    fn samples_until_finished_then_drops() {
        let mut sched = Scheduler::new();
        sched.schedule("rotate", linear(100.0), 0.0);

        let s = sched.poll(50.0);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].t, 0.5);
        assert!(!s[0].finished);

        let s = sched.poll(150.0);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].t, 1.0);
        assert!(s[0].finished);
        assert!(sched.is_empty());
        assert!(sched.poll(200.0).is_empty());
    }

    #[test]
    fn delay_produces_no_samples() {
        let mut sched = Scheduler::new();
        sched.schedule("rotate", linear(100.0).with_delay(250.0), 0.0);
        assert!(sched.poll(100.0).is_empty());
        assert_eq!(sched.len(), 1);
        assert_eq!(sched.poll(300.0)[0].t, 0.5);
    }

    #[test]
    fn scheduling_same_slot_interrupts_previous() {
        let mut sched = Scheduler::new();
        let first = sched.schedule("rotate", linear(100.0), 0.0);
        let second = sched.schedule("rotate", linear(100.0), 10.0);
        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert_eq!(sched.len(), 1);

        let s = sched.poll(60.0);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].id, second.id);
    }

    #[test]
    fn externally_cancelled_token_stops_sampling() {
        let mut sched = Scheduler::new();
        let handle = sched.schedule("rotate", linear(100.0), 0.0);
        handle.token.cancel();
        assert_eq!(sched.len(), 1);
        assert!(sched.poll(50.0).is_empty());
        assert!(sched.is_empty());
    }

    #[test]
    fn cancel_all_stops_every_slot() {
        let mut sched = Scheduler::new();
        let a = sched.schedule("rotate", linear(100.0), 0.0);
        let b = sched.schedule("dwell", linear(100.0), 0.0);
        assert_eq!(sched.cancel_all(), 2);
        assert!(a.token.is_cancelled() && b.token.is_cancelled());
        assert!(sched.poll(50.0).is_empty());
    }

    #[test]
    fn polls_in_insertion_order() {
        let mut sched = Scheduler::new();
        sched.schedule("b", linear(100.0), 0.0);
        sched.schedule("a", linear(100.0), 0.0);
        let slots: Vec<_> = sched.poll(10.0).iter().map(|s| s.slot).collect();
        assert_eq!(slots, vec!["b", "a"]);
    }
}
