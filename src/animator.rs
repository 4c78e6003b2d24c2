//! Decaying-step value animation.
//!
//! The displayed value moves a tenth of the remaining distance toward its
//! target on every tick, which eases out smoothly and can never overshoot.
//! Ticks are cooperative: the host calls [`ValueAnimator::poll`] with the
//! current time and every tick that has come due fires, in order.
//!
//! At most one tick is ever pending. It lives in a [`TimerSlot`] owned by the
//! animator, and the slot is cancelled before anything is rescheduled, when a
//! new target arrives, and when the animator is dropped.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Interval between two animation ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Fraction of the remaining distance covered per tick is `1 / STEP_DIVISOR`.
const STEP_DIVISOR: f64 = 10.0;

/// Steps at or below this size snap straight to the target.
const SNAP_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    /// No tick pending; the value sits at its target.
    Settling,
    /// A tick is scheduled.
    Animating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTick {
    pub id: TickId,
    pub due: Instant,
}

// ============================================================================
// TIMER SLOT
// ============================================================================

/// Owned handle for the single pending animation tick.
#[derive(Debug, Default)]
pub struct TimerSlot {
    pending: Option<PendingTick>,
    next_id: u64,
}

impl TimerSlot {
    /// Arms the slot, cancelling whatever was pending.
    pub fn schedule(&mut self, due: Instant) -> TickId {
        self.cancel();
        let id = TickId(self.next_id);
        self.next_id += 1;
        self.pending = Some(PendingTick { id, due });
        id
    }

    /// Disarms the slot, returning the tick that will no longer fire.
    pub fn cancel(&mut self) -> Option<PendingTick> {
        let cancelled = self.pending.take();
        if let Some(tick) = cancelled {
            trace!(tick = tick.id.0, "cancelled pending tick");
        }
        cancelled
    }

    pub fn pending(&self) -> Option<PendingTick> {
        self.pending
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of ticks waiting to fire; never more than one.
    pub fn armed_count(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    fn take_due(&mut self, now: Instant) -> Option<PendingTick> {
        match self.pending {
            Some(tick) if tick.due <= now => self.pending.take(),
            _ => None,
        }
    }
}

// ============================================================================
// VALUE ANIMATOR
// ============================================================================

#[derive(Debug)]
pub struct ValueAnimator {
    current: f64,
    target: f64,
    interval: Duration,
    timer: TimerSlot,
    ticks_fired: u64,
}

impl ValueAnimator {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(0.0, interval)
    }

    pub fn starting_at(value: f64, interval: Duration) -> Self {
        Self {
            current: value,
            target: value,
            interval,
            timer: TimerSlot::default(),
            ticks_fired: 0,
        }
    }

    #[inline]
    pub fn current_value(&self) -> f64 {
        self.current
    }

    #[inline]
    pub fn target_value(&self) -> f64 {
        self.target
    }

    pub fn tick_interval(&self) -> Duration {
        self.interval
    }

    pub fn timer(&self) -> &TimerSlot {
        &self.timer
    }

    /// Total ticks fired over the animator's lifetime.
    pub fn ticks_fired(&self) -> u64 {
        self.ticks_fired
    }

    pub fn phase(&self) -> AnimationPhase {
        if self.timer.is_armed() {
            AnimationPhase::Animating
        } else {
            AnimationPhase::Settling
        }
    }

    /// Starts animating toward `target`, never below `floor`.
    pub fn set_target(&mut self, target: f64, floor: f64, now: Instant) -> AnimationPhase {
        self.timer.cancel();

        self.target = target.max(floor);
        if (self.current - self.target).abs() > 0.0 {
            let id = self.timer.schedule(now + self.interval);
            debug!(
                from = self.current,
                to = self.target,
                tick = id.0,
                "animating to new target"
            );
        }
        self.phase()
    }

    /// Stops where the value currently is.
    pub fn clear_target(&mut self) {
        self.timer.cancel();
        self.target = self.current;
    }

    /// Jumps straight to the target.
    pub fn settle(&mut self) {
        self.timer.cancel();
        self.current = self.target;
    }

    /// Fires every tick due at `now`. Returns whether the value moved.
    pub fn poll(&mut self, now: Instant) -> bool {
        let before = self.current;
        while let Some(tick) = self.timer.take_due(now) {
            self.fire(tick);
        }
        self.current != before
    }

    /// Cancels the pending tick for good.
    pub fn teardown(&mut self) {
        self.timer.cancel();
    }

    fn fire(&mut self, tick: PendingTick) {
        self.ticks_fired += 1;

        let difference = (self.current - self.target).abs();
        let step = difference / STEP_DIVISOR;

        if step > SNAP_STEP && difference > step {
            if self.current > self.target {
                self.current -= step;
            } else {
                self.current += step;
            }
            let next = self.timer.schedule(tick.due + self.interval);
            trace!(value = self.current, step, tick = next.0, "animation tick");
        } else {
            self.current = self.target;
            debug!(value = self.current, "animation settled");
        }
    }
}

impl Default for ValueAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl Drop for ValueAnimator {
    fn drop(&mut self) {
        self.teardown();
    }
}
