//! Gate-length timing.
//!
//! [`TriggerTimer`] only tracks *when* the gate must be released. Asserting
//! and releasing the physical output is the caller's job.

use embassy_time::{Duration, Instant};

/// Gate release state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerTimer {
    /// No gate pending release.
    #[default]
    Idle,
    /// Gate asserted; release once `now >= off_at`.
    Active { off_at: Instant },
}

/// Gate-on time for a clock period and a length percentage.
///
/// Computed in timer ticks and rounded down.
pub fn gate_duration(period: Duration, length_percent: u8) -> Duration {
    Duration::from_ticks(period.as_ticks() * length_percent as u64 / 100)
}

impl TriggerTimer {
    pub const fn new() -> Self {
        TriggerTimer::Idle
    }

    /// Start (or restart) the gate timer.
    ///
    /// Re-arming while active replaces the previous deadline. A zero
    /// `period` yields a zero-length gate that releases on the next poll.
    ///
    /// # Examples
    ///
    /// ```
    /// use embassy_time::{Duration, Instant};
    /// use randloop::trigger::TriggerTimer;
    ///
    /// let mut timer = TriggerTimer::new();
    /// timer.arm(Duration::from_millis(1000), 50, Instant::from_millis(0));
    /// assert!(!timer.poll(Instant::from_millis(499)));
    /// assert!(timer.poll(Instant::from_millis(500)));
    /// assert!(!timer.poll(Instant::from_millis(600)));
    /// ```
    pub fn arm(&mut self, period: Duration, length_percent: u8, now: Instant) {
        *self = TriggerTimer::Active {
            off_at: now + gate_duration(period, length_percent),
        };
    }

    /// Returns `true` exactly once when an active gate reaches its deadline.
    ///
    /// Safe to call every tick; always `false` while idle.
    pub fn poll(&mut self, now: Instant) -> bool {
        match *self {
            TriggerTimer::Active { off_at } if now >= off_at => {
                *self = TriggerTimer::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TriggerTimer::Active { .. })
    }

    /// Release deadline, if active.
    pub fn off_at(&self) -> Option<Instant> {
        match self {
            TriggerTimer::Active { off_at } => Some(*off_at),
            TriggerTimer::Idle => None,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
