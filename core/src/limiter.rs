//! Fixed-window attempt limiter with a per-second cooldown countdown.
//!
//! ```text
//!            attempt (count < max, or window elapsed)
//!           ┌──────┐
//!           ▼      │
//!         Open ────┘
//!           │  attempt with count == max inside the window
//!           ▼
//!     Cooling { remaining } ──tick──▶ Cooling { remaining - 1 }
//!           │  tick reaching 0
//!           ▼
//!         Open (count = 0)
//! ```
//!
//! The window is fixed, not sliding: the count resets once a full cooldown
//! has passed since the most recent accepted attempt.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::RateLimitError;

/// Default number of attempts accepted per window.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default cooldown window.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Whether the limiter is accepting attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimiterState {
    /// Attempts are accepted.
    Open,
    /// Attempts are refused until the countdown reaches zero.
    Cooling {
        /// Whole seconds left in the countdown.
        remaining_seconds: u64,
    },
}

/// Counts verification attempts and blocks bursts.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    max_attempts: u32,
    cooldown: Duration,
    attempt_count: u32,
    last_attempt: Option<Instant>,
    state: LimiterState,
}

impl RateLimiter {
    /// Creates a limiter accepting `max_attempts` per `cooldown` window.
    pub fn new(max_attempts: u32, cooldown: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            cooldown,
            attempt_count: 0,
            last_attempt: None,
            state: LimiterState::Open,
        }
    }

    /// Records an attempt made at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError`] when the attempt budget for the current
    /// window is spent; the limiter is then in [`LimiterState::Cooling`].
    pub fn attempt(&mut self, now: Instant) -> Result<(), RateLimitError> {
        let elapsed = self
            .last_attempt
            .map(|last| now.saturating_duration_since(last));

        if elapsed.is_some_and(|e| e >= self.cooldown) {
            debug!(count = self.attempt_count, "cooldown window elapsed, resetting attempts");
            self.attempt_count = 0;
            self.state = LimiterState::Open;
        }

        if self.attempt_count >= self.max_attempts {
            let left = self.cooldown.saturating_sub(elapsed.unwrap_or_default());
            let remaining_seconds = ceil_seconds(left);
            self.state = LimiterState::Cooling { remaining_seconds };
            debug!(remaining_seconds, "attempt blocked, cooling down");
            return Err(RateLimitError { remaining_seconds });
        }

        self.attempt_count += 1;
        self.last_attempt = Some(now);
        debug!(count = self.attempt_count, max = self.max_attempts, "attempt accepted");
        Ok(())
    }

    /// Advances the countdown by one second.
    ///
    /// Reaching zero reopens the limiter and clears the attempt count. Has no
    /// effect while open.
    pub fn tick(&mut self) -> LimiterState {
        if let LimiterState::Cooling { remaining_seconds } = self.state {
            let remaining_seconds = remaining_seconds.saturating_sub(1);
            self.state = if remaining_seconds == 0 {
                debug!("cooldown expired");
                self.attempt_count = 0;
                LimiterState::Open
            } else {
                LimiterState::Cooling { remaining_seconds }
            };
        }
        self.state
    }

    /// Returns the current state.
    pub fn state(&self) -> LimiterState {
        self.state
    }

    /// Returns true while cooling down.
    pub fn is_cooling(&self) -> bool {
        matches!(self.state, LimiterState::Cooling { .. })
    }

    /// Returns the number of attempts counted in the current window.
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Returns the time of the most recent accepted attempt.
    pub fn last_attempt(&self) -> Option<Instant> {
        self.last_attempt
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_COOLDOWN)
    }
}

fn ceil_seconds(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn sixth_attempt_in_window_is_blocked() {
        let t0 = Instant::now();
        let mut limiter = RateLimiter::default();
        for i in 0..5 {
            assert!(limiter.attempt(t0 + secs(i)).is_ok(), "attempt {i}");
        }
        assert_eq!(limiter.attempt_count(), 5);

        // Last accepted attempt was at t0+4s; 10s later 50s remain.
        let err = limiter.attempt(t0 + secs(14)).unwrap_err();
        assert_eq!(err.remaining_seconds, 50);
        assert_eq!(
            limiter.state(),
            LimiterState::Cooling {
                remaining_seconds: 50
            }
        );
    }

    #[test]
    fn remaining_seconds_round_up() {
        let t0 = Instant::now();
        let mut limiter = RateLimiter::new(1, secs(60));
        limiter.attempt(t0).unwrap();
        let err = limiter.attempt(t0 + Duration::from_millis(500)).unwrap_err();
        assert_eq!(err.remaining_seconds, 60);
    }

    #[test]
    fn stale_block_clears_once_window_elapses() {
        let t0 = Instant::now();
        let mut limiter = RateLimiter::default();
        for _ in 0..5 {
            limiter.attempt(t0).unwrap();
        }
        assert!(limiter.attempt(t0 + secs(1)).is_err());

        assert!(limiter.attempt(t0 + secs(60)).is_ok());
        assert_eq!(limiter.attempt_count(), 1);
        assert_eq!(limiter.state(), LimiterState::Open);
    }

    #[test]
    fn countdown_reopens_and_resets_count() {
        let t0 = Instant::now();
        let mut limiter = RateLimiter::new(2, secs(3));
        limiter.attempt(t0).unwrap();
        limiter.attempt(t0).unwrap();
        assert_eq!(
            limiter.attempt(t0).unwrap_err(),
            RateLimitError {
                remaining_seconds: 3
            }
        );

        assert_eq!(
            limiter.tick(),
            LimiterState::Cooling {
                remaining_seconds: 2
            }
        );
        assert_eq!(
            limiter.tick(),
            LimiterState::Cooling {
                remaining_seconds: 1
            }
        );
        assert_eq!(limiter.tick(), LimiterState::Open);
        assert_eq!(limiter.attempt_count(), 0);

        // Count restarted, so a fresh attempt is accepted immediately.
        assert!(limiter.attempt(t0 + secs(3)).is_ok());
        assert_eq!(limiter.attempt_count(), 1);
    }

    #[test]
    fn tick_while_open_is_a_no_op() {
        let mut limiter = RateLimiter::default();
        assert_eq!(limiter.tick(), LimiterState::Open);
        assert_eq!(limiter.attempt_count(), 0);
    }

    #[test]
    fn attempts_spread_past_window_never_block() {
        let t0 = Instant::now();
        let mut limiter = RateLimiter::new(2, secs(10));
        for i in 0..20 {
            assert!(limiter.attempt(t0 + secs(i * 10)).is_ok());
        }
    }
}
