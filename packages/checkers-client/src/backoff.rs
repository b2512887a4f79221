//! Delay schedule between reconnect attempts.

use std::time::Duration;

use rand::random;

const INITIAL_DELAY: Duration = Duration::from_millis(500);
const MAX_DELAY: Duration = Duration::from_secs(30);
const DELAY_MULTIPLIER: f64 = 2.0;
const JITTER_PERCENT: f64 = 0.2;
const MIN_DELAY_SECS: f64 = 0.05;

/// Doublings beyond this are already far past any sensible cap.
const MAX_EXPONENT: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// `initial * multiplier^(attempt-1)`, capped at `max`, then spread by
    /// `+/- jitter` of itself.
    Exponential {
        initial: Duration,
        multiplier: f64,
        max: Duration,
        jitter: f64,
    },
    Fixed(Duration),
}

impl Default for Backoff {
    fn default() -> Self {
        Self::exponential()
    }
}

impl Backoff {
    /// 500 ms doubling up to 30 s, with 20% jitter.
    pub fn exponential() -> Self {
        Backoff::Exponential {
            initial: INITIAL_DELAY,
            multiplier: DELAY_MULTIPLIER,
            max: MAX_DELAY,
            jitter: JITTER_PERCENT,
        }
    }

    pub fn fixed(delay: Duration) -> Self {
        Backoff::Fixed(delay)
    }

    /// Delay before reconnect attempt `attempt`, counting from 1.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.delay_with(attempt, random::<f64>() * 2.0 - 1.0)
    }

    /// `spread` in `[-1, 1]` picks the point inside the jitter band.
    fn delay_with(&self, attempt: u32, spread: f64) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential {
                initial,
                multiplier,
                max,
                jitter,
            } => {
                let exponent = attempt.saturating_sub(1).min(MAX_EXPONENT) as i32;
                let base = initial.as_secs_f64() * multiplier.powi(exponent);
                let capped = base.min(max.as_secs_f64());
                let jittered = capped + spread.clamp(-1.0, 1.0) * capped * jitter;
                Duration::from_secs_f64(jittered.max(MIN_DELAY_SECS))
            }
        }
    }
}
