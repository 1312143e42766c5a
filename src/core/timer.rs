/// Fixed-duration timers for the cosmetic delays between resolver
/// completion and control returning to the host mode.
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A countdown advanced explicitly by the caller. Cannot be skipped;
/// only dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    remaining: Duration,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
        }
    }

    /// Advance by `dt`. Returns true once the timer has run out.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }

    pub fn is_done(&self) -> bool {
        self.remaining.is_zero()
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn default_dice_tick() -> u64 {
    50
}

fn default_dice_spin() -> u64 {
    1500
}

fn default_dice_reveal() -> u64 {
    2500
}

fn default_puzzle_success() -> u64 {
    1500
}

fn default_code_feedback() -> u64 {
    1000
}

/// Durations of every timed step, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Interval between spin preview faces.
    #[serde(default = "default_dice_tick")]
    pub dice_tick_ms: u64,
    /// How long the die spins before the final roll is drawn.
    #[serde(default = "default_dice_spin")]
    pub dice_spin_ms: u64,
    /// How long the final roll stays on screen before the branch is taken.
    #[serde(default = "default_dice_reveal")]
    pub dice_reveal_ms: u64,
    #[serde(default = "default_puzzle_success")]
    pub puzzle_success_ms: u64,
    /// How long a rejected or easter-egg code stays on the keypad display.
    #[serde(default = "default_code_feedback")]
    pub code_feedback_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            dice_tick_ms: default_dice_tick(),
            dice_spin_ms: default_dice_spin(),
            dice_reveal_ms: default_dice_reveal(),
            puzzle_success_ms: default_puzzle_success(),
            code_feedback_ms: default_code_feedback(),
        }
    }
}

impl Timings {
    pub fn dice_tick(&self) -> Duration {
        ms(self.dice_tick_ms)
    }

    pub fn dice_spin(&self) -> Duration {
        ms(self.dice_spin_ms)
    }

    pub fn dice_reveal(&self) -> Duration {
        ms(self.dice_reveal_ms)
    }

    pub fn puzzle_success(&self) -> Duration {
        ms(self.puzzle_success_ms)
    }

    pub fn code_feedback(&self) -> Duration {
        ms(self.code_feedback_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_counts_down_and_saturates() {
        let mut timer = Timer::new(ms(100));
        assert!(!timer.tick(ms(40)));
        assert_eq!(timer.remaining(), ms(60));
        assert!(timer.tick(ms(500)));
        assert!(timer.is_done());
        assert!(timer.tick(ms(1)));
    }

    #[test]
    fn zero_timer_is_done_immediately() {
        assert!(Timer::new(Duration::ZERO).is_done());
    }

    #[test]
    fn timings_fill_defaults_from_partial_ron() {
        let timings: Timings = ron::from_str("(dice_spin_ms: 10)").unwrap();
        assert_eq!(timings.dice_spin(), ms(10));
        assert_eq!(timings.dice_reveal(), ms(2500));
        assert_eq!(timings.puzzle_success(), ms(1500));
    }
}
