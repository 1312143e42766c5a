/// Dice Resolver: d20 skill checks with a cosmetic spin before the roll.
use rand::Rng;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::core::signal::{Cue, Signal, SignalQueue};
use crate::core::timer::{Timer, Timings};
use crate::schema::story::{DiceChallenge, Effect};

pub const D20_SIDES: u8 = 20;

/// A d20 result. Only values in 1..=20 can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct D20(u8);

impl D20 {
    pub fn new(value: u8) -> Option<Self> {
        (1..=D20_SIDES).contains(&value).then_some(Self(value))
    }

    /// Draw a uniformly distributed roll.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(1..=D20_SIDES))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// A roll equal to the target succeeds.
    pub fn meets(self, target: u8) -> bool {
        self.0 >= target
    }
}

impl TryFrom<u8> for D20 {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(value)
    }
}

impl fmt::Display for D20 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RollPhase {
    Idle,
    Spinning { spin: Timer, since_face: Duration },
    Revealed { roll: D20, reveal: Timer },
    Finished(D20),
}

/// One dice challenge from "roll requested" to "branch decided".
///
/// Input after the roll is requested is ignored; the only way to abandon
/// a roll in flight is to drop the roller.
#[derive(Debug, Clone)]
pub struct DiceRoller {
    target: u8,
    stat: String,
    timings: Timings,
    phase: RollPhase,
}

impl DiceRoller {
    pub fn new(challenge: &DiceChallenge, timings: Timings) -> Self {
        Self {
            target: challenge.target,
            stat: challenge.stat.clone(),
            timings,
            phase: RollPhase::Idle,
        }
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn stat(&self) -> &str {
        &self.stat
    }

    pub fn is_idle(&self) -> bool {
        self.phase == RollPhase::Idle
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self.phase, RollPhase::Spinning { .. })
    }

    /// The final roll, once drawn.
    pub fn result(&self) -> Option<D20> {
        match self.phase {
            RollPhase::Revealed { roll, .. } | RollPhase::Finished(roll) => Some(roll),
            _ => None,
        }
    }

    /// Begin spinning. Returns false if a roll was already requested.
    pub fn start(&mut self, signals: &mut SignalQueue) -> bool {
        if !self.is_idle() {
            return false;
        }
        signals.cue(Cue::DiceRoll);
        self.phase = RollPhase::Spinning {
            spin: Timer::new(self.timings.dice_spin()),
            since_face: Duration::ZERO,
        };
        true
    }

    /// Advance the spin and reveal. Returns the final roll exactly once,
    /// when the reveal delay has elapsed.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: Duration,
        rng: &mut R,
        signals: &mut SignalQueue,
    ) -> Option<D20> {
        let mut left = dt;
        loop {
            match &mut self.phase {
                RollPhase::Idle | RollPhase::Finished(_) => return None,
                RollPhase::Spinning { spin, since_face } => {
                    let step = left.min(spin.remaining());
                    left -= step;
                    *since_face += step;
                    let interval = self.timings.dice_tick();
                    while !interval.is_zero() && *since_face >= interval {
                        *since_face -= interval;
                        // Preview faces are discarded; they never decide anything.
                        signals.push(Signal::DiceFace(D20::roll(rng).value()));
                    }
                    if !spin.tick(step) {
                        return None;
                    }
                    let roll = D20::roll(rng);
                    self.reveal(roll, signals);
                }
                RollPhase::Revealed { roll, reveal } => {
                    let step = left.min(reveal.remaining());
                    left -= step;
                    if !reveal.tick(step) {
                        return None;
                    }
                    let roll = *roll;
                    self.phase = RollPhase::Finished(roll);
                    return Some(roll);
                }
            }
        }
    }

    fn reveal(&mut self, roll: D20, signals: &mut SignalQueue) {
        let success = roll.meets(self.target);
        debug!(stat = %self.stat, roll = roll.value(), target = self.target, success, "dice roll");
        signals.push(Signal::DiceResult {
            roll: roll.value(),
            target: self.target,
            success,
        });
        if success {
            signals.cue(Cue::Success);
        } else {
            signals.cue(Cue::Failure);
            signals.push(Signal::Effect(Effect::Shake));
        }
        self.phase = RollPhase::Revealed {
            roll,
            reveal: Timer::new(self.timings.dice_reveal()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ids::NodeId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn challenge(target: u8) -> DiceChallenge {
        DiceChallenge {
            target,
            stat: "Stealth".to_string(),
            success: NodeId::from("sneak_success"),
            fail: NodeId::from("sneak_fail"),
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn d20_rejects_out_of_range() {
        assert!(D20::new(0).is_none());
        assert!(D20::new(21).is_none());
        assert_eq!(D20::new(1).map(D20::value), Some(1));
        assert_eq!(D20::try_from(20).map(D20::value), Ok(20));
        assert_eq!(D20::try_from(42), Err(42));
    }

    #[test]
    fn equal_roll_succeeds() {
        let roll = D20::new(8).unwrap();
        assert!(roll.meets(8));
        assert!(roll.meets(7));
        assert!(!roll.meets(9));
    }

    #[test]
    fn roll_distribution_is_uniform() {
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 200_000;
        let mut counts = [0u32; 20];
        for _ in 0..trials {
            let roll = D20::roll(&mut rng).value();
            assert!((1..=20).contains(&roll));
            counts[(roll - 1) as usize] += 1;
        }
        let expected = trials as f64 / 20.0;
        for (face, count) in counts.iter().enumerate() {
            let deviation = (*count as f64 - expected).abs() / expected;
            assert!(
                deviation < 0.05,
                "face {} drawn {} times, expected about {}",
                face + 1,
                count,
                expected
            );
        }
    }

    #[test]
    fn spin_then_reveal_then_finish() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut signals = SignalQueue::new();
        let mut roller = DiceRoller::new(&challenge(8), Timings::default());

        assert!(roller.tick(ms(5000), &mut rng, &mut signals).is_none());
        assert!(roller.start(&mut signals));
        assert!(!roller.start(&mut signals));
        assert!(roller.is_rolling());

        assert!(roller.tick(ms(1000), &mut rng, &mut signals).is_none());
        assert!(roller.result().is_none());
        assert!(roller.tick(ms(600), &mut rng, &mut signals).is_none());
        let revealed = roller.result().expect("roll drawn after the spin");

        assert!(roller.tick(ms(2000), &mut rng, &mut signals).is_none());
        let finished = roller.tick(ms(600), &mut rng, &mut signals);
        assert_eq!(finished, Some(revealed));
        // Reported once only.
        assert!(roller.tick(ms(600), &mut rng, &mut signals).is_none());

        let drained = signals.drain();
        assert_eq!(drained[0], Signal::Cue(Cue::DiceRoll));
        let faces = drained
            .iter()
            .filter(|s| matches!(s, Signal::DiceFace(_)))
            .count();
        assert_eq!(faces, 30);
        assert!(drained.iter().any(|s| matches!(
            s,
            Signal::DiceResult { roll, target: 8, .. } if *roll == revealed.value()
        )));
    }

    #[test]
    fn single_large_tick_runs_to_completion() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut signals = SignalQueue::new();
        let mut roller = DiceRoller::new(&challenge(1), Timings::default());
        roller.start(&mut signals);
        let roll = roller.tick(ms(10_000), &mut rng, &mut signals);
        assert!(roll.is_some());
        assert!(signals.iter().any(|s| *s == Signal::Cue(Cue::Success)));
    }

    #[test]
    fn failure_shakes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut signals = SignalQueue::new();
        // Target above the die's range always fails.
        let mut roller = DiceRoller::new(&challenge(21), Timings::default());
        roller.start(&mut signals);
        roller.tick(ms(10_000), &mut rng, &mut signals);
        let drained = signals.drain();
        assert!(drained.contains(&Signal::Cue(Cue::Failure)));
        assert!(drained.contains(&Signal::Effect(Effect::Shake)));
    }
}
