/// Outbound presentation signals: declarative, fire-and-forget.
///
/// The engine never plays media itself. It queues signals; the host drains
/// them after each inbound event and renders or plays whatever it likes.
use crate::schema::ids::ItemId;
use crate::schema::story::{Effect, EndingKind};

/// A short sound cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Click,
    Heartbeat,
    Failure,
    Success,
    ItemGet,
    DiceRoll,
}

impl Cue {
    /// Returns the tag string for this cue (e.g., "cue:item_get").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Click => "cue:click",
            Self::Heartbeat => "cue:heartbeat",
            Self::Failure => "cue:failure",
            Self::Success => "cue:success",
            Self::ItemGet => "cue:item_get",
            Self::DiceRoll => "cue:dice_roll",
        }
    }
}

/// Which cinematic is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CinematicKind {
    Intro,
    Ending(EndingKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Play a sound cue.
    Cue(Cue),
    /// Render a transient effect; the host clears it on its own timer.
    Effect(Effect),
    /// Play a voice line, stopping any voice line already playing.
    Voice(String),
    /// Play a cinematic with narration over it.
    Cinematic {
        kind: CinematicKind,
        video: String,
        narration: String,
    },
    /// An item entered the inventory for the first time.
    ItemAcquired(ItemId),
    /// Sanity dropped by `cost`, now at `sanity`.
    Tension { cost: u32, sanity: u32 },
    /// Show a line of descriptive text (hotspot findings, flavor).
    Narration(String),
    /// A throwaway face shown while the die spins.
    DiceFace(u8),
    /// The final roll of a dice challenge.
    DiceResult { roll: u8, target: u8, success: bool },
    /// What the code-entry display should read.
    CodeDisplay(String),
    /// A puzzle reached its solved state.
    PuzzleSolved,
}

/// FIFO of pending signals, drained by the host.
#[derive(Debug, Clone, Default)]
pub struct SignalQueue {
    pending: Vec<Signal>,
}

impl SignalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, signal: Signal) {
        self.pending.push(signal);
    }

    pub fn cue(&mut self, cue: Cue) {
        self.push(Signal::Cue(cue));
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.pending.iter()
    }

    /// Take every pending signal in emission order.
    pub fn drain(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut queue = SignalQueue::new();
        queue.cue(Cue::Click);
        queue.push(Signal::Effect(Effect::Shake));
        queue.push(Signal::Voice("/audio/voice/intro_whisper.mp3".to_string()));
        assert_eq!(queue.len(), 3);

        let drained = queue.drain();
        assert_eq!(drained[0], Signal::Cue(Cue::Click));
        assert_eq!(drained[1], Signal::Effect(Effect::Shake));
        assert!(matches!(&drained[2], Signal::Voice(v) if v.ends_with("intro_whisper.mp3")));
        assert!(queue.is_empty());
    }

    #[test]
    fn cue_tags() {
        assert_eq!(Cue::ItemGet.tag(), "cue:item_get");
        assert_eq!(Cue::DiceRoll.tag(), "cue:dice_roll");
    }
}
