/// Ring-rotation: concentric rings stepped 45° at a time. Solved when
/// every ring reads 0°.

pub const STEP_DEGREES: u16 = 45;
pub const FULL_TURN: u16 = 360;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingRotation {
    angles: Vec<u16>,
    solved: bool,
}

impl RingRotation {
    pub fn new(scramble: &[u16]) -> Self {
        let angles: Vec<u16> = scramble.iter().map(|a| a % FULL_TURN).collect();
        let solved = angles.iter().all(|&a| a == 0);
        Self { angles, solved }
    }

    pub fn angles(&self) -> &[u16] {
        &self.angles
    }

    pub fn ring_count(&self) -> usize {
        self.angles.len()
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Advance ring `ring` by one step. Returns its new angle, or None if
    /// the click was ignored.
    pub fn rotate(&mut self, ring: usize) -> Option<u16> {
        if self.solved {
            return None;
        }
        let angle = self.angles.get_mut(ring)?;
        *angle = (*angle + STEP_DEGREES) % FULL_TURN;
        let new_angle = *angle;
        self.solved = self.angles.iter().all(|&a| a == 0);
        Some(new_angle)
    }
}
