/// Code-entry keypad: up to four digits, checked on submit.
use std::time::Duration;

use crate::core::timer::Timer;
use crate::schema::puzzle::{EasterEgg, EggTone};

pub const MAX_DIGITS: usize = 4;

/// Result of a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFeedback {
    /// Correct code. The keypad is now solved.
    Accepted,
    /// Wrong code; the buffer was cleared.
    Rejected,
    /// Wrong, but special-cased. The display shows `display` for a moment.
    Notable { display: String, tone: EggTone },
    /// Input is not being accepted right now.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CodeEntry {
    code: String,
    easter_eggs: Vec<EasterEgg>,
    buffer: String,
    flash: Option<(String, Timer)>,
    flash_duration: Duration,
    solved: bool,
}

impl CodeEntry {
    pub fn new(code: &str, easter_eggs: &[EasterEgg], flash_duration: Duration) -> Self {
        Self {
            code: code.to_string(),
            easter_eggs: easter_eggs.to_vec(),
            buffer: String::new(),
            flash: None,
            flash_duration,
            solved: false,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Digits typed so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// What the keypad display should read.
    pub fn display(&self) -> &str {
        match &self.flash {
            Some((text, _)) => text,
            None => &self.buffer,
        }
    }

    fn accepting(&self) -> bool {
        !self.solved && self.flash.is_none()
    }

    /// Append a digit. Returns false if the digit was ignored.
    pub fn press(&mut self, digit: u8) -> bool {
        if !self.accepting() || digit > 9 || self.buffer.len() >= MAX_DIGITS {
            return false;
        }
        self.buffer.push(char::from(b'0' + digit));
        true
    }

    /// Remove the last digit. Returns false if nothing changed.
    pub fn delete(&mut self) -> bool {
        if !self.accepting() {
            return false;
        }
        self.buffer.pop().is_some()
    }

    pub fn submit(&mut self) -> CodeFeedback {
        if !self.accepting() {
            return CodeFeedback::Ignored;
        }
        if self.buffer == self.code {
            self.solved = true;
            return CodeFeedback::Accepted;
        }
        let attempt = std::mem::take(&mut self.buffer);
        match self.easter_eggs.iter().find(|egg| egg.code == attempt) {
            Some(egg) => {
                self.flash = Some((egg.display.clone(), Timer::new(self.flash_duration)));
                CodeFeedback::Notable {
                    display: egg.display.clone(),
                    tone: egg.tone,
                }
            }
            None => CodeFeedback::Rejected,
        }
    }

    /// Advance the easter-egg display. Returns true when it clears.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let cleared = match &mut self.flash {
            Some((_, timer)) => timer.tick(dt),
            None => false,
        };
        if cleared {
            self.flash = None;
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypad() -> CodeEntry {
        CodeEntry::new(
            "089",
            &[
                EasterEgg {
                    code: "666".to_string(),
                    display: "HELL".to_string(),
                    tone: EggTone::Ominous,
                },
                EasterEgg {
                    code: "1234".to_string(),
                    display: "TOO EASY".to_string(),
                    tone: EggTone::Mocking,
                },
            ],
            Duration::from_millis(1000),
        )
    }

    fn type_code(pad: &mut CodeEntry, code: &str) {
        for c in code.chars() {
            pad.press(c.to_digit(10).unwrap() as u8);
        }
    }

    #[test]
    fn correct_code_solves_and_locks() {
        let mut pad = keypad();
        type_code(&mut pad, "089");
        assert_eq!(pad.submit(), CodeFeedback::Accepted);
        assert!(pad.is_solved());
        assert!(!pad.press(1));
        assert!(!pad.delete());
        assert_eq!(pad.submit(), CodeFeedback::Ignored);
    }

    #[test]
    fn buffer_caps_at_four_digits() {
        let mut pad = keypad();
        type_code(&mut pad, "123456");
        assert_eq!(pad.buffer(), "1234");
        assert!(pad.delete());
        assert_eq!(pad.buffer(), "123");
    }

    #[test]
    fn wrong_code_clears_buffer() {
        let mut pad = keypad();
        type_code(&mut pad, "0891");
        assert_eq!(pad.submit(), CodeFeedback::Rejected);
        assert_eq!(pad.buffer(), "");
        assert!(!pad.is_solved());
        assert!(pad.press(0));
    }

    #[test]
    fn easter_egg_flashes_then_clears() {
        let mut pad = keypad();
        type_code(&mut pad, "666");
        assert_eq!(
            pad.submit(),
            CodeFeedback::Notable {
                display: "HELL".to_string(),
                tone: EggTone::Ominous
            }
        );
        assert!(!pad.is_solved());
        assert_eq!(pad.display(), "HELL");
        assert!(!pad.press(0));

        assert!(!pad.tick(Duration::from_millis(400)));
        assert!(pad.tick(Duration::from_millis(600)));
        assert_eq!(pad.display(), "");
        type_code(&mut pad, "089");
        assert_eq!(pad.submit(), CodeFeedback::Accepted);
    }

    #[test]
    fn rejects_non_digits() {
        let mut pad = keypad();
        assert!(!pad.press(10));
        assert_eq!(pad.buffer(), "");
    }
}
