use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyModifiers};
use invaders::InputFlags;

/// Terminals report presses and auto-repeats but no releases, so a key
/// counts as held until this long after its last repeat.
const HOLD: Duration = Duration::from_millis(150);

const HELD_KEYS: [InputFlags; 3] = [InputFlags::LEFT, InputFlags::RIGHT, InputFlags::FIRE];

/// Turns key events into the per-tick input bitmask.
///
/// Movement and fire behave as held keys. Menu keys are edge-triggered:
/// they stay set until a simulation tick consumes them.
#[derive(Debug, Default)]
pub struct InputSampler {
    held_until: [Option<Instant>; 3],
    pressed: InputFlags,
    quit: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Instant) {
        let flag = match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
                return;
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit = true;
                return;
            }
            KeyCode::Left | KeyCode::Char('a') => InputFlags::LEFT,
            KeyCode::Right | KeyCode::Char('d') => InputFlags::RIGHT,
            KeyCode::Char(' ') => InputFlags::FIRE,
            KeyCode::Up | KeyCode::Char('w') => InputFlags::UP,
            KeyCode::Down | KeyCode::Char('s') => InputFlags::DOWN,
            KeyCode::Enter => InputFlags::CONFIRM,
            KeyCode::Char('p') => InputFlags::PAUSE,
            _ => return,
        };

        match HELD_KEYS.iter().position(|&held| held == flag) {
            Some(slot) => self.held_until[slot] = Some(now + HOLD),
            None => self.pressed |= flag,
        }
    }

    /// Input for a tick happening at `now`, without consuming anything.
    pub fn peek(&self, now: Instant) -> InputFlags {
        HELD_KEYS
            .iter()
            .zip(&self.held_until)
            .filter(|(_, until)| until.is_some_and(|until| now < until))
            .fold(self.pressed, |acc, (&flag, _)| acc | flag)
    }

    /// Clears edge-triggered keys once a tick has seen them.
    pub fn consume(&mut self) {
        self.pressed = InputFlags::empty();
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}
