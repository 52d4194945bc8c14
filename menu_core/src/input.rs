use std::time::Duration;

use crate::control::ScrollParam;
use crate::events::{Direction, UiEvent};

/// Turns a held direction into repeated `Scroll` events. The first repeat
/// waits for the start delay, later ones for the scroll delay.
#[derive(Debug, Clone, Default)]
pub struct ScrollRepeater {
    held: Option<Direction>,
    elapsed: Duration,
    repeating: bool,
}

impl ScrollRepeater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<Direction> {
        self.held
    }

    pub fn press(&mut self, direction: Direction) {
        self.held = Some(direction);
        self.elapsed = Duration::ZERO;
        self.repeating = false;
    }

    pub fn release(&mut self, direction: Direction) {
        if self.held == Some(direction) {
            *self = Self::default();
        }
    }

    /// Advances the hold timer. `param` comes from the active menu; a
    /// direction it does not list never repeats.
    pub fn advance(&mut self, dt: Duration, param: Option<&ScrollParam>) -> Option<UiEvent> {
        let direction = self.held?;
        let param = param.filter(|param| param.allows(direction))?;

        self.elapsed += dt;
        let delay = if self.repeating {
            param.scroll_delay_ms
        } else {
            param.start_delay_ms
        };
        let delay = Duration::from_millis(u64::from(delay));
        if self.elapsed < delay {
            return None;
        }
        self.elapsed -= delay;
        self.repeating = true;
        Some(UiEvent::Scroll { direction })
    }
}
