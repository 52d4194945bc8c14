use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::control::{ControlId, ControlState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    Begin,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActionPress {
    Down,
    #[default]
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[default]
    Keyboard,
    Gamepad,
    Mouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveControlChoice {
    First,
    Last,
}

/// Messages carried on the UI bus. Input, menu lifecycle and application
/// level requests share one queue so the core can consume its own output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiEvent {
    PointerMove {
        x: f32,
        y: f32,
    },
    Select {
        #[serde(default)]
        device: Device,
        #[serde(default)]
        press: ActionPress,
        #[serde(default)]
        position: Option<[f32; 2]>,
    },
    Navigate {
        direction: Direction,
    },
    Scroll {
        direction: Direction,
    },
    TabLeft,
    TabRight,
    Escape,
    Toggle,
    Back,
    ToMenu {
        menu: String,
    },
    TransitionIn {
        phase: TransitionPhase,
    },
    TransitionOut {
        phase: TransitionPhase,
    },
    StateChange {
        target: ControlId,
        state: ControlState,
    },
    SelectExecute,
    SetActiveControl {
        choice: ActiveControlChoice,
    },
    ChangeFocus {
        control: String,
    },
    Reactivate,
    BackToMainMenu,
    GameStateChange,
    Quit,
    Custom {
        name: String,
        #[serde(default)]
        code: i32,
    },
}

impl UiEvent {
    /// Events that drive a tree's transition protocol. Interface overlays do
    /// not forward these to their menus.
    pub fn is_menu_lifecycle(&self) -> bool {
        matches!(
            self,
            UiEvent::TransitionIn { .. }
                | UiEvent::TransitionOut { .. }
                | UiEvent::SetActiveControl { .. }
        )
    }

    pub fn directional(&self) -> Option<Direction> {
        match self {
            UiEvent::Navigate { direction } | UiEvent::Scroll { direction } => Some(*direction),
            _ => None,
        }
    }

    /// Maps a message raised from script code (`DispatchEvent(kind, code)`)
    /// onto the bus vocabulary. Unknown names travel as `Custom`.
    pub fn from_script(kind: &str, code: i32) -> Self {
        let phase = if code == 0 {
            TransitionPhase::Begin
        } else {
            TransitionPhase::End
        };
        match kind {
            "escape" => UiEvent::Escape,
            "toggle" => UiEvent::Toggle,
            "back" => UiEvent::Back,
            "trans_in" => UiEvent::TransitionIn { phase },
            "trans_out" => UiEvent::TransitionOut { phase },
            "select_execute" => UiEvent::SelectExecute,
            "reactivate" => UiEvent::Reactivate,
            "back_to_main_menu" => UiEvent::BackToMainMenu,
            "game_state_change" => UiEvent::GameStateChange,
            "quit" => UiEvent::Quit,
            other => UiEvent::Custom {
                name: other.to_string(),
                code,
            },
        }
    }
}

/// Delivered messages a queue keeps unless told otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// FIFO bus for UI messages. The most recent deliveries are kept in
/// `history` (up to `history_limit`) so a host can replay or persist what
/// happened during a run.
#[derive(Debug, Clone, Serialize)]
pub struct EventQueue {
    pending: VecDeque<UiEvent>,
    history: VecDeque<UiEvent>,
    #[serde(skip)]
    history_limit: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A limit of zero turns history off.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            history: VecDeque::new(),
            history_limit: limit,
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.history_limit = limit;
        let excess = self.history.len().saturating_sub(limit);
        self.history.drain(..excess);
    }

    pub fn dispatch(&mut self, event: UiEvent) {
        log::trace!("dispatch {event:?}");
        self.pending.push_back(event);
    }

    pub fn next(&mut self) -> Option<UiEvent> {
        let event = self.pending.pop_front()?;
        if self.history_limit > 0 {
            if self.history.len() == self.history_limit {
                self.history.pop_front();
            }
            self.history.push_back(event.clone());
        }
        Some(event)
    }

    pub fn peek(&self) -> Option<&UiEvent> {
        self.pending.front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl ExactSizeIterator<Item = &UiEvent> {
        self.pending.iter()
    }

    /// Oldest first.
    pub fn history(&self) -> &VecDeque<UiEvent> {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
