use std::collections::BTreeSet;

use crate::document::ScrollDef;
use crate::events::Direction;

/// Key-repeat configuration for a control or menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollParam {
    pub start_delay_ms: u32,
    pub scroll_delay_ms: u32,
    directions: BTreeSet<Direction>,
}

impl ScrollParam {
    pub fn new(start_delay_ms: u32, scroll_delay_ms: u32) -> Self {
        Self {
            start_delay_ms,
            scroll_delay_ms,
            directions: BTreeSet::new(),
        }
    }

    pub fn from_def(def: &ScrollDef) -> Self {
        let mut param = Self::new(def.start_delay, def.scroll_delay);
        for (direction, enabled) in [
            (Direction::Up, def.up),
            (Direction::Down, def.down),
            (Direction::Left, def.left),
            (Direction::Right, def.right),
        ] {
            if enabled {
                param.directions.insert(direction);
            }
        }
        param
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.directions.insert(direction);
        self
    }

    pub fn allows(&self, direction: Direction) -> bool {
        self.directions.contains(&direction)
    }

    pub fn is_enabled(&self) -> bool {
        !self.directions.is_empty()
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.directions.iter().copied()
    }
}
