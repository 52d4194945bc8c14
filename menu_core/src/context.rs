use glam::Vec2;

use crate::events::{Device, EventQueue, UiEvent};
use crate::geometry::ScreenSettings;
use crate::script::{ScriptHost, ScriptPool};

/// Most recent input device and pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub last_device: Device,
    pub pointer: Vec2,
}

impl InputState {
    pub fn last_device_was_pointer(&self) -> bool {
        self.last_device == Device::Mouse
    }

    /// Tracks the device behind an input event before it is queued.
    pub fn observe(&mut self, event: &UiEvent) {
        match event {
            UiEvent::PointerMove { x, y } => {
                self.last_device = Device::Mouse;
                self.pointer = Vec2::new(*x, *y);
            }
            UiEvent::Select {
                device, position, ..
            } => {
                self.last_device = *device;
                if let Some([x, y]) = position {
                    self.pointer = Vec2::new(*x, *y);
                }
            }
            UiEvent::Navigate { .. } | UiEvent::Scroll { .. } | UiEvent::TabLeft | UiEvent::TabRight => {
                if self.last_device == Device::Mouse {
                    self.last_device = Device::Keyboard;
                }
            }
            _ => {}
        }
    }
}

/// Shared state every menu and control operation runs against.
#[derive(Debug)]
pub struct UiContext {
    pub events: EventQueue,
    pub scripts: ScriptPool,
    pub input: InputState,
    pub screen: ScreenSettings,
}

impl UiContext {
    pub fn new<H: ScriptHost + 'static>(host: H) -> Self {
        Self::with_pool(ScriptPool::new(host))
    }

    pub fn with_pool(scripts: ScriptPool) -> Self {
        Self {
            events: EventQueue::new(),
            scripts,
            input: InputState::default(),
            screen: ScreenSettings::default(),
        }
    }

    pub fn with_screen(mut self, screen: ScreenSettings) -> Self {
        self.screen = screen;
        self
    }
}
