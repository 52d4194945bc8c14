//! Menu navigation core: a stack of menus with animated transitions, controls
//! with a small focus/selection state machine, composite controls with a
//! directional navigation graph and a pool of cooperative script slots.
//!
//! Everything runs on one thread, one frame at a time. Input and internal
//! notifications travel as [`UiEvent`]s over a single [`EventQueue`]; nothing
//! calls across menus or controls directly.

pub mod context;
pub mod control;
pub mod document;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod menu;
pub mod render;
pub mod script;
pub mod sprite;
pub mod system;
pub mod tree;

pub use context::{InputState, UiContext};
pub use control::{
    ActionType, Composite, Control, ControlId, ControlIds, ControlInfo, ControlKind, ControlState,
    NavGraph, ScrollParam, SmartGui,
};
pub use document::MenuDocument;
pub use error::UiError;
pub use events::{
    ActionPress, ActiveControlChoice, Device, Direction, EventQueue, TransitionPhase, UiEvent,
};
pub use geometry::ScreenSettings;
pub use input::ScrollRepeater;
pub use menu::{Menu, MenuPhase, MenuRegistry, MenuUnit};
pub use render::{DrawCommand, DrawRecord, RecordingRenderer, RenderTarget};
pub use script::{LuaScriptHost, NativeScriptHost, ScriptHost, ScriptPool};
pub use system::MenuSystem;
pub use tree::{MenuTree, TreeState};
