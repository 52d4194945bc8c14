//! Declarative menu description, loaded from JSON.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::control::{ActionType, ControlState};
use crate::error::UiError;
use crate::events::Direction;
use crate::geometry::Transform2D;
use crate::sprite::SpriteScript;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuDocument {
    #[serde(flatten)]
    pub tree: TreeDef,
    /// Optional overlay tree (HUD, pause prompt) with its own menus.
    #[serde(default)]
    pub interface: Option<TreeDef>,
}

impl MenuDocument {
    pub fn from_json(text: &str) -> Result<Self, UiError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, UiError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeDef {
    #[serde(default)]
    pub root_menu: Option<String>,
    #[serde(default)]
    pub default_menu: Option<String>,
    #[serde(default)]
    pub menus: Vec<MenuDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuDef {
    pub name: String,
    #[serde(default)]
    pub controls: Vec<ControlDef>,
    #[serde(default)]
    pub scroll: Option<ScrollDef>,
    #[serde(default)]
    pub transform: Transform2D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKindDef {
    #[default]
    Button,
    Label,
}

fn inactive() -> ControlState {
    ControlState::Inactive
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: ControlKindDef,
    #[serde(default = "inactive")]
    pub default_state: ControlState,
    #[serde(default)]
    pub mouse_select_down: bool,
    #[serde(default)]
    pub action: ActionDef,
    #[serde(default)]
    pub state_script: StateScriptDef,
    #[serde(default)]
    pub scroll: Option<ScrollDef>,
    #[serde(default)]
    pub size_modifier: [f32; 2],
    #[serde(default)]
    pub transform: Transform2D,
    #[serde(default)]
    pub sprites: Vec<SpriteDef>,
    #[serde(default)]
    pub strings: Vec<String>,
    #[serde(default)]
    pub navigate: NavigateDef,
    #[serde(default)]
    pub sub_controls: Option<SubControlsDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionDef {
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default)]
    pub execution_action: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateScriptDef {
    #[serde(default)]
    pub on_active: Option<String>,
    #[serde(default)]
    pub on_select: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrollDef {
    #[serde(default)]
    pub start_delay: u32,
    #[serde(default)]
    pub scroll_delay: u32,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateDef {
    #[serde(default)]
    pub up: Option<String>,
    #[serde(default)]
    pub down: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
}

impl NavigateDef {
    pub fn target(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Up => self.up.as_deref(),
            Direction::Down => self.down.as_deref(),
            Direction::Left => self.left.as_deref(),
            Direction::Right => self.right.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubControlsDef {
    #[serde(default)]
    pub responds_to_select_msg: bool,
    #[serde(default)]
    pub controls: Vec<ControlDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteDef {
    pub object: String,
    #[serde(default)]
    pub size: [f32; 2],
    #[serde(default)]
    pub transform: Transform2D,
    /// Font name; marks the sprite as a text sprite.
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub scripts: BTreeMap<SpriteScript, String>,
}
