use std::collections::BTreeMap;

use glam::{Mat4, Vec2};
use serde::{Deserialize, Serialize};

use crate::context::UiContext;
use crate::document::SpriteDef;
use crate::error::UiError;
use crate::geometry::Transform2D;
use crate::render::{DrawCommand, RenderTarget};
use crate::script::{ScriptArg, ScriptComponent, ScriptPool};

/// Script slots a sprite can bind. The display keys follow the owning
/// control's state; the transition keys follow the owning menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteScript {
    TransIn,
    TransOut,
    Disabled,
    Inactive,
    Active,
    Selected,
}

impl SpriteScript {
    pub fn is_transition(self) -> bool {
        matches!(self, SpriteScript::TransIn | SpriteScript::TransOut)
    }

    /// Keys that snap the sprite to its look in the same frame.
    pub fn is_immediate(self) -> bool {
        matches!(self, SpriteScript::Disabled | SpriteScript::Inactive)
    }
}

/// Visual element owned by a control.
#[derive(Debug)]
pub struct MenuSprite {
    object: String,
    size: Vec2,
    transform: Transform2D,
    world: Mat4,
    font: Option<String>,
    text: Option<String>,
    scripts: BTreeMap<SpriteScript, String>,
    display: ScriptComponent,
    transition: ScriptComponent,
}

impl MenuSprite {
    pub fn from_def(def: &SpriteDef) -> Self {
        Self {
            object: def.object.clone(),
            size: Vec2::from(def.size),
            transform: def.transform,
            world: Mat4::IDENTITY,
            font: def.font.clone(),
            text: None,
            scripts: def.scripts.clone(),
            display: ScriptComponent::new(),
            transition: ScriptComponent::new(),
        }
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn is_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn font(&self) -> Option<&str> {
        self.font.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    pub fn script_component(&self, key: SpriteScript) -> &ScriptComponent {
        if key.is_transition() {
            &self.transition
        } else {
            &self.display
        }
    }

    pub fn is_animating(&self) -> bool {
        self.display.is_active() || self.transition.is_active()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_active()
    }

    /// Starts the script bound to `key`, if any. Immediate keys run their
    /// first step before returning.
    pub fn prepare(&mut self, key: SpriteScript, owner: &str, cx: &mut UiContext) -> Result<(), UiError> {
        let Some(function) = self.scripts.get(&key) else {
            return Ok(());
        };
        let args = [ScriptArg::from(owner), ScriptArg::from(self.object.as_str())];
        let component = if key.is_transition() {
            &mut self.transition
        } else {
            &mut self.display
        };
        component.prepare(&mut cx.scripts, function, &args)?;
        if key.is_immediate() {
            component.update(&mut cx.scripts, &mut cx.events)?;
        }
        Ok(())
    }

    pub fn update(&mut self, cx: &mut UiContext) -> Result<(), UiError> {
        self.display.update(&mut cx.scripts, &mut cx.events)?;
        self.transition.update(&mut cx.scripts, &mut cx.events)?;
        Ok(())
    }

    pub fn recycle(&mut self, pool: &mut ScriptPool) {
        self.display.reset_and_recycle(pool);
        self.transition.reset_and_recycle(pool);
    }

    pub fn transform(&mut self, parent: &Mat4) {
        self.world = *parent * self.transform.matrix();
    }

    pub fn render(&self, control: &str, target: &mut dyn RenderTarget) {
        target.draw(DrawCommand {
            control,
            object: &self.object,
            text: self.text.as_deref(),
            matrix: &self.world,
        });
    }
}
