//! Interactive menu elements.
//!
//! A [`Control`] owns its sprites, its script hooks and, for composites, its
//! children. Controls never change each other's state directly: focus and
//! selection travel as [`UiEvent::StateChange`] messages so that every sibling
//! observes them in the same pass and deactivates itself when the message is
//! aimed elsewhere.

mod composite;
mod scroll;
mod smart;

use std::collections::BTreeMap;
use std::fmt;

use glam::{Mat4, Vec2};
use serde::{Deserialize, Serialize};

pub use composite::{Composite, NavGraph};
pub use scroll::ScrollParam;
pub use smart::{ExecutionCallback, SmartGui};

use crate::context::UiContext;
use crate::document::{ControlDef, ControlKindDef};
use crate::error::UiError;
use crate::events::{ActionPress, ActiveControlChoice, Device, TransitionPhase, UiEvent};
use crate::geometry::{screen_collision, Quad, ScreenSettings, Transform2D};
use crate::render::RenderTarget;
use crate::script::{ScriptArg, ScriptComponent, ScriptPool};
use crate::sprite::{MenuSprite, SpriteScript};

/// Identity of a control within one loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(pub u32);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sequential id source shared by every control built from one document.
#[derive(Debug, Default)]
pub struct ControlIds {
    next: u32,
}

impl ControlIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ControlId {
        let id = ControlId(self.next);
        self.next += 1;
        id
    }
}

/// Ordered so that "above inactive" means active or selected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    #[default]
    Null,
    Disabled,
    Inactive,
    Active,
    Selected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    #[serde(rename = "none")]
    NoAction,
    /// Free-form action handled by an attached behaviour or callback.
    Action,
    ToMenu,
    Back,
    Close,
    ChangeFocus,
    BackToMainMenu,
    StateChange,
    QuitGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlScript {
    OnActive,
    OnSelected,
}

/// Snapshot handed to smart behaviours and execution callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlInfo {
    pub id: ControlId,
    pub name: String,
    pub state: ControlState,
    pub action_type: ActionType,
    pub execution_action: String,
}

#[derive(Debug)]
pub enum ControlKind {
    /// Static text or art; never takes focus.
    Label,
    Button,
    Composite(Composite),
}

pub struct Control {
    id: ControlId,
    name: String,
    kind: ControlKind,
    state: ControlState,
    last_state: ControlState,
    default_state: ControlState,
    action_type: ActionType,
    execution_action: String,
    mouse_select: ActionPress,
    hooks: BTreeMap<ControlScript, String>,
    scripts: ScriptComponent,
    scroll: ScrollParam,
    size: Vec2,
    size_modifier: Vec2,
    transform: Transform2D,
    world: Mat4,
    collision: Option<Quad>,
    collision_center: Vec2,
    sprites: Vec<MenuSprite>,
    strings: Vec<String>,
    smart: Option<Box<dyn SmartGui>>,
    callbacks: Vec<ExecutionCallback>,
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("last_state", &self.last_state)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Control {
    /// Builds a control (and any children) from its declaration. Script
    /// names are checked against the pool's host so a typo fails at load.
    pub fn from_def(
        def: &ControlDef,
        ids: &mut ControlIds,
        scripts: &ScriptPool,
    ) -> Result<Self, UiError> {
        let id = ids.allocate();

        let mut hooks = BTreeMap::new();
        if let Some(function) = &def.state_script.on_active {
            hooks.insert(ControlScript::OnActive, function.clone());
        }
        if let Some(function) = &def.state_script.on_select {
            hooks.insert(ControlScript::OnSelected, function.clone());
        }
        let sprite_functions = def.sprites.iter().flat_map(|sprite| sprite.scripts.values());
        for function in hooks.values().chain(sprite_functions) {
            if !scripts.has_function(function) {
                return Err(UiError::UnknownScriptFunction {
                    owner: def.name.clone(),
                    function: function.clone(),
                });
            }
        }

        let mut sprites = Vec::with_capacity(def.sprites.len());
        let mut size = Vec2::ZERO;
        let mut font_sprites = 0;
        for sprite_def in &def.sprites {
            let mut sprite = MenuSprite::from_def(sprite_def);
            if sprite.is_font() {
                if let Some(text) = def.strings.get(font_sprites) {
                    sprite.set_text(text.clone());
                }
                font_sprites += 1;
            } else {
                size = size.max(sprite.size());
            }
            sprites.push(sprite);
        }

        let kind = match (&def.sub_controls, def.kind) {
            (Some(sub), _) => ControlKind::Composite(Composite::from_def(&def.name, sub, ids, scripts)?),
            (None, ControlKindDef::Label) => ControlKind::Label,
            (None, ControlKindDef::Button) => ControlKind::Button,
        };

        Ok(Self {
            id,
            name: def.name.clone(),
            kind,
            state: def.default_state,
            last_state: ControlState::Null,
            default_state: def.default_state,
            action_type: def.action.action_type,
            execution_action: def.action.execution_action.clone().unwrap_or_default(),
            mouse_select: if def.mouse_select_down {
                ActionPress::Down
            } else {
                ActionPress::Up
            },
            hooks,
            scripts: ScriptComponent::new(),
            scroll: def.scroll.as_ref().map(ScrollParam::from_def).unwrap_or_default(),
            size,
            size_modifier: Vec2::from(def.size_modifier),
            transform: def.transform,
            world: Mat4::IDENTITY,
            collision: None,
            collision_center: Vec2::ZERO,
            sprites,
            strings: def.strings.clone(),
            smart: None,
            callbacks: Vec::new(),
        })
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    pub fn composite(&self) -> Option<&Composite> {
        match &self.kind {
            ControlKind::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn last_state(&self) -> ControlState {
        self.last_state
    }

    pub fn default_state(&self) -> ControlState {
        self.default_state
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn execution_action(&self) -> &str {
        &self.execution_action
    }

    pub fn is_active(&self) -> bool {
        self.state == ControlState::Active
    }

    pub fn is_selected(&self) -> bool {
        self.state == ControlState::Selected
    }

    pub fn is_disabled(&self) -> bool {
        self.state == ControlState::Disabled
    }

    /// Whether navigation may land on this control.
    pub fn is_focusable(&self) -> bool {
        !self.is_disabled() && !matches!(self.kind, ControlKind::Label)
    }

    pub fn scroll_param(&self) -> &ScrollParam {
        &self.scroll
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn collision(&self) -> Option<&Quad> {
        self.collision.as_ref()
    }

    pub fn collision_center(&self) -> Vec2 {
        self.collision_center
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    pub fn sprites(&self) -> &[MenuSprite] {
        &self.sprites
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn info(&self) -> ControlInfo {
        ControlInfo {
            id: self.id,
            name: self.name.clone(),
            state: self.state,
            action_type: self.action_type,
            execution_action: self.execution_action.clone(),
        }
    }

    /// True while any script owned by this control or its subtree is still
    /// pending.
    pub fn is_animating(&self) -> bool {
        self.scripts.is_active()
            || self.sprites.iter().any(MenuSprite::is_animating)
            || self.children().iter().any(Control::is_animating)
    }

    /// True while a transition-in or transition-out sprite script is pending.
    pub fn is_transitioning(&self) -> bool {
        self.sprites.iter().any(MenuSprite::is_transitioning)
            || self.children().iter().any(Control::is_transitioning)
    }

    fn children(&self) -> &[Control] {
        match &self.kind {
            ControlKind::Composite(composite) => &composite.children,
            _ => &[],
        }
    }

    pub fn set_smart_gui(&mut self, mut smart: Box<dyn SmartGui>) {
        smart.create(&self.info());
        self.smart = Some(smart);
    }

    pub fn connect_execution_action(&mut self, callback: ExecutionCallback) {
        self.callbacks.push(callback);
    }

    pub fn update(&mut self, cx: &mut UiContext) -> Result<(), UiError> {
        self.scripts.update(&mut cx.scripts, &mut cx.events)?;
        for sprite in &mut self.sprites {
            sprite.update(cx)?;
        }
        if let ControlKind::Composite(composite) = &mut self.kind {
            for child in &mut composite.children {
                child.update(cx)?;
            }
        }
        Ok(())
    }

    /// Recomputes the world matrix and the screen-space collision quad.
    pub fn transform(&mut self, parent: &Mat4, screen: &ScreenSettings) {
        self.world = *parent * self.transform.matrix();
        for sprite in &mut self.sprites {
            sprite.transform(&self.world);
        }

        if self.size.cmpgt(Vec2::ZERO).any() {
            let half_extents = (self.size + self.size_modifier) * 0.5;
            let (quad, center) = screen_collision(&self.world, half_extents, screen);
            self.collision = Some(quad);
            self.collision_center = center;
        }

        if let ControlKind::Composite(composite) = &mut self.kind {
            for child in &mut composite.children {
                child.transform(&self.world, screen);
            }
        }
    }

    pub fn render(&self, target: &mut dyn RenderTarget) {
        for sprite in &self.sprites {
            sprite.render(&self.name, target);
        }
        for child in self.children() {
            child.render(target);
        }
    }

    /// Routes a bus message through this control and, for composites, its
    /// children. Directional input moves focus inside an active composite
    /// once the children have seen it. Returns true when focus moved.
    pub fn handle_event(&mut self, event: &UiEvent, cx: &mut UiContext) -> Result<bool, UiError> {
        match event {
            UiEvent::StateChange { target, state } => self.on_state_change(*target, *state, cx)?,
            UiEvent::SelectExecute => self.on_select_execute(cx),
            UiEvent::SetActiveControl { choice } => self.on_set_active_control(*choice, cx)?,
            UiEvent::Reactivate => self.on_reactivate(cx)?,
            UiEvent::TransitionIn { phase } => self.on_transition_in(*phase, cx)?,
            UiEvent::TransitionOut { phase } => self.on_transition_out(*phase, cx)?,
            _ => {}
        }

        if self.smart.is_some() {
            let info = self.info();
            if let Some(smart) = self.smart.as_mut() {
                smart.handle_event(event, &info, &mut cx.events);
            }
        }

        let state = self.state;
        let ControlKind::Composite(composite) = &mut self.kind else {
            return Ok(false);
        };
        if state == ControlState::Disabled
            && matches!(event, UiEvent::StateChange { state, .. } if *state >= ControlState::Active)
        {
            return Ok(false);
        }
        let mut moved = false;
        for child in &mut composite.children {
            moved |= child.handle_event(event, cx)?;
        }
        if state == ControlState::Active && !moved {
            if let Some(direction) = event.directional() {
                moved = composite.navigate(direction, &mut cx.events);
            }
        }
        Ok(moved)
    }

    fn on_state_change(
        &mut self,
        target: ControlId,
        state: ControlState,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        let routed = match &self.kind {
            ControlKind::Composite(composite) if !composite.responds_to_select_msg => {
                Some(composite.locate(target))
            }
            _ => None,
        };

        match routed {
            None => self.apply_state_change(target, state, cx),
            Some(Some((index, child_state))) if state == ControlState::Active => {
                let focusable = match &self.kind {
                    ControlKind::Composite(composite) => composite.children[index].is_focusable(),
                    _ => false,
                };
                if self.is_disabled() || !focusable {
                    return Ok(());
                }
                // Light up the container when focus lands anywhere inside it.
                if child_state != state {
                    self.state = state;
                    self.last_state = state;
                    self.recycle_context(&mut cx.scripts);
                    self.set_display_state(cx)?;
                }
                if let ControlKind::Composite(composite) = &mut self.kind {
                    composite.set_active(Some(index));
                }
                Ok(())
            }
            Some(_) if state < ControlState::Selected => self.apply_state_change(target, state, cx),
            Some(_) => Ok(()),
        }
    }

    fn apply_state_change(
        &mut self,
        target: ControlId,
        state: ControlState,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        if target == self.id {
            self.change_state(state, cx)
        } else {
            self.deactivate_control(cx)
        }
    }

    fn on_select_execute(&mut self, cx: &mut UiContext) {
        if self.state != ControlState::Selected {
            return;
        }

        let message = match self.action_type {
            ActionType::ToMenu => Some(UiEvent::ToMenu {
                menu: self.execution_action.clone(),
            }),
            ActionType::Back => Some(UiEvent::Back),
            ActionType::Close => Some(UiEvent::Toggle),
            ActionType::ChangeFocus => Some(UiEvent::ChangeFocus {
                control: self.execution_action.clone(),
            }),
            ActionType::BackToMainMenu => Some(UiEvent::BackToMainMenu),
            ActionType::StateChange => Some(UiEvent::GameStateChange),
            ActionType::QuitGame => Some(UiEvent::Quit),
            ActionType::Action | ActionType::NoAction => None,
        };
        if let Some(message) = message {
            cx.events.dispatch(message);
        }

        let info = self.info();
        if let Some(smart) = self.smart.as_mut() {
            smart.execute(&info, &mut cx.events);
        }
        for callback in &mut self.callbacks {
            callback(&info);
        }

        if self.action_type == ActionType::Action {
            cx.events.dispatch(UiEvent::Reactivate);
        }
    }

    fn on_set_active_control(
        &mut self,
        choice: ActiveControlChoice,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        if choice == ActiveControlChoice::Last && self.last_state > ControlState::Inactive {
            self.force_active(cx)?;
        }
        Ok(())
    }

    fn on_reactivate(&mut self, cx: &mut UiContext) -> Result<(), UiError> {
        if self.state > ControlState::Inactive {
            self.force_active(cx)?;
        }
        Ok(())
    }

    fn force_active(&mut self, cx: &mut UiContext) -> Result<(), UiError> {
        self.state = ControlState::Active;
        self.last_state = ControlState::Active;
        self.recycle_context(&mut cx.scripts);
        self.set_display_state(cx)
    }

    fn on_transition_in(&mut self, phase: TransitionPhase, cx: &mut UiContext) -> Result<(), UiError> {
        if phase != TransitionPhase::Begin {
            return Ok(());
        }
        if self.last_state != self.state {
            self.set_display_state(cx)?;
        }
        self.prepare_sprite_script(SpriteScript::TransIn, cx)?;

        if self.smart.is_some() {
            let info = self.info();
            if let Some(smart) = self.smart.as_mut() {
                smart.display(&info, &mut cx.events);
            }
        }
        Ok(())
    }

    fn on_transition_out(&mut self, phase: TransitionPhase, cx: &mut UiContext) -> Result<(), UiError> {
        if phase != TransitionPhase::Begin {
            return Ok(());
        }
        self.reset(false);
        self.recycle_context(&mut cx.scripts);
        if self.last_state != self.state {
            self.set_display_state(cx)?;
        }
        self.prepare_sprite_script(SpriteScript::TransOut, cx)
    }

    /// Moves to `state`, runs the matching hook and refreshes the display.
    /// A disabled control refuses focus and selection.
    pub fn change_state(&mut self, state: ControlState, cx: &mut UiContext) -> Result<(), UiError> {
        if self.state == state {
            return Ok(());
        }
        if self.is_disabled() && state >= ControlState::Active {
            log::debug!("{} is disabled, ignoring {state:?}", self.name);
            return Ok(());
        }

        self.state = state;
        match state {
            ControlState::Active => self.prepare_control_script(ControlScript::OnActive, cx)?,
            ControlState::Selected => self.prepare_control_script(ControlScript::OnSelected, cx)?,
            _ => {}
        }
        self.recycle_context(&mut cx.scripts);
        self.set_display_state(cx)?;
        self.last_state = self.state;
        Ok(())
    }

    /// Gives this control focus. Returns false for disabled controls and
    /// labels.
    pub fn activate_control(&mut self, cx: &mut UiContext) -> Result<bool, UiError> {
        if !self.is_focusable() {
            return Ok(false);
        }
        self.force_active(cx)?;
        Ok(true)
    }

    /// Drops focus if this control (or, for composites, anything below it)
    /// was showing it.
    pub fn deactivate_control(&mut self, cx: &mut UiContext) -> Result<(), UiError> {
        if self.last_state == ControlState::Null || self.last_state > ControlState::Inactive {
            self.reset(false);
            self.recycle_context(&mut cx.scripts);
            self.set_display_state(cx)?;
            self.last_state = self.state;
        }
        if let ControlKind::Composite(composite) = &mut self.kind {
            for child in &mut composite.children {
                child.deactivate_control(cx)?;
            }
        }
        Ok(())
    }

    /// Activates this control and, for composites, the first child that can
    /// take focus. Every other child is deactivated.
    pub fn activate_first_inactive_control(&mut self, cx: &mut UiContext) -> Result<bool, UiError> {
        if !self.activate_control(cx)? {
            return Ok(false);
        }
        if let ControlKind::Composite(composite) = &mut self.kind {
            let mut found = None;
            for (index, child) in composite.children.iter_mut().enumerate() {
                if found.is_none() && child.activate_first_inactive_control(cx)? {
                    found = Some(index);
                } else {
                    child.deactivate_control(cx)?;
                }
            }
            composite.set_active(found);
        }
        Ok(true)
    }

    /// Drops active or selected back to inactive. Disabled is left alone.
    pub fn reset(&mut self, complete: bool) {
        if self.state > ControlState::Inactive {
            self.state = ControlState::Inactive;
        }
        if complete {
            self.last_state = self.state;
        }
        if let ControlKind::Composite(composite) = &mut self.kind {
            for child in &mut composite.children {
                child.reset(complete);
            }
        }
    }

    pub fn revert_to_default_state(&mut self) {
        self.state = self.default_state;
    }

    /// Returns every script slot held by this control and its subtree.
    pub fn recycle_all(&mut self, pool: &mut ScriptPool) {
        self.scripts.reset_and_recycle(pool);
        self.recycle_context(pool);
        if let ControlKind::Composite(composite) = &mut self.kind {
            for child in &mut composite.children {
                child.recycle_all(pool);
            }
        }
    }

    fn recycle_context(&mut self, pool: &mut ScriptPool) {
        for sprite in &mut self.sprites {
            sprite.recycle(pool);
        }
    }

    fn set_display_state(&mut self, cx: &mut UiContext) -> Result<(), UiError> {
        let key = match self.state {
            ControlState::Inactive => SpriteScript::Inactive,
            ControlState::Active => SpriteScript::Active,
            ControlState::Selected => SpriteScript::Selected,
            ControlState::Disabled | ControlState::Null => SpriteScript::Disabled,
        };
        self.prepare_sprite_script(key, cx)
    }

    fn prepare_sprite_script(&mut self, key: SpriteScript, cx: &mut UiContext) -> Result<(), UiError> {
        for sprite in &mut self.sprites {
            sprite.prepare(key, &self.name, cx)?;
        }
        Ok(())
    }

    fn prepare_control_script(&mut self, hook: ControlScript, cx: &mut UiContext) -> Result<(), UiError> {
        if let Some(function) = self.hooks.get(&hook) {
            self.scripts
                .prepare(&mut cx.scripts, function, &[ScriptArg::from(self.name.as_str())])?;
        }
        Ok(())
    }

    pub fn is_point_in_control(&self, point: Vec2) -> bool {
        self.collision.map_or(false, |quad| quad.contains(point))
    }

    /// Focuses the control under the pointer. Returns true when the pointer
    /// is over this control or one of its children.
    pub fn handle_pointer_move(&mut self, point: Vec2, cx: &mut UiContext) -> Result<bool, UiError> {
        if matches!(self.kind, ControlKind::Label) || self.is_disabled() {
            return Ok(false);
        }

        let hit = self.is_point_in_control(point);
        if hit && !self.is_active() {
            cx.events.dispatch(UiEvent::StateChange {
                target: self.id,
                state: ControlState::Active,
            });
        }

        let ControlKind::Composite(composite) = &mut self.kind else {
            return Ok(hit);
        };
        let mut found = false;
        for child in &mut composite.children {
            if child.handle_pointer_move(point, cx)? {
                found = true;
                break;
            }
        }
        if hit && !found {
            for child in &mut composite.children {
                child.deactivate_control(cx)?;
            }
        }
        Ok(hit || found)
    }

    /// Requests selection of the active control. Pointer presses must match
    /// the configured press phase and land inside the collision quad; other
    /// devices select on key down.
    pub fn handle_select_action(
        &mut self,
        device: Device,
        press: ActionPress,
        point: Vec2,
        cx: &mut UiContext,
    ) -> bool {
        match &mut self.kind {
            ControlKind::Label => return false,
            ControlKind::Composite(composite) if !composite.responds_to_select_msg => {
                return composite
                    .children
                    .iter_mut()
                    .any(|child| child.handle_select_action(device, press, point, cx));
            }
            _ => {}
        }

        if !self.is_active() {
            return false;
        }
        let triggered = match device {
            Device::Mouse => press == self.mouse_select && self.is_point_in_control(point),
            Device::Keyboard | Device::Gamepad => press == ActionPress::Down,
        };
        if triggered {
            cx.events.dispatch(UiEvent::StateChange {
                target: self.id,
                state: ControlState::Selected,
            });
        }
        triggered
    }

    pub fn find_control(&self, name: &str) -> Option<&Control> {
        if self.name == name {
            return Some(self);
        }
        self.find_sub_control(name)
    }

    pub fn find_sub_control(&self, name: &str) -> Option<&Control> {
        self.children()
            .iter()
            .find_map(|child| child.find_control(name))
    }

    pub fn find_control_mut(&mut self, name: &str) -> Option<&mut Control> {
        if self.name == name {
            return Some(self);
        }
        match &mut self.kind {
            ControlKind::Composite(composite) => composite
                .children
                .iter_mut()
                .find_map(|child| child.find_control_mut(name)),
            _ => None,
        }
    }

    pub fn find_control_by_id(&self, id: ControlId) -> Option<&Control> {
        if self.id == id {
            return Some(self);
        }
        self.children()
            .iter()
            .find_map(|child| child.find_control_by_id(id))
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.find_control_by_id(id).is_some()
    }

    /// The deepest focused control at or below this one.
    pub fn focused_leaf(&self) -> &Control {
        match &self.kind {
            ControlKind::Composite(composite) => composite
                .active_child()
                .filter(|child| child.state >= ControlState::Active)
                .map_or(self, Control::focused_leaf),
            _ => self,
        }
    }

    /// Puts `strings[string_index]` on the `sprite_index`-th text sprite.
    pub fn create_font_string(&mut self, string_index: usize, sprite_index: usize) -> bool {
        match self.strings.get(string_index).cloned() {
            Some(text) => self.set_font_string(text, sprite_index),
            None => false,
        }
    }

    pub fn set_font_string(&mut self, text: impl Into<String>, sprite_index: usize) -> bool {
        match self
            .sprites
            .iter_mut()
            .filter(|sprite| sprite.is_font())
            .nth(sprite_index)
        {
            Some(sprite) => {
                sprite.set_text(text.into());
                true
            }
            None => false,
        }
    }
}
