use std::collections::BTreeMap;

use glam::{Mat4, Vec2};

use crate::context::UiContext;
use crate::control::{
    ActionType, Control, ControlId, ControlIds, ControlState, NavGraph, ScrollParam,
};
use crate::document::{MenuDef, NavigateDef};
use crate::error::UiError;
use crate::events::{ActiveControlChoice, Direction, TransitionPhase, UiEvent};
use crate::geometry::{ScreenSettings, Transform2D};
use crate::render::RenderTarget;
use crate::script::ScriptPool;

/// What a [`MenuTree`](crate::tree::MenuTree) needs from the menus it stacks.
pub trait MenuUnit {
    fn name(&self) -> &str;
    fn update(&mut self, cx: &mut UiContext) -> Result<(), UiError>;
    fn transform(&mut self, screen: &ScreenSettings);
    fn render(&self, target: &mut dyn RenderTarget);
    fn handle_event(&mut self, event: &UiEvent, cx: &mut UiContext) -> Result<(), UiError>;
    /// Full reset when the menu is popped off the path.
    fn reset(&mut self, cx: &mut UiContext);
    /// Shows the menu without a transition (the root on init).
    fn activate(&mut self, cx: &mut UiContext) -> Result<(), UiError>;
    fn scroll_param(&self, direction: Direction) -> Option<&ScrollParam>;
    fn active_control(&self) -> Result<&Control, UiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuPhase {
    #[default]
    Idle,
    TransitionIn,
    TransitionOut,
}

/// Menu built from a [`MenuDef`]. Completes its own transitions once no
/// control has a transition script pending, and fires `SelectExecute` once
/// a selected control has finished animating.
#[derive(Debug)]
pub struct Menu {
    name: String,
    controls: Vec<Control>,
    nav: NavGraph,
    active: Option<usize>,
    scroll: ScrollParam,
    transform: Transform2D,
    phase: MenuPhase,
    pending_select: Option<ControlId>,
    visible: bool,
}

impl Menu {
    pub fn from_def(def: &MenuDef, ids: &mut ControlIds, scripts: &ScriptPool) -> Result<Self, UiError> {
        let controls = def
            .controls
            .iter()
            .map(|control| Control::from_def(control, ids, scripts))
            .collect::<Result<Vec<_>, _>>()?;
        let names: Vec<&str> = controls.iter().map(Control::name).collect();
        let links: Vec<&NavigateDef> = def.controls.iter().map(|control| &control.navigate).collect();
        let nav = NavGraph::resolve(&def.name, &names, &links)?;

        Ok(Self {
            name: def.name.clone(),
            controls,
            nav,
            active: None,
            scroll: def.scroll.as_ref().map(ScrollParam::from_def).unwrap_or_default(),
            transform: def.transform,
            phase: MenuPhase::Idle,
            pending_select: None,
            visible: false,
        })
    }

    /// Fails when a `to_menu` action names a menu missing from `menus` or a
    /// `change_focus` action names a control this menu does not have.
    pub fn validate_actions(&self, menus: &MenuRegistry) -> Result<(), UiError> {
        let mut pending: Vec<&Control> = self.controls.iter().collect();
        while let Some(control) = pending.pop() {
            let target = control.execution_action();
            match control.action_type() {
                ActionType::ToMenu if !menus.contains(target) => {
                    return Err(UiError::UnknownMenu(target.to_string()));
                }
                ActionType::ChangeFocus if self.find_control(target).is_none() => {
                    return Err(UiError::UnknownNavTarget {
                        owner: self.name.clone(),
                        target: target.to_string(),
                    });
                }
                _ => {}
            }
            if let Some(composite) = control.composite() {
                pending.extend(composite.children());
            }
        }
        Ok(())
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn phase(&self) -> MenuPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn find_control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find_map(|control| control.find_control(name))
    }

    pub fn find_control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls
            .iter_mut()
            .find_map(|control| control.find_control_mut(name))
    }

    pub fn find_control_by_id(&self, id: ControlId) -> Option<&Control> {
        self.controls
            .iter()
            .find_map(|control| control.find_control_by_id(id))
    }

    fn top_level_index(&self, id: ControlId) -> Option<usize> {
        self.controls.iter().position(|control| control.contains(id))
    }

    fn is_transitioning(&self) -> bool {
        self.controls.iter().any(Control::is_transitioning)
    }

    fn activate_first(&mut self, cx: &mut UiContext) -> Result<(), UiError> {
        let mut found = None;
        for (index, control) in self.controls.iter_mut().enumerate() {
            if found.is_none() && control.activate_first_inactive_control(cx)? {
                found = Some(index);
            } else {
                control.deactivate_control(cx)?;
            }
        }
        self.active = found;
        Ok(())
    }

    fn navigate(&mut self, direction: Direction, cx: &mut UiContext) -> Result<(), UiError> {
        let Some(from) = self.active else {
            // Nothing focused yet (pointer user switching to keys).
            return self.activate_first(cx);
        };
        let controls = &self.controls;
        if let Some(next) = self
            .nav
            .walk(from, direction, |index| !controls[index].is_focusable())
        {
            cx.events.dispatch(UiEvent::StateChange {
                target: controls[next].id(),
                state: ControlState::Active,
            });
        }
        Ok(())
    }
}

impl MenuUnit for Menu {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, cx: &mut UiContext) -> Result<(), UiError> {
        for control in &mut self.controls {
            control.update(cx)?;
        }

        match self.phase {
            MenuPhase::TransitionIn if !self.is_transitioning() => {
                self.phase = MenuPhase::Idle;
                cx.events.dispatch(UiEvent::TransitionIn {
                    phase: TransitionPhase::End,
                });
            }
            MenuPhase::TransitionOut if !self.is_transitioning() => {
                self.phase = MenuPhase::Idle;
                self.visible = false;
                cx.events.dispatch(UiEvent::TransitionOut {
                    phase: TransitionPhase::End,
                });
            }
            _ => {}
        }

        if let Some(target) = self.pending_select {
            let settled = self
                .find_control_by_id(target)
                .map_or(true, |control| !control.is_animating());
            if settled {
                self.pending_select = None;
                cx.events.dispatch(UiEvent::SelectExecute);
            }
        }
        Ok(())
    }

    fn transform(&mut self, screen: &ScreenSettings) {
        let world: Mat4 = self.transform.matrix();
        for control in &mut self.controls {
            control.transform(&world, screen);
        }
    }

    fn render(&self, target: &mut dyn RenderTarget) {
        if !self.visible {
            return;
        }
        for control in &self.controls {
            control.render(target);
        }
    }

    fn handle_event(&mut self, event: &UiEvent, cx: &mut UiContext) -> Result<(), UiError> {
        match event {
            UiEvent::TransitionIn {
                phase: TransitionPhase::Begin,
            } => {
                self.phase = MenuPhase::TransitionIn;
                self.visible = true;
            }
            UiEvent::TransitionOut {
                phase: TransitionPhase::Begin,
            } => {
                self.phase = MenuPhase::TransitionOut;
                self.pending_select = None;
            }
            _ => {}
        }

        let mut moved = false;
        for control in &mut self.controls {
            moved |= control.handle_event(event, cx)?;
        }

        let idle = self.phase == MenuPhase::Idle;
        match event {
            UiEvent::PointerMove { x, y } if idle => {
                let point = Vec2::new(*x, *y);
                for control in &mut self.controls {
                    if control.handle_pointer_move(point, cx)? {
                        break;
                    }
                }
            }
            UiEvent::Select {
                device,
                press,
                position,
            } if idle => {
                let point = position.map(Vec2::from).unwrap_or(cx.input.pointer);
                for control in &mut self.controls {
                    if control.handle_select_action(*device, *press, point, cx) {
                        break;
                    }
                }
            }
            UiEvent::Navigate { direction } | UiEvent::Scroll { direction } if idle && !moved => {
                self.navigate(*direction, cx)?;
            }
            UiEvent::StateChange { target, state } => {
                if let Some(index) = self.top_level_index(*target) {
                    if *state >= ControlState::Active && self.controls[index].is_focusable() {
                        self.active = Some(index);
                    }
                    if *state == ControlState::Selected {
                        self.pending_select = Some(*target);
                    }
                }
            }
            UiEvent::SetActiveControl { choice } => match choice {
                ActiveControlChoice::First => self.activate_first(cx)?,
                ActiveControlChoice::Last => {
                    self.active = self
                        .controls
                        .iter()
                        .position(|control| control.state() >= ControlState::Active);
                }
            },
            UiEvent::ChangeFocus { control } => {
                let target = self
                    .find_control(control)
                    .map(Control::id)
                    .ok_or_else(|| UiError::UnknownNavTarget {
                        owner: self.name.clone(),
                        target: control.clone(),
                    })?;
                cx.events.dispatch(UiEvent::StateChange {
                    target,
                    state: ControlState::Active,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn reset(&mut self, cx: &mut UiContext) {
        for control in &mut self.controls {
            control.reset(true);
            control.recycle_all(&mut cx.scripts);
        }
        self.phase = MenuPhase::Idle;
        self.pending_select = None;
        self.active = None;
        self.visible = false;
    }

    fn activate(&mut self, cx: &mut UiContext) -> Result<(), UiError> {
        self.visible = true;
        self.phase = MenuPhase::Idle;
        if cx.input.last_device_was_pointer() {
            for control in &mut self.controls {
                control.deactivate_control(cx)?;
            }
            self.active = None;
            Ok(())
        } else {
            self.activate_first(cx)
        }
    }

    fn scroll_param(&self, direction: Direction) -> Option<&ScrollParam> {
        if let Some(control) = self.active.and_then(|index| self.controls.get(index)) {
            for candidate in [control.focused_leaf(), control] {
                if candidate.scroll_param().allows(direction) {
                    return Some(candidate.scroll_param());
                }
            }
        }
        self.scroll.allows(direction).then_some(&self.scroll)
    }

    fn active_control(&self) -> Result<&Control, UiError> {
        self.active
            .and_then(|index| self.controls.get(index))
            .filter(|control| control.state() >= ControlState::Active)
            .map(Control::focused_leaf)
            .ok_or_else(|| UiError::NoActiveControl(self.name.clone()))
    }
}

/// Menus by name. Trees refer to menus by name only.
#[derive(Debug)]
pub struct MenuRegistry<M = Menu> {
    menus: BTreeMap<String, M>,
}

impl<M> Default for MenuRegistry<M> {
    fn default() -> Self {
        Self {
            menus: BTreeMap::new(),
        }
    }
}

impl<M: MenuUnit> MenuRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, menu: M) -> Result<(), UiError> {
        let name = menu.name().to_string();
        if self.menus.contains_key(&name) {
            return Err(UiError::DuplicateMenu(name));
        }
        self.menus.insert(name, menu);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.menus.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&M, UiError> {
        self.menus
            .get(name)
            .ok_or_else(|| UiError::UnknownMenu(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut M, UiError> {
        self.menus
            .get_mut(name)
            .ok_or_else(|| UiError::UnknownMenu(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.menus.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

impl MenuRegistry<Menu> {
    pub fn from_defs(
        defs: &[MenuDef],
        ids: &mut ControlIds,
        scripts: &ScriptPool,
    ) -> Result<Self, UiError> {
        let mut registry = Self::new();
        for def in defs {
            registry.insert(Menu::from_def(def, ids, scripts)?)?;
        }
        for menu in registry.menus.values() {
            menu.validate_actions(&registry)?;
        }
        log::debug!("loaded {} menus", registry.len());
        Ok(registry)
    }
}
