use std::time::Duration;

use crate::context::UiContext;
use crate::control::{Control, ControlIds};
use crate::document::MenuDocument;
use crate::error::UiError;
use crate::events::{Direction, UiEvent};
use crate::geometry::ScreenSettings;
use crate::input::ScrollRepeater;
use crate::menu::{Menu, MenuRegistry};
use crate::render::RenderTarget;
use crate::script::ScriptPool;
use crate::tree::{MenuTree, TreeState};

/// Upper bound on deliveries in one pump. Menus that keep answering their
/// own events would otherwise spin forever.
pub const MAX_EVENTS_PER_PUMP: usize = 1024;

#[derive(Debug)]
struct Overlay {
    tree: MenuTree,
    menus: MenuRegistry,
}

/// A loaded document with its trees, menus and shared context, driven one
/// frame at a time.
#[derive(Debug)]
pub struct MenuSystem {
    menus: MenuRegistry,
    tree: MenuTree,
    overlay: Option<Overlay>,
    cx: UiContext,
    repeater: ScrollRepeater,
    frame: u64,
    quit_requested: bool,
}

impl MenuSystem {
    pub fn from_document(
        document: &MenuDocument,
        scripts: ScriptPool,
        screen: ScreenSettings,
    ) -> Result<Self, UiError> {
        let mut ids = ControlIds::new();
        let menus = MenuRegistry::from_defs(&document.tree.menus, &mut ids, &scripts)?;
        let tree = MenuTree::new(
            document.tree.root_menu.clone(),
            document.tree.default_menu.clone(),
        );
        tree.validate(&menus)?;

        let overlay = match &document.interface {
            Some(def) => {
                let menus = MenuRegistry::from_defs(&def.menus, &mut ids, &scripts)?;
                let tree = MenuTree::interface(def.root_menu.clone(), def.default_menu.clone());
                tree.validate(&menus)?;
                Some(Overlay { tree, menus })
            }
            None => None,
        };

        Ok(Self {
            menus,
            tree,
            overlay,
            cx: UiContext::with_pool(scripts).with_screen(screen),
            repeater: ScrollRepeater::new(),
            frame: 0,
            quit_requested: false,
        })
    }

    pub fn init(&mut self) -> Result<(), UiError> {
        self.tree.init(&mut self.menus, &mut self.cx)?;
        if let Some(overlay) = &mut self.overlay {
            overlay.tree.init(&mut overlay.menus, &mut self.cx)?;
        }
        self.transform()
    }

    pub fn menus(&self) -> &MenuRegistry {
        &self.menus
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn interface_tree(&self) -> Option<&MenuTree> {
        self.overlay.as_ref().map(|overlay| &overlay.tree)
    }

    pub fn interface_menus(&self) -> Option<&MenuRegistry> {
        self.overlay.as_ref().map(|overlay| &overlay.menus)
    }

    pub fn context(&self) -> &UiContext {
        &self.cx
    }

    pub fn context_mut(&mut self) -> &mut UiContext {
        &mut self.cx
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Set once a `Quit` message has been delivered.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn active_menu(&self) -> Result<&Menu, UiError> {
        self.tree.active_menu(&self.menus)
    }

    pub fn find_control_mut(&mut self, menu: &str, control: &str) -> Result<&mut Control, UiError> {
        self.menus
            .get_mut(menu)?
            .find_control_mut(control)
            .ok_or_else(|| UiError::UnknownNavTarget {
                owner: menu.to_string(),
                target: control.to_string(),
            })
    }

    /// Queues an input event, noting which device produced it.
    pub fn post(&mut self, event: UiEvent) {
        self.cx.input.observe(&event);
        self.cx.events.dispatch(event);
    }

    /// Starts holding a direction: one navigation step now, repeats later.
    pub fn hold(&mut self, direction: Direction) {
        self.repeater.press(direction);
        self.post(UiEvent::Navigate { direction });
    }

    pub fn release(&mut self, direction: Direction) {
        self.repeater.release(direction);
    }

    /// Delivers queued events until the bus is empty. Returns the number of
    /// deliveries.
    pub fn pump(&mut self) -> Result<usize, UiError> {
        let mut delivered = 0;
        while let Some(event) = self.cx.events.next() {
            delivered += 1;
            if delivered > MAX_EVENTS_PER_PUMP {
                return Err(UiError::EventOverflow(MAX_EVENTS_PER_PUMP));
            }
            log::trace!("deliver {event:?}");
            if event == UiEvent::Quit {
                self.quit_requested = true;
            }

            let overlay_live = !self.tree.is_active() && self.tree.state() == TreeState::Idle;
            self.tree.handle_event(&event, &mut self.menus, &mut self.cx)?;
            if overlay_live {
                if let Some(overlay) = &mut self.overlay {
                    overlay
                        .tree
                        .handle_event(&event, &mut overlay.menus, &mut self.cx)?;
                }
            }
        }
        Ok(delivered)
    }

    pub fn update(&mut self) -> Result<(), UiError> {
        self.tree.update(&mut self.menus, &mut self.cx)?;
        if let Some(overlay) = &mut self.overlay {
            overlay.tree.update(&mut overlay.menus, &mut self.cx)?;
        }
        Ok(())
    }

    pub fn transform(&mut self) -> Result<(), UiError> {
        let screen = self.cx.screen;
        self.tree.transform(&mut self.menus, &screen)?;
        if let Some(overlay) = &mut self.overlay {
            overlay.tree.transform(&mut overlay.menus, &screen)?;
        }
        Ok(())
    }

    /// Draws the overlay first so open menus sit on top of it.
    pub fn render(&self, target: &mut dyn RenderTarget) -> Result<(), UiError> {
        if let Some(overlay) = &self.overlay {
            overlay.tree.render(&overlay.menus, target)?;
        }
        self.tree.render(&self.menus, target)
    }

    /// One frame: key repeat, event delivery, script update, transform and
    /// render.
    pub fn frame_step(&mut self, dt: Duration, target: &mut dyn RenderTarget) -> Result<(), UiError> {
        let repeat = {
            let param = self
                .repeater
                .held()
                .and_then(|direction| self.tree.scroll_param(direction, &self.menus).ok().flatten());
            self.repeater.advance(dt, param)
        };
        if let Some(event) = repeat {
            self.post(event);
        }

        self.pump()?;
        self.update()?;
        self.pump()?;
        self.transform()?;
        self.render(target)?;
        self.frame += 1;
        Ok(())
    }
}
