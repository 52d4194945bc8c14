//! Stack of open menus and the transition protocol between them.
//!
//! The tree never completes a transition on its own: it emits
//! `TransitionOut`/`TransitionIn` with [`TransitionPhase::Begin`] and waits
//! for the matching `End` to come back over the bus, usually raised by the
//! top menu once its transition scripts have finished.

use crate::context::UiContext;
use crate::control::ScrollParam;
use crate::error::UiError;
use crate::events::{ActiveControlChoice, Direction, TransitionPhase, UiEvent};
use crate::geometry::ScreenSettings;
use crate::menu::{MenuRegistry, MenuUnit};
use crate::render::RenderTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeState {
    /// Accepts navigation requests.
    #[default]
    Idle,
    /// A transition is in flight; only completion signals are handled.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Awaiting {
    Out,
    In,
}

#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    path: Vec<String>,
    root: Option<String>,
    default: Option<String>,
    pending_target: Option<String>,
    awaiting: Option<Awaiting>,
    interface: bool,
}

impl MenuTree {
    pub fn new(root: Option<String>, default: Option<String>) -> Self {
        Self {
            root,
            default,
            ..Self::default()
        }
    }

    /// Overlay tree (HUD and similar). It shows its root permanently and
    /// leaves menu navigation messages to the main tree.
    pub fn interface(root: Option<String>, default: Option<String>) -> Self {
        Self {
            interface: true,
            ..Self::new(root, default)
        }
    }

    /// Checks that the configured root and default menus exist.
    pub fn validate<M: MenuUnit>(&self, menus: &MenuRegistry<M>) -> Result<(), UiError> {
        for name in self.root.iter().chain(self.default.iter()) {
            if !menus.contains(name) {
                return Err(UiError::UnknownMenu(name.clone()));
            }
        }
        Ok(())
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn state(&self) -> TreeState {
        if self.awaiting.is_some() {
            TreeState::Active
        } else {
            TreeState::Idle
        }
    }

    pub fn pending_target(&self) -> Option<&str> {
        self.pending_target.as_deref()
    }

    pub fn is_interface(&self) -> bool {
        self.interface
    }

    /// True while a menu is displayed.
    pub fn is_active(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn has_root_menu(&self) -> bool {
        self.root.is_some()
    }

    pub fn root_menu(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn default_menu(&self) -> Option<&str> {
        self.default.as_deref()
    }

    fn top(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    fn top_is_root(&self) -> bool {
        self.top().is_some() && self.top() == self.root.as_deref()
    }

    /// Clears the path and shows the root menu, if any, without a transition.
    pub fn init<M: MenuUnit>(
        &mut self,
        menus: &mut MenuRegistry<M>,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        self.path.clear();
        self.pending_target = None;
        self.awaiting = None;
        if let Some(root) = self.root.clone() {
            menus.get_mut(&root)?.activate(cx)?;
            log::debug!("menu tree initialised with root {root}");
            self.path.push(root);
        }
        Ok(())
    }

    pub fn active_menu<'m, M: MenuUnit>(&self, menus: &'m MenuRegistry<M>) -> Result<&'m M, UiError> {
        let top = self.top().ok_or(UiError::NoActiveMenu)?;
        menus.get(top)
    }

    pub fn scroll_param<'m, M: MenuUnit>(
        &self,
        direction: Direction,
        menus: &'m MenuRegistry<M>,
    ) -> Result<Option<&'m ScrollParam>, UiError> {
        Ok(self.active_menu(menus)?.scroll_param(direction))
    }

    pub fn update<M: MenuUnit>(
        &self,
        menus: &mut MenuRegistry<M>,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        match self.top() {
            Some(top) => menus.get_mut(top)?.update(cx),
            None => Ok(()),
        }
    }

    pub fn transform<M: MenuUnit>(
        &self,
        menus: &mut MenuRegistry<M>,
        screen: &ScreenSettings,
    ) -> Result<(), UiError> {
        if let Some(top) = self.top() {
            menus.get_mut(top)?.transform(screen);
        }
        Ok(())
    }

    pub fn render<M: MenuUnit>(
        &self,
        menus: &MenuRegistry<M>,
        target: &mut dyn RenderTarget,
    ) -> Result<(), UiError> {
        if let Some(top) = self.top() {
            menus.get(top)?.render(target);
        }
        Ok(())
    }

    pub fn handle_event<M: MenuUnit>(
        &mut self,
        event: &UiEvent,
        menus: &mut MenuRegistry<M>,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        if let Some(top) = self.top() {
            if !(self.interface && event.is_menu_lifecycle()) {
                menus.get_mut(top)?.handle_event(event, cx)?;
            }
        }
        if self.interface {
            return Ok(());
        }

        match (self.awaiting, event) {
            (None, UiEvent::Escape) => self.request_transition(menus, cx),
            (None, UiEvent::Toggle) => self.on_toggle(menus, cx),
            (None, UiEvent::Back) => {
                if !self.path.is_empty() && !self.top_is_root() {
                    self.request_transition(menus, cx)?;
                }
                Ok(())
            }
            (None, UiEvent::ToMenu { menu }) => self.on_to_menu(menu, menus, cx),
            (
                Some(Awaiting::Out),
                UiEvent::TransitionOut {
                    phase: TransitionPhase::End,
                },
            ) => self.on_transition_out_end(menus, cx),
            (
                Some(Awaiting::In),
                UiEvent::TransitionIn {
                    phase: TransitionPhase::End,
                },
            ) => {
                self.on_transition_in_end(cx);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn request_transition<M: MenuUnit>(
        &mut self,
        menus: &MenuRegistry<M>,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        if self.path.is_empty() {
            let Some(default) = self.default.clone() else {
                log::debug!("no default menu to open");
                return Ok(());
            };
            menus.get(&default)?;
            self.path.push(default.clone());
            self.pending_target = Some(default);
            self.awaiting = Some(Awaiting::In);
            cx.events.dispatch(UiEvent::TransitionIn {
                phase: TransitionPhase::Begin,
            });
        } else if !self.top_is_root() {
            self.awaiting = Some(Awaiting::Out);
            cx.events.dispatch(UiEvent::TransitionOut {
                phase: TransitionPhase::Begin,
            });
        }
        Ok(())
    }

    fn on_toggle<M: MenuUnit>(
        &mut self,
        menus: &mut MenuRegistry<M>,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        let Some(root) = self.root.clone() else {
            self.request_transition(menus, cx)?;
            if self.path.len() > 1 {
                self.collapse_to(&[], menus, cx)?;
            }
            return Ok(());
        };

        if self.path.len() > 1 {
            self.request_transition(menus, cx)?;
            if self.path.len() > 2 {
                self.collapse_to(&[root], menus, cx)?;
            }
        } else if self.top_is_root() {
            // Opening from the root brings up the default menu over it.
            match self.default.clone() {
                Some(default) if default != root => self.on_to_menu(&default, menus, cx)?,
                _ => log::debug!("toggle at root {root} has no default menu to open"),
            }
        }
        Ok(())
    }

    /// Keeps `keep` followed by the current top, resetting every menu that
    /// is dropped in between.
    fn collapse_to<M: MenuUnit>(
        &mut self,
        keep: &[String],
        menus: &mut MenuRegistry<M>,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        let Some(top) = self.path.pop() else {
            return Ok(());
        };
        for name in self.path.drain(..) {
            if !keep.contains(&name) {
                menus.get_mut(&name)?.reset(cx);
            }
        }
        self.path.extend(keep.iter().cloned());
        self.path.push(top);
        Ok(())
    }

    fn on_to_menu<M: MenuUnit>(
        &mut self,
        name: &str,
        menus: &MenuRegistry<M>,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        menus.get(name)?;
        self.pending_target = Some(name.to_string());

        if self.path.is_empty() {
            self.path.push(name.to_string());
            self.awaiting = Some(Awaiting::In);
            cx.events.dispatch(UiEvent::TransitionIn {
                phase: TransitionPhase::Begin,
            });
        } else {
            self.awaiting = Some(Awaiting::Out);
            cx.events.dispatch(UiEvent::TransitionOut {
                phase: TransitionPhase::Begin,
            });
        }
        Ok(())
    }

    fn on_transition_out_end<M: MenuUnit>(
        &mut self,
        menus: &mut MenuRegistry<M>,
        cx: &mut UiContext,
    ) -> Result<(), UiError> {
        if let Some(target) = self.pending_target.clone() {
            match self.path.iter().position(|name| *name == target) {
                Some(index) => {
                    for name in self.path.drain(index + 1..) {
                        menus.get_mut(&name)?.reset(cx);
                    }
                }
                None => self.path.push(target),
            }
            self.begin_transition_in(cx);
            return Ok(());
        }

        if self.top_is_root() {
            self.awaiting = None;
            return Ok(());
        }
        if let Some(top) = self.path.pop() {
            menus.get_mut(&top)?.reset(cx);
            log::debug!("closed menu {top}");
        }
        if self.path.is_empty() {
            self.awaiting = None;
        } else {
            self.begin_transition_in(cx);
        }
        Ok(())
    }

    fn begin_transition_in(&mut self, cx: &mut UiContext) {
        self.awaiting = Some(Awaiting::In);
        cx.events.dispatch(UiEvent::TransitionIn {
            phase: TransitionPhase::Begin,
        });
    }

    fn on_transition_in_end(&mut self, cx: &mut UiContext) {
        if !cx.input.last_device_was_pointer() {
            let choice = if self.pending_target.is_some() {
                ActiveControlChoice::First
            } else {
                ActiveControlChoice::Last
            };
            cx.events.dispatch(UiEvent::SetActiveControl { choice });
        }
        self.pending_target = None;
        self.awaiting = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Control;
    use crate::events::Device;
    use crate::script::NativeScriptHost;

    /// Menu that only records what it was told.
    #[derive(Debug, Default)]
    struct StubMenu {
        name: String,
        events: Vec<UiEvent>,
        resets: usize,
        activations: usize,
    }

    impl MenuUnit for StubMenu {
        fn name(&self) -> &str {
            &self.name
        }
        fn update(&mut self, _cx: &mut UiContext) -> Result<(), UiError> {
            Ok(())
        }
        fn transform(&mut self, _screen: &ScreenSettings) {}
        fn render(&self, _target: &mut dyn RenderTarget) {}
        fn handle_event(&mut self, event: &UiEvent, _cx: &mut UiContext) -> Result<(), UiError> {
            self.events.push(event.clone());
            Ok(())
        }
        fn reset(&mut self, _cx: &mut UiContext) {
            self.resets += 1;
        }
        fn activate(&mut self, _cx: &mut UiContext) -> Result<(), UiError> {
            self.activations += 1;
            Ok(())
        }
        fn scroll_param(&self, _direction: Direction) -> Option<&ScrollParam> {
            None
        }
        fn active_control(&self) -> Result<&Control, UiError> {
            Err(UiError::NoActiveControl(self.name.clone()))
        }
    }

    fn registry(names: &[&str]) -> MenuRegistry<StubMenu> {
        let mut menus = MenuRegistry::new();
        for name in names {
            menus
                .insert(StubMenu {
                    name: name.to_string(),
                    ..StubMenu::default()
                })
                .expect("insert");
        }
        menus
    }

    fn context() -> UiContext {
        UiContext::new(NativeScriptHost::new())
    }

    fn send(tree: &mut MenuTree, menus: &mut MenuRegistry<StubMenu>, cx: &mut UiContext, event: UiEvent) {
        tree.handle_event(&event, menus, cx).expect("handle event");
    }

    /// Delivers queued events, answering every transition begin with its end.
    fn settle(tree: &mut MenuTree, menus: &mut MenuRegistry<StubMenu>, cx: &mut UiContext) {
        let mut guard = 0;
        while let Some(event) = cx.events.next() {
            guard += 1;
            assert!(guard < 100, "transition protocol did not settle");
            tree.handle_event(&event, menus, cx).expect("handle event");
            match event {
                UiEvent::TransitionIn {
                    phase: TransitionPhase::Begin,
                } => cx.events.dispatch(UiEvent::TransitionIn {
                    phase: TransitionPhase::End,
                }),
                UiEvent::TransitionOut {
                    phase: TransitionPhase::Begin,
                } => cx.events.dispatch(UiEvent::TransitionOut {
                    phase: TransitionPhase::End,
                }),
                _ => {}
            }
        }
    }

    fn path(tree: &MenuTree) -> Vec<&str> {
        tree.path().iter().map(String::as_str).collect()
    }

    #[test]
    fn init_pushes_and_activates_the_root() {
        let mut menus = registry(&["R", "D"]);
        let mut cx = context();
        let mut tree = MenuTree::new(Some("R".into()), Some("D".into()));
        tree.init(&mut menus, &mut cx).expect("init");

        assert_eq!(path(&tree), ["R"]);
        assert_eq!(tree.state(), TreeState::Idle);
        assert_eq!(menus.get("R").expect("R").activations, 1);
        assert!(cx.events.is_empty());
    }

    #[test]
    fn toggle_without_root_never_keeps_more_than_one_menu() {
        let mut menus = registry(&["D", "A", "B"]);
        let mut cx = context();
        let mut tree = MenuTree::new(None, Some("D".into()));
        tree.init(&mut menus, &mut cx).expect("init");

        let steps = [
            UiEvent::Toggle,
            UiEvent::ToMenu { menu: "A".into() },
            UiEvent::ToMenu { menu: "B".into() },
            UiEvent::Toggle,
            UiEvent::Toggle,
            UiEvent::Toggle,
        ];
        for event in steps {
            send(&mut tree, &mut menus, &mut cx, event.clone());
            settle(&mut tree, &mut menus, &mut cx);
            if event == UiEvent::Toggle {
                assert!(tree.path().len() <= 1, "path {:?}", tree.path());
            }
            assert_eq!(tree.state(), TreeState::Idle);
        }
        assert_eq!(path(&tree), ["D"]);
    }

    #[test]
    fn toggle_with_root_keeps_root_and_one_menu() {
        let mut menus = registry(&["R", "D", "A", "B"]);
        let mut cx = context();
        let mut tree = MenuTree::new(Some("R".into()), Some("D".into()));
        tree.init(&mut menus, &mut cx).expect("init");

        for menu in ["A", "B"] {
            send(&mut tree, &mut menus, &mut cx, UiEvent::ToMenu { menu: menu.into() });
            settle(&mut tree, &mut menus, &mut cx);
        }
        assert_eq!(path(&tree), ["R", "A", "B"]);

        send(&mut tree, &mut menus, &mut cx, UiEvent::Toggle);
        assert_eq!(path(&tree), ["R", "B"]);
        assert_eq!(menus.get("A").expect("A").resets, 1);
        settle(&mut tree, &mut menus, &mut cx);
        assert_eq!(path(&tree), ["R"]);

        for _ in 0..4 {
            send(&mut tree, &mut menus, &mut cx, UiEvent::Toggle);
            settle(&mut tree, &mut menus, &mut cx);
            let current = path(&tree);
            assert!(current == ["R"] || current == ["R", "D"], "path {current:?}");
        }
    }

    #[test]
    fn back_never_pops_the_root() {
        let mut menus = registry(&["R", "A"]);
        let mut cx = context();
        let mut tree = MenuTree::new(Some("R".into()), None);
        tree.init(&mut menus, &mut cx).expect("init");

        send(&mut tree, &mut menus, &mut cx, UiEvent::Back);
        assert!(cx.events.is_empty());
        assert_eq!(tree.state(), TreeState::Idle);

        send(&mut tree, &mut menus, &mut cx, UiEvent::ToMenu { menu: "A".into() });
        settle(&mut tree, &mut menus, &mut cx);
        send(&mut tree, &mut menus, &mut cx, UiEvent::Back);
        settle(&mut tree, &mut menus, &mut cx);
        send(&mut tree, &mut menus, &mut cx, UiEvent::Back);
        settle(&mut tree, &mut menus, &mut cx);
        assert_eq!(path(&tree), ["R"]);
        assert_eq!(menus.get("A").expect("A").resets, 1);
    }

    #[test]
    fn unknown_menu_fails_without_touching_the_path() {
        let mut menus = registry(&["R"]);
        let mut cx = context();
        let mut tree = MenuTree::new(Some("R".into()), None);
        tree.init(&mut menus, &mut cx).expect("init");

        let err = tree
            .handle_event(&UiEvent::ToMenu { menu: "nope".into() }, &mut menus, &mut cx)
            .expect_err("unknown menu");
        assert!(matches!(err, UiError::UnknownMenu(name) if name == "nope"));
        assert_eq!(path(&tree), ["R"]);
        assert_eq!(tree.state(), TreeState::Idle);
        assert_eq!(tree.pending_target(), None);
        assert!(cx.events.is_empty());
    }

    #[test]
    fn duplicate_transition_out_end_pops_once() {
        let mut menus = registry(&["A", "B"]);
        let mut cx = context();
        let mut tree = MenuTree::new(Some("A".into()), None);
        tree.init(&mut menus, &mut cx).expect("init");
        send(&mut tree, &mut menus, &mut cx, UiEvent::ToMenu { menu: "B".into() });
        settle(&mut tree, &mut menus, &mut cx);
        assert_eq!(path(&tree), ["A", "B"]);

        send(&mut tree, &mut menus, &mut cx, UiEvent::Back);
        let end = UiEvent::TransitionOut {
            phase: TransitionPhase::End,
        };
        send(&mut tree, &mut menus, &mut cx, end.clone());
        assert_eq!(path(&tree), ["A"]);
        send(&mut tree, &mut menus, &mut cx, end);
        assert_eq!(path(&tree), ["A"]);
        assert_eq!(menus.get("B").expect("B").resets, 1);
        assert_eq!(menus.get("A").expect("A").resets, 0);
    }

    #[test]
    fn duplicate_transition_in_end_is_ignored_once_idle() {
        let mut menus = registry(&["D"]);
        let mut cx = context();
        let mut tree = MenuTree::new(None, Some("D".into()));
        send(&mut tree, &mut menus, &mut cx, UiEvent::Escape);
        assert_eq!(path(&tree), ["D"]);

        let end = UiEvent::TransitionIn {
            phase: TransitionPhase::End,
        };
        send(&mut tree, &mut menus, &mut cx, end.clone());
        send(&mut tree, &mut menus, &mut cx, end);
        let set_active = cx
            .events
            .pending()
            .filter(|event| matches!(event, UiEvent::SetActiveControl { .. }))
            .count();
        assert_eq!(set_active, 1);
    }

    #[test]
    fn root_toggle_opens_the_default_menu() {
        let mut menus = registry(&["R", "D"]);
        let mut cx = context();
        let mut tree = MenuTree::new(Some("R".into()), Some("D".into()));
        tree.init(&mut menus, &mut cx).expect("init");

        send(&mut tree, &mut menus, &mut cx, UiEvent::Toggle);
        assert_eq!(tree.state(), TreeState::Active);
        assert_eq!(
            cx.events.next(),
            Some(UiEvent::TransitionOut {
                phase: TransitionPhase::Begin
            })
        );

        send(
            &mut tree,
            &mut menus,
            &mut cx,
            UiEvent::TransitionOut {
                phase: TransitionPhase::End,
            },
        );
        assert_eq!(path(&tree), ["R", "D"]);
        assert_eq!(
            cx.events.next(),
            Some(UiEvent::TransitionIn {
                phase: TransitionPhase::Begin
            })
        );

        send(
            &mut tree,
            &mut menus,
            &mut cx,
            UiEvent::TransitionIn {
                phase: TransitionPhase::End,
            },
        );
        assert_eq!(path(&tree), ["R", "D"]);
        assert_eq!(tree.state(), TreeState::Idle);
    }

    #[test]
    fn navigation_is_ignored_while_transitioning() {
        let mut menus = registry(&["R", "A", "B"]);
        let mut cx = context();
        let mut tree = MenuTree::new(Some("R".into()), None);
        tree.init(&mut menus, &mut cx).expect("init");

        send(&mut tree, &mut menus, &mut cx, UiEvent::ToMenu { menu: "A".into() });
        send(&mut tree, &mut menus, &mut cx, UiEvent::ToMenu { menu: "B".into() });
        assert_eq!(tree.pending_target(), Some("A"));
        settle(&mut tree, &mut menus, &mut cx);
        assert_eq!(path(&tree), ["R", "A"]);
    }

    #[test]
    fn transition_in_end_restores_focus_by_direction() {
        let mut menus = registry(&["R", "A"]);
        let mut cx = context();
        let mut tree = MenuTree::new(Some("R".into()), None);
        tree.init(&mut menus, &mut cx).expect("init");

        send(&mut tree, &mut menus, &mut cx, UiEvent::ToMenu { menu: "A".into() });
        settle(&mut tree, &mut menus, &mut cx);
        assert!(cx.events.history().contains(&UiEvent::SetActiveControl {
            choice: ActiveControlChoice::First
        }));

        cx.events.clear_history();
        send(&mut tree, &mut menus, &mut cx, UiEvent::Back);
        settle(&mut tree, &mut menus, &mut cx);
        assert!(cx.events.history().contains(&UiEvent::SetActiveControl {
            choice: ActiveControlChoice::Last
        }));

        cx.events.clear_history();
        cx.input.last_device = Device::Mouse;
        send(&mut tree, &mut menus, &mut cx, UiEvent::ToMenu { menu: "A".into() });
        settle(&mut tree, &mut menus, &mut cx);
        assert!(!cx
            .events
            .history()
            .iter()
            .any(|event| matches!(event, UiEvent::SetActiveControl { .. })));
    }

    #[test]
    fn returning_to_a_menu_on_the_path_unwinds_to_it() {
        let mut menus = registry(&["R", "A", "B"]);
        let mut cx = context();
        let mut tree = MenuTree::new(Some("R".into()), None);
        tree.init(&mut menus, &mut cx).expect("init");
        for menu in ["A", "B", "A"] {
            send(&mut tree, &mut menus, &mut cx, UiEvent::ToMenu { menu: menu.into() });
            settle(&mut tree, &mut menus, &mut cx);
        }
        assert_eq!(path(&tree), ["R", "A"]);
        assert_eq!(menus.get("B").expect("B").resets, 1);
    }

    #[test]
    fn interface_trees_filter_lifecycle_events() {
        let mut menus = registry(&["hud"]);
        let mut cx = context();
        let mut tree = MenuTree::interface(Some("hud".into()), None);
        tree.init(&mut menus, &mut cx).expect("init");

        send(
            &mut tree,
            &mut menus,
            &mut cx,
            UiEvent::TransitionIn {
                phase: TransitionPhase::Begin,
            },
        );
        send(&mut tree, &mut menus, &mut cx, UiEvent::PointerMove { x: 1.0, y: 2.0 });
        send(&mut tree, &mut menus, &mut cx, UiEvent::ToMenu { menu: "elsewhere".into() });

        let seen = &menus.get("hud").expect("hud").events;
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], UiEvent::PointerMove { x: 1.0, y: 2.0 });
        assert_eq!(path(&tree), ["hud"]);
    }

    #[test]
    fn active_menu_requires_an_open_menu() {
        let menus = registry(&["D"]);
        let tree = MenuTree::new(None, Some("D".into()));
        assert!(matches!(tree.active_menu(&menus), Err(UiError::NoActiveMenu)));
        assert!(matches!(
            tree.scroll_param(Direction::Up, &menus),
            Err(UiError::NoActiveMenu)
        ));
    }

    #[test]
    fn validate_rejects_missing_root_or_default() {
        let menus = registry(&["R"]);
        assert!(MenuTree::new(Some("R".into()), None).validate(&menus).is_ok());
        assert!(matches!(
            MenuTree::new(Some("R".into()), Some("D".into())).validate(&menus),
            Err(UiError::UnknownMenu(name)) if name == "D"
        ));
    }
}
