use std::collections::HashMap;

use super::{Control, ControlId, ControlIds, ControlState};
use crate::document::{NavigateDef, SubControlsDef};
use crate::error::UiError;
use crate::events::{Direction, EventQueue, UiEvent};
use crate::script::ScriptPool;

/// Directed up/down/left/right links between siblings, indexed by position
/// in the owning list. Links need not be symmetric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavGraph {
    links: Vec<[Option<usize>; 4]>,
}

impl NavGraph {
    /// Resolves named links. `names[i]` and `links[i]` describe the same node;
    /// unnamed nodes can link out but cannot be linked to.
    pub fn resolve(owner: &str, names: &[&str], links: &[&NavigateDef]) -> Result<Self, UiError> {
        let index: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(position, name)| (*name, position))
            .collect();

        let mut graph = Vec::with_capacity(links.len());
        for link in links {
            let mut node = [None; 4];
            for direction in Direction::ALL {
                if let Some(target) = link.target(direction) {
                    let to = index.get(target).ok_or_else(|| UiError::UnknownNavTarget {
                        owner: owner.to_string(),
                        target: target.to_string(),
                    })?;
                    node[direction.index()] = Some(*to);
                }
            }
            graph.push(node);
        }
        Ok(Self { links: graph })
    }

    pub fn neighbor(&self, from: usize, direction: Direction) -> Option<usize> {
        self.links.get(from)?[direction.index()]
    }

    /// Follows `direction` from `from`, passing over nodes for which
    /// `blocked` is true. Stops at a missing edge or when the walk reaches a
    /// node it has already visited.
    pub fn walk(
        &self,
        from: usize,
        direction: Direction,
        blocked: impl Fn(usize) -> bool,
    ) -> Option<usize> {
        let mut visited = vec![false; self.links.len()];
        *visited.get_mut(from)? = true;
        let mut current = from;
        loop {
            let next = self.neighbor(current, direction)?;
            if std::mem::replace(visited.get_mut(next)?, true) {
                return None;
            }
            if !blocked(next) {
                return Some(next);
            }
            current = next;
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Children and navigation state of a composite control.
#[derive(Debug, Default)]
pub struct Composite {
    pub(super) children: Vec<Control>,
    nav: NavGraph,
    active: Option<usize>,
    pub(super) responds_to_select_msg: bool,
}

impl Composite {
    pub(super) fn from_def(
        owner: &str,
        def: &SubControlsDef,
        ids: &mut ControlIds,
        scripts: &ScriptPool,
    ) -> Result<Self, UiError> {
        let children = def
            .controls
            .iter()
            .map(|child| Control::from_def(child, ids, scripts))
            .collect::<Result<Vec<_>, _>>()?;
        let names: Vec<&str> = children.iter().map(Control::name).collect();
        let links: Vec<&NavigateDef> = def.controls.iter().map(|child| &child.navigate).collect();
        let nav = NavGraph::resolve(owner, &names, &links)?;
        Ok(Self {
            children,
            nav,
            active: None,
            responds_to_select_msg: def.responds_to_select_msg,
        })
    }

    pub fn children(&self) -> &[Control] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Control] {
        &mut self.children
    }

    pub fn nav(&self) -> &NavGraph {
        &self.nav
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_child(&self) -> Option<&Control> {
        self.children.get(self.active?)
    }

    pub fn responds_to_select_msg(&self) -> bool {
        self.responds_to_select_msg
    }

    pub(super) fn set_active(&mut self, index: Option<usize>) {
        self.active = index;
    }

    /// Index of the direct child whose subtree holds `target`, with the
    /// state of the targeted control.
    pub(super) fn locate(&self, target: ControlId) -> Option<(usize, ControlState)> {
        self.children.iter().enumerate().find_map(|(index, child)| {
            child
                .find_control_by_id(target)
                .map(|found| (index, found.state()))
        })
    }

    /// Moves focus from the active child. Disabled neighbours are passed
    /// over in the same direction. Returns true when focus moved.
    pub fn navigate(&mut self, direction: Direction, events: &mut EventQueue) -> bool {
        let Some(from) = self.active else {
            return false;
        };
        let children = &self.children;
        let Some(next) = self
            .nav
            .walk(from, direction, |index| !children[index].is_focusable())
        else {
            return false;
        };
        events.dispatch(UiEvent::StateChange {
            target: children[next].id(),
            state: ControlState::Active,
        });
        self.active = Some(next);
        true
    }
}
