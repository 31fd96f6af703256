use std::any::Any;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::input::InputEvent;
use super::keymap::Keymap;
use crate::state::AppState;
use crate::ui::{Action, NavAction, NavIntent};

/// A screen or modal. Panes never touch `AppState` directly; they return
/// actions for dispatch.
pub trait Pane {
    fn id(&self) -> &'static str;

    /// A key resolved to a named action by the layer stack
    fn handle_action(&mut self, action: &str, event: &InputEvent, state: &AppState) -> Action;

    /// A key no layer claimed
    fn handle_raw_input(&mut self, _event: &InputEvent, _state: &AppState) -> Action {
        Action::None
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, state: &AppState);

    fn keymap(&self) -> &Keymap;

    /// Called whenever the pane becomes active
    fn on_enter(&mut self, _state: &AppState) {}

    /// Drawn on top of the pane below it
    fn is_modal(&self) -> bool {
        false
    }

    /// A text field currently has focus
    fn is_editing(&self) -> bool {
        false
    }

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub struct PaneManager {
    panes: Vec<Box<dyn Pane>>,
    active: usize,
    /// Panes covered by pushed ones, oldest first
    stack: Vec<usize>,
}

impl PaneManager {
    pub fn new(first: Box<dyn Pane>) -> Self {
        Self {
            panes: vec![first],
            active: 0,
            stack: Vec::new(),
        }
    }

    pub fn add_pane(&mut self, pane: Box<dyn Pane>) {
        self.panes.push(pane);
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.panes.iter().position(|p| p.id() == id)
    }

    pub fn active(&self) -> &dyn Pane {
        self.panes[self.active].as_ref()
    }

    pub fn active_mut(&mut self) -> &mut dyn Pane {
        self.panes[self.active].as_mut()
    }

    pub fn get_pane_mut<T: 'static>(&mut self, id: &str) -> Option<&mut T> {
        let idx = self.index_of(id)?;
        self.panes[idx].as_any_mut().downcast_mut::<T>()
    }

    /// Replace the current view; drops any pushed panes
    pub fn switch_to(&mut self, id: &str, state: &AppState) {
        if let Some(idx) = self.index_of(id) {
            self.stack.clear();
            self.active = idx;
            self.panes[idx].on_enter(state);
        }
    }

    pub fn push_to(&mut self, id: &str, state: &AppState) {
        if let Some(idx) = self.index_of(id) {
            if idx == self.active {
                return;
            }
            self.stack.push(self.active);
            self.active = idx;
            self.panes[idx].on_enter(state);
        }
    }

    /// Returns false when there was nothing to pop
    pub fn pop(&mut self, state: &AppState) -> bool {
        match self.stack.pop() {
            Some(idx) => {
                self.active = idx;
                self.panes[idx].on_enter(state);
                true
            }
            None => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn process_nav(&mut self, action: &Action, state: &AppState) {
        if let Action::Nav(nav) = action {
            match nav {
                NavAction::SwitchPane(id) => self.switch_to(id, state),
                NavAction::PushPane(id) => self.push_to(id, state),
                NavAction::PopPane => {
                    self.pop(state);
                }
            }
        }
    }

    pub fn process_nav_intents(&mut self, intents: &[NavIntent], state: &AppState) {
        for intent in intents {
            match intent {
                NavIntent::SwitchTo(id) => self.switch_to(id, state),
                NavIntent::PushTo(id) => self.push_to(id, state),
                NavIntent::Pop => {
                    self.pop(state);
                }
                NavIntent::ConditionalPop(id) => {
                    if self.active().id() == *id {
                        self.pop(state);
                    }
                }
                NavIntent::PopOrSwitchTo(id) => {
                    if !self.pop(state) {
                        self.switch_to(id, state);
                    }
                }
            }
        }
    }

    /// Render the active pane; modals get the pane beneath them drawn first.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, state: &AppState) {
        let mut layers = vec![self.active];
        let mut covered = self.stack.iter().rev();
        while self.panes[*layers.last().unwrap_or(&self.active)].is_modal() {
            match covered.next() {
                Some(idx) => layers.push(*idx),
                None => break,
            }
        }
        for idx in layers.into_iter().rev() {
            self.panes[idx].render(area, buf, state);
        }
    }
}
