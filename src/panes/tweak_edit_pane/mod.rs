mod editing;
mod input;
mod rendering;

use std::any::Any;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect as RatatuiRect;

use openshade_core::state::{Parameter, Tweak};

use crate::state::AppState;
use crate::ui::widgets::TextInput;
use crate::ui::{Action, InputEvent, Keymap, Pane};

/// Parameter editor for one catalog tweak. Rows mirror the tweak's
/// parameter list; how a row edits depends on its control kind.
pub struct TweakEditPane {
    keymap: Keymap,
    /// Catalog index of the tweak being edited
    tweak: Option<usize>,
    pub(crate) selected_row: usize,
    /// Selected channel on RGB rows
    channel: usize,
    editing: bool,
    edit_input: TextInput,
}

impl TweakEditPane {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            tweak: None,
            selected_row: 0,
            channel: 0,
            editing: false,
            edit_input: TextInput::new(""),
        }
    }

    pub fn set_tweak(&mut self, idx: usize) {
        if self.tweak != Some(idx) {
            self.selected_row = 0;
            self.channel = 0;
        }
        self.tweak = Some(idx);
        self.editing = false;
        self.edit_input.set_focused(false);
    }

    fn current<'a>(&self, state: &'a AppState) -> Option<&'a Tweak> {
        self.tweak.and_then(|i| state.tweaks.get(i))
    }

    fn current_param<'a>(&self, state: &'a AppState) -> Option<&'a Parameter> {
        self.current(state).and_then(|t| t.parameters.get(self.selected_row))
    }
}

impl Pane for TweakEditPane {
    fn id(&self) -> &'static str {
        "tweak_edit"
    }

    fn handle_action(&mut self, action: &str, event: &InputEvent, state: &AppState) -> Action {
        self.handle_action_impl(action, event, state)
    }

    fn handle_raw_input(&mut self, event: &InputEvent, _state: &AppState) -> Action {
        if self.editing {
            self.edit_input.handle_input(event);
        }
        Action::None
    }

    fn render(&mut self, area: RatatuiRect, buf: &mut Buffer, state: &AppState) {
        self.render_impl(area, buf, state);
    }

    fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn on_enter(&mut self, state: &AppState) {
        let rows = self.current(state).map(|t| t.parameters.len()).unwrap_or(0);
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
