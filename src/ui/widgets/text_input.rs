use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;

use rat_event::{HandleEvent, Regular};
use rat_widget::focus::HasFocus;
use rat_widget::text_input::{TextInput as RatTextInput, TextInputState};

use crate::ui::input::InputEvent;
use crate::ui::rat_compat::{outcome_consumed, to_crossterm_key_event};
use crate::ui::style::{Palette, Style};

/// Single-line text field: parameter values, paths, comments, shader code.
pub struct TextInput {
    label: String,
    state: TextInputState,
}

impl TextInput {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            state: TextInputState::new(),
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.state.set_value(value);
        self
    }

    pub fn value(&self) -> &str {
        self.state.text()
    }

    pub fn set_value(&mut self, value: &str) {
        self.state.set_value(value);
    }

    /// Next typed character replaces everything
    pub fn select_all(&mut self) {
        self.state.select_all();
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.state.focus.set(focused);
    }

    pub fn is_focused(&self) -> bool {
        self.state.is_focused()
    }

    /// Returns true if the event was consumed
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.state.is_focused() {
            return false;
        }
        let ct_event = to_crossterm_key_event(event);
        let outcome: rat_event::Outcome = self.state.handle(&ct_event, Regular).into();
        outcome_consumed(outcome)
    }

    /// Draw `label value` on one row; returns the rows used.
    pub fn render_buf(&mut self, buf: &mut Buffer, x: u16, y: u16, width: u16, palette: &Palette) -> u16 {
        let label_style = palette.dim_style();
        for (j, ch) in self.label.chars().enumerate() {
            if let Some(cell) = buf.cell_mut((x + j as u16, y)) {
                cell.set_char(ch).set_style(label_style);
            }
        }

        let label_offset = if self.label.is_empty() {
            0
        } else {
            self.label.chars().count() as u16 + 1
        };
        let input_width = width.saturating_sub(label_offset);
        if input_width == 0 {
            return 1;
        }

        let widget = RatTextInput::new()
            .style(ratatui::style::Style::from(Style::new().fg(palette.text).bg(palette.selection_bg)))
            .focus_style(ratatui::style::Style::from(Style::new().fg(palette.text).bg(palette.selection_bg).bold()))
            .select_style(ratatui::style::Style::from(Style::new().fg(palette.bg).bg(palette.accent)))
            .cursor_style(ratatui::style::Style::from(Style::new().fg(palette.bg).bg(palette.text)));

        let area = Rect::new(x + label_offset, y, input_width, 1);
        widget.render(area, buf, &mut self.state);
        1
    }
}
