use std::any::Any;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect as RatatuiRect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::state::AppState;
use crate::ui::layout_helpers::fit;
use crate::ui::widgets::TextInput;
use crate::ui::{Action, InputEvent, Keymap, NavAction, Palette, Pane, PresetAction};

/// Line-by-line editor for the preset comment.
pub struct CommentPane {
    keymap: Keymap,
    lines: Vec<String>,
    selected: usize,
    editing: bool,
    edit_input: TextInput,
}

fn split_lines(comment: &str) -> Vec<String> {
    let lines: Vec<String> = comment.lines().map(str::to_string).collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

impl CommentPane {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            lines: vec![String::new()],
            selected: 0,
            editing: false,
            edit_input: TextInput::new(""),
        }
    }

    fn joined(&self) -> String {
        let text = self.lines.join("\n");
        text.trim_end_matches('\n').to_string()
    }

    fn start_edit(&mut self) -> Action {
        let current = self.lines.get(self.selected).cloned().unwrap_or_default();
        self.edit_input.set_value(&current);
        self.edit_input.set_focused(true);
        self.editing = true;
        Action::PushLayer("text_edit")
    }

    fn stop_edit(&mut self) {
        self.editing = false;
        self.edit_input.set_focused(false);
    }
}

impl Pane for CommentPane {
    fn id(&self) -> &'static str {
        "comment"
    }

    fn handle_action(&mut self, action: &str, _event: &InputEvent, _state: &AppState) -> Action {
        match action {
            "text:confirm" if self.editing => {
                let value = self.edit_input.value().to_string();
                if let Some(line) = self.lines.get_mut(self.selected) {
                    *line = value;
                }
                self.stop_edit();
                Action::Preset(PresetAction::SetComment(self.joined()))
            }
            "text:cancel" if self.editing => {
                self.stop_edit();
                Action::None
            }
            "prev" => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            "next" => {
                if self.selected + 1 < self.lines.len() {
                    self.selected += 1;
                }
                Action::None
            }
            "edit" => self.start_edit(),
            "insert" => {
                let at = (self.selected + 1).min(self.lines.len());
                self.lines.insert(at, String::new());
                self.selected = at;
                self.start_edit()
            }
            "delete" => {
                if self.lines.len() > 1 {
                    self.lines.remove(self.selected);
                    self.selected = self.selected.min(self.lines.len() - 1);
                } else {
                    self.lines[0].clear();
                }
                Action::Preset(PresetAction::SetComment(self.joined()))
            }
            "back" => Action::Nav(NavAction::SwitchPane("tweaks")),
            _ => Action::None,
        }
    }

    fn handle_raw_input(&mut self, event: &InputEvent, _state: &AppState) -> Action {
        if self.editing {
            self.edit_input.handle_input(event);
        }
        Action::None
    }

    fn render(&mut self, area: RatatuiRect, buf: &mut Buffer, state: &AppState) {
        let palette = Palette::for_theme(state.settings.theme);
        let title = match state.loaded_preset_name() {
            Some(name) => format!(" Comment: {} ", name),
            None => " Comment ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(palette.border_style())
            .title_style(palette.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = inner.height.saturating_sub(2) as usize;
        let start = self.selected.saturating_sub(rows.saturating_sub(1));
        let width = inner.width.saturating_sub(3);
        for (i, line) in self.lines.iter().enumerate().skip(start).take(rows) {
            let y = inner.y + (i - start) as u16;
            if self.editing && i == self.selected {
                self.edit_input.render_buf(buf, inner.x + 2, y, width, &palette);
                continue;
            }
            let style = if i == self.selected {
                palette.selected_style()
            } else {
                palette.text_style()
            };
            if i == self.selected {
                if let Some(cell) = buf.cell_mut((inner.x, y)) {
                    cell.set_char('>').set_style(style);
                }
            }
            let row = RatatuiRect::new(inner.x + 2, y, width, 1);
            Paragraph::new(Line::from(Span::styled(fit(line, width as usize), style))).render(row, buf);
        }

        let footer = RatatuiRect::new(inner.x + 1, inner.y + inner.height.saturating_sub(1), inner.width.saturating_sub(2), 1);
        let hint = if self.editing {
            "[Enter] Keep  [Esc] Discard"
        } else {
            "[Enter] Edit  [o] New line  [x] Delete line  [Esc] Back"
        };
        Paragraph::new(Line::from(Span::styled(hint, palette.dim_style()))).render(footer, buf);
    }

    fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn on_enter(&mut self, state: &AppState) {
        self.lines = split_lines(&state.comment);
        self.selected = self.selected.min(self.lines.len() - 1);
        self.stop_edit();
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use crate::ui::KeyCode;

    #[test]
    fn insert_edit_and_delete_lines() {
        let mut state = test_state();
        state.comment = "first\nsecond".into();
        let mut pane = CommentPane::new(Keymap::new());
        pane.on_enter(&state);
        let key = InputEvent::key(KeyCode::Enter);

        assert_eq!(pane.handle_action("insert", &key, &state), Action::PushLayer("text_edit"));
        assert!(pane.is_editing());
        pane.edit_input.set_value("middle");
        assert_eq!(
            pane.handle_action("text:confirm", &key, &state),
            Action::Preset(PresetAction::SetComment("first\nmiddle\nsecond".into()))
        );
        assert!(!pane.is_editing());

        pane.handle_action("prev", &key, &state);
        assert_eq!(
            pane.handle_action("delete", &key, &state),
            Action::Preset(PresetAction::SetComment("middle\nsecond".into()))
        );
    }

    #[test]
    fn cancel_keeps_line() {
        let mut state = test_state();
        state.comment = "keep".into();
        let mut pane = CommentPane::new(Keymap::new());
        pane.on_enter(&state);
        let key = InputEvent::key(KeyCode::Escape);
        pane.handle_action("edit", &key, &state);
        pane.edit_input.set_value("changed");
        assert_eq!(pane.handle_action("text:cancel", &key, &state), Action::None);
        assert_eq!(pane.joined(), "keep");
    }
}
