use std::any::Any;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect as RatatuiRect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::state::AppState;
use crate::ui::layout_helpers::fit;
use crate::ui::{Action, InputEvent, Keymap, NavAction, Palette, Pane, Style};

/// Scrollback over the activity log. Follows new entries until scrolled.
pub struct LogPane {
    keymap: Keymap,
    /// Entries hidden below the view; 0 = following the tail
    offset: usize,
    page: usize,
}

impl LogPane {
    pub fn new(keymap: Keymap) -> Self {
        Self { keymap, offset: 0, page: 10 }
    }

    fn scroll_up(&mut self, n: usize, total: usize) {
        self.offset = (self.offset + n).min(total.saturating_sub(1));
    }

    fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }
}

impl Pane for LogPane {
    fn id(&self) -> &'static str {
        "log"
    }

    fn handle_action(&mut self, action: &str, _event: &InputEvent, state: &AppState) -> Action {
        let total = state.log.len();
        match action {
            "up" => self.scroll_up(1, total),
            "down" => self.scroll_down(1),
            "page_up" => self.scroll_up(self.page, total),
            "page_down" => self.scroll_down(self.page),
            "top" => self.offset = total.saturating_sub(1),
            "bottom" => self.offset = 0,
            "back" => return Action::Nav(NavAction::SwitchPane("tweaks")),
            _ => {}
        }
        Action::None
    }

    fn render(&mut self, area: RatatuiRect, buf: &mut Buffer, state: &AppState) {
        let palette = Palette::for_theme(state.settings.theme);
        let entries = state.log.entries();
        let title = format!(
            " Activity Log ({} errors, {} warnings) ",
            state.log.count(openshade_core::Severity::Error),
            state.log.count(openshade_core::Severity::Warning)
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(palette.border_style())
            .title_style(palette.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = inner.height as usize;
        self.page = rows.max(1);
        let end = entries.len().saturating_sub(self.offset);
        let start = end.saturating_sub(rows);
        let width = inner.width.saturating_sub(1) as usize;
        let lines: Vec<Line> = entries[start..end]
            .iter()
            .map(|e| {
                let style = ratatui::style::Style::from(Style::new().fg(palette.severity(e.severity)));
                Line::from(Span::styled(format!(" {}", fit(&e.display_line(), width)), style))
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }

    fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn on_enter(&mut self, _state: &AppState) {
        self.offset = 0;
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
    fn scrolling_is_clamped_to_log() {
        let mut state = test_state();
        for i in 0..5 {
            state.log.info(format!("entry {}", i));
        }
        let mut pane = LogPane::new(Keymap::new());
        let key = InputEvent::key(KeyCode::Up);
        for _ in 0..10 {
            pane.handle_action("up", &key, &state);
        }
        assert_eq!(pane.offset, state.log.len() - 1);
        pane.handle_action("bottom", &key, &state);
        assert_eq!(pane.offset, 0);
        pane.handle_action("down", &key, &state);
        assert_eq!(pane.offset, 0);
    }
}
