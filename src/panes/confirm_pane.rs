use std::any::Any;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect as RatatuiRect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::state::AppState;
use crate::ui::layout_helpers::center_rect;
use crate::ui::{Action, InputEvent, KeyCode, Keymap, NavAction, Palette, Pane, PresetAction, ShaderAction, Style};

/// What the dialog is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// No backup exists yet; declining disables applying
    Backup,
    /// The simulator was updated since the backup was taken
    UpdateBackup,
    SaveBeforeQuit,
    Restore,
}

pub struct ConfirmPane {
    keymap: Keymap,
    message: String,
    pending: Option<PendingAction>,
    selected: bool, // false = No, true = Yes
    quit_after_save: bool,
}

impl ConfirmPane {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            message: String::new(),
            pending: None,
            selected: true,
            quit_after_save: false,
        }
    }

    /// Configure the dialog before showing it
    pub fn set_confirm(&mut self, message: &str, pending: PendingAction) {
        self.message = message.to_string();
        self.pending = Some(pending);
        self.selected = true;
        self.quit_after_save = false;
    }

    /// True once after the user chose to save before quitting
    pub fn take_quit_after_save(&mut self) -> bool {
        std::mem::take(&mut self.quit_after_save)
    }

    fn confirm_action(&mut self) -> Action {
        match self.pending.take() {
            Some(PendingAction::Backup) | Some(PendingAction::UpdateBackup) => {
                Action::Shader(ShaderAction::Backup)
            }
            Some(PendingAction::SaveBeforeQuit) => {
                self.quit_after_save = true;
                Action::Preset(PresetAction::Save)
            }
            Some(PendingAction::Restore) => Action::Shader(ShaderAction::Restore),
            None => Action::Nav(NavAction::PopPane),
        }
    }

    fn decline_action(&mut self) -> Action {
        match self.pending.take() {
            Some(PendingAction::Backup) => Action::Shader(ShaderAction::SkipBackup),
            Some(PendingAction::SaveBeforeQuit) => Action::Quit,
            _ => Action::Nav(NavAction::PopPane),
        }
    }

    /// Escape: back out without deciding, except where a decision is required
    fn cancel_action(&mut self) -> Action {
        match self.pending {
            Some(PendingAction::Backup) => self.decline_action(),
            _ => {
                self.pending = None;
                Action::Nav(NavAction::PopPane)
            }
        }
    }
}

impl Pane for ConfirmPane {
    fn id(&self) -> &'static str {
        "confirm"
    }

    fn handle_action(&mut self, action: &str, _event: &InputEvent, _state: &AppState) -> Action {
        match action {
            "cancel" => self.cancel_action(),
            "confirm" => {
                if self.selected {
                    self.confirm_action()
                } else {
                    self.decline_action()
                }
            }
            "left" | "right" | "toggle" => {
                self.selected = !self.selected;
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_raw_input(&mut self, event: &InputEvent, _state: &AppState) -> Action {
        match event.key {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_action(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.decline_action(),
            _ => Action::None,
        }
    }

    fn render(&mut self, area: RatatuiRect, buf: &mut Buffer, state: &AppState) {
        let palette = Palette::for_theme(state.settings.theme);
        let lines: Vec<&str> = self.message.lines().collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
        let width = (longest + 6).max(30).min(area.width.saturating_sub(4));
        let height = lines.len() as u16 + 6;
        let rect = center_rect(area, width, height);
        Clear.render(rect, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Confirm ")
            .border_style(ratatui::style::Style::from(Style::new().fg(palette.warning)))
            .title_style(ratatui::style::Style::from(Style::new().fg(palette.warning)))
            .style(ratatui::style::Style::from(Style::new().bg(palette.bg)));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let msg_area = RatatuiRect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), lines.len() as u16);
        let text: Vec<Line> = lines
            .iter()
            .map(|l| Line::from(Span::styled(*l, palette.text_style())))
            .collect();
        Paragraph::new(text).render(msg_area, buf);

        let no_style = if !self.selected {
            palette.selected_style()
        } else {
            palette.dim_style()
        };
        let yes_style = if self.selected {
            ratatui::style::Style::from(Style::new().fg(palette.bg).bg(palette.warning).bold())
        } else {
            palette.dim_style()
        };

        let btn_y = inner.y + lines.len() as u16 + 2;
        if btn_y < inner.y + inner.height {
            let btn_area = RatatuiRect::new(inner.x + 1, btn_y, inner.width.saturating_sub(2), 1);
            let line = Line::from(vec![
                Span::styled("  [N]o  ", no_style),
                Span::raw("    "),
                Span::styled("  [Y]es  ", yes_style),
            ]);
            Paragraph::new(line).render(btn_area, buf);
        }
    }

    fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn is_modal(&self) -> bool {
        true
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    fn pane(pending: PendingAction) -> ConfirmPane {
        let mut p = ConfirmPane::new(Keymap::new());
        p.set_confirm("Question?", pending);
        p
    }

    #[test]
    fn declining_first_backup_skips_it() {
        let state = test_state();
        let mut p = pane(PendingAction::Backup);
        let key = InputEvent::key(KeyCode::Escape);
        assert_eq!(p.handle_action("cancel", &key, &state), Action::Shader(ShaderAction::SkipBackup));
    }

    #[test]
    fn save_before_quit_flags_followup() {
        let state = test_state();
        let mut p = pane(PendingAction::SaveBeforeQuit);
        let yes = InputEvent::key(KeyCode::Char('y'));
        assert_eq!(p.handle_raw_input(&yes, &state), Action::Preset(PresetAction::Save));
        assert!(p.take_quit_after_save());
        assert!(!p.take_quit_after_save());

        let mut p = pane(PendingAction::SaveBeforeQuit);
        let enter = InputEvent::key(KeyCode::Enter);
        p.handle_action("toggle", &enter, &state);
        assert_eq!(p.handle_action("confirm", &enter, &state), Action::Quit);
    }

    #[test]
    fn restore_cancel_just_closes() {
        let state = test_state();
        let mut p = pane(PendingAction::Restore);
        let esc = InputEvent::key(KeyCode::Escape);
        assert_eq!(p.handle_action("cancel", &esc, &state), Action::Nav(NavAction::PopPane));
    }
}
