use std::any::Any;
use std::path::{Path, PathBuf};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect as RatatuiRect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::state::AppState;
use crate::ui::layout_helpers::{center_rect, fit};
use crate::ui::widgets::TextInput;
use crate::ui::{Action, InputEvent, KeyCode, Keymap, NavAction, Palette, Pane, PresetAction, ShaderAction, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPurpose {
    OpenPreset,
    SavePresetAs,
    BackupDir,
}

impl PathPurpose {
    fn title(&self) -> &'static str {
        match self {
            PathPurpose::OpenPreset => " Open Preset ",
            PathPurpose::SavePresetAs => " Save Preset As ",
            PathPurpose::BackupDir => " Backup Directory ",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            PathPurpose::OpenPreset => "Open",
            PathPurpose::SavePresetAs => "Save",
            PathPurpose::BackupDir => "Set",
        }
    }
}

pub struct PathPane {
    keymap: Keymap,
    purpose: PathPurpose,
    input: TextInput,
    /// Preset files found next to the settings, offered with Up/Down
    candidates: Vec<PathBuf>,
    candidate: Option<usize>,
    error: Option<String>,
}

/// Relative preset names live in the preset directory; saved presets get
/// an `.ini` extension when none was typed.
fn resolve_preset_path(dir: &Path, input: &str, add_extension: bool) -> PathBuf {
    let mut path = PathBuf::from(input);
    if path.is_relative() {
        path = dir.join(path);
    }
    if add_extension && path.extension().is_none() {
        path.set_extension("ini");
    }
    path
}

fn preset_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("ini")))
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}

impl PathPane {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            purpose: PathPurpose::OpenPreset,
            input: TextInput::new(""),
            candidates: Vec::new(),
            candidate: None,
            error: None,
        }
    }

    /// Reset state before showing the prompt
    pub fn open(&mut self, purpose: PathPurpose, initial: &str) {
        self.purpose = purpose;
        self.input.set_value(initial);
        self.input.select_all();
        self.error = None;
        self.candidate = None;
    }

    fn submit(&mut self, state: &AppState) -> Action {
        let text = self.input.value().trim().to_string();
        if text.is_empty() {
            self.error = Some("Path cannot be empty".to_string());
            return Action::None;
        }
        match self.purpose {
            PathPurpose::OpenPreset => {
                let path = resolve_preset_path(&state.preset_dir, &text, false);
                if !path.is_file() {
                    self.error = Some(format!("{} not found", path.display()));
                    return Action::None;
                }
                Action::Preset(PresetAction::Open(path))
            }
            PathPurpose::SavePresetAs => {
                Action::Preset(PresetAction::SaveAs(resolve_preset_path(&state.preset_dir, &text, true)))
            }
            PathPurpose::BackupDir => Action::Shader(ShaderAction::SetBackupDir(PathBuf::from(text))),
        }
    }

    fn pick_candidate(&mut self, delta: isize) {
        if self.candidates.is_empty() {
            return;
        }
        let len = self.candidates.len() as isize;
        let next = match self.candidate {
            Some(i) => (i as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        } as usize;
        self.candidate = Some(next);
        let name = self.candidates[next]
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.input.set_value(&name);
    }
}

impl Pane for PathPane {
    fn id(&self) -> &'static str {
        "path_prompt"
    }

    fn handle_action(&mut self, action: &str, _event: &InputEvent, state: &AppState) -> Action {
        match action {
            "text:confirm" => self.submit(state),
            "text:cancel" => Action::Nav(NavAction::PopPane),
            _ => Action::None,
        }
    }

    fn handle_raw_input(&mut self, event: &InputEvent, _state: &AppState) -> Action {
        match event.key {
            KeyCode::Up if self.purpose != PathPurpose::BackupDir => self.pick_candidate(-1),
            KeyCode::Down if self.purpose != PathPurpose::BackupDir => self.pick_candidate(1),
            _ => {
                if self.input.handle_input(event) {
                    self.error = None;
                }
            }
        }
        Action::None
    }

    fn render(&mut self, area: RatatuiRect, buf: &mut Buffer, state: &AppState) {
        let palette = Palette::for_theme(state.settings.theme);
        let shown = self.candidates.len().min(6) as u16;
        let width = 60_u16.min(area.width.saturating_sub(4));
        let height = 7 + shown + u16::from(self.error.is_some());
        let rect = center_rect(area, width, height);
        Clear.render(rect, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.purpose.title())
            .border_style(palette.border_style())
            .title_style(palette.border_style())
            .style(ratatui::style::Style::from(Style::new().bg(palette.bg)));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let label = match self.purpose {
            PathPurpose::BackupDir => "Directory:".to_string(),
            _ => format!("Preset file (in {}):", state.preset_dir.display()),
        };
        let label_area = RatatuiRect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), 1);
        let label = fit(&label, label_area.width as usize);
        Paragraph::new(Line::from(Span::styled(label, palette.dim_style()))).render(label_area, buf);

        self.input.render_buf(buf, inner.x + 2, inner.y + 2, inner.width.saturating_sub(4), &palette);

        let mut y = inner.y + 3;
        if let Some(ref error) = self.error {
            let err_area = RatatuiRect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1);
            let err_style = ratatui::style::Style::from(Style::new().fg(palette.error));
            Paragraph::new(Line::from(Span::styled(error.as_str(), err_style))).render(err_area, buf);
            y += 1;
        }

        if self.purpose != PathPurpose::BackupDir {
            let start = self.candidate.unwrap_or(0).saturating_sub(shown.saturating_sub(1) as usize);
            for (i, path) in self.candidates.iter().enumerate().skip(start).take(shown as usize) {
                let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
                let style = if self.candidate == Some(i) {
                    palette.selected_style()
                } else {
                    palette.dim_style()
                };
                let row = RatatuiRect::new(inner.x + 2, y, inner.width.saturating_sub(4), 1);
                Paragraph::new(Line::from(Span::styled(fit(&name, row.width as usize), style))).render(row, buf);
                y += 1;
            }
        }

        let footer_y = rect.y + rect.height.saturating_sub(2);
        if footer_y < area.y + area.height {
            let footer_area = RatatuiRect::new(inner.x + 1, footer_y, inner.width.saturating_sub(2), 1);
            let hint = if self.purpose == PathPurpose::BackupDir {
                format!("[Enter] {}  [Esc] Cancel", self.purpose.verb())
            } else {
                format!("[Enter] {}  [Up/Down] Browse  [Esc] Cancel", self.purpose.verb())
            };
            Paragraph::new(Line::from(Span::styled(hint, palette.dim_style()))).render(footer_area, buf);
        }
    }

    fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn on_enter(&mut self, state: &AppState) {
        self.candidates = preset_files(&state.preset_dir);
        self.input.set_focused(true);
    }

    fn is_modal(&self) -> bool {
        true
    }

    fn is_editing(&self) -> bool {
        true
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
