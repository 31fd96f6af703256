use std::any::Any;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect as RatatuiRect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use openshade_core::state::CustomTweak;
use openshade_core::ShaderFile;

use crate::state::AppState;
use crate::ui::layout_helpers::fit;
use crate::ui::widgets::TextInput;
use crate::ui::{Action, CustomAction, InputEvent, Keymap, NavAction, Palette, Pane, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Shader,
    Index,
    OldCode,
    NewCode,
}

impl Field {
    const ALL: [Field; 5] = [Field::Name, Field::Shader, Field::Index, Field::OldCode, Field::NewCode];

    fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Shader => "Shader file",
            Field::Index => "Occurrence (0 = all)",
            Field::OldCode => "Find",
            Field::NewCode => "Replace with",
        }
    }
}

/// Code is edited on one line; newlines show as `\n`.
fn escape_newlines(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

fn unescape_newlines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn field_value(custom: &CustomTweak, field: Field) -> String {
    match field {
        Field::Name => custom.name.clone(),
        Field::Shader => custom.shader.file_name().to_string(),
        Field::Index => custom.index.to_string(),
        Field::OldCode => escape_newlines(&custom.old_code),
        Field::NewCode => escape_newlines(&custom.new_code),
    }
}

/// List of user-authored tweaks plus a form for the selected one.
pub struct CustomTweakPane {
    keymap: Keymap,
    selected: usize,
    /// Form open on `selected`
    form: bool,
    field: usize,
    editing: bool,
    edit_input: TextInput,
    error: Option<String>,
}

impl CustomTweakPane {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            selected: 0,
            form: false,
            field: 0,
            editing: false,
            edit_input: TextInput::new(""),
            error: None,
        }
    }

    fn current_field(&self) -> Field {
        Field::ALL[self.field.min(Field::ALL.len() - 1)]
    }

    fn update(&self, custom: CustomTweak) -> Action {
        Action::Custom(CustomAction::Update(self.selected, custom))
    }

    fn start_edit(&mut self, custom: &CustomTweak) -> Action {
        let field = self.current_field();
        if field == Field::Shader {
            return self.cycle_shader(custom, 1);
        }
        self.edit_input.set_value(&field_value(custom, field));
        self.edit_input.set_focused(true);
        self.editing = true;
        self.error = None;
        Action::PushLayer("text_edit")
    }

    fn stop_edit(&mut self) {
        self.editing = false;
        self.edit_input.set_focused(false);
    }

    fn commit_edit(&mut self, custom: &CustomTweak) -> Action {
        let text = self.edit_input.value().to_string();
        self.stop_edit();
        let mut edited = custom.clone();
        match self.current_field() {
            Field::Name => {
                if text.trim().is_empty() {
                    self.error = Some("Name cannot be empty".to_string());
                    return Action::None;
                }
                edited.name = text.trim().to_string();
            }
            Field::Index => match text.trim().parse::<usize>() {
                Ok(i) => edited.index = i,
                Err(_) => {
                    self.error = Some(format!("'{}' is not a whole number", text.trim()));
                    return Action::None;
                }
            },
            Field::OldCode => edited.old_code = unescape_newlines(&text),
            Field::NewCode => edited.new_code = unescape_newlines(&text),
            Field::Shader => return Action::None,
        }
        self.update(edited)
    }

    fn cycle_shader(&self, custom: &CustomTweak, delta: isize) -> Action {
        let all = ShaderFile::ALL;
        let pos = all.iter().position(|f| *f == custom.shader).unwrap_or(0) as isize;
        let next = (pos + delta).rem_euclid(all.len() as isize) as usize;
        self.update(CustomTweak { shader: all[next], ..custom.clone() })
    }

    fn step_field(&self, custom: &CustomTweak, delta: isize) -> Action {
        match self.current_field() {
            Field::Shader => self.cycle_shader(custom, delta),
            Field::Index => {
                let index = (custom.index as isize + delta).max(0) as usize;
                self.update(CustomTweak { index, ..custom.clone() })
            }
            _ => Action::None,
        }
    }

    fn handle_form(&mut self, action: &str, custom: &CustomTweak) -> Action {
        match action {
            "text:confirm" if self.editing => self.commit_edit(custom),
            "text:cancel" if self.editing => {
                self.stop_edit();
                Action::None
            }
            "prev" => {
                self.field = self.field.saturating_sub(1);
                Action::None
            }
            "next" => {
                self.field = (self.field + 1).min(Field::ALL.len() - 1);
                Action::None
            }
            "decrease" => self.step_field(custom, -1),
            "increase" => self.step_field(custom, 1),
            "edit" => self.start_edit(custom),
            "toggle" => Action::Custom(CustomAction::Toggle(self.selected)),
            "back" => {
                self.form = false;
                self.error = None;
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_list(&mut self, action: &str, count: usize) -> Action {
        match action {
            "prev" => self.selected = self.selected.saturating_sub(1),
            "next" => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
            }
            "add" => {
                self.selected = count;
                return Action::Custom(CustomAction::Add);
            }
            "remove" if count > 0 => {
                let idx = self.selected;
                self.selected = self.selected.min(count.saturating_sub(2));
                return Action::Custom(CustomAction::Remove(idx));
            }
            "toggle" if count > 0 => return Action::Custom(CustomAction::Toggle(self.selected)),
            "edit" if count > 0 => {
                self.form = true;
                self.field = 0;
            }
            "back" => return Action::Nav(NavAction::SwitchPane("tweaks")),
            _ => {}
        }
        Action::None
    }

    fn render_list(&self, area: RatatuiRect, buf: &mut Buffer, state: &AppState, palette: &Palette) {
        if state.custom_tweaks.is_empty() {
            Paragraph::new(Span::styled("No custom tweaks. [a] adds one.", palette.dim_style()))
                .render(RatatuiRect::new(area.x + 1, area.y, area.width.saturating_sub(2), 1), buf);
            return;
        }
        let rows = area.height as usize;
        let start = self.selected.saturating_sub(rows.saturating_sub(1));
        for (i, custom) in state.custom_tweaks.iter().enumerate().skip(start).take(rows) {
            let y = area.y + (i - start) as u16;
            let is_selected = i == self.selected;
            let style = if is_selected { palette.selected_style() } else { palette.text_style() };
            let check_style = if custom.is_enabled { style.fg(palette.enabled.into()) } else { style };
            let line = Line::from(vec![
                Span::styled(if is_selected { "> " } else { "  " }, style),
                Span::styled(if custom.is_enabled { "[x] " } else { "[ ] " }, check_style),
                Span::styled(fit(&custom.name, 40), style),
                Span::styled(format!("  {}", custom.shader.file_name()), palette.dim_style()),
            ]);
            Paragraph::new(line).render(RatatuiRect::new(area.x, y, area.width, 1), buf);
        }
    }

    fn render_form(&mut self, area: RatatuiRect, buf: &mut Buffer, custom: &CustomTweak, palette: &Palette) {
        let label_width = 22_u16;
        for (i, field) in Field::ALL.iter().enumerate() {
            let y = area.y + i as u16 * 2;
            if y >= area.y + area.height {
                break;
            }
            let is_selected = i == self.field;
            let style = if is_selected { palette.selected_style() } else { palette.dim_style() };
            if is_selected {
                if let Some(cell) = buf.cell_mut((area.x, y)) {
                    cell.set_char('>').set_style(style);
                }
            }
            Paragraph::new(Span::styled(field.label(), style))
                .render(RatatuiRect::new(area.x + 2, y, label_width, 1), buf);

            let value_x = area.x + 2 + label_width;
            let value_width = area.width.saturating_sub(label_width + 3);
            if is_selected && self.editing {
                self.edit_input.render_buf(buf, value_x, y, value_width, palette);
                continue;
            }
            let value = field_value(custom, *field);
            let value = if *field == Field::Shader { format!("< {} >", value) } else { value };
            Paragraph::new(Span::styled(fit(&value, value_width as usize), palette.text_style()))
                .render(RatatuiRect::new(value_x, y, value_width, 1), buf);
        }

        let mut y = area.y + Field::ALL.len() as u16 * 2;
        if let Some(ref error) = self.error {
            let err_style = ratatui::style::Style::from(Style::new().fg(palette.error));
            Paragraph::new(Span::styled(error.as_str(), err_style))
                .render(RatatuiRect::new(area.x + 2, y, area.width.saturating_sub(4), 1), buf);
            y += 1;
        }
        if y < area.y + area.height {
            let state_label = if custom.is_enabled { "Enabled" } else { "Disabled" };
            Paragraph::new(Span::styled(
                format!("{}  [Enter] Edit  [Left/Right] Change  [Space] Toggle  [Esc] Back", state_label),
                palette.dim_style(),
            ))
            .render(RatatuiRect::new(area.x + 2, y, area.width.saturating_sub(4), 1), buf);
        }
    }
}

impl Pane for CustomTweakPane {
    fn id(&self) -> &'static str {
        "custom"
    }

    fn handle_action(&mut self, action: &str, _event: &InputEvent, state: &AppState) -> Action {
        if self.form {
            match state.custom_tweaks.get(self.selected) {
                Some(custom) => return self.handle_form(action, custom),
                None => {
                    self.form = false;
                    self.stop_edit();
                }
            }
        }
        self.handle_list(action, state.custom_tweaks.len())
    }

    fn handle_raw_input(&mut self, event: &InputEvent, _state: &AppState) -> Action {
        if self.editing {
            self.edit_input.handle_input(event);
        }
        Action::None
    }

    fn render(&mut self, area: RatatuiRect, buf: &mut Buffer, state: &AppState) {
        let palette = Palette::for_theme(state.settings.theme);
        let form_custom = if self.form { state.custom_tweaks.get(self.selected) } else { None };
        let title = match form_custom {
            Some(custom) => format!(" Custom tweak: {} ({}) ", custom.name, custom.key),
            None => format!(" Custom tweaks ({}) ", state.custom_tweaks.len()),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(palette.border_style())
            .title_style(palette.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        match form_custom {
            Some(custom) => self.render_form(inner, buf, custom, &palette),
            None => {
                let list = RatatuiRect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1));
                self.render_list(list, buf, state, &palette);
                let footer = RatatuiRect::new(inner.x + 1, inner.y + inner.height.saturating_sub(1), inner.width.saturating_sub(2), 1);
                Paragraph::new(Span::styled(
                    "[a] Add  [Enter] Open  [Space] Toggle  [x] Remove  [Esc] Back",
                    palette.dim_style(),
                ))
                .render(footer, buf);
            }
        }
    }

    fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn on_enter(&mut self, state: &AppState) {
        self.selected = self.selected.min(state.custom_tweaks.len().saturating_sub(1));
        self.stop_edit();
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
