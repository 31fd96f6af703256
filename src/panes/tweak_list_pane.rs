use std::any::Any;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect as RatatuiRect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use openshade_core::state::{Category, Control, Parameter, Tweak};

use crate::state::AppState;
use crate::ui::layout_helpers::fit;
use crate::ui::{Action, InputEvent, Keymap, NavAction, Palette, Pane, Style, TweakAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Header(Category),
    Tweak(usize),
}

/// Catalog tweaks under category headers. The catalog is already grouped.
fn build_rows(tweaks: &[Tweak]) -> Vec<Row> {
    let mut rows = Vec::with_capacity(tweaks.len() + 8);
    let mut current = None;
    for (i, tweak) in tweaks.iter().enumerate() {
        if current != Some(tweak.category) {
            current = Some(tweak.category);
            rows.push(Row::Header(tweak.category));
        }
        rows.push(Row::Tweak(i));
    }
    rows
}

/// One-line rendering of a parameter value for summaries
pub(crate) fn value_label(param: &Parameter) -> String {
    match param.control {
        Control::Checkbox => if param.is_checked() { "on" } else { "off" }.to_string(),
        Control::Combobox => param.selected_label().unwrap_or(param.value.as_str()).to_string(),
        _ => param.value.clone(),
    }
}

pub struct TweakListPane {
    keymap: Keymap,
    /// Catalog index of the highlighted tweak
    selected: usize,
    scroll: usize,
    page: usize,
}

impl TweakListPane {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            selected: 0,
            scroll: 0,
            page: 10,
        }
    }

    pub fn selected_tweak(&self) -> usize {
        self.selected
    }

    fn move_by(&mut self, delta: isize, count: usize) {
        if count == 0 {
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, count as isize - 1);
        self.selected = next as usize;
    }

    fn jump_category(&mut self, tweaks: &[Tweak], forward: bool) {
        let Some(current) = tweaks.get(self.selected).map(|t| t.category) else {
            return;
        };
        let target = if forward {
            tweaks.iter().position(|t| t.category > current)
        } else {
            let prev = tweaks.iter().filter(|t| t.category < current).map(|t| t.category).max();
            prev.and_then(|c| tweaks.iter().position(|t| t.category == c))
        };
        if let Some(i) = target {
            self.selected = i;
        }
    }

    fn render_list(&mut self, area: RatatuiRect, buf: &mut Buffer, state: &AppState, palette: &Palette) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Tweaks ({}/{} enabled) ", state.enabled_count(), state.tweaks.len() + state.custom_tweaks.len()))
            .border_style(palette.border_style())
            .title_style(palette.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = build_rows(&state.tweaks);
        let visible = inner.height as usize;
        self.page = visible.max(1);
        let selected_row = rows
            .iter()
            .position(|r| *r == Row::Tweak(self.selected))
            .unwrap_or(0);
        // Keep the header of the first visible group on screen when possible
        if selected_row < self.scroll {
            self.scroll = selected_row.saturating_sub(1);
        } else if selected_row >= self.scroll + visible {
            self.scroll = selected_row + 1 - visible;
        }

        let width = inner.width as usize;
        for (i, row) in rows.iter().enumerate().skip(self.scroll).take(visible) {
            let y = inner.y + (i - self.scroll) as u16;
            let line = match *row {
                Row::Header(category) => Line::from(Span::styled(
                    fit(&format!("-- {} --", category.label()), width),
                    ratatui::style::Style::from(Style::new().fg(palette.accent).bold()),
                )),
                Row::Tweak(idx) => {
                    let tweak = &state.tweaks[idx];
                    let is_selected = idx == self.selected;
                    let base = if is_selected { palette.selected_style() } else { palette.text_style() };
                    let check_style = if tweak.is_enabled {
                        base.fg(palette.enabled.into())
                    } else {
                        base
                    };
                    let marker = if is_selected { ">" } else { " " };
                    let check = if tweak.is_enabled { "[x]" } else { "[ ]" };
                    let mut spans = vec![
                        Span::styled(format!("{} ", marker), base),
                        Span::styled(check, check_style),
                        Span::styled(" ", base),
                        Span::styled(fit(&tweak.name, width.saturating_sub(9)), base),
                    ];
                    if tweak.is_dirty() {
                        spans.push(Span::styled(" *", base.fg(palette.changed.into())));
                    }
                    Line::from(spans)
                }
            };
            Paragraph::new(line).render(RatatuiRect::new(inner.x, y, inner.width, 1), buf);
        }
    }

    fn render_detail(&self, area: RatatuiRect, buf: &mut Buffer, state: &AppState, palette: &Palette) {
        let Some(tweak) = state.tweaks.get(self.selected) else {
            return;
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", tweak.name))
            .border_style(palette.border_style())
            .title_style(palette.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Category: ", palette.dim_style()),
                Span::styled(tweak.category.label(), palette.text_style()),
            ]),
            Line::from(""),
            Line::from(Span::styled(tweak.description.as_str(), palette.text_style())),
            Line::from(""),
        ];
        if tweak.parameters.is_empty() {
            lines.push(Line::from(Span::styled("No parameters", palette.dim_style())));
        }
        for param in &tweak.parameters {
            let style = if param.has_changed() {
                ratatui::style::Style::from(Style::new().fg(palette.changed))
            } else {
                palette.text_style()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", param.name), palette.dim_style()),
                Span::styled(value_label(param), style),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Space] Toggle  [Enter] Edit  [d] Defaults  [p] Previous",
            palette.dim_style(),
        )));
        Paragraph::new(lines).wrap(Wrap { trim: false }).render(inner, buf);
    }
}

impl Pane for TweakListPane {
    fn id(&self) -> &'static str {
        "tweaks"
    }

    fn handle_action(&mut self, action: &str, _event: &InputEvent, state: &AppState) -> Action {
        let count = state.tweaks.len();
        match action {
            "prev" => self.move_by(-1, count),
            "next" => self.move_by(1, count),
            "page_up" => self.move_by(-(self.page as isize), count),
            "page_down" => self.move_by(self.page as isize, count),
            "first" => self.selected = 0,
            "last" => self.selected = count.saturating_sub(1),
            "next_category" => self.jump_category(&state.tweaks, true),
            "prev_category" => self.jump_category(&state.tweaks, false),
            "toggle" if self.selected < count => return Action::Tweak(TweakAction::Toggle(self.selected)),
            "edit" if self.selected < count => return Action::Nav(NavAction::PushPane("tweak_edit")),
            "reset_defaults" if self.selected < count => {
                return Action::Tweak(TweakAction::ResetDefaults(self.selected))
            }
            "reset_previous" if self.selected < count => {
                return Action::Tweak(TweakAction::ResetPrevious(self.selected))
            }
            _ => {}
        }
        Action::None
    }

    fn render(&mut self, area: RatatuiRect, buf: &mut Buffer, state: &AppState) {
        let palette = Palette::for_theme(state.settings.theme);
        let list_width = (area.width * 45 / 100).max(30).min(area.width);
        let list = RatatuiRect::new(area.x, area.y, list_width, area.height);
        self.render_list(list, buf, state, &palette);
        if area.width > list_width {
            let detail = RatatuiRect::new(area.x + list_width, area.y, area.width - list_width, area.height);
            self.render_detail(detail, buf, state, &palette);
        }
    }

    fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn on_enter(&mut self, state: &AppState) {
        self.selected = self.selected.min(state.tweaks.len().saturating_sub(1));
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
    fn rows_start_each_category_with_header() {
        let state = test_state();
        let rows = build_rows(&state.tweaks);
        assert!(matches!(rows[0], Row::Header(_)));
        let headers = rows.iter().filter(|r| matches!(r, Row::Header(_))).count();
        let mut categories: Vec<Category> = state.tweaks.iter().map(|t| t.category).collect();
        categories.dedup();
        assert_eq!(headers, categories.len());
    }

    #[test]
    fn navigation_and_toggle() {
        let state = test_state();
        let mut pane = TweakListPane::new(Keymap::new());
        let key = InputEvent::key(KeyCode::Down);
        pane.handle_action("prev", &key, &state);
        assert_eq!(pane.selected_tweak(), 0);
        pane.handle_action("last", &key, &state);
        assert_eq!(pane.selected_tweak(), state.tweaks.len() - 1);
        pane.handle_action("next", &key, &state);
        assert_eq!(pane.selected_tweak(), state.tweaks.len() - 1);
        assert_eq!(
            pane.handle_action("toggle", &key, &state),
            Action::Tweak(TweakAction::Toggle(state.tweaks.len() - 1))
        );
    }

    #[test]
    fn category_jumps_land_on_first_tweak() {
        let state = test_state();
        let mut pane = TweakListPane::new(Keymap::new());
        let key = InputEvent::key(KeyCode::Tab);
        pane.handle_action("next_category", &key, &state);
        let first_cat = state.tweaks[0].category;
        let idx = pane.selected_tweak();
        assert_ne!(state.tweaks[idx].category, first_cat);
        assert_eq!(state.tweaks[idx - 1].category, first_cat);
        pane.handle_action("prev_category", &key, &state);
        assert_eq!(pane.selected_tweak(), 0);
    }

    #[test]
    fn combobox_summary_uses_label() {
        let p = Parameter::choice("Mode", "Mode", 1, 0, &["Off", "Soft", "Hard"]);
        assert_eq!(value_label(&p), "Soft");
        let c = Parameter::checkbox("On", "On", true, false);
        assert_eq!(value_label(&c), "on");
    }
}
