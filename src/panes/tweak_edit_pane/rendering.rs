use ratatui::buffer::Buffer;
use ratatui::layout::Rect as RatatuiRect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use openshade_core::state::{format_number, Bounds, Control, Parameter};

use super::TweakEditPane;
use crate::state::AppState;
use crate::ui::layout_helpers::fit;
use crate::ui::{Palette, Style};

const NAME_WIDTH: usize = 30;

impl TweakEditPane {
    pub(super) fn render_impl(&mut self, area: RatatuiRect, buf: &mut Buffer, state: &AppState) {
        let palette = Palette::for_theme(state.settings.theme);
        let Some(tweak) = self.current(state) else {
            return;
        };

        let status = if tweak.is_enabled { "enabled" } else { "disabled" };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ({}) ", tweak.name, status))
            .border_style(palette.border_style())
            .title_style(ratatui::style::Style::from(Style::new().fg(if tweak.is_enabled {
                palette.enabled
            } else {
                palette.border
            })));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut y = inner.y;
        if !tweak.description.is_empty() {
            let desc_area = RatatuiRect::new(inner.x + 1, y, inner.width.saturating_sub(2), 2);
            Paragraph::new(Span::styled(tweak.description.as_str(), palette.dim_style()))
                .wrap(Wrap { trim: true })
                .render(desc_area, buf);
            y += 3;
        }

        if tweak.parameters.is_empty() {
            let msg = "This tweak has no parameters. [Space] or [t] switches it on and off.";
            Paragraph::new(Span::styled(msg, palette.dim_style()))
                .render(RatatuiRect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1), buf);
            return;
        }

        let bottom = inner.y + inner.height.saturating_sub(3);
        for (i, param) in tweak.parameters.iter().enumerate() {
            if y >= bottom {
                break;
            }
            let is_selected = i == self.selected_row;
            self.render_param_row(buf, inner.x, y, inner.width, param, is_selected, &palette);
            y += 1;
        }

        // Selected parameter details
        if let Some(param) = tweak.parameters.get(self.selected_row) {
            let mut info = vec![Span::styled(param.data_name.as_str(), palette.dim_style())];
            if let Bounds::Range { min, max } = param.bounds {
                if matches!(param.control, Control::Text | Control::Rgb) {
                    info.push(Span::styled(
                        format!("  range {} .. {}", format_number(min), format_number(max)),
                        palette.dim_style(),
                    ));
                }
            }
            info.push(Span::styled(
                format!("  default {}", param.default_value),
                palette.dim_style(),
            ));
            if !param.description.is_empty() {
                info.push(Span::styled(format!("  {}", param.description), palette.text_style()));
            }
            Paragraph::new(Line::from(info))
                .render(RatatuiRect::new(inner.x + 1, bottom, inner.width.saturating_sub(2), 1), buf);
        }

        let hint = "[Left/Right] Adjust  [Enter] Type  [Space] Toggle  [ [ ] ] Channel  [d] Defaults  [p] Previous  [Esc] Back";
        Paragraph::new(Span::styled(fit(hint, inner.width.saturating_sub(2) as usize), palette.dim_style()))
            .render(RatatuiRect::new(inner.x + 1, bottom + 1, inner.width.saturating_sub(2), 1), buf);
    }

    #[allow(clippy::too_many_arguments)]
    fn render_param_row(
        &mut self,
        buf: &mut Buffer,
        x: u16,
        y: u16,
        width: u16,
        param: &Parameter,
        is_selected: bool,
        palette: &Palette,
    ) {
        let row_style = if is_selected { palette.selected_style() } else { palette.text_style() };

        if is_selected {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char('>').set_style(row_style);
            }
        }

        let name = format!("{:w$}", fit(&param.name, NAME_WIDTH), w = NAME_WIDTH);
        let name_style = if param.has_changed() {
            row_style.fg(palette.changed.into())
        } else {
            row_style
        };
        Paragraph::new(Span::styled(name, name_style)).render(RatatuiRect::new(x + 2, y, NAME_WIDTH as u16, 1), buf);

        let value_x = x + 3 + NAME_WIDTH as u16;
        let value_width = width.saturating_sub(value_x - x + 1);
        if is_selected && self.editing {
            self.edit_input.render_buf(buf, value_x, y, value_width.min(24), palette);
            return;
        }

        let mut spans = match param.control {
            Control::Checkbox => vec![Span::styled(
                if param.is_checked() { "[x]" } else { "[ ]" },
                row_style,
            )],
            Control::Combobox => vec![Span::styled(
                format!("< {} >", param.selected_label().unwrap_or("?")),
                row_style,
            )],
            Control::Rgb => rgb_spans(param, is_selected.then_some(self.channel), row_style, palette),
            Control::Text | Control::TextBox => {
                let mut spans = vec![Span::styled(format!("{:10}", param.value), row_style)];
                if let (Bounds::Range { min, max }, Some(v)) = (param.bounds, param.numeric()) {
                    spans.push(Span::styled(" ", row_style));
                    spans.push(Span::styled(
                        render_slider(v, min, max, 16),
                        row_style.fg(palette.accent.into()),
                    ));
                }
                spans
            }
        };
        if param.has_changed() {
            spans.push(Span::styled(
                format!("  was {}", param.previous_display()),
                palette.dim_style(),
            ));
        }
        Paragraph::new(Line::from(spans)).render(RatatuiRect::new(value_x, y, value_width, 1), buf);
    }
}

fn rgb_spans<'a>(
    param: &Parameter,
    channel: Option<usize>,
    row_style: ratatui::style::Style,
    palette: &Palette,
) -> Vec<Span<'a>> {
    let Some(rgb) = param.rgb_value() else {
        return vec![Span::styled(param.value.clone(), row_style)];
    };
    let mut spans = Vec::new();
    for (i, label) in ["R", "G", "B"].iter().enumerate() {
        let style = if channel == Some(i) {
            ratatui::style::Style::from(Style::new().fg(palette.bg).bg(palette.accent).bold())
        } else {
            row_style
        };
        spans.push(Span::styled(format!("{} {:.2}", label, rgb.channel(i)), style));
        spans.push(Span::styled("  ", row_style));
    }
    spans
}

/// `[=====-----]` position of `value` within `min..max`
fn render_slider(value: f64, min: f64, max: f64, width: usize) -> String {
    let span = max - min;
    let frac = if span > 0.0 { ((value - min) / span).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (frac * width as f64).round() as usize;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    s.push_str(&"=".repeat(filled));
    s.push_str(&"-".repeat(width - filled));
    s.push(']');
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_fills_proportionally() {
        assert_eq!(render_slider(0.0, 0.0, 1.0, 4), "[----]");
        assert_eq!(render_slider(0.5, 0.0, 1.0, 4), "[==--]");
        assert_eq!(render_slider(9.0, 0.0, 1.0, 4), "[====]");
    }
}
