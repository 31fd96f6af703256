use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use super::layout_helpers::fit;
use super::style::{Palette, Style};
use crate::state::AppState;

const TABS: &[(&str, &str)] = &[
    ("F1", "Tweaks"),
    ("F2", "Custom"),
    ("F3", "Log"),
    ("F4", "Comment"),
];

/// Header tabs and the status footer drawn around every pane.
pub struct Frame;

impl Frame {
    pub fn new() -> Self {
        Self
    }

    /// Draw chrome and return the area left for the active pane.
    pub fn render(&self, area: Rect, buf: &mut Buffer, state: &AppState, active_pane: &str) -> Rect {
        let palette = Palette::for_theme(state.settings.theme);
        buf.set_style(area, ratatui::style::Style::from(Style::new().fg(palette.text).bg(palette.bg)));
        if area.height < 4 {
            return area;
        }

        self.render_header(Rect::new(area.x, area.y, area.width, 1), buf, &palette, active_pane);
        let footer = Rect::new(area.x, area.y + area.height - 2, area.width, 2);
        self.render_footer(footer, buf, state, &palette);

        Rect::new(area.x, area.y + 1, area.width, area.height - 3)
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer, palette: &Palette, active_pane: &str) {
        let active_tab = match active_pane {
            "tweaks" | "tweak_edit" => "Tweaks",
            "custom" => "Custom",
            "log" => "Log",
            "comment" => "Comment",
            _ => "",
        };
        let mut spans = vec![Span::styled(
            " OpenShade ",
            ratatui::style::Style::from(Style::new().fg(palette.bg).bg(palette.accent).bold()),
        )];
        for (key, label) in TABS {
            let style = if *label == active_tab {
                palette.selected_style()
            } else {
                palette.dim_style()
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!("{} {}", key, label), style));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer, state: &AppState, palette: &Palette) {
        let loaded = state.loaded_preset_name().unwrap_or_else(|| "(none)".to_string());
        let active = state.active_preset_name().unwrap_or_else(|| "(none)".to_string());
        let mut status = vec![
            Span::styled(" Preset: ", palette.dim_style()),
            Span::styled(loaded, palette.text_style()),
        ];
        if state.has_unsaved_changes() {
            status.push(Span::styled(" *", ratatui::style::Style::from(Style::new().fg(palette.changed))));
        }
        status.push(Span::styled("  Active: ", palette.dim_style()));
        status.push(Span::styled(active, palette.text_style()));
        status.push(Span::styled(
            format!("  Enabled: {}", state.enabled_count()),
            palette.dim_style(),
        ));
        if !state.can_apply {
            status.push(Span::styled(
                "  [backup missing]",
                ratatui::style::Style::from(Style::new().fg(palette.error)),
            ));
        }
        Paragraph::new(Line::from(status)).render(Rect::new(area.x, area.y, area.width, 1), buf);

        if let Some(entry) = state.log.last() {
            let line = fit(&entry.display_line(), area.width.saturating_sub(2) as usize);
            let style = ratatui::style::Style::from(Style::new().fg(palette.severity(entry.severity)));
            Paragraph::new(Line::from(Span::styled(format!(" {}", line), style)))
                .render(Rect::new(area.x, area.y + 1, area.width, 1), buf);
        }
    }
}
