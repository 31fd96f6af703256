use openshade_core::config::Theme;
use openshade_core::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::new(230, 230, 230);
    pub const BLACK: Color = Color::new(10, 10, 14);
    pub const DARK_GRAY: Color = Color::new(110, 110, 120);
    pub const YELLOW: Color = Color::new(240, 200, 60);
    pub const CYAN: Color = Color::new(80, 200, 220);
    pub const LIME: Color = Color::new(120, 220, 90);
    pub const ORANGE: Color = Color::new(240, 150, 50);
    pub const RED: Color = Color::new(220, 60, 60);
    pub const PINK: Color = Color::new(240, 90, 200);
    pub const PURPLE: Color = Color::new(150, 90, 240);
}

impl From<Color> for ratatui::style::Color {
    fn from(c: Color) -> Self {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Style {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(mut self, c: Color) -> Self {
        self.fg = Some(c);
        self
    }

    pub fn bg(mut self, c: Color) -> Self {
        self.bg = Some(c);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl From<Style> for ratatui::style::Style {
    fn from(s: Style) -> Self {
        let mut out = ratatui::style::Style::default();
        if let Some(fg) = s.fg {
            out = out.fg(fg.into());
        }
        if let Some(bg) = s.bg {
            out = out.bg(bg.into());
        }
        if s.bold {
            out = out.add_modifier(ratatui::style::Modifier::BOLD);
        }
        out
    }
}

/// Colors for one UI theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub text: Color,
    pub dim: Color,
    pub border: Color,
    pub accent: Color,
    pub selection_bg: Color,
    /// Rows and values that differ from their baseline
    pub changed: Color,
    pub enabled: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::new(18, 18, 24),
                text: Color::WHITE,
                dim: Color::DARK_GRAY,
                border: Color::CYAN,
                accent: Color::ORANGE,
                selection_bg: Color::new(40, 50, 80),
                changed: Color::YELLOW,
                enabled: Color::LIME,
                success: Color::LIME,
                warning: Color::YELLOW,
                error: Color::RED,
            },
            Theme::Light => Self {
                bg: Color::new(238, 238, 232),
                text: Color::new(30, 30, 30),
                dim: Color::new(120, 120, 120),
                border: Color::new(40, 90, 160),
                accent: Color::new(190, 90, 20),
                selection_bg: Color::new(200, 215, 240),
                changed: Color::new(170, 110, 0),
                enabled: Color::new(30, 130, 40),
                success: Color::new(30, 130, 40),
                warning: Color::new(170, 110, 0),
                error: Color::new(180, 30, 30),
            },
            Theme::Synthwave => Self {
                bg: Color::new(26, 16, 40),
                text: Color::new(240, 220, 255),
                dim: Color::new(140, 110, 170),
                border: Color::PINK,
                accent: Color::CYAN,
                selection_bg: Color::new(70, 30, 100),
                changed: Color::new(255, 200, 80),
                enabled: Color::CYAN,
                success: Color::CYAN,
                warning: Color::new(255, 200, 80),
                error: Color::new(255, 80, 120),
            },
        }
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.success,
            Severity::Info => self.text,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }

    pub fn text_style(&self) -> ratatui::style::Style {
        Style::new().fg(self.text).into()
    }

    pub fn dim_style(&self) -> ratatui::style::Style {
        Style::new().fg(self.dim).into()
    }

    pub fn border_style(&self) -> ratatui::style::Style {
        Style::new().fg(self.border).into()
    }

    pub fn selected_style(&self) -> ratatui::style::Style {
        Style::new().fg(self.text).bg(self.selection_bg).bold().into()
    }
}
