//! Application settings stored in `config.txt` as `key, value` lines.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::activity::ActivityLog;
use crate::error::{Error, Result};

pub const SETTINGS_FILE: &str = "config.txt";

/// Recorded simulator version when the settings file has none.
pub const DEFAULT_SIM_VERSION: &str = "5.3.17.28160";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Synthwave,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::Synthwave];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
            Theme::Synthwave => "Synthwave",
        };
        f.write_str(s)
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub active_preset: Option<PathBuf>,
    pub loaded_preset: Option<PathBuf>,
    pub sim_version: String,
    pub theme: Theme,
    pub backup_dir: Option<PathBuf>,
    pub sim_dir: Option<PathBuf>,
    pub shader_cache: Option<PathBuf>,
    pub main_width: Option<f64>,
    pub main_height: Option<f64>,
    /// Width of the tweak list column
    pub col1_width: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_preset: None,
            loaded_preset: None,
            sim_version: DEFAULT_SIM_VERSION.to_string(),
            theme: Theme::default(),
            backup_dir: None,
            sim_dir: None,
            shader_cache: None,
            main_width: None,
            main_height: None,
            col1_width: None,
        }
    }
}

impl Settings {
    /// Read settings; a missing file yields defaults.
    pub fn load(path: &Path, log: &mut ActivityLog) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::parse(&text, log))
    }

    pub fn parse(text: &str, log: &mut ActivityLog) -> Self {
        let mut settings = Self::default();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();

            match parts.as_slice() {
                [_] => log.warn(format!(
                    "Missing data in {}. Check line {} contains {{key}}, {{value}}",
                    SETTINGS_FILE,
                    i + 1
                )),
                [key, value] => settings.apply(key, value, i + 1, log),
                _ => log.warn(format!(
                    "Too much data in {}. Check line {} contains only {{key}}, {{value}}",
                    SETTINGS_FILE,
                    i + 1
                )),
            }
        }

        settings
    }

    fn apply(&mut self, key: &str, value: &str, line: usize, log: &mut ActivityLog) {
        let mut number = |v: &str| match v.parse::<f64>() {
            Ok(n) => Some(n),
            Err(_) => {
                log.warn(format!("Invalid number '{}' for {} on line {} of {}", v, key, line, SETTINGS_FILE));
                None
            }
        };
        match key {
            "Active_Preset" => self.active_preset = Some(PathBuf::from(value)),
            "Loaded_Preset" => self.loaded_preset = Some(PathBuf::from(value)),
            "P3D_Version" => self.sim_version = value.to_string(),
            "Theme" => {
                if let Ok(theme) = value.parse() {
                    self.theme = theme;
                }
            }
            "Backup_Directory" => self.backup_dir = Some(PathBuf::from(value)),
            "P3D_Directory" => self.sim_dir = Some(PathBuf::from(value)),
            "Shader_Cache" => self.shader_cache = Some(PathBuf::from(value)),
            "Main_Width" => self.main_width = number(value),
            "Main_Height" => self.main_height = number(value),
            "Col1_Width" => self.col1_width = number(value),
            other => log::debug!("ignoring unknown setting {}", other),
        }
    }

    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        let existing = |p: &Option<PathBuf>| p.as_ref().filter(|p| p.exists()).map(|p| p.display().to_string());

        if let Some(p) = existing(&self.active_preset) {
            lines.push(format!("Active_Preset, {}", p));
        }
        if let Some(p) = existing(&self.loaded_preset) {
            lines.push(format!("Loaded_Preset, {}", p));
        }
        lines.push(format!("P3D_Version, {}", self.sim_version));
        lines.push(format!("Theme, {}", self.theme));
        if let Some(ref d) = self.backup_dir {
            lines.push(format!("Backup_Directory, {}", d.display()));
        }
        if let Some(ref d) = self.sim_dir {
            lines.push(format!("P3D_Directory, {}", d.display()));
        }
        if let Some(ref d) = self.shader_cache {
            lines.push(format!("Shader_Cache, {}", d.display()));
        }
        for (key, value) in [
            ("Main_Width", self.main_width),
            ("Main_Height", self.main_height),
            ("Col1_Width", self.col1_width),
        ] {
            if let Some(v) = value {
                lines.push(format!("{}, {}", key, v));
            }
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_text()).map_err(|e| Error::io(path, e))
    }
}
