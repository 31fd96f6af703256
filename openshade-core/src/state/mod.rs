pub mod custom;
pub mod param;
pub mod tweak;

pub use custom::{next_custom_key, CustomTweak};
pub use param::{format_number, Bounds, Control, ParamId, Parameter, Rgb};
pub use tweak::{Category, Tweak};

use std::path::{Path, PathBuf};

use crate::activity::ActivityLog;
use crate::config::Settings;
use crate::persistence::IniFile;
use crate::sim::SimPaths;

/// Fingerprint of everything a preset stores, taken at load/save time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SavedSnapshot {
    tweaks: Vec<(bool, Vec<String>)>,
    custom_tweaks: Vec<CustomTweak>,
    comment: String,
}

/// Top-level application state, owned by main.rs and passed to panes by reference.
pub struct AppState {
    /// Catalog order
    pub tweaks: Vec<Tweak>,
    pub custom_tweaks: Vec<CustomTweak>,
    pub comment: String,
    pub paths: SimPaths,
    pub settings: Settings,
    /// Where `settings` is saved on exit
    pub settings_path: PathBuf,
    /// Directory new presets are created in
    pub preset_dir: PathBuf,
    /// Preset being edited (None = nothing loaded yet)
    pub loaded_preset: Option<IniFile>,
    /// Preset last written to the shader files
    pub active_preset: Option<PathBuf>,
    pub log: ActivityLog,
    /// False while the shader backup is missing or incomplete
    pub can_apply: bool,
    /// Version of the installed simulator, when it could be determined
    pub sim_version: Option<String>,
    saved: SavedSnapshot,
}

impl AppState {
    pub fn new(tweaks: Vec<Tweak>, settings: Settings, settings_path: PathBuf, paths: SimPaths) -> Self {
        let preset_dir = settings_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut state = Self {
            tweaks,
            custom_tweaks: Vec::new(),
            comment: String::new(),
            paths,
            settings,
            settings_path,
            preset_dir,
            loaded_preset: None,
            active_preset: None,
            log: ActivityLog::new(),
            can_apply: true,
            sim_version: None,
            saved: SavedSnapshot::default(),
        };
        state.clear_changes_info();
        state.mark_saved();
        state
    }

    fn snapshot(&self) -> SavedSnapshot {
        SavedSnapshot {
            tweaks: self
                .tweaks
                .iter()
                .map(|t| (t.is_enabled, t.parameters.iter().map(|p| p.value.clone()).collect()))
                .collect(),
            custom_tweaks: self.custom_tweaks.clone(),
            comment: self.comment.clone(),
        }
    }

    pub fn mark_saved(&mut self) {
        self.saved = self.snapshot();
    }

    /// Edits since the last load or save, or a loaded preset whose file is gone.
    pub fn has_unsaved_changes(&self) -> bool {
        if self.snapshot() != self.saved {
            return true;
        }
        match self.loaded_preset {
            Some(ref ini) => !ini.path().exists(),
            None => false,
        }
    }

    /// Every tweak disabled with default parameters; custom tweaks dropped.
    pub fn reset_to_defaults(&mut self) {
        for tweak in &mut self.tweaks {
            tweak.is_enabled = false;
            tweak.reset_defaults();
        }
        self.custom_tweaks.clear();
    }

    /// Current values become the baselines the UI compares against.
    pub fn clear_changes_info(&mut self) {
        for tweak in &mut self.tweaks {
            tweak.commit();
        }
    }

    pub fn enabled_count(&self) -> usize {
        self.tweaks.iter().filter(|t| t.is_enabled).count()
            + self.custom_tweaks.iter().filter(|c| c.is_enabled).count()
    }

    pub fn tweak_index_by_name(&self, name: &str) -> Option<usize> {
        self.tweaks.iter().position(|t| t.name == name)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.tweak_index_by_name(name)
            .map(|i| self.tweaks[i].is_enabled)
            .unwrap_or(false)
    }

    pub fn loaded_preset_name(&self) -> Option<String> {
        self.loaded_preset.as_ref().map(IniFile::filename)
    }

    pub fn active_preset_name(&self) -> Option<String> {
        self.active_preset
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Copy preset locations into settings so they survive a restart.
    pub fn sync_settings(&mut self) {
        self.settings.loaded_preset = self.loaded_preset.as_ref().map(|p| p.path().to_path_buf());
        self.settings.active_preset = self.active_preset.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let tweaks = vec![
            Tweak::new("A", Category::Clouds, "Alpha", "")
                .with_param(Parameter::number("X", "X", 1.0, 2.0, 0.0, 5.0, Control::TextBox)),
            Tweak::new("B", Category::Hdr, "Beta", ""),
        ];
        AppState::new(tweaks, Settings::default(), PathBuf::from("/app/config.txt"), SimPaths::default())
    }

    #[test]
    fn fresh_state_has_no_unsaved_changes() {
        let s = state();
        assert!(!s.has_unsaved_changes());
        assert_eq!(s.preset_dir, PathBuf::from("/app"));
    }

    #[test]
    fn edits_are_detected_and_cleared_by_mark_saved() {
        let mut s = state();
        s.tweaks[0].parameters[0].set_value("3");
        assert!(s.has_unsaved_changes());
        s.mark_saved();
        assert!(!s.has_unsaved_changes());
        s.comment = "note".into();
        assert!(s.has_unsaved_changes());
    }

    #[test]
    fn missing_preset_file_counts_as_unsaved() {
        let mut s = state();
        s.loaded_preset = Some(IniFile::new("/nowhere/custom_preset.ini"));
        assert!(s.has_unsaved_changes());
    }

    #[test]
    fn reset_to_defaults_disables_and_clears_custom() {
        let mut s = state();
        s.tweaks[1].is_enabled = true;
        s.custom_tweaks.push(CustomTweak::new("CUSTOM_TWEAK_1", "c", crate::shaders::ShaderFile::Cloud));
        assert_eq!(s.enabled_count(), 2);
        s.reset_to_defaults();
        assert_eq!(s.enabled_count(), 0);
        assert_eq!(s.tweaks[0].value(0), "2");
        assert!(s.custom_tweaks.is_empty());
    }

    #[test]
    fn lookup_by_name() {
        let mut s = state();
        s.tweaks[1].is_enabled = true;
        assert_eq!(s.tweak_index_by_name("Beta"), Some(1));
        assert!(s.is_enabled("Beta"));
        assert!(!s.is_enabled("Gamma"));
    }
}
