use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

use openshade_core::activity::ActivityLog;
use openshade_core::catalog::generate_tweaks;
use openshade_core::config::{Settings, SETTINGS_FILE};
use openshade_core::dispatch::{load_preset_file, startup_guard, verify_backup, StartupGuard};
use openshade_core::persistence::next_preset_path;
use openshade_core::sim::{current_version, SimPaths};

use crate::panes::{ConfirmPane, PendingAction};
use crate::state::AppState;
use crate::ui::PaneManager;

/// Where the simulator lives and which settings file to use, from the CLI.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub sim_dir: Option<PathBuf>,
    pub sim_version: Option<String>,
    pub config: Option<PathBuf>,
}

/// Directory holding settings, presets and the default backup folder
pub fn app_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("openshade"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("openshade"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("openshade.log")
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}

/// File logging always; terminal logging only when ratatui does not own the terminal.
/// Without a log file, CLI runs still log to the terminal.
pub fn init_logging(to_terminal: bool, verbose: bool) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .build();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    match open_log_file(&log_path()) {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config.clone(), file)),
        Err(e) => eprintln!("openshade: file logging disabled: {:#}", e),
    }
    if to_terminal {
        let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
        loggers.push(TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto));
    }
    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("openshade: logger already initialised: {}", e);
    }
}

/// Build the application state: settings, simulator paths and version, and
/// the presets that were open at last exit.
pub fn load_state(opts: &StartupOptions) -> Result<AppState> {
    let settings_path = match opts.config {
        Some(ref p) => p.clone(),
        None => {
            let dir = app_dir();
            fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
            dir.join(SETTINGS_FILE)
        }
    };
    let base_dir = settings_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut log = ActivityLog::new();
    let settings = Settings::load(&settings_path, &mut log)
        .with_context(|| format!("Failed to read settings {}", settings_path.display()))?;
    let paths = SimPaths::resolve(&settings, opts.sim_dir.as_deref(), &base_dir);

    let mut state = AppState::new(generate_tweaks(), settings, settings_path, paths);
    state.log = log;
    state.paths.validate(&mut state.log);

    state.sim_version = current_version(state.paths.sim_dir.as_deref(), opts.sim_version.as_deref());
    match state.sim_version {
        Some(ref v) => log::info!("Prepar3D version {}", v),
        None => state
            .log
            .info("Prepar3D version could not be determined, the version check is skipped."),
    }

    restore_presets(&mut state);
    Ok(state)
}

/// Reopen the loaded preset and remember the active one from last session.
fn restore_presets(state: &mut AppState) {
    if let Some(active) = state.settings.active_preset.clone() {
        if active.is_file() {
            state.active_preset = Some(active);
        } else {
            state.log.warn(format!("Active Preset file [{}] not found", active.display()));
        }
    }

    if let Some(loaded) = state.settings.loaded_preset.clone() {
        match load_preset_file(state, &loaded, false) {
            Ok(()) => {
                let name = state.loaded_preset_name().unwrap_or_default();
                state.log.success(format!("Preset [{}] loaded", name));
            }
            Err(e) => {
                state.log.error(format!("Failed to load preset file [{}]. {}", loaded.display(), e));
            }
        }
    }
}

/// Check the backup and, when it is missing or stale, ask before taking one.
pub fn startup_prompt(state: &mut AppState, panes: &mut PaneManager) {
    let guard = startup_guard(state);
    let pending = match guard {
        StartupGuard::Ready => {
            verify_backup(state);
            return;
        }
        StartupGuard::NeedsBackup => {
            state.can_apply = false;
            PendingAction::Backup
        }
        StartupGuard::VersionChanged { .. } => {
            verify_backup(state);
            PendingAction::UpdateBackup
        }
    };
    if let Some(message) = guard.prompt() {
        if let Some(confirm) = panes.get_pane_mut::<ConfirmPane>("confirm") {
            confirm.set_confirm(&message, pending);
        }
        panes.push_to("confirm", state);
    }
}

/// Text of the save-before-quit question
pub fn unsaved_changes_prompt(state: &AppState) -> String {
    match state.loaded_preset_name() {
        Some(name) => format!(
            "Some changes for the preset [{}] were not saved.\nWould you like to save them now?",
            name
        ),
        None => {
            let next = next_preset_path(&state.preset_dir);
            let name = next
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!(
                "Some changes were not saved.\nWould you like to save them now as a new preset [{}] ?",
                name
            )
        }
    }
}

/// Persist preset locations and settings; failures are logged.
pub fn save_settings(state: &mut AppState) {
    state.sync_settings();
    if let Err(e) = state.settings.save(&state.settings_path) {
        log::error!("Could not save settings. {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    #[test]
    fn log_file_creates_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("openshade.log");
        open_log_file(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn log_file_error_names_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();
        let err = open_log_file(&blocker.join("openshade.log")).unwrap_err();
        assert!(format!("{:#}", err).contains(&blocker.display().to_string()));
    }

    #[test]
    fn loads_presets_recorded_in_settings() {
        let dir = tempfile::tempdir().unwrap();
        let preset = dir.path().join("evening.ini");
        let mut source = test_state();
        source.preset_dir = dir.path().to_path_buf();
        source.tweaks[0].is_enabled = true;
        source.comment = "dusk".into();
        let mut ini = openshade_core::persistence::IniFile::new(&preset);
        openshade_core::persistence::save_preset(&source.tweaks, &source.custom_tweaks, &source.comment, &mut ini)
            .unwrap();

        let config = dir.path().join("config.txt");
        let settings = Settings {
            loaded_preset: Some(preset.clone()),
            active_preset: Some(dir.path().join("gone.ini")),
            ..Settings::default()
        };
        settings.save(&config).unwrap();

        let opts = StartupOptions {
            sim_dir: Some(dir.path().join("sim")),
            sim_version: Some("5.4.9.28482".into()),
            config: Some(config),
        };
        let state = load_state(&opts).unwrap();
        assert_eq!(state.loaded_preset_name().as_deref(), Some("evening.ini"));
        assert!(state.tweaks[0].is_enabled);
        assert_eq!(state.comment, "dusk");
        assert!(state.active_preset.is_none());
        assert_eq!(state.sim_version.as_deref(), Some("5.4.9.28482"));
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn quit_prompt_names_the_preset() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = test_state();
        state.preset_dir = dir.path().to_path_buf();
        assert!(unsaved_changes_prompt(&state).contains("as a new preset [custom_preset.ini]"));
        state.loaded_preset = Some(openshade_core::persistence::IniFile::new(dir.path().join("a.ini")));
        assert!(unsaved_changes_prompt(&state).starts_with("Some changes for the preset [a.ini]"));
    }
}
