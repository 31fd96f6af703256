use std::path::Path;

use crate::action::{DispatchResult, PresetAction};
use crate::apply;
use crate::error::{Error, Result};
use crate::persistence::{self, IniFile};
use crate::state::AppState;

/// Read a preset into the state. The file is parsed before anything is
/// touched, so a failure leaves the current preset in place.
///
/// With `monitor_changes` the values held before loading stay as baselines,
/// letting the UI show what the preset changed.
pub fn load_preset_file(state: &mut AppState, path: &Path, monitor_changes: bool) -> Result<()> {
    if !path.is_file() {
        return Err(Error::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "preset file not found"),
        ));
    }
    let ini = IniFile::open(path)?;

    persistence::load_tweaks(&mut state.tweaks, &ini, monitor_changes, &mut state.log);
    state.custom_tweaks = persistence::load_custom_tweaks(&ini, &mut state.log);
    state.comment = persistence::load_comments(&ini);
    state.loaded_preset = Some(ini);
    state.mark_saved();
    Ok(())
}

fn save_to(state: &mut AppState, mut ini: IniFile) -> Result<IniFile> {
    persistence::save_preset(&state.tweaks, &state.custom_tweaks, &state.comment, &mut ini)?;
    Ok(ini)
}

fn report_saved(state: &mut AppState, ini: IniFile) {
    state.log.success(format!(
        "Preset [{}] saved in {}",
        ini.filename(),
        ini.path().display()
    ));
    state.loaded_preset = Some(ini);
    state.mark_saved();
}

pub(super) fn dispatch_preset(action: &PresetAction, state: &mut AppState) -> DispatchResult {
    let mut result = DispatchResult::none();
    match action {
        PresetAction::New => {
            // Parameters carry over into the new preset
            let path = persistence::next_preset_path(&state.preset_dir);
            let ini = IniFile::new(path);
            state.log.success(format!("New Preset [{}] created", ini.filename()));
            state.loaded_preset = Some(ini);
        }
        PresetAction::Open(path) => match load_preset_file(state, path, true) {
            Ok(()) => {
                let name = state.loaded_preset_name().unwrap_or_default();
                state.log.success(format!("Preset [{}] loaded", name));
            }
            Err(e) => {
                state.log.error(format!(
                    "Failed to load preset file [{}]. {}",
                    path.display(),
                    e
                ));
                result.failed = true;
            }
        },
        PresetAction::Save => {
            let ini = match state.loaded_preset.take() {
                Some(ini) => ini,
                None => IniFile::new(persistence::next_preset_path(&state.preset_dir)),
            };
            let name = ini.filename();
            let fallback = ini.clone();
            match save_to(state, ini) {
                Ok(ini) => report_saved(state, ini),
                Err(e) => {
                    state.log.error(format!("Failed to save preset file [{}]. {}", name, e));
                    state.loaded_preset = Some(fallback);
                    result.failed = true;
                }
            }
        }
        PresetAction::SaveAs(path) => {
            let ini = IniFile::open(path).unwrap_or_else(|_| IniFile::new(path.clone()));
            let name = ini.filename();
            match save_to(state, ini) {
                Ok(ini) => report_saved(state, ini),
                Err(e) => {
                    state.log.error(format!("Failed to save preset file [{}]. {}", name, e));
                    result.failed = true;
                }
            }
        }
        PresetAction::Apply => match apply::apply_preset(state) {
            Ok(report) => result.report = Some(report),
            Err(e) => {
                log::debug!("apply failed: {}", e);
                result.failed = true;
            }
        },
        PresetAction::ResetToActive => {
            let Some(active) = state.active_preset.clone() else {
                state.log.warn("No active preset to restore.");
                result.failed = true;
                return result;
            };
            match load_preset_file(state, &active, false) {
                Ok(()) => state.log.success("Active preset parameters restored."),
                Err(e) => {
                    state.log.error(format!(
                        "Active Preset file [{}] not found",
                        active.display()
                    ));
                    log::debug!("{}", e);
                    result.failed = true;
                }
            }
        }
        PresetAction::ResetToDefaults => {
            state.reset_to_defaults();
            state.log.success("Parameters reset to default");
        }
        PresetAction::SetComment(text) => {
            state.comment = text.clone();
        }
    }
    result
}
