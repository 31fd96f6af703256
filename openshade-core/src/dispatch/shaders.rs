use crate::action::{DispatchResult, ShaderAction};
use crate::apply::clear_shader_cache;
use crate::backup::{self, VersionCheck};
use crate::state::AppState;

/// What has to happen with the shader backup before tweaks can be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupGuard {
    /// A backup folder exists for the running simulator version
    Ready,
    /// There is no backup folder yet
    NeedsBackup,
    /// The simulator was updated after the backup was taken
    VersionChanged { recorded: String, current: String },
}

impl StartupGuard {
    /// Text of the confirmation shown before backing up.
    pub fn prompt(&self) -> Option<String> {
        match self {
            StartupGuard::Ready => None,
            StartupGuard::NeedsBackup => Some(
                "OpenShade will backup your Prepar3D shaders now.\n\
                 Make sure the files are the original ones or cancel and manually \
                 select your backup folder in the settings."
                    .to_string(),
            ),
            StartupGuard::VersionChanged { current, .. } => Some(format!(
                "OpenShade has detected a new version of Prepar3D ({}).\n\n\
                 It is STRONGLY recommended that you backup the default shader files again \
                 otherwise they will be overwritten by old shader files when applying a preset.",
                current
            )),
        }
    }
}

pub fn startup_guard(state: &AppState) -> StartupGuard {
    if !state.paths.backup_dir.is_dir() {
        return StartupGuard::NeedsBackup;
    }
    match backup::version_check(&state.settings.sim_version, state.sim_version.as_deref()) {
        VersionCheck::Changed { recorded, current } => StartupGuard::VersionChanged { recorded, current },
        VersionCheck::Unchanged | VersionCheck::Unknown => StartupGuard::Ready,
    }
}

/// Check the backup folder and enable or disable applying. Digest mismatches
/// are reported but do not block.
pub fn verify_backup(state: &mut AppState) -> bool {
    let dir = state.paths.backup_dir.clone();
    let check = backup::check_backup(&dir);
    if !check.is_complete() {
        log::debug!("missing backup files: {:?}", check.missing);
        state.log.error(format!(
            "Missing shader files in {}. OpenShade can not run",
            dir.display()
        ));
        state.can_apply = false;
        return false;
    }

    match backup::verify_hashes(&dir) {
        Ok(mismatches) => {
            for m in mismatches {
                state.log.warn(format!(
                    "Backup file {} does not match its recorded checksum. It may not be an original shader.",
                    m.file
                ));
            }
        }
        Err(e) => state.log.warn(format!("Could not verify backup checksums. {}", e)),
    }
    state.can_apply = true;
    true
}

pub(super) fn dispatch_shader(action: &ShaderAction, state: &mut AppState) -> DispatchResult {
    let mut result = DispatchResult::none();
    match action {
        ShaderAction::Backup => match backup::backup_shaders(&state.paths) {
            Ok(()) => {
                if let Some(ref v) = state.sim_version {
                    state.settings.sim_version = v.clone();
                }
                state.log.success("Shaders backed up");
                state.can_apply = true;
            }
            Err(e) => {
                log::debug!("backup failed: {}", e);
                state.log.warn("Shaders could not be backed up. OpenShade can not run.");
                state.can_apply = false;
                result.failed = true;
            }
        },
        ShaderAction::SkipBackup => {
            if !state.paths.backup_dir.is_dir() {
                state.log.warn("Shaders were not backed up. OpenShade can not run.");
                state.can_apply = false;
            }
        }
        ShaderAction::Verify => {
            result.failed = !verify_backup(state);
        }
        ShaderAction::Restore => match backup::restore_shaders(&state.paths) {
            Ok(()) => {
                state.active_preset = None;
                state.log.success("Shader files restored");
                clear_shader_cache(state);
            }
            Err(e) => {
                state.log.error(format!("Could not restore shader files. {}", e));
                result.failed = true;
            }
        },
        ShaderAction::ClearCache => {
            result.failed = !clear_shader_cache(state);
        }
        ShaderAction::SetBackupDir(dir) => {
            state.paths.backup_dir = dir.clone();
            state.settings.backup_dir = Some(dir.clone());
            if backup::check_backup(dir).is_complete() {
                state.can_apply = true;
                state.log.success("All shader files found");
                state.log.success(format!("Backup directory set to {}", dir.display()));
            } else {
                state.can_apply = false;
                state.log.error(format!(
                    "Missing shader files in {}. OpenShade can not run",
                    dir.display()
                ));
                result.failed = true;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::activity::Severity;
    use crate::dispatch::dispatch_action;
    use crate::test_support::{sim_fixture, SimFixture};

    #[test]
    fn fresh_install_needs_backup_then_is_ready() {
        let SimFixture { _root, mut state } = sim_fixture();
        state.sim_version = Some("5.4.9".into());
        assert_eq!(startup_guard(&state), StartupGuard::NeedsBackup);
        assert!(startup_guard(&state).prompt().unwrap().contains("backup your Prepar3D shaders"));

        let r = dispatch_action(&Action::Shader(ShaderAction::Backup), &mut state);
        assert!(!r.failed);
        assert_eq!(state.settings.sim_version, "5.4.9");
        assert_eq!(startup_guard(&state), StartupGuard::Ready);
        assert!(verify_backup(&mut state));
    }

    #[test]
    fn version_change_is_detected() {
        let SimFixture { _root, mut state } = sim_fixture();
        dispatch_action(&Action::Shader(ShaderAction::Backup), &mut state);
        state.sim_version = Some("6.0".into());
        let guard = startup_guard(&state);
        assert!(matches!(guard, StartupGuard::VersionChanged { ref current, .. } if current == "6.0"));
        assert!(guard.prompt().unwrap().contains("new version of Prepar3D (6.0)"));
    }

    #[test]
    fn skip_backup_disables_apply() {
        let SimFixture { _root, mut state } = sim_fixture();
        dispatch_action(&Action::Shader(ShaderAction::SkipBackup), &mut state);
        assert!(!state.can_apply);
        assert_eq!(state.log.last().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn set_backup_dir_checks_contents() {
        let SimFixture { _root, mut state } = sim_fixture();
        let empty = tempfile::tempdir().unwrap();
        let r = dispatch_action(
            &Action::Shader(ShaderAction::SetBackupDir(empty.path().to_path_buf())),
            &mut state,
        );
        assert!(r.failed);
        assert!(!state.can_apply);
        assert_eq!(state.settings.backup_dir.as_deref(), Some(empty.path()));
    }

    #[test]
    fn restore_clears_active_preset_and_cache() {
        let SimFixture { _root, mut state } = sim_fixture();
        dispatch_action(&Action::Shader(ShaderAction::Backup), &mut state);
        let cache = state.paths.cache_dir.clone().unwrap();
        std::fs::write(cache.join("x.cso"), "").unwrap();
        state.active_preset = Some("/tmp/whatever.ini".into());

        let r = dispatch_action(&Action::Shader(ShaderAction::Restore), &mut state);
        assert!(!r.failed);
        assert!(state.active_preset.is_none());
        assert!(!cache.join("x.cso").exists());
        assert_eq!(state.log.last().unwrap().message, "Shader cache cleared");
    }

    #[test]
    fn tampered_backup_warns_but_stays_usable() {
        let SimFixture { _root, mut state } = sim_fixture();
        dispatch_action(&Action::Shader(ShaderAction::Backup), &mut state);
        std::fs::write(state.paths.backup_dir.join("General.fx"), "// changed").unwrap();
        assert!(verify_backup(&mut state));
        assert!(state.log.last().unwrap().message.contains("General.fx"));
    }
}
