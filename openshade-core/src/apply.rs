//! Apply step: rebuild every shader from the backup with the enabled tweaks.

use serde::Serialize;

use crate::activity::ActivityLog;
use crate::backup;
use crate::error::{Error, Result};
use crate::recipes;
use crate::shaders::{ShaderBuffers, ShaderFile};
use crate::state::{AppState, CustomTweak, Tweak};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Applied,
    Failed { file: ShaderFile, error: String },
    Unsupported,
    MissingDependency { requires: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TweakOutcome {
    pub name: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub outcomes: Vec<TweakOutcome>,
    pub applied: usize,
    pub enabled: usize,
    pub cache_cleared: bool,
}

impl ApplyReport {
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Failed { .. }))
            .count()
    }
}

fn record(report: &mut ApplyReport, name: &str, outcome: Outcome) {
    if outcome == Outcome::Applied {
        report.applied += 1;
    }
    report.outcomes.push(TweakOutcome {
        name: name.to_string(),
        outcome,
    });
}

/// Run enabled catalog tweaks then enabled custom tweaks against `buffers`,
/// logging one line per tweak.
pub fn patch_buffers(
    tweaks: &[Tweak],
    custom_tweaks: &[CustomTweak],
    buffers: &mut ShaderBuffers,
    log: &mut ActivityLog,
) -> ApplyReport {
    let mut report = ApplyReport::default();
    let is_enabled = |name: &str| tweaks.iter().any(|t| t.name == name && t.is_enabled);

    for tweak in tweaks.iter().filter(|t| t.is_enabled) {
        report.enabled += 1;

        let Some(recipe) = recipes::recipe_for(tweak) else {
            log.warn(format!("Did not apply tweak [{}]. Tweak is not supported.", tweak.name));
            record(&mut report, &tweak.name, Outcome::Unsupported);
            continue;
        };

        if let Some(requires) = recipe.requires.filter(|r| !is_enabled(*r)) {
            log.warn(format!(
                "Did not apply tweak [{}]. It requires [{}] to be enabled.",
                tweak.name, requires
            ));
            record(
                &mut report,
                &tweak.name,
                Outcome::MissingDependency {
                    requires: requires.to_string(),
                },
            );
            continue;
        }

        match recipe.run(buffers) {
            Ok(()) => {
                log.success(format!("Tweak [{}] applied.", tweak.name));
                record(&mut report, &tweak.name, Outcome::Applied);
            }
            Err((file, error)) => {
                log.error(format!("Failed to apply tweak [{}] in {} file.", tweak.name, file));
                log::debug!("{}: {}", tweak.name, error);
                record(
                    &mut report,
                    &tweak.name,
                    Outcome::Failed {
                        file,
                        error: error.to_string(),
                    },
                );
            }
        }
    }

    for custom in custom_tweaks.iter().filter(|c| c.is_enabled) {
        report.enabled += 1;
        let text = buffers.get_mut(custom.shader);
        match custom.patch(text) {
            Ok(patched) => {
                *text = patched;
                log.success(format!("Custom tweak [{}] applied.", custom.name));
                record(&mut report, &custom.name, Outcome::Applied);
            }
            Err(error) => {
                log.error(format!(
                    "Failed to apply custom tweak [{}] in {} file.",
                    custom.name, custom.shader
                ));
                record(
                    &mut report,
                    &custom.name,
                    Outcome::Failed {
                        file: custom.shader,
                        error: error.to_string(),
                    },
                );
            }
        }
    }

    report
}

/// Empty the simulator's compiled shader cache so patched sources get rebuilt.
pub fn clear_shader_cache(state: &mut AppState) -> bool {
    let Some(cache) = state.paths.cache_dir.clone() else {
        state.log.error("Could not clear shader cache.");
        return false;
    };
    match backup::clear_directory(&cache) {
        Ok(n) => {
            log::debug!("removed {} cached shaders", n);
            state.log.success("Shader cache cleared");
            true
        }
        Err(e) => {
            log::debug!("{}", e);
            state.log.error("Could not clear shader cache.");
            false
        }
    }
}

/// Reload shaders from the backup, patch them, write them live and clear
/// the shader cache. Operator-facing messages go to `state.log`.
pub fn apply_preset(state: &mut AppState) -> Result<ApplyReport> {
    if !state.can_apply {
        state.log.error("Shader backup is not usable. Tweaks can not be applied.");
        return Err(Error::ApplyDisabled);
    }
    let Some(shader_dir) = state.paths.shader_dir.clone() else {
        state.log.error("P3D shader directory not found!");
        return Err(Error::NoShaderDir);
    };

    let mut buffers = match ShaderBuffers::load(&state.paths.backup_dir) {
        Ok(b) => b,
        Err(e) => {
            state.log.error(format!(
                "Missing shader files in {}. OpenShade can not run",
                state.paths.backup_dir.display()
            ));
            return Err(e);
        }
    };

    let mut report = patch_buffers(&state.tweaks, &state.custom_tweaks, &mut buffers, &mut state.log);

    if let Err(e) = buffers.write_live(&shader_dir) {
        state.log.error("Could not write tweaks to shader files.");
        return Err(e);
    }

    let summary = format!("{}/{} tweaks applied. ", report.applied, report.enabled);
    // The live shaders now match the loaded preset, or no preset at all
    state.active_preset = state.loaded_preset.as_ref().map(|p| p.path().to_path_buf());
    match state.loaded_preset {
        Some(ref preset) => {
            state
                .log
                .success(format!("Preset [{}] applied. {}", preset.filename(), summary));
        }
        None => state.log.success(format!("Tweaks applied. {}", summary)),
    }

    report.cache_cleared = clear_shader_cache(state);

    state.clear_changes_info();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::generate_tweaks;
    use crate::recipes::tests::fixture_for;
    use crate::persistence::IniFile;
    use crate::state::Category;
    use crate::test_support::{sim_fixture, SimFixture};

    fn enable(tweaks: &mut [Tweak], name: &str) {
        tweaks.iter_mut().find(|t| t.name == name).unwrap().is_enabled = true;
    }

    #[test]
    fn unsupported_and_dependency_are_warnings() {
        let mut tweaks = generate_tweaks();
        tweaks.push(Tweak::new("X", Category::Hdr, "Mystery", ""));
        enable(&mut tweaks, "Mystery");
        enable(&mut tweaks, "Atmospheres Haze Effect");

        let mut buffers = ShaderBuffers::default();
        let mut log = ActivityLog::new();
        let report = patch_buffers(&tweaks, &[], &mut buffers, &mut log);

        assert_eq!(report.enabled, 2);
        assert_eq!(report.applied, 0);
        assert_eq!(log.count(crate::activity::Severity::Warning), 2);
        assert!(report.outcomes.iter().any(|o| o.outcome
            == Outcome::MissingDependency {
                requires: "Atmospheres Fog Fix".into()
            }));
    }

    #[test]
    fn failures_do_not_stop_other_tweaks() {
        let mut tweaks = generate_tweaks();
        enable(&mut tweaks, "Cloud shadow depth");
        enable(&mut tweaks, "Turn off HDR luminance adaptation effect");

        let hdr = tweaks.iter().find(|t| t.name.starts_with("Turn off HDR")).unwrap();
        let mut buffers = fixture_for([&recipes::recipe_for(hdr).unwrap()]);
        let mut log = ActivityLog::new();
        let report = patch_buffers(&tweaks, &[], &mut buffers, &mut log);

        assert_eq!(report.applied, 1);
        assert_eq!(report.failed(), 1);
        assert!(log
            .entries()
            .iter()
            .any(|e| e.message == "Failed to apply tweak [Cloud shadow depth] in Shadow.fxh file."));
        assert!(buffers.get(ShaderFile::Hdr).contains("cb_mDayNightInterpolant"));
    }

    #[test]
    fn custom_tweaks_run_after_catalog() {
        let mut custom = CustomTweak::new("CUSTOM_TWEAK_1", "Mine", ShaderFile::Hdr);
        custom.old_code = "0.35".into();
        custom.new_code = "0.5".into();

        let mut tweaks = generate_tweaks();
        enable(&mut tweaks, "Turn off HDR luminance adaptation effect");
        let hdr = tweaks.iter().find(|t| t.name.starts_with("Turn off HDR")).unwrap();
        let mut buffers = fixture_for([&recipes::recipe_for(hdr).unwrap()]);
        let mut log = ActivityLog::new();
        let report = patch_buffers(&tweaks, &[custom], &mut buffers, &mut log);

        assert_eq!(report.applied, 2);
        assert!(buffers
            .get(ShaderFile::Hdr)
            .contains("return max((1-cb_mDayNightInterpolant) * 0.5, 0.1);"));
    }

    #[test]
    fn disabled_tweaks_are_ignored() {
        let tweaks = generate_tweaks();
        let mut buffers = ShaderBuffers::default();
        let mut log = ActivityLog::new();
        let report = patch_buffers(&tweaks, &[], &mut buffers, &mut log);
        assert_eq!(report.enabled, 0);
        assert!(log.is_empty());
    }

    #[test]
    fn apply_without_loaded_preset_clears_active_preset() {
        let SimFixture { _root, mut state } = sim_fixture();
        backup::backup_shaders(&state.paths).unwrap();
        let preset = state.preset_dir.join("a.ini");
        state.loaded_preset = Some(IniFile::new(&preset));

        apply_preset(&mut state).unwrap();
        assert_eq!(state.active_preset.as_deref(), Some(preset.as_path()));

        state.loaded_preset = None;
        apply_preset(&mut state).unwrap();
        assert!(state.active_preset.is_none());
        assert!(state.log.entries().iter().any(|e| e.message.starts_with("Tweaks applied.")));
    }
}
