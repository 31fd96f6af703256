//! Backup, apply, save, reopen and restore against a throwaway simulator tree.

use std::fs;
use std::path::{Path, PathBuf};

use openshade_core::action::{PresetAction, ShaderAction, TweakAction};
use openshade_core::catalog::generate_tweaks;
use openshade_core::config::Settings;
use openshade_core::recipes::{recipe_for, Step};
use openshade_core::sim::{SimPaths, SHADER_SUBDIR};
use openshade_core::state::{AppState, Tweak};
use openshade_core::{dispatch_action, Action, Outcome, Severity, ShaderFile};

const ENABLED: [&str; 2] = ["Turn off HDR luminance adaptation effect", "Cloud saturation"];

/// Stock-looking shader sources containing every anchor the enabled tweaks need.
fn stock_sources(tweaks: &[Tweak]) -> Vec<(ShaderFile, String)> {
    let mut texts: Vec<(ShaderFile, String)> = ShaderFile::ALL
        .iter()
        .map(|f| (*f, format!("// {}\n", f.file_name())))
        .collect();
    for tweak in tweaks.iter().filter(|t| ENABLED.contains(&t.name.as_str())) {
        let recipe = recipe_for(tweak).expect("catalog tweak has a recipe");
        for step in &recipe.steps {
            let text = &mut texts.iter_mut().find(|(f, _)| *f == step.file()).unwrap().1;
            match step {
                Step::AddBefore { anchor, .. }
                | Step::AddAfter { anchor, .. }
                | Step::ReplaceFirst { anchor, .. }
                | Step::ReplaceAll { anchor, .. } => text.push_str(&format!("{anchor}\n")),
                Step::ReplaceSecond { anchor, .. } => text.push_str(&format!("{anchor}\n{anchor}\n")),
                Step::CommentOut { start, end, .. } => text.push_str(&format!("{start}\nx();\n{end}\n")),
            }
        }
    }
    texts
}

struct Sim {
    _root: tempfile::TempDir,
    shaders: PathBuf,
    cache: PathBuf,
    app: PathBuf,
}

fn sim() -> Sim {
    let root = tempfile::tempdir().unwrap();
    let shaders = root.path().join("P3D").join(SHADER_SUBDIR);
    let cache = root.path().join("cache");
    let app = root.path().join("app");
    fs::create_dir_all(shaders.join("PostProcess")).unwrap();
    fs::create_dir_all(&cache).unwrap();
    fs::create_dir_all(&app).unwrap();
    for (file, text) in stock_sources(&generate_tweaks()) {
        fs::write(file.live_path(&shaders), text).unwrap();
    }
    Sim { _root: root, shaders, cache, app }
}

fn state_for(sim: &Sim) -> AppState {
    let paths = SimPaths {
        sim_dir: sim.shaders.parent().map(Path::to_path_buf),
        shader_dir: Some(sim.shaders.clone()),
        cache_dir: Some(sim.cache.clone()),
        backup_dir: sim.app.join("Backup Shaders"),
    };
    AppState::new(generate_tweaks(), Settings::default(), sim.app.join("config.txt"), paths)
}

fn toggle(state: &mut AppState, name: &str) {
    let idx = state.tweak_index_by_name(name).unwrap();
    dispatch_action(&Action::Tweak(TweakAction::Toggle(idx)), state);
}

#[test]
fn full_cycle() {
    let sim = sim();
    let mut state = state_for(&sim);
    let hdr_live = ShaderFile::Hdr.live_path(&sim.shaders);
    let stock_hdr = fs::read_to_string(&hdr_live).unwrap();

    assert!(!dispatch_action(&Action::Shader(ShaderAction::Backup), &mut state).failed);
    assert!(!dispatch_action(&Action::Shader(ShaderAction::Verify), &mut state).failed);

    for name in ENABLED {
        toggle(&mut state, name);
    }
    fs::write(sim.cache.join("stale.cso"), "").unwrap();

    let result = dispatch_action(&Action::Preset(PresetAction::Apply), &mut state);
    let report = result.report.expect("apply report");
    assert_eq!(report.enabled, 2);
    assert_eq!(report.applied, 2);
    assert!(report.outcomes.iter().all(|o| o.outcome == Outcome::Applied));
    assert!(report.cache_cleared);
    assert!(!sim.cache.join("stale.cso").exists());
    assert_ne!(fs::read_to_string(&hdr_live).unwrap(), stock_hdr);
    assert_eq!(state.log.count(Severity::Error), 0);

    // Applying twice starts from the backup, not from the patched files
    let first = fs::read_to_string(&hdr_live).unwrap();
    dispatch_action(&Action::Preset(PresetAction::Apply), &mut state);
    assert_eq!(fs::read_to_string(&hdr_live).unwrap(), first);

    let preset = sim.app.join("evening.ini");
    dispatch_action(&Action::Preset(PresetAction::SaveAs(preset.clone())), &mut state);
    assert!(!state.has_unsaved_changes());

    let mut reopened = state_for(&sim);
    dispatch_action(&Action::Preset(PresetAction::Open(preset)), &mut reopened);
    for name in ENABLED {
        assert!(reopened.is_enabled(name), "{name} should be enabled");
    }

    assert!(!dispatch_action(&Action::Shader(ShaderAction::Restore), &mut state).failed);
    assert_eq!(fs::read_to_string(&hdr_live).unwrap(), stock_hdr);
    assert!(state.active_preset.is_none());
}

#[test]
fn apply_marks_loaded_preset_active() {
    let sim = sim();
    let mut state = state_for(&sim);
    dispatch_action(&Action::Shader(ShaderAction::Backup), &mut state);
    dispatch_action(&Action::Preset(PresetAction::Save), &mut state);
    dispatch_action(&Action::Preset(PresetAction::Apply), &mut state);

    assert_eq!(state.active_preset_name().as_deref(), Some("custom_preset.ini"));
    let applied = state
        .log
        .entries()
        .iter()
        .find(|e| e.message.starts_with("Preset [custom_preset.ini] applied."))
        .expect("apply summary");
    assert!(applied.message.contains("0/0 tweaks applied."));
}

#[test]
fn broken_backup_blocks_apply() {
    let sim = sim();
    let mut state = state_for(&sim);
    dispatch_action(&Action::Shader(ShaderAction::Backup), &mut state);
    fs::remove_file(state.paths.backup_dir.join("Cloud.fx")).unwrap();

    assert!(dispatch_action(&Action::Shader(ShaderAction::Verify), &mut state).failed);
    let result = dispatch_action(&Action::Preset(PresetAction::Apply), &mut state);
    assert!(result.failed);
    assert!(result.report.is_none());
}
