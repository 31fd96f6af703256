//! Shared state builders for unit tests.

use std::fs;
use std::path::Path;

use crate::catalog::generate_tweaks;
use crate::config::{Settings, SETTINGS_FILE};
use crate::shaders::ShaderFile;
use crate::sim::{SimPaths, DEFAULT_BACKUP_DIR, SHADER_SUBDIR};
use crate::state::AppState;

pub(crate) fn catalog_state() -> AppState {
    AppState::new(
        generate_tweaks(),
        Settings::default(),
        Path::new("/nonexistent/app").join(SETTINGS_FILE),
        SimPaths::default(),
    )
}

/// Catalog state whose presets and backup live under `dir`.
pub(crate) fn catalog_state_in(dir: &Path) -> AppState {
    let paths = SimPaths {
        backup_dir: dir.join(DEFAULT_BACKUP_DIR),
        ..SimPaths::default()
    };
    AppState::new(generate_tweaks(), Settings::default(), dir.join(SETTINGS_FILE), paths)
}

pub(crate) struct SimFixture {
    pub _root: tempfile::TempDir,
    pub state: AppState,
}

/// A simulator install with stock shaders and an empty cache; no backup yet.
pub(crate) fn sim_fixture() -> SimFixture {
    let root = tempfile::tempdir().unwrap();
    let sim = root.path().join("sim");
    let shaders = sim.join(SHADER_SUBDIR);
    let cache = root.path().join("cache");
    let app = root.path().join("app");
    fs::create_dir_all(shaders.join("PostProcess")).unwrap();
    fs::create_dir_all(&cache).unwrap();
    fs::create_dir_all(&app).unwrap();
    for file in ShaderFile::ALL {
        fs::write(file.live_path(&shaders), format!("// stock {}\n", file.file_name())).unwrap();
    }

    let paths = SimPaths {
        sim_dir: Some(sim),
        shader_dir: Some(shaders),
        cache_dir: Some(cache),
        backup_dir: app.join(DEFAULT_BACKUP_DIR),
    };
    let state = AppState::new(generate_tweaks(), Settings::default(), app.join(SETTINGS_FILE), paths);
    SimFixture { _root: root, state }
}
