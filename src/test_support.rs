//! Shared state builder for pane and global-action tests.

use std::path::PathBuf;

use openshade_core::catalog::generate_tweaks;
use openshade_core::config::Settings;
use openshade_core::sim::SimPaths;

use crate::state::AppState;

/// Catalog tweaks, default settings and no simulator on disk.
pub(crate) fn test_state() -> AppState {
    AppState::new(
        generate_tweaks(),
        Settings::default(),
        PathBuf::from("/nonexistent/openshade/config.txt"),
        SimPaths::default(),
    )
}
