mod custom;
mod preset;
mod shaders;
mod tweak;

use crate::action::{Action, DispatchResult};
use crate::state::AppState;

pub use preset::load_preset_file;
pub use shaders::{startup_guard, verify_backup, StartupGuard};

/// Dispatch an action. Returns a DispatchResult describing side effects for the UI layer.
///
/// Failures never propagate: they are written to the activity log and flagged
/// on the result.
pub fn dispatch_action(action: &Action, state: &mut AppState) -> DispatchResult {
    match action {
        Action::Quit => DispatchResult::with_quit(),
        Action::Nav(_) => DispatchResult::none(), // Handled by PaneManager
        Action::Tweak(a) => tweak::dispatch_tweak(a, state),
        Action::Param(a) => tweak::dispatch_param(a, state),
        Action::Preset(a) => preset::dispatch_preset(a, state),
        Action::Shader(a) => shaders::dispatch_shader(a, state),
        Action::Custom(a) => custom::dispatch_custom(a, state),
        Action::CycleTheme => {
            state.settings.theme = state.settings.theme.next();
            DispatchResult::none()
        }
        Action::None => DispatchResult::none(),
        // Layer management is handled by the UI loop
        Action::PushLayer(_) | Action::PopLayer(_) => DispatchResult::none(),
    }
}
