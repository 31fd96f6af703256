use crate::dispatch;
use crate::panes::{ConfirmPane, PathPane, PathPurpose, PendingAction};
use crate::persistence::next_preset_path;
use crate::setup;
use crate::state::AppState;
use crate::ui::{Action, DispatchResult, LayerStack, PaneManager, PresetAction, ShaderAction};

pub(crate) enum GlobalResult {
    Quit,
    Handled,
    NotHandled,
}

fn switch_to_pane(target: &str, panes: &mut PaneManager, state: &AppState, layer_stack: &mut LayerStack) {
    panes.switch_to(target, state);
    layer_stack.set_pane_layer(panes.active().id());
}

fn open_confirm(panes: &mut PaneManager, state: &AppState, message: &str, pending: PendingAction) {
    if let Some(confirm) = panes.get_pane_mut::<ConfirmPane>("confirm") {
        confirm.set_confirm(message, pending);
    }
    panes.push_to("confirm", state);
}

fn open_path_prompt(panes: &mut PaneManager, state: &AppState, purpose: PathPurpose, initial: &str) {
    if let Some(prompt) = panes.get_pane_mut::<PathPane>("path_prompt") {
        prompt.open(purpose, initial);
    }
    panes.push_to("path_prompt", state);
}

fn run_action(action: Action, state: &mut AppState, panes: &mut PaneManager) -> GlobalResult {
    let result = dispatch::dispatch_action(&action, state);
    if result.quit {
        return GlobalResult::Quit;
    }
    apply_dispatch_result(result, state, panes);
    GlobalResult::Handled
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Keys from the global layer. Dialogs keep focus: only quit reaches past them.
pub(crate) fn handle_global_action(
    action: &str,
    state: &mut AppState,
    panes: &mut PaneManager,
    layer_stack: &mut LayerStack,
) -> GlobalResult {
    if panes.active().is_modal() && action != "quit" {
        return GlobalResult::NotHandled;
    }

    match action {
        "quit" => {
            // A second quit from the save prompt leaves without saving
            if !state.has_unsaved_changes() || panes.active().id() == "confirm" {
                return GlobalResult::Quit;
            }
            let message = setup::unsaved_changes_prompt(state);
            open_confirm(panes, state, &message, PendingAction::SaveBeforeQuit);
        }
        "pane:tweaks" => switch_to_pane("tweaks", panes, state, layer_stack),
        "pane:custom" => switch_to_pane("custom", panes, state, layer_stack),
        "pane:log" => switch_to_pane("log", panes, state, layer_stack),
        "pane:comment" => switch_to_pane("comment", panes, state, layer_stack),
        "apply" => return run_action(Action::Preset(PresetAction::Apply), state, panes),
        "preset:new" => return run_action(Action::Preset(PresetAction::New), state, panes),
        "preset:save" => return run_action(Action::Preset(PresetAction::Save), state, panes),
        "preset:reset_active" => return run_action(Action::Preset(PresetAction::ResetToActive), state, panes),
        "preset:reset_defaults" => return run_action(Action::Preset(PresetAction::ResetToDefaults), state, panes),
        "preset:open" => open_path_prompt(panes, state, PathPurpose::OpenPreset, ""),
        "preset:save_as" => {
            let initial = match state.loaded_preset {
                Some(ref ini) => ini.filename(),
                None => file_name_of(&next_preset_path(&state.preset_dir)),
            };
            open_path_prompt(panes, state, PathPurpose::SavePresetAs, &initial);
        }
        "shader:backup" => {
            let message = format!(
                "Copy the current Prepar3D shaders to\n{}?\nThe previous backup will be overwritten.",
                state.paths.backup_dir.display()
            );
            open_confirm(panes, state, &message, PendingAction::UpdateBackup);
        }
        "shader:restore" => {
            let message = format!(
                "Restore the original shaders from\n{}?\nApplied tweaks will be removed from Prepar3D.",
                state.paths.backup_dir.display()
            );
            open_confirm(panes, state, &message, PendingAction::Restore);
        }
        "shader:clear_cache" => return run_action(Action::Shader(ShaderAction::ClearCache), state, panes),
        "shader:backup_dir" => {
            let initial = state.paths.backup_dir.display().to_string();
            open_path_prompt(panes, state, PathPurpose::BackupDir, &initial);
        }
        "theme" => return run_action(Action::CycleTheme, state, panes),
        _ => return GlobalResult::NotHandled,
    }
    GlobalResult::Handled
}

/// Apply a DispatchResult to the UI layer
pub(crate) fn apply_dispatch_result(result: DispatchResult, state: &mut AppState, panes: &mut PaneManager) {
    if let Some(ref report) = result.report {
        log::debug!(
            "apply finished: {}/{} applied, {} failed, cache cleared: {}",
            report.applied,
            report.enabled,
            report.failed(),
            report.cache_cleared
        );
    }
    panes.process_nav_intents(&result.nav, state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panes::{LogPane, TweakListPane};
    use crate::test_support::test_state;
    use crate::ui::keybindings::load_keybindings;
    use crate::ui::Keymap;

    fn panes() -> PaneManager {
        let mut pm = PaneManager::new(Box::new(TweakListPane::new(Keymap::new())));
        pm.add_pane(Box::new(LogPane::new(Keymap::new())));
        pm.add_pane(Box::new(ConfirmPane::new(Keymap::new())));
        pm.add_pane(Box::new(PathPane::new(Keymap::new())));
        pm
    }

    fn layers() -> LayerStack {
        let (layers, _) = load_keybindings();
        let mut stack = LayerStack::new(layers);
        stack.push("global");
        stack
    }

    #[test]
    fn quit_asks_to_save_pending_changes() {
        let mut state = test_state();
        let mut pm = panes();
        let mut ls = layers();
        assert!(matches!(handle_global_action("quit", &mut state, &mut pm, &mut ls), GlobalResult::Quit));

        state.tweaks[0].is_enabled = !state.tweaks[0].is_enabled;
        assert!(matches!(handle_global_action("quit", &mut state, &mut pm, &mut ls), GlobalResult::Handled));
        assert_eq!(pm.active().id(), "confirm");
        assert!(matches!(handle_global_action("quit", &mut state, &mut pm, &mut ls), GlobalResult::Quit));
    }

    #[test]
    fn dialogs_block_pane_switching() {
        let mut state = test_state();
        let mut pm = panes();
        let mut ls = layers();
        handle_global_action("preset:open", &mut state, &mut pm, &mut ls);
        assert_eq!(pm.active().id(), "path_prompt");
        assert!(matches!(
            handle_global_action("pane:log", &mut state, &mut pm, &mut ls),
            GlobalResult::NotHandled
        ));
        assert_eq!(pm.active().id(), "path_prompt");
    }

    #[test]
    fn switches_panes_and_cycles_theme() {
        let mut state = test_state();
        let mut pm = panes();
        let mut ls = layers();
        let theme = state.settings.theme;
        handle_global_action("pane:log", &mut state, &mut pm, &mut ls);
        assert_eq!(pm.active().id(), "log");
        handle_global_action("theme", &mut state, &mut pm, &mut ls);
        assert_eq!(state.settings.theme, theme.next());
    }
}
