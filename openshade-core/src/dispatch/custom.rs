use crate::action::{CustomAction, DispatchResult};
use crate::shaders::ShaderFile;
use crate::state::{next_custom_key, AppState, CustomTweak};

pub(super) fn dispatch_custom(action: &CustomAction, state: &mut AppState) -> DispatchResult {
    match action {
        CustomAction::Add => {
            let key = next_custom_key(&state.custom_tweaks);
            let name = format!("Custom tweak {}", state.custom_tweaks.len() + 1);
            let mut custom = CustomTweak::new(&key, &name, ShaderFile::General);
            custom.is_enabled = false;
            state.custom_tweaks.push(custom);
        }
        CustomAction::Update(idx, custom) => {
            if let Some(slot) = state.custom_tweaks.get_mut(*idx) {
                // The key identifies the preset section and never changes
                let key = std::mem::take(&mut slot.key);
                *slot = CustomTweak { key, ..custom.clone() };
            }
        }
        CustomAction::Remove(idx) => {
            if *idx < state.custom_tweaks.len() {
                state.custom_tweaks.remove(*idx);
            }
        }
        CustomAction::Toggle(idx) => {
            if let Some(custom) = state.custom_tweaks.get_mut(*idx) {
                custom.is_enabled = !custom.is_enabled;
            }
        }
    }
    DispatchResult::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::dispatch::dispatch_action;
    use crate::test_support::catalog_state;

    #[test]
    fn add_update_toggle_remove() {
        let mut state = catalog_state();
        dispatch_action(&Action::Custom(CustomAction::Add), &mut state);
        dispatch_action(&Action::Custom(CustomAction::Add), &mut state);
        assert_eq!(state.custom_tweaks[1].key, "CUSTOM_TWEAK_2");
        assert!(!state.custom_tweaks[0].is_enabled);

        let mut edited = CustomTweak::new("IGNORED", "Sharper", ShaderFile::Hdr);
        edited.old_code = "a".into();
        edited.new_code = "b".into();
        dispatch_action(&Action::Custom(CustomAction::Update(0, edited)), &mut state);
        assert_eq!(state.custom_tweaks[0].key, "CUSTOM_TWEAK_1");
        assert_eq!(state.custom_tweaks[0].shader, ShaderFile::Hdr);
        assert!(state.custom_tweaks[0].is_enabled);

        dispatch_action(&Action::Custom(CustomAction::Toggle(0)), &mut state);
        assert!(!state.custom_tweaks[0].is_enabled);

        dispatch_action(&Action::Custom(CustomAction::Remove(0)), &mut state);
        dispatch_action(&Action::Custom(CustomAction::Remove(7)), &mut state);
        assert_eq!(state.custom_tweaks.len(), 1);
        assert_eq!(state.custom_tweaks[0].key, "CUSTOM_TWEAK_2");
        assert!(state.has_unsaved_changes());
    }
}
