use openshade_core::state::{format_number, Control};

use super::TweakEditPane;
use crate::state::AppState;
use crate::ui::{Action, ParamAction};

impl TweakEditPane {
    pub(super) fn start_edit(&mut self, state: &AppState) -> Action {
        let Some(param) = self.current_param(state) else {
            return Action::None;
        };
        let initial = match param.control {
            Control::Checkbox => {
                let (tweak, param) = (self.tweak.unwrap_or(0), self.selected_row);
                return Action::Param(ParamAction::Toggle { tweak, param });
            }
            Control::Combobox => param.selected_label().unwrap_or("").to_string(),
            Control::Rgb => param
                .rgb_value()
                .map(|rgb| format_number(rgb.channel(self.channel)))
                .unwrap_or_default(),
            Control::Text | Control::TextBox => param.value.clone(),
        };
        self.edit_input.set_value(&initial);
        self.edit_input.select_all();
        self.edit_input.set_focused(true);
        self.editing = true;
        Action::PushLayer("text_edit")
    }

    pub(super) fn stop_edit(&mut self) {
        self.editing = false;
        self.edit_input.set_focused(false);
    }

    /// Typed text becomes a `Set`; invalid input is reported by dispatch.
    pub(super) fn commit_edit(&mut self, state: &AppState) -> Action {
        let text = self.edit_input.value().trim().to_string();
        self.stop_edit();
        let (Some(tweak), Some(param)) = (self.tweak, self.current_param(state)) else {
            return Action::None;
        };
        let value = match param.control {
            Control::Rgb => match (param.rgb_value(), text.parse::<f64>()) {
                (Some(_), Ok(v)) => {
                    return Action::Param(ParamAction::SetRgbChannel {
                        tweak,
                        param: self.selected_row,
                        channel: self.channel,
                        value: v,
                    })
                }
                // Let the parser reject it so the user sees why
                _ => text,
            },
            _ => text,
        };
        Action::Param(ParamAction::Set { tweak, param: self.selected_row, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panes::TweakEditPane;
    use crate::test_support::test_state;
    use crate::ui::{InputEvent, KeyCode, Keymap, Pane};

    #[test]
    fn typed_number_becomes_set() {
        let state = test_state();
        let idx = state.tweak_index_by_name("Cloud saturation").unwrap();
        let mut pane = TweakEditPane::new(Keymap::new());
        pane.set_tweak(idx);
        let enter = InputEvent::key(KeyCode::Enter);

        assert_eq!(pane.handle_action("edit", &enter, &state), Action::PushLayer("text_edit"));
        assert!(pane.is_editing());
        assert_eq!(pane.edit_input.value(), "1");
        pane.edit_input.set_value("1.5");
        assert_eq!(
            pane.handle_action("text:confirm", &enter, &state),
            Action::Param(ParamAction::Set { tweak: idx, param: 0, value: "1.5".into() })
        );
        assert!(!pane.is_editing());
    }

    #[test]
    fn rgb_edit_targets_selected_channel() {
        let state = test_state();
        let idx = state.tweak_index_by_name("Scene tone adjustment").unwrap();
        let mut pane = TweakEditPane::new(Keymap::new());
        pane.set_tweak(idx);
        let enter = InputEvent::key(KeyCode::Enter);

        pane.handle_action("prev_channel", &enter, &state);
        pane.handle_action("edit", &enter, &state);
        pane.edit_input.set_value("0.8");
        assert_eq!(
            pane.handle_action("text:confirm", &enter, &state),
            Action::Param(ParamAction::SetRgbChannel { tweak: idx, param: 0, channel: 2, value: 0.8 })
        );
    }

    #[test]
    fn cancel_discards() {
        let state = test_state();
        let idx = state.tweak_index_by_name("Cloud saturation").unwrap();
        let mut pane = TweakEditPane::new(Keymap::new());
        pane.set_tweak(idx);
        let esc = InputEvent::key(KeyCode::Escape);
        pane.handle_action("edit", &esc, &state);
        assert_eq!(pane.handle_action("text:cancel", &esc, &state), Action::None);
        assert!(!pane.is_editing());
    }
}
