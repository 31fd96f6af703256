use openshade_core::state::Control;

use super::TweakEditPane;
use crate::state::AppState;
use crate::ui::{Action, InputEvent, NavAction, ParamAction, TweakAction};

impl TweakEditPane {
    pub(super) fn handle_action_impl(&mut self, action: &str, _event: &InputEvent, state: &AppState) -> Action {
        let Some(tweak_idx) = self.tweak else {
            return match action {
                "back" => Action::Nav(NavAction::PopPane),
                _ => Action::None,
            };
        };

        match action {
            "text:confirm" if self.editing => return self.commit_edit(state),
            "text:cancel" if self.editing => {
                self.stop_edit();
                return Action::None;
            }
            "back" => return Action::Nav(NavAction::PopPane),
            "toggle_tweak" => return Action::Tweak(TweakAction::Toggle(tweak_idx)),
            "reset_defaults" => return Action::Tweak(TweakAction::ResetDefaults(tweak_idx)),
            "reset_previous" => return Action::Tweak(TweakAction::ResetPrevious(tweak_idx)),
            _ => {}
        }

        let rows = self.current(state).map(|t| t.parameters.len()).unwrap_or(0);
        match action {
            "prev" => {
                self.selected_row = self.selected_row.saturating_sub(1);
                self.channel = 0;
                return Action::None;
            }
            "next" => {
                if self.selected_row + 1 < rows {
                    self.selected_row += 1;
                    self.channel = 0;
                }
                return Action::None;
            }
            _ => {}
        }

        let Some(param) = self.current_param(state) else {
            // Tweaks without parameters: Space still switches the tweak
            return match action {
                "toggle" => Action::Tweak(TweakAction::Toggle(tweak_idx)),
                _ => Action::None,
            };
        };
        let at = (tweak_idx, self.selected_row);

        match action {
            "decrease" => self.nudge(param.control, at, -1.0),
            "increase" => self.nudge(param.control, at, 1.0),
            "decrease_big" => self.nudge(param.control, at, -10.0),
            "increase_big" => self.nudge(param.control, at, 10.0),
            "prev_channel" if param.control == Control::Rgb => {
                self.channel = (self.channel + 2) % 3;
                Action::None
            }
            "next_channel" if param.control == Control::Rgb => {
                self.channel = (self.channel + 1) % 3;
                Action::None
            }
            "toggle" => match param.control {
                Control::Checkbox => Action::Param(ParamAction::Toggle { tweak: at.0, param: at.1 }),
                _ => Action::Tweak(TweakAction::Toggle(tweak_idx)),
            },
            "edit" => self.start_edit(state),
            _ => Action::None,
        }
    }

    fn nudge(&self, control: Control, (tweak, param): (usize, usize), steps: f64) -> Action {
        match control {
            Control::Text | Control::TextBox => Action::Param(ParamAction::Step { tweak, param, steps }),
            Control::Checkbox => Action::Param(ParamAction::Toggle { tweak, param }),
            Control::Combobox => Action::Param(ParamAction::Cycle { tweak, param, delta: steps.signum() as i64 }),
            Control::Rgb => Action::Param(ParamAction::StepRgbChannel {
                tweak,
                param,
                channel: self.channel,
                steps,
            }),
        }
    }
}
