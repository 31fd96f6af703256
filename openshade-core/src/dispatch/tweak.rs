use crate::action::{DispatchResult, ParamAction, TweakAction};
use crate::state::{AppState, Parameter};

pub(super) fn dispatch_tweak(action: &TweakAction, state: &mut AppState) -> DispatchResult {
    match action {
        TweakAction::Toggle(idx) => {
            if let Some(tweak) = state.tweaks.get_mut(*idx) {
                tweak.is_enabled = !tweak.is_enabled;
            }
        }
        TweakAction::ResetDefaults(idx) => {
            if let Some(tweak) = state.tweaks.get_mut(*idx) {
                tweak.reset_defaults();
            }
        }
        TweakAction::ResetPrevious(idx) => {
            if let Some(tweak) = state.tweaks.get_mut(*idx) {
                tweak.reset_previous();
            }
        }
    }
    DispatchResult::none()
}

fn param_mut(state: &mut AppState, tweak: usize, param: usize) -> Option<&mut Parameter> {
    state.tweaks.get_mut(tweak)?.parameters.get_mut(param)
}

pub(super) fn dispatch_param(action: &ParamAction, state: &mut AppState) -> DispatchResult {
    match action {
        ParamAction::Set { tweak, param, value } => {
            let Some(p) = param_mut(state, *tweak, *param) else {
                return DispatchResult::none();
            };
            if !p.parse_and_set(value) {
                let name = p.name.clone();
                state.log.warn(format!("Invalid value '{}' for parameter [{}]", value.trim(), name));
                return DispatchResult::failure();
            }
        }
        ParamAction::Step { tweak, param, steps } => {
            if let Some(p) = param_mut(state, *tweak, *param) {
                p.step(*steps);
            }
        }
        ParamAction::Toggle { tweak, param } => {
            if let Some(p) = param_mut(state, *tweak, *param) {
                p.toggle();
            }
        }
        ParamAction::Cycle { tweak, param, delta } => {
            if let Some(p) = param_mut(state, *tweak, *param) {
                p.cycle(*delta);
            }
        }
        ParamAction::SetRgbChannel { tweak, param, channel, value } => {
            if let Some(p) = param_mut(state, *tweak, *param) {
                p.set_rgb_channel(*channel, *value);
            }
        }
        ParamAction::StepRgbChannel { tweak, param, channel, steps } => {
            if let Some(p) = param_mut(state, *tweak, *param) {
                p.step_rgb_channel(*channel, *steps);
            }
        }
    }
    DispatchResult::none()
}
