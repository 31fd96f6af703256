use std::path::PathBuf;

use crate::apply::ApplyReport;
use crate::state::CustomTweak;

/// Navigation actions (pane switching, modal stack)
#[derive(Debug, Clone, PartialEq)]
pub enum NavAction {
    SwitchPane(&'static str),
    PushPane(&'static str),
    PopPane,
}

/// Tweak-level actions, addressed by catalog index
#[derive(Debug, Clone, PartialEq)]
pub enum TweakAction {
    Toggle(usize),
    ResetDefaults(usize),
    ResetPrevious(usize),
}

/// Parameter edits, addressed by (tweak index, parameter index)
#[derive(Debug, Clone, PartialEq)]
pub enum ParamAction {
    /// Parse and store user input for the parameter's control kind
    Set { tweak: usize, param: usize, value: String },
    Step { tweak: usize, param: usize, steps: f64 },
    Toggle { tweak: usize, param: usize },
    Cycle { tweak: usize, param: usize, delta: i64 },
    SetRgbChannel { tweak: usize, param: usize, channel: usize, value: f64 },
    StepRgbChannel { tweak: usize, param: usize, channel: usize, steps: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresetAction {
    New,
    Open(PathBuf),
    Save,
    SaveAs(PathBuf),
    Apply,
    /// Reload the active preset, discarding edits
    ResetToActive,
    ResetToDefaults,
    SetComment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShaderAction {
    /// Copy live shaders into the backup folder and record the simulator version
    Backup,
    /// The user declined the initial backup
    SkipBackup,
    /// Check the backup folder and enable or disable applying accordingly
    Verify,
    /// Put the pristine backup back into the simulator
    Restore,
    ClearCache,
    SetBackupDir(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomAction {
    Add,
    Update(usize, CustomTweak),
    Remove(usize),
    Toggle(usize),
}

/// Actions that can be returned from pane input handling
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    Nav(NavAction),
    Tweak(TweakAction),
    Param(ParamAction),
    Preset(PresetAction),
    Shader(ShaderAction),
    Custom(CustomAction),
    CycleTheme,
    /// Push a named layer onto the layer stack
    PushLayer(&'static str),
    /// Pop a named layer from the layer stack
    PopLayer(&'static str),
}

/// Navigation intent returned from dispatch, processed by the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum NavIntent {
    SwitchTo(&'static str),
    PushTo(&'static str),
    Pop,
    /// Pop only if the active pane matches the given id
    ConditionalPop(&'static str),
    /// Pop, falling back to SwitchTo if stack is empty
    PopOrSwitchTo(&'static str),
}

/// Result of dispatching an action: side effects for the UI layer to process
#[derive(Debug, Clone, Default)]
pub struct DispatchResult {
    pub quit: bool,
    pub nav: Vec<NavIntent>,
    /// Set when the action ran the apply step
    pub report: Option<ApplyReport>,
    /// The action failed; details are in the activity log
    pub failed: bool,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_quit() -> Self {
        Self { quit: true, ..Self::default() }
    }

    pub fn with_nav(intent: NavIntent) -> Self {
        Self { nav: vec![intent], ..Self::default() }
    }

    pub fn failure() -> Self {
        Self { failed: true, ..Self::default() }
    }

    pub fn push_nav(&mut self, intent: NavIntent) {
        self.nav.push(intent);
    }

    pub fn merge(&mut self, other: DispatchResult) {
        self.quit = self.quit || other.quit;
        self.nav.extend(other.nav);
        if other.report.is_some() {
            self.report = other.report;
        }
        self.failed = self.failed || other.failed;
    }
}
