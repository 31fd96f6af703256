mod frame;
pub mod input;
pub mod keybindings;
pub mod keymap;
pub mod layer;
pub mod layout_helpers;
pub mod pane;
pub mod rat_compat;
pub mod style;
pub mod terminal;
pub mod widgets;

pub use frame::Frame;
pub use input::{InputEvent, KeyCode, Modifiers};
pub use keymap::Keymap;
pub use layer::{LayerResult, LayerStack};
pub use pane::{Pane, PaneManager};
pub use style::{Color, Palette, Style};
pub use terminal::{AppEvent, RatatuiBackend};

pub use crate::action::{
    Action, CustomAction, DispatchResult, NavAction, NavIntent, ParamAction, PresetAction,
    ShaderAction, TweakAction,
};
