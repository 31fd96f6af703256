// Re-export core crate modules so crate::state, crate::dispatch, etc. resolve throughout the binary
pub use openshade_core::action;
pub use openshade_core::dispatch;
pub use openshade_core::persistence;
pub use openshade_core::state;

mod cli;
mod global_actions;
mod panes;
mod setup;
mod ui;

#[cfg(test)]
mod test_support;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use global_actions::{apply_dispatch_result, handle_global_action, GlobalResult};
use panes::{
    CommentPane, ConfirmPane, CustomTweakPane, LogPane, PathPane, TweakEditPane, TweakListPane,
};
use setup::StartupOptions;
use state::AppState;
use ui::{
    keybindings, Action, AppEvent, Frame, Keymap, LayerResult, LayerStack, NavAction, NavIntent,
    PaneManager, RatatuiBackend,
};

/// Prepar3D shader tweaking
#[derive(Parser)]
#[command(name = "openshade")]
#[command(about = "Tweak Prepar3D v5 shaders through presets")]
struct Cli {
    /// Prepar3D install directory (overrides OPENSHADE_P3D_DIR and settings)
    #[arg(long, global = true)]
    sim_dir: Option<PathBuf>,

    /// Installed Prepar3D version, when it cannot be read from the install
    #[arg(long, global = true)]
    sim_version: Option<String>,

    /// Settings file to use instead of the per-user one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive editor (the default)
    Tui,

    /// Patch the simulator shaders with a preset
    Apply {
        /// Preset file; defaults to the preset loaded last session
        #[arg(long)]
        preset: Option<PathBuf>,

        /// Use a backup taken under another Prepar3D version
        #[arg(long)]
        force: bool,
    },

    /// Copy the live shaders into the backup folder
    Backup {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Put the backed-up shaders back into the simulator
    Restore {
        /// Use a backup taken under another Prepar3D version
        #[arg(long)]
        force: bool,
    },

    /// Empty the compiled shader cache
    ClearCache,

    /// Check the backup folder
    Check {
        /// Also compare files against the recorded checksums
        #[arg(long)]
        hashes: bool,
    },

    /// List the tweak catalog
    List {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let opts = StartupOptions {
        sim_dir: cli.sim_dir,
        sim_version: cli.sim_version,
        config: cli.config,
    };

    let command = cli.command.unwrap_or(Commands::Tui);
    // The terminal belongs to ratatui in interactive mode
    setup::init_logging(!matches!(command, Commands::Tui), cli.verbose);
    cli::execute(command, &opts)
}

fn run_tui(mut state: AppState) -> Result<()> {
    let mut backend = RatatuiBackend::new().context("Failed to open terminal")?;
    backend.start().context("Failed to enter raw mode")?;
    let result = run(&mut backend, &mut state);
    backend.stop().context("Failed to restore terminal")?;

    setup::save_settings(&mut state);
    result
}

fn pane_keymap(keymaps: &mut HashMap<String, Keymap>, id: &str) -> Keymap {
    keymaps.remove(id).unwrap_or_else(Keymap::new)
}

fn run(backend: &mut RatatuiBackend, state: &mut AppState) -> Result<()> {
    // Load keybindings from embedded TOML (with optional user override)
    let (layers, mut keymaps) = keybindings::load_keybindings();

    let mut panes = PaneManager::new(Box::new(TweakListPane::new(pane_keymap(&mut keymaps, "tweaks"))));
    panes.add_pane(Box::new(TweakEditPane::new(pane_keymap(&mut keymaps, "tweak_edit"))));
    panes.add_pane(Box::new(CustomTweakPane::new(pane_keymap(&mut keymaps, "custom"))));
    panes.add_pane(Box::new(LogPane::new(pane_keymap(&mut keymaps, "log"))));
    panes.add_pane(Box::new(CommentPane::new(pane_keymap(&mut keymaps, "comment"))));
    panes.add_pane(Box::new(ConfirmPane::new(pane_keymap(&mut keymaps, "confirm"))));
    panes.add_pane(Box::new(PathPane::new(pane_keymap(&mut keymaps, "path_prompt"))));

    let mut layer_stack = LayerStack::new(layers);
    layer_stack.push("global");

    setup::startup_prompt(state, &mut panes);
    let app_frame = Frame::new();
    let mut dirty = true;

    loop {
        // Sync layer stack in case dispatch switched panes last iteration
        layer_stack.set_pane_layer(panes.active().id());
        sync_text_edit_layer(&panes, &mut layer_stack);

        if dirty {
            backend.draw(|area, buf| {
                let inner = app_frame.render(area, buf, state, panes.active().id());
                panes.render(inner, buf, state);
            })?;
            dirty = false;
        }

        let Some(app_event) = backend.poll_event(Duration::from_millis(250))? else {
            continue;
        };
        dirty = true;
        let event = match app_event {
            AppEvent::Resize => continue,
            AppEvent::Key(event) => event,
        };

        let source = panes.active().id();
        let pane_action = match layer_stack.resolve(&event) {
            LayerResult::Action(action) => {
                match handle_global_action(action, state, &mut panes, &mut layer_stack) {
                    GlobalResult::Quit => break,
                    GlobalResult::Handled => continue,
                    GlobalResult::NotHandled => panes.active_mut().handle_action(action, &event, state),
                }
            }
            LayerResult::Blocked | LayerResult::Unresolved => {
                panes.active_mut().handle_raw_input(&event, state)
            }
        };

        // Process layer management actions
        match &pane_action {
            Action::PushLayer(name) => layer_stack.push(name),
            Action::PopLayer(name) => layer_stack.pop(name),
            Action::Nav(NavAction::PushPane("tweak_edit")) => {
                let selected = panes
                    .get_pane_mut::<TweakListPane>("tweaks")
                    .map(|p| p.selected_tweak());
                if let (Some(idx), Some(edit)) = (selected, panes.get_pane_mut::<TweakEditPane>("tweak_edit")) {
                    edit.set_tweak(idx);
                }
            }
            _ => {}
        }

        // Process navigation
        panes.process_nav(&pane_action, state);

        let mut dispatch_result = dispatch::dispatch_action(&pane_action, state);
        if dispatch_result.quit {
            break;
        }
        let decided = !matches!(pane_action, Action::None | Action::Nav(_) | Action::PushLayer(_) | Action::PopLayer(_));
        if decided && (source == "confirm" || source == "path_prompt") {
            dispatch_result.push_nav(NavIntent::ConditionalPop(source));
        }
        let quit_after_save = source == "confirm"
            && panes
                .get_pane_mut::<ConfirmPane>("confirm")
                .is_some_and(|c| c.take_quit_after_save());
        let failed = dispatch_result.failed;
        apply_dispatch_result(dispatch_result, state, &mut panes);
        if quit_after_save && !failed {
            break;
        }
    }

    Ok(())
}

/// Keep the text_edit layer on the stack exactly while a field has focus.
fn sync_text_edit_layer(panes: &PaneManager, layer_stack: &mut LayerStack) {
    if panes.active().is_editing() {
        layer_stack.push("text_edit");
    } else {
        layer_stack.pop("text_edit");
    }
}
