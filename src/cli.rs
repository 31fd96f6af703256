//! Command dispatch. Headless commands run the same actions the interactive
//! editor dispatches; activity lines reach the terminal through the logger.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use openshade_core::backup::{check_backup, verify_hashes};
use openshade_core::dispatch::{load_preset_file, startup_guard, verify_backup, StartupGuard};
use openshade_core::state::{CustomTweak, Tweak};

use crate::setup::{self, StartupOptions};
use crate::state::AppState;
use crate::ui::{Action, PresetAction, ShaderAction};
use crate::{dispatch, Commands};

pub(crate) fn execute(command: Commands, opts: &StartupOptions) -> Result<()> {
    let mut state = setup::load_state(opts)?;
    match command {
        Commands::Tui => crate::run_tui(state),
        Commands::Apply { preset, force } => apply(&mut state, preset.as_deref(), force),
        Commands::Backup { yes } => backup(&mut state, yes),
        Commands::Restore { force } => restore(&mut state, force),
        Commands::ClearCache => run(&mut state, Action::Shader(ShaderAction::ClearCache)),
        Commands::Check { hashes } => check(&state, hashes),
        Commands::List { json } => list(&state, json),
    }
}

/// Dispatch one action and turn a failure into an error carrying the last log line.
fn run(state: &mut AppState, action: Action) -> Result<()> {
    let result = dispatch::dispatch_action(&action, state);
    if result.failed {
        let reason = state
            .log
            .last()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| format!("{:?} failed", action));
        bail!(reason);
    }
    if let Some(report) = result.report {
        println!(
            "{}/{} tweaks applied, {} failed{}",
            report.applied,
            report.enabled,
            report.failed(),
            if report.cache_cleared { ", shader cache cleared" } else { "" }
        );
    }
    Ok(())
}

/// Refuse to touch live shaders without a usable backup. A backup taken
/// under another simulator version is refused unless `force` is set.
fn require_backup(state: &mut AppState, force: bool) -> Result<()> {
    match startup_guard(state) {
        StartupGuard::NeedsBackup => bail!(
            "No shader backup in {}. Run `openshade backup` first.",
            state.paths.backup_dir.display()
        ),
        guard @ StartupGuard::VersionChanged { .. } => {
            if let Some(prompt) = guard.prompt() {
                log::warn!("{}", prompt);
            }
            if !force {
                bail!(
                    "Shader backup in {} was taken for another Prepar3D version. \
                     Re-run `openshade backup`, or pass --force to use it anyway.",
                    state.paths.backup_dir.display()
                );
            }
        }
        StartupGuard::Ready => {}
    }
    if !verify_backup(state) {
        bail!("Shader backup in {} is incomplete", state.paths.backup_dir.display());
    }
    Ok(())
}

fn apply(state: &mut AppState, preset: Option<&Path>, force: bool) -> Result<()> {
    if let Some(path) = preset {
        load_preset_file(state, path, false)
            .with_context(|| format!("Failed to load preset file [{}]", path.display()))?;
    } else if state.loaded_preset.is_none() {
        log::warn!("No preset given or loaded; applying default tweaks");
    }
    require_backup(state, force)?;
    run(state, Action::Preset(PresetAction::Apply))?;
    setup::save_settings(state);
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{}\nContinue? [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).context("Failed to read answer")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn backup(state: &mut AppState, yes: bool) -> Result<()> {
    let question = startup_guard(state).prompt().unwrap_or_else(|| {
        format!(
            "The backup in {} will be overwritten with the current shaders.",
            state.paths.backup_dir.display()
        )
    });
    if !yes && !confirm(&question)? {
        println!("Backup cancelled");
        return Ok(());
    }
    run(state, Action::Shader(ShaderAction::Backup))?;
    setup::save_settings(state);
    Ok(())
}

fn restore(state: &mut AppState, force: bool) -> Result<()> {
    require_backup(state, force)?;
    run(state, Action::Shader(ShaderAction::Restore))?;
    setup::save_settings(state);
    Ok(())
}

fn check(state: &AppState, hashes: bool) -> Result<()> {
    let dir = &state.paths.backup_dir;
    let found = check_backup(dir);
    for file in &found.missing {
        println!("missing: {}", file.file_name());
    }
    if !found.is_complete() {
        bail!("Shader backup in {} is incomplete", dir.display());
    }

    if hashes {
        let mismatches = verify_hashes(dir).context("Failed to read the backup checksums")?;
        for m in &mismatches {
            println!("modified: {} (expected {}, found {})", m.file.file_name(), m.expected, m.actual);
        }
        if !mismatches.is_empty() {
            bail!("{} backed-up shader(s) differ from their checksums", mismatches.len());
        }
    }
    println!("Backup in {} is complete", dir.display());
    Ok(())
}

#[derive(Serialize)]
struct Catalog<'a> {
    tweaks: &'a [Tweak],
    custom_tweaks: &'a [CustomTweak],
}

fn list(state: &AppState, json: bool) -> Result<()> {
    if json {
        let catalog = Catalog {
            tweaks: &state.tweaks,
            custom_tweaks: &state.custom_tweaks,
        };
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    let mut category = None;
    for tweak in &state.tweaks {
        if category != Some(tweak.category) {
            category = Some(tweak.category);
            println!("{}", tweak.category);
        }
        println!("  [{}] {}", if tweak.is_enabled { "x" } else { " " }, tweak.name);
        for param in &tweak.parameters {
            println!("        {} = {}", param.name, param.value);
        }
    }
    for custom in &state.custom_tweaks {
        println!(
            "  [{}] {} ({} #{})",
            if custom.is_enabled { "x" } else { " " },
            custom.name,
            custom.shader.file_name(),
            custom.index
        );
    }
    Ok(())
}
