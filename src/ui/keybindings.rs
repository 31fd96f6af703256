use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use super::keymap::{KeyBinding, KeyPattern, Keymap};
use super::layer::Layer;
use super::KeyCode;

#[derive(Deserialize)]
struct KeybindingConfig {
    #[allow(dead_code)]
    version: u32,
    layers: HashMap<String, LayerConfig>,
}

#[derive(Deserialize)]
struct LayerConfig {
    #[serde(default = "default_transparent")]
    transparent: bool,
    bindings: Vec<RawBinding>,
}

fn default_transparent() -> bool {
    true
}

#[derive(Deserialize)]
struct RawBinding {
    key: String,
    action: String,
    description: String,
}

/// Bindings live for the whole session, so their strings are leaked once.
fn intern(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Parse key notation: `"q"`, `"Space"`, `"Up"`, `"F5"`, `"Ctrl+s"`,
/// `"Alt+x"`, `"Ctrl+Left"`, `"Shift+Right"`.
fn parse_key(s: &str) -> Result<KeyPattern, String> {
    if let Some(rest) = s.strip_prefix("Ctrl+") {
        match single_char(rest) {
            Some(c) => Ok(KeyPattern::Ctrl(c)),
            None => parse_named_key(rest).map(KeyPattern::CtrlKey),
        }
    } else if let Some(rest) = s.strip_prefix("Alt+") {
        single_char(rest)
            .map(KeyPattern::Alt)
            .ok_or_else(|| format!("Alt binding needs a single character: {}", s))
    } else if let Some(rest) = s.strip_prefix("Shift+") {
        parse_named_key(rest).map(KeyPattern::ShiftKey)
    } else if let Some(c) = single_char(s) {
        Ok(KeyPattern::Char(c))
    } else if s == "Space" {
        Ok(KeyPattern::Char(' '))
    } else {
        parse_named_key(s).map(KeyPattern::Key)
    }
}

fn parse_named_key(s: &str) -> Result<KeyCode, String> {
    let code = match s {
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "BackTab" => KeyCode::BackTab,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Insert" => KeyCode::Insert,
        "Delete" => KeyCode::Delete,
        _ => match s.strip_prefix('F').map(str::parse::<u8>) {
            Some(Ok(n)) => KeyCode::F(n),
            _ => return Err(format!("unknown key: {}", s)),
        },
    };
    Ok(code)
}

const DEFAULT_KEYBINDINGS: &str = include_str!("../../keybindings.toml");

/// Layers that belong to no pane
const MODE_LAYERS: &[&str] = &["global", "text_edit"];

/// Embedded defaults, with layers from the user's override file replacing
/// the built-in ones. Returns the layers for the `LayerStack` and one keymap
/// per pane.
pub fn load_keybindings() -> (Vec<Layer>, HashMap<String, Keymap>) {
    let mut config: KeybindingConfig =
        toml::from_str(DEFAULT_KEYBINDINGS).expect("embedded keybindings.toml is valid");

    if let Some(path) = user_keybindings_path().filter(|p| p.exists()) {
        match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| toml::from_str::<KeybindingConfig>(&text).map_err(|e| e.to_string()))
        {
            Ok(user) => {
                log::info!("Loaded keybindings from {}", path.display());
                merge_config(&mut config, user);
            }
            Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
        }
    }

    let layers = build_layers(&config.layers);
    let pane_keymaps = build_pane_keymaps(&config.layers);
    (layers, pane_keymaps)
}

fn user_keybindings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("openshade").join("keybindings.toml"))
}

fn merge_config(base: &mut KeybindingConfig, user: KeybindingConfig) {
    for (layer_id, layer_config) in user.layers {
        base.layers.insert(layer_id, layer_config);
    }
}

fn build_bindings(layer: &str, raw: &[RawBinding]) -> Vec<KeyBinding> {
    raw.iter()
        .filter_map(|b| match parse_key(&b.key) {
            Ok(pattern) => Some(KeyBinding {
                pattern,
                action: intern(b.action.clone()),
                description: intern(b.description.clone()),
            }),
            Err(e) => {
                log::warn!("[{}] {}", layer, e);
                None
            }
        })
        .collect()
}

fn build_layers(layers: &HashMap<String, LayerConfig>) -> Vec<Layer> {
    layers
        .iter()
        .map(|(name, config)| Layer {
            name: intern(name.clone()),
            keymap: Keymap::from_bindings(build_bindings(name, &config.bindings)),
            transparent: config.transparent,
        })
        .collect()
}

fn build_pane_keymaps(layers: &HashMap<String, LayerConfig>) -> HashMap<String, Keymap> {
    layers
        .iter()
        .filter(|(name, _)| !MODE_LAYERS.contains(&name.as_str()))
        .map(|(name, config)| (name.clone(), Keymap::from_bindings(build_bindings(name, &config.bindings))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_named_keys() {
        assert_eq!(parse_key("q"), Ok(KeyPattern::Char('q')));
        assert_eq!(parse_key("["), Ok(KeyPattern::Char('[')));
        assert_eq!(parse_key("Space"), Ok(KeyPattern::Char(' ')));
        assert_eq!(parse_key("Enter"), Ok(KeyPattern::Key(KeyCode::Enter)));
        assert_eq!(parse_key("F12"), Ok(KeyPattern::Key(KeyCode::F(12))));
    }

    #[test]
    fn parses_modifiers() {
        assert_eq!(parse_key("Ctrl+s"), Ok(KeyPattern::Ctrl('s')));
        assert_eq!(parse_key("Alt+x"), Ok(KeyPattern::Alt('x')));
        assert_eq!(parse_key("Ctrl+Left"), Ok(KeyPattern::CtrlKey(KeyCode::Left)));
        assert_eq!(parse_key("Shift+BackTab"), Ok(KeyPattern::ShiftKey(KeyCode::BackTab)));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(parse_key("Hyper").is_err());
        assert!(parse_key("Alt+Left").is_err());
        assert!(parse_key("Fx").is_err());
    }

    #[test]
    fn embedded_bindings_cover_every_pane() {
        let (layers, pane_keymaps) = load_keybindings();
        assert!(layers.iter().any(|l| l.name == "text_edit" && !l.transparent));
        for pane in ["tweaks", "tweak_edit", "custom", "log", "comment", "path_prompt", "confirm"] {
            assert!(pane_keymaps.contains_key(pane), "missing {}", pane);
        }
        assert!(!pane_keymaps.contains_key("global"));
        let global = layers.iter().find(|l| l.name == "global").map(|l| &l.keymap);
        assert_eq!(global.and_then(|k| k.lookup(&crate::ui::InputEvent::key(KeyCode::F(5)))), Some("apply"));
    }
}
