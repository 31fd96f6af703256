use std::collections::HashMap;

use super::input::InputEvent;
use super::keymap::Keymap;

/// A named keymap participating in resolution
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: &'static str,
    pub keymap: Keymap,
    /// Unmatched keys fall through to the layer below
    pub transparent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerResult {
    Action(&'static str),
    /// An opaque layer swallowed the key; the pane gets it as raw input
    Blocked,
    Unresolved,
}

/// Resolution order, top first: pushed mode layers, the active pane's layer,
/// then the base layers.
pub struct LayerStack {
    layers: HashMap<&'static str, Layer>,
    stack: Vec<&'static str>,
    pane_layer: Option<&'static str>,
}

impl LayerStack {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self {
            layers: layers.into_iter().map(|l| (l.name, l)).collect(),
            stack: Vec::new(),
            pane_layer: None,
        }
    }

    pub fn push(&mut self, name: &str) {
        if self.has_layer(name) {
            return;
        }
        if let Some(layer) = self.layers.get(name) {
            self.stack.push(layer.name);
        } else {
            log::warn!("unknown key layer {}", name);
        }
    }

    pub fn pop(&mut self, name: &str) {
        self.stack.retain(|l| *l != name);
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.stack.iter().any(|l| *l == name)
    }

    pub fn set_pane_layer(&mut self, pane_id: &str) {
        self.pane_layer = self.layers.get(pane_id).map(|l| l.name);
    }

    fn order(&self) -> Vec<&'static str> {
        // The base layer ("global") is pushed first and stays at the bottom
        let mut order: Vec<&'static str> = Vec::with_capacity(self.stack.len() + 1);
        let (base, modes) = self.stack.split_at(self.stack.len().min(1));
        order.extend(modes.iter().rev());
        order.extend(self.pane_layer);
        order.extend(base);
        order
    }

    pub fn resolve(&self, event: &InputEvent) -> LayerResult {
        for name in self.order() {
            let Some(layer) = self.layers.get(name) else {
                continue;
            };
            if let Some(action) = layer.keymap.lookup(event) {
                return LayerResult::Action(action);
            }
            if !layer.transparent {
                return LayerResult::Blocked;
            }
        }
        LayerResult::Unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::input::KeyCode;
    use crate::ui::keymap::{KeyBinding, KeyPattern};

    fn layer(name: &'static str, transparent: bool, bindings: &[(KeyPattern, &'static str)]) -> Layer {
        Layer {
            name,
            transparent,
            keymap: Keymap::from_bindings(
                bindings
                    .iter()
                    .map(|(pattern, action)| KeyBinding { pattern: *pattern, action: *action, description: "" })
                    .collect(),
            ),
        }
    }

    fn stack() -> LayerStack {
        let mut s = LayerStack::new(vec![
            layer("global", true, &[(KeyPattern::Ctrl('q'), "quit"), (KeyPattern::Char('?'), "help")]),
            layer("tweaks", true, &[(KeyPattern::Char(' '), "toggle"), (KeyPattern::Char('?'), "pane_help")]),
            layer("text_edit", false, &[(KeyPattern::Key(KeyCode::Enter), "text:confirm")]),
        ]);
        s.push("global");
        s.set_pane_layer("tweaks");
        s
    }

    #[test]
    fn pane_layer_shadows_global() {
        let s = stack();
        assert_eq!(s.resolve(&InputEvent::key(KeyCode::Char('?'))), LayerResult::Action("pane_help"));
        assert_eq!(s.resolve(&InputEvent::ctrl('q')), LayerResult::Action("quit"));
        assert_eq!(s.resolve(&InputEvent::key(KeyCode::Char('z'))), LayerResult::Unresolved);
    }

    #[test]
    fn opaque_mode_layer_blocks() {
        let mut s = stack();
        s.push("text_edit");
        s.push("text_edit");
        assert_eq!(s.resolve(&InputEvent::key(KeyCode::Char(' '))), LayerResult::Blocked);
        assert_eq!(s.resolve(&InputEvent::key(KeyCode::Enter)), LayerResult::Action("text:confirm"));
        s.pop("text_edit");
        assert!(!s.has_layer("text_edit"));
        assert_eq!(s.resolve(&InputEvent::key(KeyCode::Char(' '))), LayerResult::Action("toggle"));
    }
}
