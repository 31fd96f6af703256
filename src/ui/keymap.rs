use super::input::{InputEvent, KeyCode};

/// What a binding matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPattern {
    /// Plain character, shift allowed (so `"*"` and `"A"` work)
    Char(char),
    /// Named key without modifiers
    Key(KeyCode),
    Ctrl(char),
    Alt(char),
    CtrlKey(KeyCode),
    ShiftKey(KeyCode),
}

impl KeyPattern {
    pub fn matches(&self, event: &InputEvent) -> bool {
        let m = event.modifiers;
        match *self {
            KeyPattern::Char(c) => event.key == KeyCode::Char(c) && !m.ctrl && !m.alt,
            KeyPattern::Key(k) => event.key == k && !m.ctrl && !m.alt && !m.shift,
            KeyPattern::Ctrl(c) => {
                m.ctrl && matches!(event.key, KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
            }
            KeyPattern::Alt(c) => m.alt && event.key == KeyCode::Char(c),
            KeyPattern::CtrlKey(k) => m.ctrl && event.key == k,
            KeyPattern::ShiftKey(k) => m.shift && event.key == k,
        }
    }

    /// Short label for help lines
    pub fn label(&self) -> String {
        fn named(k: KeyCode) -> String {
            match k {
                KeyCode::Char(' ') => "Space".into(),
                KeyCode::Char(c) => c.to_string(),
                KeyCode::Escape => "Esc".into(),
                KeyCode::F(n) => format!("F{}", n),
                other => format!("{:?}", other),
            }
        }
        match *self {
            KeyPattern::Char(c) => named(KeyCode::Char(c)),
            KeyPattern::Key(k) => named(k),
            KeyPattern::Ctrl(c) => format!("^{}", c),
            KeyPattern::Alt(c) => format!("M-{}", c),
            KeyPattern::CtrlKey(k) => format!("^{}", named(k)),
            KeyPattern::ShiftKey(k) => format!("S-{}", named(k)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub pattern: KeyPattern,
    pub action: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bindings(bindings: Vec<KeyBinding>) -> Self {
        Self { bindings }
    }

    /// First binding matching the event wins
    pub fn lookup(&self, event: &InputEvent) -> Option<&'static str> {
        self.bindings
            .iter()
            .find(|b| b.pattern.matches(event))
            .map(|b| b.action)
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// `key label` pairs, one per action, in declaration order
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut seen: Vec<&'static str> = Vec::new();
        let mut out = Vec::new();
        for b in &self.bindings {
            if seen.contains(&b.action) {
                continue;
            }
            seen.push(b.action);
            out.push((b.pattern.label(), b.description));
        }
        out
    }
}
