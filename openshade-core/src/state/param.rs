use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_PARAM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique parameter handle, used by the UI to address a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamId(u64);

impl ParamId {
    pub fn next() -> Self {
        ParamId(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How a parameter value string is interpreted and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    /// Numeric spinner; also accepts a free-form shader expression
    Text,
    /// `"1"` / `"0"`
    Checkbox,
    /// `"R,G,B"`, two decimals per channel
    Rgb,
    /// Selected index into `range`
    Combobox,
    /// Free text, inserted verbatim
    TextBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Bounds {
    Unbounded,
    Range { min: f64, max: f64 },
}

impl Bounds {
    /// `0, 0` is the catalog's way of saying "no limits".
    pub fn new(min: f64, max: f64) -> Self {
        if min == 0.0 && max == 0.0 {
            Bounds::Unbounded
        } else {
            Bounds::Range { min, max }
        }
    }

    pub fn clamp(&self, v: f64) -> f64 {
        match *self {
            Bounds::Unbounded => v,
            Bounds::Range { min, max } if min <= max => v.clamp(min, max),
            Bounds::Range { .. } => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(',').map(|p| p.trim().parse::<f64>());
        let r = parts.next()?.ok()?;
        let g = parts.next()?.ok()?;
        let b = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { r, g, b })
    }

    pub fn channel(&self, idx: usize) -> f64 {
        match idx {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    fn set_channel(&mut self, idx: usize, v: f64) {
        match idx {
            0 => self.r = v,
            1 => self.g = v,
            _ => self.b = v,
        }
    }

    pub fn to_value_string(&self) -> String {
        format!("{:.2},{:.2},{:.2}", self.r, self.g, self.b)
    }
}

/// Format a number the way values are stored in presets: plain decimal
/// notation, no trailing zeros.
pub fn format_number(v: f64) -> String {
    let s = format!("{:.12}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub id: ParamId,
    /// Preset key. RGB parameters hold three comma-separated keys.
    pub data_name: String,
    pub name: String,
    pub description: String,
    pub value: String,
    pub old_value: String,
    pub default_value: String,
    pub bounds: Bounds,
    pub range: Vec<String>,
    pub control: Control,
}

impl Parameter {
    fn base(data_name: &str, name: &str, value: String, default: String, control: Control) -> Self {
        Self {
            id: ParamId::next(),
            data_name: data_name.to_string(),
            name: name.to_string(),
            description: String::new(),
            old_value: value.clone(),
            value,
            default_value: default,
            bounds: Bounds::Unbounded,
            range: Vec::new(),
            control,
        }
    }

    pub fn number(data_name: &str, name: &str, value: f64, default: f64, min: f64, max: f64, control: Control) -> Self {
        let mut p = Self::base(data_name, name, format_number(value), format_number(default), control);
        p.bounds = Bounds::new(min, max);
        p
    }

    pub fn checkbox(data_name: &str, name: &str, on: bool, default: bool) -> Self {
        let flag = |b: bool| if b { "1" } else { "0" }.to_string();
        let mut p = Self::base(data_name, name, flag(on), flag(default), Control::Checkbox);
        p.bounds = Bounds::new(0.0, 1.0);
        p
    }

    pub fn rgb(data_name: &str, name: &str, value: Rgb, default: Rgb, min: f64, max: f64) -> Self {
        let mut p = Self::base(data_name, name, value.to_value_string(), default.to_value_string(), Control::Rgb);
        p.bounds = Bounds::new(min, max);
        p
    }

    pub fn choice(data_name: &str, name: &str, selected: usize, default: usize, range: &[&str]) -> Self {
        let mut p = Self::base(data_name, name, selected.to_string(), default.to_string(), Control::Combobox);
        p.range = range.iter().map(|s| s.to_string()).collect();
        p
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Raw string comparison: `"1.0"` and `"1.00"` count as different.
    pub fn has_changed(&self) -> bool {
        self.old_value != self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    /// Parse user input according to the control kind. Numbers are clamped
    /// into bounds; spinner parameters also accept shader expressions.
    /// Returns false when the input was rejected and the value left untouched.
    pub fn parse_and_set(&mut self, input: &str) -> bool {
        let input = input.trim();
        match self.control {
            Control::Text => {
                match input.parse::<f64>() {
                    Ok(v) => self.value = format_number(self.bounds.clamp(v)),
                    Err(_) if !input.is_empty() => self.value = input.to_string(),
                    Err(_) => return false,
                }
                true
            }
            Control::TextBox => {
                self.value = input.to_string();
                true
            }
            Control::Checkbox => match input {
                "1" | "true" | "on" => { self.value = "1".into(); true }
                "0" | "false" | "off" => { self.value = "0".into(); true }
                _ => false,
            },
            Control::Rgb => match Rgb::parse(input) {
                Some(mut rgb) => {
                    for c in 0..3 {
                        rgb.set_channel(c, self.bounds.clamp(rgb.channel(c)));
                    }
                    self.value = rgb.to_value_string();
                    true
                }
                None => false,
            },
            Control::Combobox => match input.parse::<usize>() {
                Ok(i) if i < self.range.len() => { self.value = i.to_string(); true }
                _ => match self.range.iter().position(|r| r.eq_ignore_ascii_case(input)) {
                    Some(i) => { self.value = i.to_string(); true }
                    None => false,
                },
            },
        }
    }

    /// Store a number, clamped into bounds.
    pub fn set_numeric(&mut self, v: f64) {
        self.value = format_number(self.bounds.clamp(v));
    }

    pub fn numeric(&self) -> Option<f64> {
        self.value.trim().parse::<f64>().ok()
    }

    /// A spinner parameter currently holding a shader expression rather than a number.
    pub fn is_expression(&self) -> bool {
        matches!(self.control, Control::Text | Control::TextBox) && self.numeric().is_none()
    }

    /// Nudge a numeric value by `steps` increments of one tenth of its magnitude.
    pub fn step(&mut self, steps: f64) {
        match self.control {
            Control::Checkbox => self.toggle(),
            Control::Combobox => self.cycle(steps as i64),
            Control::Rgb => {}
            Control::Text | Control::TextBox => {
                if let Some(v) = self.numeric() {
                    let next = v + step_size(v) * steps;
                    let next = if self.control == Control::Text { self.bounds.clamp(next) } else { next };
                    self.value = format_number(next);
                }
            }
        }
    }

    pub fn toggle(&mut self) {
        if self.control == Control::Checkbox {
            self.value = if self.value == "1" { "0" } else { "1" }.to_string();
        }
    }

    pub fn is_checked(&self) -> bool {
        self.value == "1"
    }

    pub fn cycle(&mut self, delta: i64) {
        if self.control != Control::Combobox || self.range.is_empty() {
            return;
        }
        let len = self.range.len() as i64;
        let current = self.value.parse::<i64>().unwrap_or(0);
        self.value = (current + delta).rem_euclid(len).to_string();
    }

    pub fn selected_label(&self) -> Option<&str> {
        let idx = self.value.parse::<usize>().ok()?;
        self.range.get(idx).map(|s| s.as_str())
    }

    pub fn rgb_value(&self) -> Option<Rgb> {
        Rgb::parse(&self.value)
    }

    pub fn set_rgb_channel(&mut self, channel: usize, v: f64) {
        if let Some(mut rgb) = self.rgb_value() {
            rgb.set_channel(channel, self.bounds.clamp(v));
            self.value = rgb.to_value_string();
        }
    }

    pub fn step_rgb_channel(&mut self, channel: usize, steps: f64) {
        if let Some(rgb) = self.rgb_value() {
            let v = rgb.channel(channel);
            self.set_rgb_channel(channel, v + 0.01 * steps);
        }
    }

    /// Preset keys for the three channels of an RGB parameter.
    pub fn rgb_keys(&self) -> Option<[&str; 3]> {
        let mut it = self.data_name.split(',').map(str::trim);
        Some([it.next()?, it.next()?, it.next()?])
    }

    /// What the previous-value indicator shows.
    pub fn previous_display(&self) -> String {
        match self.control {
            Control::Checkbox => if self.old_value == "1" { "Enabled" } else { "Disabled" }.to_string(),
            Control::Combobox => self
                .old_value
                .parse::<usize>()
                .ok()
                .and_then(|i| self.range.get(i).cloned())
                .unwrap_or_else(|| self.old_value.clone()),
            _ => self.old_value.clone(),
        }
    }

    pub fn reset_default(&mut self) {
        self.value = self.default_value.clone();
    }

    pub fn reset_previous(&mut self) {
        self.value = self.old_value.clone();
    }

    pub fn commit(&mut self) {
        self.old_value = self.value.clone();
    }
}

fn step_size(v: f64) -> f64 {
    if v == 0.0 {
        0.1
    } else {
        10f64.powf(v.abs().log10().floor()) / 10.0
    }
}
